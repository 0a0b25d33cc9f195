use std::fmt;
use std::rc::Rc;

use super::{DynKey, Key, element_name};
use crate::error::Result;
use crate::storage::{IndexStorage, Storage};
use crate::value::Configurable;

/// Key addressing the existing element at a fixed index of a list key.
///
/// Reading or writing an index past the end fails with
/// [`Error::IndexOutOfBounds`](crate::Error::IndexOutOfBounds); the list never grows.
pub struct IndexKey<'c, T> {
    key: Key<'c, T>,
    index: usize,
}

impl<'c, T: Configurable> IndexKey<'c, T> {
    pub fn new(list: &Key<'c, Vec<T>>, index: usize) -> Self {
        let list_key = list.as_dyn();
        let storage: Rc<dyn Storage + 'c> = Rc::new(IndexStorage::new(
            list_key.storage().clone(),
            list_key.clone(),
            index,
        ));
        let key = list_key.emulate(element_name(list_key, index), T::descriptor(), storage);

        Self {
            key: Key::from_dyn(key),
            index,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn key(&self) -> &Key<'c, T> {
        &self.key
    }

    pub fn get_value(&self) -> Result<T> {
        self.key.get_value()
    }

    pub fn set_value(&self, value: T) -> Result<()> {
        self.key.set_value(value)
    }

    pub fn exists(&self) -> bool {
        self.key.exists()
    }
}

impl<'c, T> AsRef<DynKey<'c>> for IndexKey<'c, T> {
    fn as_ref(&self) -> &DynKey<'c> {
        self.key.as_ref()
    }
}

impl<T> fmt::Debug for IndexKey<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexKey")
            .field("key", &self.key)
            .field("index", &self.index)
            .finish()
    }
}
