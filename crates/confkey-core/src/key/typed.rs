use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::rc::Rc;

use super::{DynKey, IndexKey};
use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::types::TypeDesc;
use crate::value::Configurable;

/// Typed key: a [`DynKey`] whose values convert to and from `T`.
pub struct Key<'c, T> {
    key: DynKey<'c>,
    _marker: PhantomData<fn() -> T>,
}

impl<'c, T: Configurable> Key<'c, T> {
    /// Wraps `key` as is; its descriptor is expected to describe `T`.
    pub fn from_dyn(key: DynKey<'c>) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    pub fn as_dyn(&self) -> &DynKey<'c> {
        &self.key
    }

    pub fn into_dyn(self) -> DynKey<'c> {
        self.key
    }

    pub fn name(&self) -> Option<&str> {
        self.key.name()
    }

    pub fn desc(&self) -> &TypeDesc {
        self.key.desc()
    }

    pub fn parent(&self) -> Option<&DynKey<'c>> {
        self.key.parent()
    }

    pub fn get_key<U: Configurable>(&self, name: impl Into<String>) -> Key<'c, U> {
        self.key.child(name)
    }

    pub fn get_key_section(&self, name: impl Into<String>) -> DynKey<'c> {
        self.key.get_key_section(name)
    }

    /// Emulated view of this key typed as `U`.
    pub fn get_as<U: Configurable>(&self) -> Key<'c, U> {
        Key::from_dyn(self.key.get_as(U::descriptor()))
    }

    /// Emulated view of this key typed as `U` over another storage.
    pub fn get_as_with<U: Configurable>(&self, storage: Rc<dyn Storage + 'c>) -> Key<'c, U> {
        Key::from_dyn(self.key.get_as_with(U::descriptor(), storage))
    }

    pub fn get_value(&self) -> Result<T> {
        let object = self.key.get_value()?;
        T::from_object(object).map_err(|err| {
            Error::serialization_with(&self.key, format!("cannot read value as '{}'", self.desc()), err)
        })
    }

    pub fn set_value(&self, value: T) -> Result<()> {
        self.key.set_value(value.into_object())
    }

    /// Value of this key, or `default` if the key holds nothing.
    pub fn get_value_or(&self, default: T) -> Result<T> {
        if self.exists() {
            self.get_value()
        } else {
            Ok(default)
        }
    }

    pub fn exists(&self) -> bool {
        self.key.exists()
    }

    pub fn remove(&self) -> Result<bool> {
        self.key.remove()
    }

    pub fn path(&self) -> Vec<String> {
        self.key.path()
    }

    pub fn path_string(&self) -> String {
        self.key.path_string()
    }
}

impl<'c, T: Configurable> Key<'c, Vec<T>> {
    /// Key of the existing element at `index`.
    pub fn index(&self, index: usize) -> IndexKey<'c, T> {
        IndexKey::new(self, index)
    }
}

impl<'c, T> AsRef<DynKey<'c>> for Key<'c, T> {
    fn as_ref(&self) -> &DynKey<'c> {
        &self.key
    }
}

impl<T> Clone for Key<'_, T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Key<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for Key<'_, T> {}

impl<T> Hash for Key<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T> fmt::Display for Key<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, f)
    }
}

impl<T> fmt::Debug for Key<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.key).finish()
    }
}
