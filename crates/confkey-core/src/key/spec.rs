use std::fmt;
use std::marker::PhantomData;

use super::{DynKey, Key};
use crate::error::Result;
use crate::types::TypeDesc;
use crate::value::Configurable;

/// A reusable (name, type) pair resolving to a child key under any parent.
pub struct KeySpec<T> {
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Configurable> KeySpec<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> TypeDesc {
        T::descriptor()
    }

    pub fn resolve<'c, P>(&self, parent: &P) -> Key<'c, T>
    where
        P: AsRef<DynKey<'c>> + ?Sized,
    {
        parent.as_ref().child(self.name.as_str())
    }

    pub fn get_value<'c, P>(&self, parent: &P) -> Result<T>
    where
        P: AsRef<DynKey<'c>> + ?Sized,
    {
        self.resolve(parent).get_value()
    }

    pub fn set_value<'c, P>(&self, parent: &P, value: T) -> Result<()>
    where
        P: AsRef<DynKey<'c>> + ?Sized,
    {
        self.resolve(parent).set_value(value)
    }
}

impl<T> Clone for KeySpec<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for KeySpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySpec").field("name", &self.name).finish()
    }
}
