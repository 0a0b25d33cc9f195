use std::cell::RefCell;

use serde_json::Value;

use super::{Storage, slot_name};
use crate::error::{Error, Result};
use crate::key::DynKey;
use crate::value::{RawMap, raw_kind};

/// Edits the entry `name` of `map`, dropping it again if it was created for a failed edit.
pub(crate) fn edit_entry(
    map: &mut RawMap,
    name: &str,
    edit: &mut dyn FnMut(&mut Value) -> Result<()>,
) -> Result<()> {
    let inserted = !map.contains_key(name);
    let result = edit(map.entry(name).or_insert(Value::Null));
    if result.is_err() && inserted {
        map.shift_remove(name);
    }
    result
}

/// Flat storage over a shared map, keyed by the key's name.
///
/// Backs the direct children of a config's root key.
pub struct MapStorage<'a> {
    map: &'a RefCell<RawMap>,
}

impl<'a> MapStorage<'a> {
    pub fn new(map: &'a RefCell<RawMap>) -> Self {
        Self { map }
    }
}

impl Storage for MapStorage<'_> {
    fn peek(&self, key: &DynKey<'_>, visit: &mut dyn FnMut(Option<&Value>)) {
        let map = self.map.borrow();
        visit(map.get(slot_name(key)));
    }

    fn modify(&self, key: &DynKey<'_>, edit: &mut dyn FnMut(&mut Value) -> Result<()>) -> Result<()> {
        let mut map = self.map.borrow_mut();
        edit_entry(&mut map, slot_name(key), edit)
    }

    fn remove_value(&self, key: &DynKey<'_>) -> Result<Option<Value>> {
        Ok(self.map.borrow_mut().shift_remove(slot_name(key)))
    }
}

/// The whole map as the single value of the root key.
pub struct RootStorage<'a> {
    map: &'a RefCell<RawMap>,
}

impl<'a> RootStorage<'a> {
    pub fn new(map: &'a RefCell<RawMap>) -> Self {
        Self { map }
    }
}

impl Storage for RootStorage<'_> {
    fn peek(&self, _key: &DynKey<'_>, visit: &mut dyn FnMut(Option<&Value>)) {
        let snapshot = Value::Object(self.map.borrow().clone());
        visit(Some(&snapshot));
    }

    fn modify(&self, key: &DynKey<'_>, edit: &mut dyn FnMut(&mut Value) -> Result<()>) -> Result<()> {
        let mut map = self.map.borrow_mut();
        let mut value = Value::Object(map.clone());
        edit(&mut value)?;
        match value {
            Value::Object(edited) => {
                *map = edited;
                Ok(())
            }
            other => Err(Error::serialization(
                key,
                format!("the root value must be a map, found {}", raw_kind(&other)),
            )),
        }
    }

    fn remove_value(&self, _key: &DynKey<'_>) -> Result<Option<Value>> {
        let removed = std::mem::take(&mut *self.map.borrow_mut());
        Ok(Some(Value::Object(removed)))
    }
}

/// A single value cell, ignoring the key it is addressed with.
#[derive(Debug, Default)]
pub struct CellStorage {
    cell: RefCell<Option<Value>>,
}

impl CellStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: Value) -> Self {
        Self {
            cell: RefCell::new(Some(value)),
        }
    }

    /// Takes the staged value out of the cell.
    pub fn take(&self) -> Option<Value> {
        self.cell.borrow_mut().take()
    }
}

impl Storage for CellStorage {
    fn peek(&self, _key: &DynKey<'_>, visit: &mut dyn FnMut(Option<&Value>)) {
        visit(self.cell.borrow().as_ref());
    }

    fn modify(&self, _key: &DynKey<'_>, edit: &mut dyn FnMut(&mut Value) -> Result<()>) -> Result<()> {
        let mut cell = self.cell.borrow_mut();
        let inserted = cell.is_none();
        let result = edit(cell.get_or_insert(Value::Null));
        if result.is_err() && inserted {
            *cell = None;
        }
        result
    }

    fn remove_value(&self, _key: &DynKey<'_>) -> Result<Option<Value>> {
        Ok(self.take())
    }
}
