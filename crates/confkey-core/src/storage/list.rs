use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use super::Storage;
use crate::error::{Error, Result};
use crate::key::{DynKey, KeyIdentity};

/// Element slots of one list (de)serialization, keyed by element identity.
///
/// Reads only ever consult the element slots. Every write re-derives the ordered
/// list of slot values and pushes it to the backing (storage, key).
pub struct ListStorage<'c> {
    elements: RefCell<IndexMap<KeyIdentity, Value>>,
    backing: Rc<dyn Storage + 'c>,
    backing_key: DynKey<'c>,
}

impl<'c> ListStorage<'c> {
    pub fn new(backing: Rc<dyn Storage + 'c>, backing_key: DynKey<'c>) -> Self {
        Self {
            elements: RefCell::new(IndexMap::new()),
            backing,
            backing_key,
        }
    }

    /// Seeds the slot of an element without pushing to the backing storage.
    pub fn insert_raw(&self, key: &DynKey<'_>, value: Value) {
        self.elements.borrow_mut().insert(key.identity().clone(), value);
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push_list(&self) -> Result<()> {
        let list = Value::Array(self.elements.borrow().values().cloned().collect());
        self.backing.push_value(&self.backing_key, list)
    }
}

impl Storage for ListStorage<'_> {
    fn peek(&self, key: &DynKey<'_>, visit: &mut dyn FnMut(Option<&Value>)) {
        visit(self.elements.borrow().get(key.identity()));
    }

    fn modify(&self, key: &DynKey<'_>, edit: &mut dyn FnMut(&mut Value) -> Result<()>) -> Result<()> {
        {
            let mut elements = self.elements.borrow_mut();
            let identity = key.identity();
            let inserted = !elements.contains_key(identity);
            let result = edit(elements.entry(identity.clone()).or_insert(Value::Null));
            if let Err(err) = result {
                if inserted {
                    elements.shift_remove(identity);
                }
                return Err(err);
            }
        }
        self.push_list()
    }

    fn remove_value(&self, key: &DynKey<'_>) -> Result<Option<Value>> {
        let removed = self.elements.borrow_mut().shift_remove(key.identity());
        if removed.is_some() {
            self.push_list()?;
        }
        Ok(removed)
    }
}

/// One existing element of a list held by an outer storage.
///
/// The key passed to each operation is ignored; the element is addressed by
/// (outer storage, list key, index). Reads and writes never grow the list.
pub struct IndexStorage<'c> {
    outer: Rc<dyn Storage + 'c>,
    list_key: DynKey<'c>,
    index: usize,
}

impl<'c> IndexStorage<'c> {
    pub fn new(outer: Rc<dyn Storage + 'c>, list_key: DynKey<'c>, index: usize) -> Self {
        Self {
            outer,
            list_key,
            index,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Length of the backing list, `None` if the list key holds no list.
    fn list_len(&self) -> Option<usize> {
        let mut len = None;
        self.outer.peek(&self.list_key, &mut |value| {
            len = value.and_then(Value::as_array).map(Vec::len);
        });
        len
    }

    fn check_bounds(&self) -> Result<()> {
        match self.list_len() {
            None if !self.outer.exists(&self.list_key) => Err(Error::key_not_found(&self.list_key)),
            None => Err(Error::serialization(&self.list_key, "value is not a list")),
            Some(len) if self.index >= len => Err(Error::IndexOutOfBounds {
                key: self.list_key.to_string(),
                index: self.index,
                len,
            }),
            Some(_) => Ok(()),
        }
    }
}

impl Storage for IndexStorage<'_> {
    fn peek(&self, _key: &DynKey<'_>, visit: &mut dyn FnMut(Option<&Value>)) {
        let index = self.index;
        self.outer.peek(&self.list_key, &mut |value| {
            visit(value.and_then(Value::as_array).and_then(|items| items.get(index)));
        });
    }

    fn modify(&self, _key: &DynKey<'_>, edit: &mut dyn FnMut(&mut Value) -> Result<()>) -> Result<()> {
        self.check_bounds()?;
        let index = self.index;
        self.outer.modify(&self.list_key, &mut |value| {
            match value.as_array_mut().and_then(|items| items.get_mut(index)) {
                Some(slot) => edit(slot),
                None => Ok(()),
            }
        })
    }

    fn remove_value(&self, _key: &DynKey<'_>) -> Result<Option<Value>> {
        self.check_bounds()?;
        let index = self.index;
        let mut removed = None;
        self.outer.modify(&self.list_key, &mut |value| {
            if let Some(items) = value.as_array_mut() {
                removed = Some(items.remove(index));
            }
            Ok(())
        })?;
        Ok(removed)
    }

    fn fetch_value(&self, _key: &DynKey<'_>) -> Result<Value> {
        self.check_bounds()?;
        let mut found = None;
        self.peek(&self.list_key, &mut |value| found = value.cloned());
        found.ok_or_else(|| Error::key_not_found(&self.list_key))
    }
}
