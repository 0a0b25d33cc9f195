use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use super::map::edit_entry;
use super::{Storage, slot_name};
use crate::error::Result;
use crate::key::DynKey;
use crate::value::RawMap;

/// A section nested under the slot of an outer key.
///
/// Nothing is cached: every operation goes back through the outer storage, so a
/// section replaced wholesale by another writer is always seen fresh. Writes create
/// the section (replacing a non-map value); reads never do.
pub struct InnerStorage<'c> {
    outer: Rc<dyn Storage + 'c>,
    outer_key: DynKey<'c>,
}

impl<'c> InnerStorage<'c> {
    pub fn new(outer: Rc<dyn Storage + 'c>, outer_key: DynKey<'c>) -> Self {
        Self { outer, outer_key }
    }

    pub fn outer_key(&self) -> &DynKey<'c> {
        &self.outer_key
    }
}

impl Storage for InnerStorage<'_> {
    fn peek(&self, key: &DynKey<'_>, visit: &mut dyn FnMut(Option<&Value>)) {
        let name = slot_name(key);
        self.outer.peek(&self.outer_key, &mut |section| {
            visit(section.and_then(Value::as_object).and_then(|map| map.get(name)));
        });
    }

    fn modify(&self, key: &DynKey<'_>, edit: &mut dyn FnMut(&mut Value) -> Result<()>) -> Result<()> {
        let name = slot_name(key);
        self.outer.modify(&self.outer_key, &mut |section| {
            if !section.is_object() {
                log::trace!("Creating section '{}'", self.outer_key);
                *section = Value::Object(RawMap::new());
            }
            match section {
                Value::Object(map) => edit_entry(map, name, edit),
                _ => Ok(()),
            }
        })
    }

    fn remove_value(&self, key: &DynKey<'_>) -> Result<Option<Value>> {
        if !self.outer.exists(&self.outer_key) {
            return Ok(None);
        }
        let name = slot_name(key);
        let mut removed = None;
        self.outer.modify(&self.outer_key, &mut |section| {
            removed = section.as_object_mut().and_then(|map| map.shift_remove(name));
            Ok(())
        })?;
        Ok(removed)
    }
}

/// An owned section pushed whole as the value of a target key.
///
/// Every write pushes the full section again, which also restores it if the target
/// storage lost it in between. Serializers use this for per-entry scratch space.
pub struct AutoPushMapStorage<'c> {
    section: RefCell<RawMap>,
    target: Rc<dyn Storage + 'c>,
    target_key: DynKey<'c>,
}

impl<'c> AutoPushMapStorage<'c> {
    pub fn new(target: Rc<dyn Storage + 'c>, target_key: DynKey<'c>) -> Self {
        Self {
            section: RefCell::new(RawMap::new()),
            target,
            target_key,
        }
    }

    fn push_section(&self) -> Result<()> {
        let section = Value::Object(self.section.borrow().clone());
        self.target.push_value(&self.target_key, section)
    }
}

impl Storage for AutoPushMapStorage<'_> {
    fn peek(&self, key: &DynKey<'_>, visit: &mut dyn FnMut(Option<&Value>)) {
        visit(self.section.borrow().get(slot_name(key)));
    }

    fn modify(&self, key: &DynKey<'_>, edit: &mut dyn FnMut(&mut Value) -> Result<()>) -> Result<()> {
        edit_entry(&mut self.section.borrow_mut(), slot_name(key), edit)?;
        self.push_section()
    }

    fn remove_value(&self, key: &DynKey<'_>) -> Result<Option<Value>> {
        let removed = self.section.borrow_mut().shift_remove(slot_name(key));
        self.push_section()?;
        Ok(removed)
    }
}
