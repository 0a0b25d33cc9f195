//! # Confkey Storage Strategies
//!
//! A [`Storage`] decides where the raw value of one key physically lives. It never
//! serializes; it only moves already-raw [`Value`]s in and out of a slot addressed by
//! the key (usually by its local name, sometimes by its identity).
//!
//! ## Strategies
//!
//! - [`MapStorage`]: entries of the config's root map, keyed by name.
//! - [`RootStorage`]: the whole root map as the value of the root key.
//! - [`CellStorage`]: a single value cell, used as a staging area.
//! - [`InnerStorage`]: a section nested under an outer (storage, key) pair, re-read on
//!   every access.
//! - [`AutoPushMapStorage`]: an owned section pushed whole to a target key on each write.
//! - [`ListStorage`]: per-element slots keyed by element identity, re-pushed as an
//!   ordered list on each write.
//! - [`IndexStorage`]: one existing element of a list held by an outer storage.
use serde_json::Value;

use crate::error::{Error, Result};
use crate::key::DynKey;

pub mod inner;
pub mod list;
pub mod map;

pub use inner::{AutoPushMapStorage, InnerStorage};
pub use list::{IndexStorage, ListStorage};
pub use map::{CellStorage, MapStorage, RootStorage};

/// Physical access to the raw value of a key.
///
/// Implementors provide borrow-based [`peek`](Storage::peek) and
/// [`modify`](Storage::modify); the value-level operations derive from them.
pub trait Storage {
    /// Calls `visit` with the current raw value of `key`, or `None` if absent.
    fn peek(&self, key: &DynKey<'_>, visit: &mut dyn FnMut(Option<&Value>));

    /// Calls `edit` with a mutable slot for `key`, inserting `null` first if the slot
    /// is absent. Missing intermediate sections are created.
    fn modify(&self, key: &DynKey<'_>, edit: &mut dyn FnMut(&mut Value) -> Result<()>) -> Result<()>;

    /// Removes the slot of `key`, returning its value if it was present.
    fn remove_value(&self, key: &DynKey<'_>) -> Result<Option<Value>>;

    fn push_value(&self, key: &DynKey<'_>, value: Value) -> Result<()> {
        let mut value = Some(value);
        self.modify(key, &mut |slot| {
            if let Some(value) = value.take() {
                *slot = value;
            }
            Ok(())
        })
    }

    /// Clone of the raw value of `key`; [`Error::KeyNotFound`] when absent.
    fn fetch_value(&self, key: &DynKey<'_>) -> Result<Value> {
        let mut found = None;
        self.peek(key, &mut |value| found = value.cloned());
        found.ok_or_else(|| Error::key_not_found(key))
    }

    fn exists(&self, key: &DynKey<'_>) -> bool {
        let mut present = false;
        self.peek(key, &mut |value| present = value.is_some());
        present
    }
}

/// Local name of a key inside a section.
pub(crate) fn slot_name<'k>(key: &'k DynKey<'_>) -> &'k str {
    key.name().unwrap_or_default()
}

#[cfg(test)]
mod tests;
