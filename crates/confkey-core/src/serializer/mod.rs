//! # Confkey Serializers
//!
//! Type-directed conversion between domain values ([`Object`]) and raw values.
//!
//! A [`Serializer`] receives the key, its type descriptor, its storage and the
//! registry, so it can create further (usually emulated) keys and recurse through
//! [`Serializers::write`] and [`Serializers::read`].
//!
//! ## Components
//!
//! - [`Serializer`]: the conversion trait.
//! - [`Serializers`]: registry chained to a parent registry, plus the named-type
//!   hierarchy used for supertype registrations.
//! - [`builtin`]: scalars, lists, maps, enums, uuids, type descriptors and type names.
use crate::error::Result;
use crate::key::DynKey;
use crate::storage::Storage;
use crate::types::TypeDesc;
use crate::value::Object;

pub mod builtin;
pub mod registry;

pub use registry::Serializers;

/// Converts values of one family of types between [`Object`] and raw form.
pub trait Serializer: Send + Sync {
    /// Writes `value` as the raw value of `key` into `storage`.
    fn serialize(
        &self,
        value: Object,
        key: &DynKey<'_>,
        desc: &TypeDesc,
        storage: &dyn Storage,
        serializers: &Serializers,
    ) -> Result<()>;

    /// Reads the raw value of `key` from `storage` back into a domain value.
    fn deserialize(
        &self,
        key: &DynKey<'_>,
        desc: &TypeDesc,
        storage: &dyn Storage,
        serializers: &Serializers,
    ) -> Result<Object>;
}

#[cfg(test)]
mod tests;
