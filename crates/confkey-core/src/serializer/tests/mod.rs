
use serde_json::Value;

use crate::error::Result;
use crate::key::DynKey;
use crate::serializer::{Serializer, Serializers};
use crate::storage::Storage;
use crate::types::TypeDesc;
use crate::value::Object;

/// Writes a fixed tag, so tests can tell which registration handled a key.
pub(super) struct Tagged(pub &'static str);

impl Serializer for Tagged {
    fn serialize(
        &self,
        _value: Object,
        key: &DynKey<'_>,
        _desc: &TypeDesc,
        storage: &dyn Storage,
        _serializers: &Serializers,
    ) -> Result<()> {
        storage.push_value(key, Value::String(self.0.to_string()))
    }

    fn deserialize(
        &self,
        _key: &DynKey<'_>,
        _desc: &TypeDesc,
        _storage: &dyn Storage,
        _serializers: &Serializers,
    ) -> Result<Object> {
        Ok(Object::String(self.0.to_string()))
    }
}
