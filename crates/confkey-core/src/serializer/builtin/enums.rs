use serde_json::Value;

use crate::error::{Error, Result};
use crate::key::DynKey;
use crate::serializer::{Serializer, Serializers};
use crate::storage::Storage;
use crate::types::TypeDesc;
use crate::value::{Object, raw_kind};

/// Serializer for enumerations, registered under the enum marker descriptor.
///
/// A value is stored as its variant name. Variant names are checked against the
/// variants carried by the key's [`TypeDesc::Enum`] in both directions.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumSerializer;

fn check_variant(key: &DynKey<'_>, desc: &TypeDesc, name: &str) -> Result<()> {
    match desc {
        TypeDesc::Enum(enum_desc) if !enum_desc.has_variant(name) => Err(Error::serialization(
            key,
            format!("'{}' is not a variant of enum '{}'", name, enum_desc.name()),
        )),
        _ => Ok(()),
    }
}

impl Serializer for EnumSerializer {
    fn serialize(
        &self,
        value: Object,
        key: &DynKey<'_>,
        desc: &TypeDesc,
        storage: &dyn Storage,
        _serializers: &Serializers,
    ) -> Result<()> {
        let name = match value {
            Object::Variant(name) | Object::String(name) => name,
            other => {
                return Err(Error::serialization(
                    key,
                    format!("expected an enum variant, found {}", other.kind()),
                ));
            }
        };
        check_variant(key, desc, &name)?;
        storage.push_value(key, Value::String(name))
    }

    fn deserialize(
        &self,
        key: &DynKey<'_>,
        desc: &TypeDesc,
        storage: &dyn Storage,
        _serializers: &Serializers,
    ) -> Result<Object> {
        let name = match storage.fetch_value(key)? {
            Value::String(name) => name,
            other => {
                return Err(Error::serialization(
                    key,
                    format!("expected a variant name, found {}", raw_kind(&other)),
                ));
            }
        };
        check_variant(key, desc, &name)?;
        Ok(Object::Variant(name))
    }
}
