use uuid::Uuid;

use super::object_error;
use crate::error::{Error, Result};
use crate::key::DynKey;
use crate::serializer::{Serializer, Serializers};
use crate::storage::Storage;
use crate::types::TypeDesc;
use crate::value::Object;

fn write_text(key: &DynKey<'_>, text: String, serializers: &Serializers) -> Result<()> {
    serializers.write(&key.get_as(TypeDesc::STRING), Object::String(text))
}

fn read_text(key: &DynKey<'_>, serializers: &Serializers) -> Result<String> {
    serializers
        .read(&key.get_as(TypeDesc::STRING))?
        .into_string()
        .map_err(|err| object_error(key, err))
}

/// Stores a [`Uuid`] in its hyphenated textual form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSerializer;

impl Serializer for UuidSerializer {
    fn serialize(
        &self,
        value: Object,
        key: &DynKey<'_>,
        _desc: &TypeDesc,
        _storage: &dyn Storage,
        serializers: &Serializers,
    ) -> Result<()> {
        let uuid = match value {
            Object::Uuid(uuid) => uuid,
            Object::String(text) => Uuid::parse_str(&text)
                .map_err(|err| Error::serialization_with(key, format!("invalid uuid '{}'", text), err))?,
            other => return Err(Error::serialization(key, format!("expected a uuid, found {}", other.kind()))),
        };
        write_text(key, uuid.to_string(), serializers)
    }

    fn deserialize(
        &self,
        key: &DynKey<'_>,
        _desc: &TypeDesc,
        _storage: &dyn Storage,
        serializers: &Serializers,
    ) -> Result<Object> {
        let text = read_text(key, serializers)?;
        Uuid::parse_str(&text)
            .map(Object::Uuid)
            .map_err(|err| Error::serialization_with(key, format!("invalid uuid '{}'", text), err))
    }
}

/// Stores a [`TypeDesc`] in its canonical string form.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeDescSerializer;

impl Serializer for TypeDescSerializer {
    fn serialize(
        &self,
        value: Object,
        key: &DynKey<'_>,
        _desc: &TypeDesc,
        _storage: &dyn Storage,
        serializers: &Serializers,
    ) -> Result<()> {
        match value {
            Object::Type(desc) => write_text(key, desc.to_string(), serializers),
            other => Err(Error::serialization(
                key,
                format!("expected a type descriptor, found {}", other.kind()),
            )),
        }
    }

    fn deserialize(
        &self,
        key: &DynKey<'_>,
        _desc: &TypeDesc,
        _storage: &dyn Storage,
        serializers: &Serializers,
    ) -> Result<Object> {
        let text = read_text(key, serializers)?;
        text.parse::<TypeDesc>()
            .map(Object::Type)
            .map_err(|err| Error::serialization_with(key, "invalid type descriptor", err))
    }
}

/// Stores a [`TypeName`](crate::types::TypeName) by name.
///
/// Reading fails for names the registry chain does not know, either as a registered
/// or declared type or through the supertype hierarchy.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeNameSerializer;

impl Serializer for TypeNameSerializer {
    fn serialize(
        &self,
        value: Object,
        key: &DynKey<'_>,
        _desc: &TypeDesc,
        _storage: &dyn Storage,
        serializers: &Serializers,
    ) -> Result<()> {
        let name = match value {
            Object::String(name) => name,
            Object::Type(desc) => match desc.type_name_str() {
                Some(name) => name.to_string(),
                None => {
                    return Err(Error::serialization(key, format!("type '{}' has no name", desc)));
                }
            },
            other => {
                return Err(Error::serialization(
                    key,
                    format!("expected a type name, found {}", other.kind()),
                ));
            }
        };
        write_text(key, name, serializers)
    }

    fn deserialize(
        &self,
        key: &DynKey<'_>,
        _desc: &TypeDesc,
        _storage: &dyn Storage,
        serializers: &Serializers,
    ) -> Result<Object> {
        let name = read_text(key, serializers)?;
        if serializers.resolve_type_name(&name).is_none() {
            return Err(Error::serialization(key, format!("unknown type name '{}'", name)));
        }
        Ok(Object::String(name))
    }
}
