//! # Domain Values
//!
//! [`Object`] is the dynamic form in which domain values travel between keys and
//! serializers. [`Configurable`] maps a Rust type to its [`TypeDesc`] and to and
//! from an [`Object`].
use std::any::Any;
use std::fmt;

use serde_json::{Map, Number, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::types::TypeDesc;

mod configurable;

#[doc(hidden)]
pub use configurable::enum_from_object;
pub use configurable::{ConfigEnum, Configurable};

/// Raw root map held by a config.
pub type RawMap = Map<String, Value>;

/// Conversion failure between an [`Object`] and a concrete Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct ObjectError {
    pub expected: String,
    pub found: String,
}

impl ObjectError {
    pub fn new(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Dynamic domain value.
pub enum Object {
    Unit,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    String(String),
    List(Vec<Object>),
    /// Entries in insertion order; keys may be any object.
    Map(Vec<(Object, Object)>),
    /// Name of an enum variant.
    Variant(String),
    Uuid(Uuid),
    Type(TypeDesc),
    /// Opaque user value handled by a user serializer.
    Custom(Box<dyn Any + Send + Sync>),
}

impl Object {
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Object::Custom(Box::new(value))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Object::Unit => "unit",
            Object::Bool(_) => "bool",
            Object::Int(_) => "signed integer",
            Object::UInt(_) => "unsigned integer",
            Object::Float(_) => "float",
            Object::Char(_) => "char",
            Object::String(_) => "string",
            Object::List(_) => "list",
            Object::Map(_) => "map",
            Object::Variant(_) => "enum variant",
            Object::Uuid(_) => "uuid",
            Object::Type(_) => "type descriptor",
            Object::Custom(_) => "custom value",
        }
    }

    /// Recovers a custom value of type `T`.
    pub fn downcast<T: Any>(self) -> Result<T, ObjectError> {
        match self {
            Object::Custom(boxed) => boxed
                .downcast::<T>()
                .map(|value| *value)
                .map_err(|_| ObjectError::new(std::any::type_name::<T>(), "custom value of another type")),
            other => Err(ObjectError::new(std::any::type_name::<T>(), other.kind())),
        }
    }

    pub fn into_string(self) -> Result<String, ObjectError> {
        match self {
            Object::String(text) => Ok(text),
            other => Err(ObjectError::new("string", other.kind())),
        }
    }

    pub fn into_list(self) -> Result<Vec<Object>, ObjectError> {
        match self {
            Object::List(items) => Ok(items),
            other => Err(ObjectError::new("list", other.kind())),
        }
    }

    pub fn into_entries(self) -> Result<Vec<(Object, Object)>, ObjectError> {
        match self {
            Object::Map(entries) => Ok(entries),
            other => Err(ObjectError::new("map", other.kind())),
        }
    }

    /// Structural conversion of a raw value.
    pub fn from_raw(raw: Value) -> Object {
        match raw {
            Value::Null => Object::Unit,
            Value::Bool(flag) => Object::Bool(flag),
            Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    Object::Int(value)
                } else if let Some(value) = number.as_u64() {
                    Object::UInt(value)
                } else {
                    Object::Float(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(text) => Object::String(text),
            Value::Array(items) => Object::List(items.into_iter().map(Object::from_raw).collect()),
            Value::Object(map) => Object::Map(
                map.into_iter()
                    .map(|(key, value)| (Object::String(key), Object::from_raw(value)))
                    .collect(),
            ),
        }
    }

    /// Structural conversion into a raw value.
    ///
    /// Enum variants, uuids and type descriptors become their string form. Map keys
    /// must be scalar. Custom values have no raw form.
    pub fn into_raw(self) -> Result<Value, ObjectError> {
        Ok(match self {
            Object::Unit => Value::Null,
            Object::Bool(flag) => Value::Bool(flag),
            Object::Int(value) => Value::Number(value.into()),
            Object::UInt(value) => Value::Number(value.into()),
            Object::Float(value) => Value::Number(
                Number::from_f64(value).ok_or_else(|| ObjectError::new("finite float", value.to_string()))?,
            ),
            Object::Char(value) => Value::String(value.to_string()),
            Object::String(text) | Object::Variant(text) => Value::String(text),
            Object::Uuid(uuid) => Value::String(uuid.to_string()),
            Object::Type(desc) => Value::String(desc.to_string()),
            Object::List(items) => Value::Array(
                items
                    .into_iter()
                    .map(Object::into_raw)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Object::Map(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    let key = scalar_key(key.into_raw()?)?;
                    map.insert(key, value.into_raw()?);
                }
                Value::Object(map)
            }
            Object::Custom(_) => return Err(ObjectError::new("value with a raw form", "custom value")),
        })
    }
}

/// String form of a raw scalar, used as a raw map key.
pub fn scalar_key(raw: Value) -> Result<String, ObjectError> {
    match raw {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(ObjectError::new("scalar map key", raw_kind(&other))),
    }
}

pub fn raw_kind(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Unit => f.write_str("Unit"),
            Object::Bool(flag) => f.debug_tuple("Bool").field(flag).finish(),
            Object::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Object::UInt(value) => f.debug_tuple("UInt").field(value).finish(),
            Object::Float(value) => f.debug_tuple("Float").field(value).finish(),
            Object::Char(value) => f.debug_tuple("Char").field(value).finish(),
            Object::String(text) => f.debug_tuple("String").field(text).finish(),
            Object::List(items) => f.debug_tuple("List").field(items).finish(),
            Object::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Object::Variant(name) => f.debug_tuple("Variant").field(name).finish(),
            Object::Uuid(uuid) => f.debug_tuple("Uuid").field(uuid).finish(),
            Object::Type(desc) => f.debug_tuple("Type").field(desc).finish(),
            Object::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
