use serde_json::Value;

use super::object_error;
use crate::error::{Error, Result};
use crate::key::DynKey;
use crate::serializer::{Serializer, Serializers};
use crate::storage::Storage;
use crate::types::{ScalarKind, TypeDesc};
use crate::value::{Object, raw_kind};

/// Serializer for every [`ScalarKind`].
///
/// Both directions coerce a value of another shape through its string form, so
/// `"42"` reads as an integer and a number as a string. Values that do not fit the
/// key's [`ScalarKind`] are rejected on write as well as on read.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarSerializer;

impl Serializer for ScalarSerializer {
    fn serialize(
        &self,
        value: Object,
        key: &DynKey<'_>,
        desc: &TypeDesc,
        storage: &dyn Storage,
        _serializers: &Serializers,
    ) -> Result<()> {
        let kind = scalar_kind(key, desc)?;
        let raw = value.into_raw().map_err(|err| object_error(key, err))?;
        let checked = coerce(kind, raw).map_err(|message| Error::serialization(key, message))?;
        let raw = checked.into_raw().map_err(|err| object_error(key, err))?;
        storage.push_value(key, raw)
    }

    fn deserialize(
        &self,
        key: &DynKey<'_>,
        desc: &TypeDesc,
        storage: &dyn Storage,
        _serializers: &Serializers,
    ) -> Result<Object> {
        let kind = scalar_kind(key, desc)?;
        let raw = storage.fetch_value(key)?;
        coerce(kind, raw).map_err(|message| Error::serialization(key, message))
    }
}

fn scalar_kind(key: &DynKey<'_>, desc: &TypeDesc) -> Result<ScalarKind> {
    match desc {
        TypeDesc::Scalar(kind) => Ok(*kind),
        other => Err(Error::serialization(key, format!("'{}' is not a scalar type", other))),
    }
}

fn coerce(kind: ScalarKind, raw: Value) -> std::result::Result<Object, String> {
    match (kind, raw) {
        (ScalarKind::Bool, Value::Bool(flag)) => Ok(Object::Bool(flag)),
        (ScalarKind::String, Value::String(text)) => Ok(Object::String(text)),
        (kind, raw) => {
            let text = scalar_text(&raw)
                .ok_or_else(|| format!("expected {}, found {}", kind, raw_kind(&raw)))?;
            parse_scalar(kind, &text)
        }
    }
}

fn scalar_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn integer_bounds(kind: ScalarKind) -> Option<(i128, i128)> {
    Some(match kind {
        ScalarKind::I8 => (i8::MIN.into(), i8::MAX.into()),
        ScalarKind::I16 => (i16::MIN.into(), i16::MAX.into()),
        ScalarKind::I32 => (i32::MIN.into(), i32::MAX.into()),
        ScalarKind::I64 => (i64::MIN.into(), i64::MAX.into()),
        ScalarKind::U8 => (0, u8::MAX.into()),
        ScalarKind::U16 => (0, u16::MAX.into()),
        ScalarKind::U32 => (0, u32::MAX.into()),
        ScalarKind::U64 => (0, u64::MAX.into()),
        _ => return None,
    })
}

fn parse_scalar(kind: ScalarKind, text: &str) -> std::result::Result<Object, String> {
    let invalid = || format!("'{}' is not a valid {}", text, kind);

    if let Some((min, max)) = integer_bounds(kind) {
        let value: i128 = text.trim().parse().map_err(|_| invalid())?;
        if value < min || value > max {
            return Err(format!("{} is out of range for {}", value, kind));
        }
        return Ok(match kind {
            ScalarKind::I8 | ScalarKind::I16 | ScalarKind::I32 | ScalarKind::I64 => Object::Int(value as i64),
            _ => Object::UInt(value as u64),
        });
    }

    match kind {
        ScalarKind::Bool => text.trim().parse().map(Object::Bool).map_err(|_| invalid()),
        ScalarKind::F64 => text.trim().parse().map(Object::Float).map_err(|_| invalid()),
        ScalarKind::F32 => {
            let value: f64 = text.trim().parse().map_err(|_| invalid())?;
            if value.is_finite() && value.abs() > f64::from(f32::MAX) {
                return Err(format!("{} is out of range for {}", value, kind));
            }
            Ok(Object::Float(value))
        }
        ScalarKind::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(value), None) => Ok(Object::Char(value)),
                _ => Err(invalid()),
            }
        }
        _ => Ok(Object::String(text.to_string())),
    }
}
