//! Built-in serializers registered by [`Serializers::with_defaults`](super::Serializers::with_defaults).
use crate::error::Error;
use crate::key::DynKey;
use crate::value::ObjectError;

mod collection;
mod enums;
mod identity;
mod scalar;

pub use collection::{ListSerializer, MapSerializer};
pub use enums::EnumSerializer;
pub use identity::{TypeDescSerializer, TypeNameSerializer, UuidSerializer};
pub use scalar::ScalarSerializer;

/// Wraps an object conversion failure at `key`.
pub(crate) fn object_error(key: &DynKey<'_>, err: ObjectError) -> Error {
    Error::serialization_with(key, "unexpected value shape", err)
}
