use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use super::{Object, ObjectError, RawMap};
use crate::types::{ScalarKind, TypeDesc, TypeName};

/// A Rust type that can be stored under a key.
///
/// Scalars, strings, vectors, maps, uuids and descriptors are covered here.
/// User types implement [`Configurable::descriptor`] and usually keep the
/// default conversions, which carry the value as an opaque [`Object::Custom`]
/// for the serializer registered under that descriptor.
pub trait Configurable: Sized + Send + Sync + 'static {
    fn descriptor() -> TypeDesc;

    fn into_object(self) -> Object {
        Object::custom(self)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        object.downcast()
    }
}

/// Field-less enumeration stored by variant name.
///
/// Implement this and invoke [`configurable_enum!`](crate::configurable_enum) to get
/// the matching [`Configurable`] implementation. The enumeration is resolvable from a
/// type name only after [`Serializers::declare_enum`](crate::serializer::Serializers::declare_enum).
pub trait ConfigEnum: Copy + Send + Sync + 'static {
    const TYPE_NAME: &'static str;

    fn variants() -> &'static [Self];

    fn variant_name(&self) -> &'static str;

    fn enum_descriptor() -> TypeDesc {
        TypeDesc::enumeration(
            Self::TYPE_NAME,
            Self::variants().iter().map(|variant| variant.variant_name()),
        )
    }

    fn from_variant_name(name: &str) -> Option<Self> {
        Self::variants()
            .iter()
            .copied()
            .find(|variant| variant.variant_name() == name)
    }
}

#[doc(hidden)]
pub fn enum_from_object<E: ConfigEnum>(object: Object) -> Result<E, ObjectError> {
    match object {
        Object::Variant(name) | Object::String(name) => E::from_variant_name(&name)
            .ok_or_else(|| ObjectError::new(format!("variant of {}", E::TYPE_NAME), name)),
        other => Err(ObjectError::new(format!("variant of {}", E::TYPE_NAME), other.kind())),
    }
}

/// Implements [`Configurable`] for types implementing [`ConfigEnum`].
#[macro_export]
macro_rules! configurable_enum {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::value::Configurable for $ty {
            fn descriptor() -> $crate::types::TypeDesc {
                <$ty as $crate::value::ConfigEnum>::enum_descriptor()
            }

            fn into_object(self) -> $crate::value::Object {
                $crate::value::Object::Variant(
                    <$ty as $crate::value::ConfigEnum>::variant_name(&self).to_string(),
                )
            }

            fn from_object(
                object: $crate::value::Object,
            ) -> ::std::result::Result<Self, $crate::value::ObjectError> {
                $crate::value::enum_from_object::<$ty>(object)
            }
        }
    )+};
}

impl Configurable for bool {
    fn descriptor() -> TypeDesc {
        TypeDesc::Scalar(ScalarKind::Bool)
    }

    fn into_object(self) -> Object {
        Object::Bool(self)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        match object {
            Object::Bool(flag) => Ok(flag),
            other => Err(ObjectError::new("bool", other.kind())),
        }
    }
}

macro_rules! signed_configurable {
    ($($ty:ty => $kind:ident),+ $(,)?) => {$(
        impl Configurable for $ty {
            fn descriptor() -> TypeDesc {
                TypeDesc::Scalar(ScalarKind::$kind)
            }

            fn into_object(self) -> Object {
                Object::Int(self as i64)
            }

            fn from_object(object: Object) -> Result<Self, ObjectError> {
                let narrowed = match object {
                    Object::Int(value) => <$ty>::try_from(value).map_err(|_| value.to_string()),
                    Object::UInt(value) => <$ty>::try_from(value).map_err(|_| value.to_string()),
                    other => return Err(ObjectError::new(stringify!($ty), other.kind())),
                };
                narrowed.map_err(|found| ObjectError::new(concat!(stringify!($ty), " in range"), found))
            }
        }
    )+};
}

macro_rules! unsigned_configurable {
    ($($ty:ty => $kind:ident),+ $(,)?) => {$(
        impl Configurable for $ty {
            fn descriptor() -> TypeDesc {
                TypeDesc::Scalar(ScalarKind::$kind)
            }

            fn into_object(self) -> Object {
                Object::UInt(self as u64)
            }

            fn from_object(object: Object) -> Result<Self, ObjectError> {
                let narrowed = match object {
                    Object::Int(value) => <$ty>::try_from(value).map_err(|_| value.to_string()),
                    Object::UInt(value) => <$ty>::try_from(value).map_err(|_| value.to_string()),
                    other => return Err(ObjectError::new(stringify!($ty), other.kind())),
                };
                narrowed.map_err(|found| ObjectError::new(concat!(stringify!($ty), " in range"), found))
            }
        }
    )+};
}

signed_configurable!(i8 => I8, i16 => I16, i32 => I32, i64 => I64);
unsigned_configurable!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);

impl Configurable for f64 {
    fn descriptor() -> TypeDesc {
        TypeDesc::Scalar(ScalarKind::F64)
    }

    fn into_object(self) -> Object {
        Object::Float(self)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        match object {
            Object::Float(value) => Ok(value),
            Object::Int(value) => Ok(value as f64),
            Object::UInt(value) => Ok(value as f64),
            other => Err(ObjectError::new("f64", other.kind())),
        }
    }
}

impl Configurable for f32 {
    fn descriptor() -> TypeDesc {
        TypeDesc::Scalar(ScalarKind::F32)
    }

    fn into_object(self) -> Object {
        Object::Float(self as f64)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        let value = f64::from_object(object)?;
        if value.is_finite() && value.abs() > f64::from(f32::MAX) {
            return Err(ObjectError::new("f32 in range", value.to_string()));
        }
        Ok(value as f32)
    }
}

impl Configurable for char {
    fn descriptor() -> TypeDesc {
        TypeDesc::Scalar(ScalarKind::Char)
    }

    fn into_object(self) -> Object {
        Object::Char(self)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        match object {
            Object::Char(value) => Ok(value),
            Object::String(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(value), None) => Ok(value),
                    _ => Err(ObjectError::new("single character", text)),
                }
            }
            other => Err(ObjectError::new("char", other.kind())),
        }
    }
}

impl Configurable for String {
    fn descriptor() -> TypeDesc {
        TypeDesc::STRING
    }

    fn into_object(self) -> Object {
        Object::String(self)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        object.into_string()
    }
}

impl<T: Configurable> Configurable for Vec<T> {
    fn descriptor() -> TypeDesc {
        TypeDesc::list(T::descriptor())
    }

    fn into_object(self) -> Object {
        Object::List(self.into_iter().map(T::into_object).collect())
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        object.into_list()?.into_iter().map(T::from_object).collect()
    }
}

/// A present null value reads as `None`; `None` writes a null.
impl<T: Configurable> Configurable for Option<T> {
    fn descriptor() -> TypeDesc {
        T::descriptor()
    }

    fn into_object(self) -> Object {
        self.map_or(Object::Unit, T::into_object)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        match object {
            Object::Unit => Ok(None),
            other => T::from_object(other).map(Some),
        }
    }
}

fn into_entries<K, V, I>(entries: I) -> Object
where
    K: Configurable,
    V: Configurable,
    I: IntoIterator<Item = (K, V)>,
{
    Object::Map(
        entries
            .into_iter()
            .map(|(key, value)| (key.into_object(), value.into_object()))
            .collect(),
    )
}

fn from_entries<K, V, C>(object: Object) -> Result<C, ObjectError>
where
    K: Configurable,
    V: Configurable,
    C: FromIterator<(K, V)>,
{
    object
        .into_entries()?
        .into_iter()
        .map(|(key, value)| Ok((K::from_object(key)?, V::from_object(value)?)))
        .collect()
}

impl<K, V> Configurable for HashMap<K, V>
where
    K: Configurable + Eq + Hash,
    V: Configurable,
{
    fn descriptor() -> TypeDesc {
        TypeDesc::map(K::descriptor(), V::descriptor())
    }

    fn into_object(self) -> Object {
        into_entries(self)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        from_entries(object)
    }
}

impl<K, V> Configurable for BTreeMap<K, V>
where
    K: Configurable + Ord,
    V: Configurable,
{
    fn descriptor() -> TypeDesc {
        TypeDesc::map(K::descriptor(), V::descriptor())
    }

    fn into_object(self) -> Object {
        into_entries(self)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        from_entries(object)
    }
}

impl<K, V> Configurable for IndexMap<K, V>
where
    K: Configurable + Eq + Hash,
    V: Configurable,
{
    fn descriptor() -> TypeDesc {
        TypeDesc::map(K::descriptor(), V::descriptor())
    }

    fn into_object(self) -> Object {
        into_entries(self)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        from_entries(object)
    }
}

impl Configurable for Uuid {
    fn descriptor() -> TypeDesc {
        TypeDesc::uuid()
    }

    fn into_object(self) -> Object {
        Object::Uuid(self)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        match object {
            Object::Uuid(uuid) => Ok(uuid),
            other => Err(ObjectError::new("uuid", other.kind())),
        }
    }
}

impl Configurable for TypeDesc {
    fn descriptor() -> TypeDesc {
        TypeDesc::type_desc()
    }

    fn into_object(self) -> Object {
        Object::Type(self)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        match object {
            Object::Type(desc) => Ok(desc),
            other => Err(ObjectError::new("type descriptor", other.kind())),
        }
    }
}

impl Configurable for TypeName {
    fn descriptor() -> TypeDesc {
        TypeDesc::type_name()
    }

    fn into_object(self) -> Object {
        Object::String(self.as_str().to_string())
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        object.into_string().map(TypeName::new)
    }
}

/// Raw values are passed through untouched.
impl Configurable for Value {
    fn descriptor() -> TypeDesc {
        TypeDesc::Any
    }

    fn into_object(self) -> Object {
        Object::from_raw(self)
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        object.into_raw()
    }
}

impl Configurable for RawMap {
    fn descriptor() -> TypeDesc {
        TypeDesc::map(TypeDesc::STRING, TypeDesc::Any)
    }

    fn into_object(self) -> Object {
        Object::from_raw(Value::Object(self))
    }

    fn from_object(object: Object) -> Result<Self, ObjectError> {
        match object.into_raw()? {
            Value::Object(map) => Ok(map),
            other => Err(ObjectError::new("map", super::raw_kind(&other))),
        }
    }
}
