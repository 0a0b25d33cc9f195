//! # Type Descriptors
//!
//! [`TypeDesc`] is the type witness attached to every key. It drives serializer
//! dispatch and the native-support check of backends.
//!
//! Descriptors are a closed sum type compared structurally. User types enter the
//! model as [`TypeDesc::Named`] (with optional parameters) or [`TypeDesc::Enum`];
//! supertype relations between named types live in the serializer registry, not here.
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

mod parse;

pub use parse::TypeParseError;

/// Name of the marker descriptor every enum descriptor is assignable to.
pub const ENUM_MARKER: &str = "enum";
/// Name of the descriptor of [`uuid::Uuid`] values.
pub const UUID: &str = "uuid";
/// Name of the descriptor of [`TypeDesc`] values.
pub const TYPE_DESC: &str = "type";
/// Name of the descriptor of [`TypeName`] values.
pub const TYPE_NAME: &str = "type-name";

/// Primitive kinds with a direct raw representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    String,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 13] = [
        ScalarKind::Bool,
        ScalarKind::I8,
        ScalarKind::I16,
        ScalarKind::I32,
        ScalarKind::I64,
        ScalarKind::U8,
        ScalarKind::U16,
        ScalarKind::U32,
        ScalarKind::U64,
        ScalarKind::F32,
        ScalarKind::F64,
        ScalarKind::Char,
        ScalarKind::String,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Char => "char",
            ScalarKind::String => "string",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ScalarKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Descriptor of an enumeration: its name and the names of its variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumDesc {
    name: Arc<str>,
    variants: Arc<[Arc<str>]>,
}

impl EnumDesc {
    pub fn new<I, S>(name: impl Into<Arc<str>>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|variant| variant.as_ref())
    }

    pub fn has_variant(&self, variant: &str) -> bool {
        self.variants().any(|candidate| candidate == variant)
    }
}

/// A user or well-known type referenced by name, with optional parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    name: Arc<str>,
    params: Vec<TypeDesc>,
}

impl NamedType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[TypeDesc] {
        &self.params
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    /// No value; used by section keys.
    Void,
    /// Any raw value, passed through unchanged.
    Any,
    Scalar(ScalarKind),
    List(Box<TypeDesc>),
    Map(Box<TypeDesc>, Box<TypeDesc>),
    Enum(EnumDesc),
    Named(NamedType),
}

impl TypeDesc {
    pub const BOOL: TypeDesc = TypeDesc::Scalar(ScalarKind::Bool);
    pub const I32: TypeDesc = TypeDesc::Scalar(ScalarKind::I32);
    pub const I64: TypeDesc = TypeDesc::Scalar(ScalarKind::I64);
    pub const U8: TypeDesc = TypeDesc::Scalar(ScalarKind::U8);
    pub const F64: TypeDesc = TypeDesc::Scalar(ScalarKind::F64);
    pub const STRING: TypeDesc = TypeDesc::Scalar(ScalarKind::String);

    pub fn list(elem: TypeDesc) -> Self {
        TypeDesc::List(Box::new(elem))
    }

    pub fn map(key: TypeDesc, value: TypeDesc) -> Self {
        TypeDesc::Map(Box::new(key), Box::new(value))
    }

    /// `List` with an unresolved element type.
    pub fn raw_list() -> Self {
        TypeDesc::list(TypeDesc::Any)
    }

    /// `Map` with unresolved key and value types.
    pub fn raw_map() -> Self {
        TypeDesc::map(TypeDesc::Any, TypeDesc::Any)
    }

    pub fn named(name: impl Into<Arc<str>>) -> Self {
        TypeDesc::named_with(name, Vec::new())
    }

    pub fn named_with(name: impl Into<Arc<str>>, params: Vec<TypeDesc>) -> Self {
        TypeDesc::Named(NamedType {
            name: name.into(),
            params,
        })
    }

    pub fn enumeration<I, S>(name: impl Into<Arc<str>>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        TypeDesc::Enum(EnumDesc::new(name, variants))
    }

    pub fn enum_marker() -> Self {
        TypeDesc::named(ENUM_MARKER)
    }

    pub fn uuid() -> Self {
        TypeDesc::named(UUID)
    }

    pub fn type_desc() -> Self {
        TypeDesc::named(TYPE_DESC)
    }

    pub fn type_name() -> Self {
        TypeDesc::named(TYPE_NAME)
    }

    /// The name used to refer to this type from a [`TypeName`], if it has one.
    pub fn type_name_str(&self) -> Option<&str> {
        match self {
            TypeDesc::Named(named) => Some(named.name()),
            TypeDesc::Enum(desc) => Some(desc.name()),
            _ => None,
        }
    }

    pub fn params(&self) -> Vec<&TypeDesc> {
        match self {
            TypeDesc::List(elem) => vec![elem.as_ref()],
            TypeDesc::Map(key, value) => vec![key.as_ref(), value.as_ref()],
            TypeDesc::Named(named) => named.params.iter().collect(),
            _ => Vec::new(),
        }
    }

    pub fn has_params(&self) -> bool {
        !self.params().is_empty()
    }

    /// The descriptor with all parameters erased.
    pub fn erased(&self) -> TypeDesc {
        match self {
            TypeDesc::List(_) => TypeDesc::raw_list(),
            TypeDesc::Map(_, _) => TypeDesc::raw_map(),
            TypeDesc::Named(named) => TypeDesc::named(named.name.clone()),
            other => other.clone(),
        }
    }

    pub fn is_assignable_from(&self, other: &TypeDesc) -> bool {
        self.is_assignable_from_with(other, &|_, _| false)
    }

    /// Assignability check consulting `is_subtype(sub, sup)` for declared relations
    /// between named types.
    pub fn is_assignable_from_with(
        &self,
        other: &TypeDesc,
        is_subtype: &dyn Fn(&str, &str) -> bool,
    ) -> bool {
        if self == other {
            return true;
        }

        match (self, other) {
            (TypeDesc::Any, _) => true,
            (TypeDesc::List(sup), TypeDesc::List(sub)) => sup.is_assignable_from_with(sub, is_subtype),
            (TypeDesc::Map(sup_key, sup_value), TypeDesc::Map(sub_key, sub_value)) => {
                sup_key.is_assignable_from_with(sub_key, is_subtype)
                    && sup_value.is_assignable_from_with(sub_value, is_subtype)
            }
            (TypeDesc::Named(sup), TypeDesc::Enum(sub)) => {
                (sup.name() == ENUM_MARKER && sup.params.is_empty()) || is_subtype(sub.name(), sup.name())
            }
            (TypeDesc::Named(sup), TypeDesc::Named(sub)) => {
                let related = sup.name == sub.name || is_subtype(sub.name(), sup.name());
                let params_match = sup.params.is_empty()
                    || (sup.params.len() == sub.params.len()
                        && sup
                            .params
                            .iter()
                            .zip(sub.params.iter())
                            .all(|(sup, sub)| sup.is_assignable_from_with(sub, is_subtype)));
                related && params_match
            }
            _ => false,
        }
    }

    /// Whether a raw value of this shape can be stored without a serializer.
    ///
    /// Scalars, [`TypeDesc::Any`], and lists/maps of such types qualify. Map keys
    /// must be strings (or unresolved) since raw maps are string-keyed.
    pub fn is_basic(&self) -> bool {
        match self {
            TypeDesc::Scalar(_) | TypeDesc::Any => true,
            TypeDesc::List(elem) => elem.is_basic(),
            TypeDesc::Map(key, value) => {
                matches!(key.as_ref(), TypeDesc::Scalar(ScalarKind::String) | TypeDesc::Any)
                    && value.is_basic()
            }
            _ => false,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Void => f.write_str("void"),
            TypeDesc::Any => f.write_str("any"),
            TypeDesc::Scalar(kind) => write!(f, "{}", kind),
            TypeDesc::List(elem) => write!(f, "list<{}>", elem),
            TypeDesc::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            TypeDesc::Enum(desc) => {
                write!(f, "enum {}{{", desc.name())?;
                for (index, variant) in desc.variants().enumerate() {
                    if index > 0 {
                        f.write_str("|")?;
                    }
                    f.write_str(variant)?;
                }
                f.write_str("}")
            }
            TypeDesc::Named(named) => {
                f.write_str(named.name())?;
                if !named.params.is_empty() {
                    f.write_str("<")?;
                    for (index, param) in named.params.iter().enumerate() {
                        if index > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", param)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for TypeDesc {
    type Err = TypeParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse::parse(input)
    }
}

impl Serialize for TypeDesc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeDesc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// Reference to a registered named type by its name.
///
/// Resolving an unknown name fails when the value is read back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn of(desc: &TypeDesc) -> Option<Self> {
        desc.type_name_str().map(TypeName::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
