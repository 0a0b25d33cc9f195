use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use super::Serializer;
use super::builtin::{
    EnumSerializer, ListSerializer, MapSerializer, ScalarSerializer, TypeDescSerializer,
    TypeNameSerializer, UuidSerializer,
};
use crate::error::{Error, Result};
use crate::key::DynKey;
use crate::types::{ScalarKind, TypeDesc};
use crate::value::{ConfigEnum, Object};

/// Registry mapping type descriptors to serializers.
///
/// Lookups that find nothing locally continue in the parent registry. A config's
/// local registry chains to the shared default one, so local registrations shadow
/// the defaults without removing them.
///
/// # Resolution
///
/// Within one registry, first hit wins:
/// 1. the erased descriptor, if the requested one has parameters;
/// 2. the exact descriptor;
/// 3. the most specific registered descriptor assignable from the requested one.
///    Several unrelated most specific candidates are an
///    [`Error::AmbiguousSerializer`].
pub struct Serializers {
    entries: IndexMap<TypeDesc, Arc<dyn Serializer>>,
    supertypes: HashMap<String, Vec<String>>,
    named_types: IndexMap<String, TypeDesc>,
    parent: Option<Arc<Serializers>>,
}

impl fmt::Debug for Serializers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descs: Vec<String> = self.entries.keys().map(|desc| desc.to_string()).collect();
        f.debug_struct("Serializers")
            .field("entries", &descs)
            .field("supertypes", &self.supertypes)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl Default for Serializers {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializers {
    /// Empty registry with no parent.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            supertypes: HashMap::new(),
            named_types: IndexMap::new(),
            parent: None,
        }
    }

    /// Empty registry falling back to `parent`.
    pub fn with_parent(parent: Arc<Serializers>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new()
        }
    }

    /// Registry holding the built-in serializers.
    pub fn with_defaults() -> Self {
        let mut serializers = Self::new();
        let scalar: Arc<dyn Serializer> = Arc::new(ScalarSerializer);
        for kind in ScalarKind::ALL {
            serializers.insert(TypeDesc::Scalar(kind), scalar.clone());
        }
        serializers.insert(TypeDesc::raw_list(), Arc::new(ListSerializer));
        serializers.insert(TypeDesc::raw_map(), Arc::new(MapSerializer));
        serializers.insert(TypeDesc::enum_marker(), Arc::new(EnumSerializer));
        serializers.insert(TypeDesc::uuid(), Arc::new(UuidSerializer));
        serializers.insert(TypeDesc::type_desc(), Arc::new(TypeDescSerializer));
        serializers.insert(TypeDesc::type_name(), Arc::new(TypeNameSerializer));
        log::debug!("Default serializer registry created with {} entries", serializers.entries.len());
        serializers
    }

    pub fn parent(&self) -> Option<&Arc<Serializers>> {
        self.parent.as_ref()
    }

    /// Number of local registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Locally registered descriptors, in registration order.
    pub fn descs(&self) -> impl Iterator<Item = &TypeDesc> {
        self.entries.keys()
    }

    /// Adds an entry, making its named descriptor resolvable by name.
    fn insert(
        &mut self,
        desc: TypeDesc,
        serializer: Arc<dyn Serializer>,
    ) -> Option<Arc<dyn Serializer>> {
        if let Some(name) = desc.type_name_str() {
            self.named_types
                .entry(name.to_string())
                .or_insert_with(|| desc.erased());
        }
        self.entries.insert(desc, serializer)
    }

    /// Registers `serializer` for `desc`, replacing a previous local registration.
    pub fn register<S: Serializer + 'static>(&mut self, desc: TypeDesc, serializer: S) -> Result<()> {
        self.register_shared(desc, Arc::new(serializer))
    }

    pub fn register_shared(&mut self, desc: TypeDesc, serializer: Arc<dyn Serializer>) -> Result<()> {
        match desc {
            TypeDesc::Any => {
                return Err(Error::InvalidRegistration {
                    desc,
                    reason: "'any' values are always passed through raw".to_string(),
                });
            }
            TypeDesc::Void => {
                return Err(Error::InvalidRegistration {
                    desc,
                    reason: "'void' keys carry no value".to_string(),
                });
            }
            _ => {}
        }

        if self.insert(desc.clone(), serializer).is_some() {
            log::debug!("Replaced serializer for '{}'", desc);
        } else {
            log::debug!("Registered serializer for '{}'", desc);
        }
        Ok(())
    }

    /// Makes the named type `desc` resolvable from a [`TypeName`](crate::types::TypeName).
    pub fn declare_type(&mut self, desc: TypeDesc) {
        if let Some(name) = desc.type_name_str() {
            self.named_types.insert(name.to_string(), desc);
        }
    }

    /// Makes the enumeration `E` resolvable by its type name.
    pub fn declare_enum<E: ConfigEnum>(&mut self) {
        self.declare_type(E::enum_descriptor());
    }

    /// Declares the named type `sub` a subtype of the named type `sup`.
    ///
    /// Serializers registered for `sup` then apply to `sub`. The relation is transitive
    /// and visible to lookups continuing in parent registries.
    pub fn declare_supertype(&mut self, sub: impl Into<String>, sup: impl Into<String>) {
        let (sub, sup) = (sub.into(), sup.into());
        log::debug!("Declared '{}' as a subtype of '{}'", sub, sup);
        let supers = self.supertypes.entry(sub).or_default();
        if !supers.contains(&sup) {
            supers.push(sup);
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Serializers> {
        std::iter::successors(Some(self), |registry| registry.parent.as_deref())
    }

    /// Whether `sub` is a declared (possibly indirect) subtype of `sup` in this registry
    /// or any of its parents.
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        let mut pending = vec![sub];
        let mut seen = HashSet::new();
        while let Some(current) = pending.pop() {
            if !seen.insert(current) {
                continue;
            }
            for supers in self.chain().filter_map(|registry| registry.supertypes.get(current)) {
                for candidate in supers {
                    if candidate == sup {
                        return true;
                    }
                    pending.push(candidate.as_str());
                }
            }
        }
        false
    }

    /// Descriptor of the type called `name`, if this registry chain knows it.
    ///
    /// Scalar kinds and the built-in named types always resolve. Enumerations resolve
    /// once declared with [`declare_type`](Self::declare_type).
    pub fn resolve_type_name(&self, name: &str) -> Option<TypeDesc> {
        if let Some(kind) = ScalarKind::from_name(name) {
            return Some(TypeDesc::Scalar(kind));
        }
        for registry in self.chain() {
            if let Some(desc) = registry.named_types.get(name) {
                return Some(desc.clone());
            }
            let declared = registry.supertypes.contains_key(name)
                || registry
                    .supertypes
                    .values()
                    .any(|supers| supers.iter().any(|sup| sup == name));
            if declared {
                return Some(TypeDesc::named(name));
            }
        }
        None
    }

    pub fn has_serializer(&self, desc: &TypeDesc) -> bool {
        !matches!(self.find(desc), Ok(None))
    }

    /// Serializer for `desc` from this registry or its parents.
    pub fn find(&self, desc: &TypeDesc) -> Result<Option<Arc<dyn Serializer>>> {
        let is_subtype = |sub: &str, sup: &str| self.is_subtype(sub, sup);
        for registry in self.chain() {
            if let Some(found) = registry.find_local(desc, &is_subtype)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Like [`find`](Self::find), failing with [`Error::MissingSerializer`] when nothing matches.
    pub fn require(&self, key: &DynKey<'_>, desc: &TypeDesc) -> Result<Arc<dyn Serializer>> {
        self.find(desc)?.ok_or_else(|| Error::MissingSerializer {
            key: key.to_string(),
            desc: desc.clone(),
        })
    }

    fn find_local(
        &self,
        desc: &TypeDesc,
        is_subtype: &dyn Fn(&str, &str) -> bool,
    ) -> Result<Option<Arc<dyn Serializer>>> {
        if desc.has_params() {
            if let Some(found) = self.entries.get(&desc.erased()) {
                return Ok(Some(found.clone()));
            }
        }
        if let Some(found) = self.entries.get(desc) {
            return Ok(Some(found.clone()));
        }

        let candidates: Vec<&TypeDesc> = self
            .entries
            .keys()
            .filter(|registered| registered.is_assignable_from_with(desc, is_subtype))
            .collect();
        let most_specific: Vec<&TypeDesc> = candidates
            .iter()
            .copied()
            .filter(|candidate| {
                !candidates.iter().any(|other| {
                    other != candidate && candidate.is_assignable_from_with(other, is_subtype)
                })
            })
            .collect();

        match most_specific.as_slice() {
            [] => Ok(None),
            [only] => Ok(self.entries.get(*only).cloned()),
            many => Err(Error::AmbiguousSerializer {
                desc: desc.clone(),
                candidates: many.iter().map(|candidate| (*candidate).clone()).collect(),
            }),
        }
    }

    /// Serializes `value` into `key`.
    ///
    /// Uses the serializer resolved for the key's descriptor; without one, pushes the
    /// raw form unchanged if the backend supports the descriptor natively. For any
    /// handled descriptor, [`Object::Unit`] is stored as a raw `null`.
    pub fn write(&self, key: &DynKey<'_>, value: Object) -> Result<()> {
        let desc = key.desc();
        let serializer = self.handler(key)?;
        if matches!(value, Object::Unit) {
            log::trace!("Pushing null into '{}'", key);
            return key.storage().push_value(key, Value::Null);
        }

        match serializer {
            Some(serializer) => {
                log::trace!("Serializing '{}' as '{}'", key, desc);
                serializer.serialize(value, key, desc, key.storage().as_ref(), self)
            }
            None => {
                log::trace!("Pushing raw value of '{}'", key);
                let raw = value
                    .into_raw()
                    .map_err(|err| Error::serialization_with(key, "value has no raw form", err))?;
                key.storage().push_value(key, raw)
            }
        }
    }

    /// Deserializes the value of `key`. Mirrors [`write`](Self::write): a present
    /// `null` reads as [`Object::Unit`].
    pub fn read(&self, key: &DynKey<'_>) -> Result<Object> {
        let desc = key.desc();
        let serializer = self.handler(key)?;
        let mut is_null = false;
        key.storage().peek(key, &mut |value| is_null = matches!(value, Some(Value::Null)));
        if is_null {
            return Ok(Object::Unit);
        }

        match serializer {
            Some(serializer) => {
                log::trace!("Deserializing '{}' as '{}'", key, desc);
                serializer.deserialize(key, desc, key.storage().as_ref(), self)
            }
            None => key.storage().fetch_value(key).map(Object::from_raw),
        }
    }

    /// Serializer for the descriptor of `key`, `None` when the backend stores the
    /// value raw, [`Error::UnsupportedValueType`] when neither applies.
    fn handler(&self, key: &DynKey<'_>) -> Result<Option<Arc<dyn Serializer>>> {
        let desc = key.desc();
        if let Some(serializer) = self.find(desc)? {
            return Ok(Some(serializer));
        }

        let backend = key.config().backend();
        if backend.supports(desc) {
            return Ok(None);
        }

        Err(Error::UnsupportedValueType {
            key: key.to_string(),
            desc: desc.clone(),
            backend: backend.name().to_string(),
        })
    }
}
