//! # Confkey Keys
//!
//! A key is an addressable handle to one configuration value, located by a chain of
//! names from the config root. [`DynKey`] is the untyped form every operation runs
//! on; [`Key`] is the typed front door converting through [`Configurable`].
//!
//! ## Identity
//!
//! Keys compare by [`KeyIdentity`] only: config, parent, name, and the original key
//! an *emulated* key was derived from. Type descriptor and storage never take part,
//! so a [`DynKey::get_as`] view equals the key it was taken from.
//!
//! ## Components
//!
//! - [`DynKey`]: untyped key and dispatch entry point.
//! - [`Key`]: typed wrapper.
//! - [`KeySpec`]: reusable (name, type) pair.
//! - [`IndexKey`]: one existing element of a list key.
//! - [`ProcessedKey`]: key with value pre/post processors.
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::config::{Config, ConfigId};
use crate::error::Result;
use crate::storage::{InnerStorage, MapStorage, RootStorage, Storage};
use crate::types::TypeDesc;
use crate::value::{Configurable, Object};

pub mod index;
pub mod process;
pub mod spec;
pub mod typed;

pub use index::IndexKey;
pub use process::ProcessedKey;
pub use spec::KeySpec;
pub use typed::Key;

/// Logical identity of a key.
#[derive(Clone)]
pub struct KeyIdentity {
    config: ConfigId,
    parent: Option<Rc<KeyIdentity>>,
    name: Option<Rc<str>>,
    /// Identity of the key this one emulates; `None` if the key is its own original.
    original: Option<Rc<KeyIdentity>>,
}

impl KeyIdentity {
    pub fn config(&self) -> ConfigId {
        self.config
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_emulated(&self) -> bool {
        self.original.is_some()
    }

    /// The resolved original key. Never itself emulated.
    fn origin(&self) -> &KeyIdentity {
        self.original.as_deref().unwrap_or(self)
    }

    fn same_slot(&self, other: &KeyIdentity) -> bool {
        self.config == other.config && self.name == other.name && self.parent == other.parent
    }

    fn hash_slot<H: Hasher>(&self, state: &mut H) {
        self.config.hash(state);
        self.name.hash(state);
        self.parent.hash(state);
    }
}

impl PartialEq for KeyIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.same_slot(other) && self.origin().same_slot(other.origin())
    }
}

impl Eq for KeyIdentity {}

impl Hash for KeyIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_slot(state);
        self.origin().hash_slot(state);
    }
}

impl fmt::Debug for KeyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyIdentity")
            .field("config", &self.config)
            .field("name", &self.name)
            .field("emulated", &self.is_emulated())
            .finish()
    }
}

struct KeyInner<'c> {
    config: &'c Config,
    parent: Option<DynKey<'c>>,
    name: Option<Rc<str>>,
    desc: TypeDesc,
    storage: Rc<dyn Storage + 'c>,
    identity: Rc<KeyIdentity>,
}

/// Untyped key bound to a config, a type descriptor and a storage.
///
/// Cheap to clone. Keys are created per call and never cached; two keys for the same
/// slot are distinct values that compare equal.
#[derive(Clone)]
pub struct DynKey<'c> {
    inner: Rc<KeyInner<'c>>,
}

impl<'c> DynKey<'c> {
    /// The default root key of `config`, holding the whole root map as its value.
    pub(crate) fn root(config: &'c Config) -> Self {
        DynKey {
            inner: Rc::new(KeyInner {
                config,
                parent: None,
                name: None,
                desc: TypeDesc::raw_map(),
                storage: Rc::new(RootStorage::new(config.root_cell())),
                identity: Rc::new(KeyIdentity {
                    config: config.id(),
                    parent: None,
                    name: None,
                    original: None,
                }),
            }),
        }
    }

    pub fn config(&self) -> &'c Config {
        self.inner.config
    }

    pub fn parent(&self) -> Option<&DynKey<'c>> {
        self.inner.parent.as_ref()
    }

    /// Local name; `None` only for the root key.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    pub fn desc(&self) -> &TypeDesc {
        &self.inner.desc
    }

    pub fn storage(&self) -> &Rc<dyn Storage + 'c> {
        &self.inner.storage
    }

    pub fn identity(&self) -> &KeyIdentity {
        &self.inner.identity
    }

    pub fn is_emulated(&self) -> bool {
        self.inner.identity.is_emulated()
    }

    pub fn is_root(&self) -> bool {
        let identity = &self.inner.identity;
        identity.parent.is_none() && identity.name.is_none() && !identity.is_emulated()
    }

    /// Child key named `name` with type `desc`.
    ///
    /// Children of the root live directly in the root map; any other child lives in
    /// the section held by this key, created on first write.
    pub fn get_key(&self, name: impl Into<String>, desc: TypeDesc) -> DynKey<'c> {
        let name: Rc<str> = Rc::from(name.into());
        let storage: Rc<dyn Storage + 'c> = if self.is_root() {
            Rc::new(MapStorage::new(self.config().root_cell()))
        } else {
            Rc::new(InnerStorage::new(self.inner.storage.clone(), self.clone()))
        };

        DynKey {
            inner: Rc::new(KeyInner {
                config: self.inner.config,
                parent: Some(self.clone()),
                name: Some(name.clone()),
                desc,
                storage,
                identity: Rc::new(KeyIdentity {
                    config: self.inner.identity.config,
                    parent: Some(self.inner.identity.clone()),
                    name: Some(name),
                    original: None,
                }),
            }),
        }
    }

    /// A grouping key with no value of its own.
    pub fn get_key_section(&self, name: impl Into<String>) -> DynKey<'c> {
        self.get_key(name, TypeDesc::Void)
    }

    /// Typed child key.
    pub fn child<T: Configurable>(&self, name: impl Into<String>) -> Key<'c, T> {
        Key::from_dyn(self.get_key(name, T::descriptor()))
    }

    /// Emulated view of this key with another type descriptor.
    pub fn get_as(&self, desc: TypeDesc) -> DynKey<'c> {
        self.get_as_with(desc, self.inner.storage.clone())
    }

    /// Emulated view of this key with another type descriptor and storage.
    pub fn get_as_with(&self, desc: TypeDesc, storage: Rc<dyn Storage + 'c>) -> DynKey<'c> {
        self.derive(self.inner.name.clone(), desc, storage)
    }

    /// Typed view of this key.
    pub fn typed<T: Configurable>(&self) -> Key<'c, T> {
        if *self.desc() == T::descriptor() {
            Key::from_dyn(self.clone())
        } else {
            Key::from_dyn(self.get_as(T::descriptor()))
        }
    }

    /// Emulated sibling named `name`, sharing this key's original.
    ///
    /// Serializers use this for synthetic element keys such as `items:0`.
    pub fn emulate(
        &self,
        name: impl Into<String>,
        desc: TypeDesc,
        storage: Rc<dyn Storage + 'c>,
    ) -> DynKey<'c> {
        self.derive(Some(Rc::from(name.into())), desc, storage)
    }

    fn derive(&self, name: Option<Rc<str>>, desc: TypeDesc, storage: Rc<dyn Storage + 'c>) -> DynKey<'c> {
        let identity = &self.inner.identity;
        let original = identity
            .original
            .clone()
            .unwrap_or_else(|| identity.clone());

        DynKey {
            inner: Rc::new(KeyInner {
                config: self.inner.config,
                parent: self.inner.parent.clone(),
                name: name.clone(),
                desc,
                storage,
                identity: Rc::new(KeyIdentity {
                    config: identity.config,
                    parent: identity.parent.clone(),
                    name,
                    original: Some(original),
                }),
            }),
        }
    }

    /// Deserializes the value of this key.
    pub fn get_value(&self) -> Result<Object> {
        self.config().serializers().read(self)
    }

    /// Serializes `value` into this key.
    pub fn set_value(&self, value: Object) -> Result<()> {
        self.config().serializers().write(self, value)
    }

    pub fn exists(&self) -> bool {
        self.inner.storage.exists(self)
    }

    /// Removes the slot of this key. Returns whether anything was removed.
    pub fn remove(&self) -> Result<bool> {
        Ok(self.inner.storage.remove_value(self)?.is_some())
    }

    /// Names from the root down to this key.
    pub fn path(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut current = Some(self);
        while let Some(key) = current {
            if let Some(name) = key.name() {
                names.push(name.to_string());
            }
            current = key.parent();
        }
        names.reverse();
        names
    }

    pub fn path_string(&self) -> String {
        self.path().join(".")
    }
}

/// Synthetic name of element `index` of the list held by `key`.
pub(crate) fn element_name(key: &DynKey<'_>, index: usize) -> String {
    format!("{}:{}", key.name().unwrap_or_default(), index)
}

impl<'c> AsRef<DynKey<'c>> for DynKey<'c> {
    fn as_ref(&self) -> &DynKey<'c> {
        self
    }
}

impl PartialEq for DynKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.identity == other.inner.identity
    }
}

impl Eq for DynKey<'_> {}

impl Hash for DynKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.identity.hash(state);
    }
}

impl fmt::Display for DynKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.path_string())
        }
    }
}

impl fmt::Debug for DynKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynKey")
            .field("path", &self.path_string())
            .field("desc", &self.inner.desc)
            .field("emulated", &self.is_emulated())
            .finish()
    }
}
