//! # Confkey Config
//!
//! [`Config`] owns the raw root map, the local serializer registry and the backend.
//! Keys borrow the config; every value written through a key ends up in the root map,
//! which the backend persists on [`Config::save`].
//!
//! A config performs no locking. It is `Send` but not `Sync`: share it across threads
//! behind a `Mutex`.
use std::cell::{Ref, RefCell};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::backend::Backend;
use crate::error::Result;
use crate::key::{DynKey, Key};
use crate::serializer::Serializers;
use crate::value::{Configurable, RawMap};

static NEXT_CONFIG_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Config`], part of every key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigId(u64);

impl ConfigId {
    fn next() -> Self {
        ConfigId(NEXT_CONFIG_ID.fetch_add(1, Ordering::Relaxed))
    }
}

pub struct Config {
    id: ConfigId,
    root: RefCell<RawMap>,
    serializers: Serializers,
    backend: Box<dyn Backend>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("id", &self.id)
            .field("backend", &self.backend.name())
            .field("entries", &self.root.borrow().len())
            .field("serializers", &self.serializers)
            .finish()
    }
}

impl Config {
    /// Config over `backend` with a fresh default serializer registry.
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self::with_serializers(backend, Arc::new(Serializers::with_defaults()))
    }

    /// Config over `backend` whose local registry falls back to `defaults`.
    pub fn with_serializers(backend: impl Backend + 'static, defaults: Arc<Serializers>) -> Self {
        let mut serializers = Serializers::with_parent(defaults);
        backend.register_serializers(&mut serializers);
        let config = Self {
            id: ConfigId::next(),
            root: RefCell::new(RawMap::new()),
            serializers,
            backend: Box::new(backend),
        };
        log::debug!("Created config {:?} over '{}' backend", config.id, config.backend.name());
        config
    }

    pub fn id(&self) -> ConfigId {
        self.id
    }

    /// Entry point for all key construction.
    pub fn root_key(&self) -> DynKey<'_> {
        self.backend.resolve_root(DynKey::root(self))
    }

    /// Typed child of the root key.
    pub fn key<T: Configurable>(&self, name: impl Into<String>) -> Key<'_, T> {
        self.root_key().child(name)
    }

    pub fn serializers(&self) -> &Serializers {
        &self.serializers
    }

    pub fn serializers_mut(&mut self) -> &mut Serializers {
        &mut self.serializers
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub(crate) fn root_cell(&self) -> &RefCell<RawMap> {
        &self.root
    }

    /// Borrow of the raw root map.
    pub fn raw(&self) -> Ref<'_, RawMap> {
        self.root.borrow()
    }

    /// Replaces the raw root map, returning the previous one.
    pub fn replace_raw(&self, root: RawMap) -> RawMap {
        self.root.replace(root)
    }

    /// Hands the root map to the backend.
    pub fn save(&self) -> Result<()> {
        self.backend.save(&self.root.borrow())?;
        log::info!("Saved config {:?} through '{}' backend", self.id, self.backend.name());
        Ok(())
    }

    /// Replaces the root map with the one loaded by the backend.
    ///
    /// On failure the current root map is kept.
    pub fn load(&self) -> Result<()> {
        let loaded = self.backend.load()?;
        log::info!(
            "Loaded config {:?} through '{}' backend ({} entries)",
            self.id,
            self.backend.name(),
            loaded.len()
        );
        self.root.replace(loaded);
        Ok(())
    }
}
