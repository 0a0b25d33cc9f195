//! # Confkey Backends
//!
//! A [`Backend`] turns the raw root map of a config into bytes and back. The engine
//! only relies on the narrow contract below; formats and I/O stay here.
//!
//! ## Backends
//!
//! - [`MemoryBackend`]: keeps the last saved map in memory.
//! - [`FunctionBackend`]: delegates to a pair of closures.
//! - [`StringBackend`]: encodes into an in-memory text buffer.
//! - [`FileBackend`]: encodes into a file, written atomically.
//!
//! Text encoding uses [`ConfigFormat`]: JSON always, YAML with the `yaml-config`
//! feature and TOML with the `toml-config` feature.
use crate::key::DynKey;
use crate::serializer::Serializers;
use crate::types::TypeDesc;
use crate::value::RawMap;

pub mod error;
pub mod file;
pub mod format;
pub mod memory;

pub use error::BackendError;
pub use file::FileBackend;
pub use format::ConfigFormat;
pub use memory::{FunctionBackend, MemoryBackend, StringBackend};

/// Persistence collaborator of a [`Config`](crate::Config).
pub trait Backend: Send + Sync {
    /// Short name used in error messages.
    fn name(&self) -> &str;

    fn save(&self, root: &RawMap) -> Result<(), BackendError>;

    fn load(&self) -> Result<RawMap, BackendError>;

    /// Whether values of `desc` can be stored raw, without a serializer.
    fn supports(&self, desc: &TypeDesc) -> bool {
        desc.is_basic()
    }

    /// Hook to contribute format-specific serializers to a config's local registry.
    fn register_serializers(&self, _serializers: &mut Serializers) {}

    /// Hook to substitute the key handed out as the config root.
    fn resolve_root<'c>(&self, default: DynKey<'c>) -> DynKey<'c> {
        default
    }
}

#[cfg(test)]
mod tests;
