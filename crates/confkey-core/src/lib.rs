//! Typed, path-indexed keys over semi-structured configuration maps.
//!
//! A [`Config`] holds a raw root map. Keys obtained from [`Config::root_key`] address
//! values by a chain of names, carry a [`TypeDesc`], and convert values through the
//! [`Serializers`] registry or store them raw when the [`Backend`] supports the type.
pub mod backend;
pub mod config;
pub mod error;
pub mod key;
pub mod serializer;
pub mod storage;
pub mod types;
pub mod value;

// Re-export the main entry points
pub use backend::{Backend, BackendError, ConfigFormat, FileBackend, FunctionBackend, MemoryBackend, StringBackend};
pub use config::{Config, ConfigId};
pub use error::{Error, Result};
pub use key::{DynKey, IndexKey, Key, KeyIdentity, KeySpec, ProcessedKey};
pub use serializer::{Serializer, Serializers};
pub use storage::Storage;
pub use types::{TypeDesc, TypeName};
pub use value::{ConfigEnum, Configurable, Object, RawMap};

#[cfg(test)]
mod tests;
