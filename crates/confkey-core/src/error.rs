//! # Confkey Core Errors
//!
//! Defines the error type returned by key, storage and serializer operations.
//!
//! [`Error`] is the primary enum. Backend failures are wrapped through
//! [`BackendError`] so callers only ever match on one type.
use std::error::Error as StdError;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::backend::error::BackendError;
use crate::types::TypeDesc;

#[derive(Debug, ThisError)]
pub enum Error {
    /// No serializer is registered for the type and the backend cannot hold it raw.
    #[error("Unsupported value type '{desc}' for key '{key}' (backend: {backend})")]
    UnsupportedValueType {
        key: String,
        desc: TypeDesc,
        backend: String,
    },

    /// Read of a slot that holds no value.
    #[error("Key not found: '{key}'")]
    KeyNotFound { key: String },

    /// A serializer was required for a type that has none registered.
    #[error("Missing serializer for key '{key}' of type '{desc}'")]
    MissingSerializer { key: String, desc: TypeDesc },

    /// Several unrelated supertype registrations match the same type.
    #[error("Ambiguous serializer for type '{desc}': candidates {}", format_candidates(candidates))]
    AmbiguousSerializer {
        desc: TypeDesc,
        candidates: Vec<TypeDesc>,
    },

    #[error("Cannot register serializer for type '{desc}': {reason}")]
    InvalidRegistration { desc: TypeDesc, reason: String },

    #[error("Index {index} out of bounds for list '{key}' of length {len}")]
    IndexOutOfBounds {
        key: String,
        index: usize,
        len: usize,
    },

    /// A serializer failed to convert a value.
    #[error("Serialization error at key '{key}': {message}")]
    Serialization {
        key: String,
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    },

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

fn format_candidates(candidates: &[TypeDesc]) -> String {
    candidates
        .iter()
        .map(|desc| desc.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    pub fn key_not_found(key: impl ToString) -> Self {
        Error::KeyNotFound {
            key: key.to_string(),
        }
    }

    pub fn serialization(key: impl ToString, message: impl Into<String>) -> Self {
        Error::Serialization {
            key: key.to_string(),
            message: message.into(),
            source: None,
        }
    }

    pub fn serialization_with<E>(key: impl ToString, message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::Serialization {
            key: key.to_string(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
