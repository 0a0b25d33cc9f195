//! # Confkey Backend Errors
//!
//! Defines [`BackendError`], raised when a backend fails to persist or restore the
//! root map: file I/O, encoding to or decoding from a text format, or a document
//! whose root is not a map.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization to '{format}' failed: {source}")]
    SerializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Deserialization from '{format}' failed: {source}")]
    DeserializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedConfigFormat(String),

    #[error("Document root in '{format}' must be a map, found {found}")]
    InvalidRoot { format: String, found: String },

    #[error("Backend operation '{operation}' failed: {message}")]
    OperationFailed { operation: String, message: String },
}

// Helper for creating Io errors, ensuring path is always included.
impl BackendError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        BackendError::Io {
            source,
            operation: operation.into(),
            path: path.into(),
        }
    }

    pub fn operation_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        BackendError::OperationFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
