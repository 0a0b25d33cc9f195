use std::fmt;
use std::path::Path;

use serde_json::Value;

use super::error::BackendError;
use crate::value::{RawMap, raw_kind};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }

    /// Encodes a root map as text in this format.
    pub fn encode(&self, root: &RawMap) -> Result<String, BackendError> {
        let encoded = match self {
            ConfigFormat::Json => serde_json::to_string_pretty(root).map_err(boxed),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(root).map_err(boxed),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(root).map_err(boxed),
        };
        encoded.map_err(|source| BackendError::SerializationError {
            format: self.to_string(),
            source,
        })
    }

    /// Decodes a root map from text in this format.
    ///
    /// Blank input and an empty document decode as an empty map.
    pub fn decode(&self, data: &str) -> Result<RawMap, BackendError> {
        if data.trim().is_empty() {
            return Ok(RawMap::new());
        }

        let decoded: Result<Value, _> = match self {
            ConfigFormat::Json => serde_json::from_str(data).map_err(boxed),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(boxed),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(boxed),
        };
        match decoded {
            Ok(Value::Object(root)) => Ok(root),
            Ok(Value::Null) => Ok(RawMap::new()),
            Ok(other) => Err(BackendError::InvalidRoot {
                format: self.to_string(),
                found: raw_kind(&other).to_string(),
            }),
            Err(source) => Err(BackendError::DeserializationError {
                format: self.to_string(),
                source,
            }),
        }
    }
}

fn boxed<E>(err: E) -> Box<dyn std::error::Error + Send + Sync + 'static>
where
    E: std::error::Error + Send + Sync + 'static,
{
    Box::new(err)
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigFormat::Json => "JSON",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "YAML",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "TOML",
        };
        f.write_str(name)
    }
}
