#![cfg(test)]

use std::sync::Arc;

use serde_json::Value;

use crate::backend::{ConfigFormat, MemoryBackend, StringBackend};
use crate::config::Config;
use crate::error::Result;
use crate::serializer::Serializers;
use crate::value::{ConfigEnum, RawMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
}

impl ConfigEnum for Color {
    const TYPE_NAME: &'static str = "Color";

    fn variants() -> &'static [Self] {
        &[Color::Red, Color::Green]
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Green => "GREEN",
        }
    }
}

crate::configurable_enum!(Color);

/// Unwraps a JSON object literal into a root map.
pub fn raw_map(value: Value) -> RawMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object literal, got {}", other),
    }
}

/// Config over a JSON string backend preloaded with `contents`.
pub fn json_config(contents: &str) -> Result<Config> {
    let config = Config::new(StringBackend::with_contents(ConfigFormat::Json, contents));
    config.load()?;
    Ok(config)
}

/// Fresh in-memory config sharing `defaults` with other configs of the same test.
pub fn memory_config(defaults: &Arc<Serializers>) -> Config {
    Config::with_serializers(MemoryBackend::new(), defaults.clone())
}
