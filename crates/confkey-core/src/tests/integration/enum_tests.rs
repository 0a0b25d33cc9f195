#![cfg(test)]

use std::collections::HashMap;

use serde_json::json;

use super::common::{Color, json_config, raw_map};
use crate::backend::MemoryBackend;
use crate::config::Config;
use crate::error::{Error, Result};

#[test]
fn test_enum_writes_variant_name() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    config.key::<Color>("color").set_value(Color::Red)?;

    assert_eq!(config.raw().get("color"), Some(&json!("RED")));
    Ok(())
}

#[test]
fn test_enum_reads_variant_name() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    config.replace_raw(raw_map(json!({"color": "GREEN"})));

    assert_eq!(config.key::<Color>("color").get_value()?, Color::Green);
    Ok(())
}

#[test]
fn test_enum_unknown_variant() -> Result<()> {
    let config = json_config(r#"{"color": "BLUE"}"#)?;

    assert!(matches!(
        config.key::<Color>("color").get_value(),
        Err(Error::Serialization { .. })
    ));
    Ok(())
}

#[test]
fn test_enums_in_collections() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let palette = config.key::<Vec<Color>>("palette");
    palette.set_value(vec![Color::Green, Color::Red])?;

    let by_color = config.key::<HashMap<Color, u32>>("counts");
    by_color.set_value(HashMap::from([(Color::Red, 2)]))?;

    assert_eq!(config.raw().get("palette"), Some(&json!(["GREEN", "RED"])));
    assert_eq!(config.raw().get("counts"), Some(&json!({"RED": 2})));
    assert_eq!(palette.get_value()?, vec![Color::Green, Color::Red]);
    assert_eq!(by_color.get_value()?.get(&Color::Red), Some(&2));
    Ok(())
}
