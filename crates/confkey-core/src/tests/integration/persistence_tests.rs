#![cfg(test)]

use std::collections::BTreeMap;
use std::path::Path;

use tempfile::tempdir;
use uuid::Uuid;

use super::common::Color;
use crate::backend::FileBackend;
use crate::config::Config;
use crate::error::Result;

#[derive(Debug, PartialEq)]
struct Settings {
    name: String,
    port: u16,
    ratio: f64,
    color: Color,
    id: Uuid,
    tags: Vec<String>,
    limits: BTreeMap<String, i64>,
    owner: String,
}

fn sample() -> Settings {
    Settings {
        name: "demo".to_string(),
        port: 8080,
        ratio: 0.75,
        color: Color::Green,
        id: Uuid::new_v4(),
        tags: vec!["alpha".to_string(), "beta".to_string()],
        limits: BTreeMap::from([("cpu".to_string(), 4), ("memory".to_string(), 2048)]),
        owner: "Ann".to_string(),
    }
}

fn write(config: &Config, settings: &Settings) -> Result<()> {
    config.key::<String>("name").set_value(settings.name.clone())?;
    config.key::<u16>("port").set_value(settings.port)?;
    config.key::<f64>("ratio").set_value(settings.ratio)?;
    config.key::<Color>("color").set_value(settings.color)?;
    config.key::<Uuid>("id").set_value(settings.id)?;
    config.key::<Vec<String>>("tags").set_value(settings.tags.clone())?;
    config
        .key::<BTreeMap<String, i64>>("limits")
        .set_value(settings.limits.clone())?;
    config
        .root_key()
        .get_key_section("meta")
        .child::<String>("owner")
        .set_value(settings.owner.clone())?;
    Ok(())
}

fn read(config: &Config) -> Result<Settings> {
    Ok(Settings {
        name: config.key::<String>("name").get_value()?,
        port: config.key::<u16>("port").get_value()?,
        ratio: config.key::<f64>("ratio").get_value()?,
        color: config.key::<Color>("color").get_value()?,
        id: config.key::<Uuid>("id").get_value()?,
        tags: config.key::<Vec<String>>("tags").get_value()?,
        limits: config.key::<BTreeMap<String, i64>>("limits").get_value()?,
        owner: config
            .root_key()
            .get_key_section("meta")
            .child::<String>("owner")
            .get_value()?,
    })
}

fn round_trip(path: &Path) -> Result<()> {
    let settings = sample();

    let writer = Config::new(FileBackend::new(path)?);
    write(&writer, &settings)?;
    writer.save()?;

    let reader = Config::new(FileBackend::new(path)?);
    assert!(reader.raw().is_empty());
    reader.load()?;
    assert_eq!(read(&reader)?, settings);
    Ok(())
}

#[test]
fn test_json_file_round_trip() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    round_trip(&temp_dir.path().join("settings.json"))
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_yaml_file_round_trip() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    round_trip(&temp_dir.path().join("settings.yaml"))
}

#[cfg(feature = "toml-config")]
#[test]
fn test_toml_file_round_trip() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    round_trip(&temp_dir.path().join("settings.toml"))
}

#[test]
fn test_load_from_missing_file_starts_empty() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = Config::new(FileBackend::new(temp_dir.path().join("fresh.json"))?);

    config.load()?;
    assert!(config.raw().is_empty());
    assert!(!config.key::<String>("name").exists());
    Ok(())
}

#[test]
fn test_hand_written_document_is_coerced() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("hand.json");
    std::fs::write(&path, r#"{"port": "8081", "tags": "single", "color": "RED"}"#)
        .expect("write document");

    let config = Config::new(FileBackend::new(&path)?);
    config.load()?;
    assert_eq!(config.key::<u16>("port").get_value()?, 8081);
    assert_eq!(config.key::<Color>("color").get_value()?, Color::Red);
    assert!(config.key::<Vec<String>>("tags").get_value().is_err());
    Ok(())
}
