#![cfg(test)]

use serde_json::json;

use super::common::{json_config, raw_map};
use crate::backend::MemoryBackend;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::TypeDesc;
use crate::value::Object;

#[test]
fn test_nested_section_serializes_to_map_form() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let name = config.root_key().get_key_section("user").get_key("name", TypeDesc::STRING);
    name.set_value(Object::String("Ann".to_string()))?;

    assert_eq!(*config.raw(), raw_map(json!({"user": {"name": "Ann"}})));
    Ok(())
}

#[test]
fn test_list_serializes_to_map_form() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    config.key::<Vec<i32>>("items").set_value(vec![1, 2, 3])?;

    assert_eq!(*config.raw(), raw_map(json!({"items": [1, 2, 3]})));
    Ok(())
}

#[test]
fn test_map_form_deserializes_back() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    config.replace_raw(raw_map(json!({"user": {"name": "Ann"}, "items": [1, 2, 3]})));

    let user = config.root_key().get_key_section("user");
    assert_eq!(user.child::<String>("name").get_value()?, "Ann");
    assert_eq!(config.key::<Vec<i32>>("items").get_value()?, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn test_values_survive_save_and_load() -> Result<()> {
    let first = Config::new(MemoryBackend::new());
    first.root_key().get_key_section("user").child::<String>("name").set_value("Ann".to_string())?;
    first.key::<Vec<i32>>("items").set_value(vec![1, 2, 3])?;
    first.save()?;

    let second = Config::new(MemoryBackend::with_root(first.backend().load()?));
    second.load()?;
    assert_eq!(
        second.root_key().get_key_section("user").child::<String>("name").get_value()?,
        "Ann"
    );
    assert_eq!(second.key::<Vec<i32>>("items").get_value()?, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn test_exists_and_key_not_found() -> Result<()> {
    let config = json_config(r#"{"user": {"name": "Ann", "nickname": null}}"#)?;
    let user = config.root_key().get_key_section("user");

    assert!(user.exists());
    assert!(user.child::<String>("name").exists());
    // A present null still exists
    assert!(user.child::<String>("nickname").exists());
    assert!(!user.child::<String>("age").exists());
    assert!(!config.root_key().get_key_section("team").child::<String>("lead").exists());

    match user.child::<i32>("age").get_value() {
        Err(Error::KeyNotFound { key }) => assert_eq!(key, "user.age"),
        other => panic!("expected KeyNotFound, got {:?}", other),
    }
    // Reading never materializes sections
    assert!(!config.raw().contains_key("team"));
    Ok(())
}

#[test]
fn test_section_replaces_scalar_on_write() -> Result<()> {
    let config = json_config(r#"{"user": "flat"}"#)?;
    let name = config.root_key().get_key_section("user").child::<String>("name");

    assert!(!name.exists());
    name.set_value("Ann".to_string())?;
    assert_eq!(*config.raw(), raw_map(json!({"user": {"name": "Ann"}})));
    Ok(())
}

#[test]
fn test_views_share_storage() -> Result<()> {
    let config = json_config(r#"{"port": "8080"}"#)?;
    let port = config.key::<String>("port");
    let numeric = port.get_as::<u16>();

    assert_eq!(numeric.get_value()?, 8080);
    numeric.set_value(9090)?;
    assert_eq!(port.get_value()?, "9090");
    assert_eq!(port.as_dyn(), numeric.as_dyn());
    Ok(())
}

#[test]
fn test_remove_and_default() -> Result<()> {
    let config = json_config(r#"{"retries": 3}"#)?;
    let retries = config.key::<u8>("retries");

    assert_eq!(retries.get_value_or(5)?, 3);
    assert!(retries.remove()?);
    assert!(!retries.remove()?);
    assert_eq!(retries.get_value_or(5)?, 5);
    Ok(())
}

#[test]
fn test_list_element_keys() -> Result<()> {
    let config = json_config(r#"{"hosts": ["a", "b"]}"#)?;
    let hosts = config.key::<Vec<String>>("hosts");

    hosts.index(0).set_value("primary".to_string())?;
    assert_eq!(hosts.get_value()?, vec!["primary".to_string(), "b".to_string()]);

    match hosts.index(5).get_value() {
        Err(Error::IndexOutOfBounds { index, len, .. }) => assert_eq!((index, len), (5, 2)),
        other => panic!("expected IndexOutOfBounds, got {:?}", other),
    }
    Ok(())
}
