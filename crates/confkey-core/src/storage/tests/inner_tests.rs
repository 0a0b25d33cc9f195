use std::rc::Rc;

use serde_json::json;

use crate::backend::MemoryBackend;
use crate::config::Config;
use crate::error::Result;
use crate::storage::{AutoPushMapStorage, CellStorage, Storage};
use crate::types::TypeDesc;

#[test]
fn test_write_materializes_sections() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let key = config
        .root_key()
        .get_key_section("a")
        .get_key_section("b")
        .get_key("c", TypeDesc::I32);

    key.storage().push_value(&key, json!(1))?;
    assert_eq!(
        serde_json::Value::Object(config.raw().clone()),
        json!({"a": {"b": {"c": 1}}})
    );
    Ok(())
}

#[test]
fn test_read_never_creates_sections() {
    let config = Config::new(MemoryBackend::new());
    let key = config.root_key().get_key_section("a").get_key("b", TypeDesc::I32);

    assert!(!key.exists());
    assert!(key.storage().fetch_value(&key).is_err());
    assert!(config.raw().is_empty(), "Reads must not create the section");
}

#[test]
fn test_section_replaced_wholesale_is_seen_fresh() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let section = config.root_key().get_key("server", TypeDesc::Any);
    let port = section.get_key("port", TypeDesc::I32);

    port.storage().push_value(&port, json!(80))?;
    section.storage().push_value(&section, json!({"port": 8080}))?;

    assert_eq!(port.storage().fetch_value(&port)?, json!(8080));
    Ok(())
}

#[test]
fn test_write_replaces_non_map_section() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let section = config.root_key().get_key("server", TypeDesc::Any);
    section.storage().push_value(&section, json!("not a map"))?;

    let port = section.get_key("port", TypeDesc::I32);
    assert!(!port.exists());
    port.storage().push_value(&port, json!(1))?;
    assert_eq!(config.raw().get("server"), Some(&json!({"port": 1})));
    Ok(())
}

#[test]
fn test_remove_keeps_absent_section_absent() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let key = config.root_key().get_key_section("a").get_key("b", TypeDesc::I32);

    assert_eq!(key.storage().remove_value(&key)?, None);
    assert!(config.raw().is_empty());

    key.storage().push_value(&key, json!(2))?;
    assert_eq!(key.storage().remove_value(&key)?, Some(json!(2)));
    assert_eq!(config.raw().get("a"), Some(&json!({})));
    Ok(())
}

#[test]
fn test_auto_push_pushes_whole_section() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let target_key = config.root_key().get_key("scratch", TypeDesc::Any);
    let target = Rc::new(CellStorage::new());
    let storage = AutoPushMapStorage::new(target.clone(), target_key.clone());

    let x = target_key.get_as(TypeDesc::I32);
    storage.push_value(&x, json!(5))?;
    assert_eq!(target.fetch_value(&target_key)?, json!({"scratch": 5}));

    // The target lost the section; the next write restores it
    target.take();
    let y = config.root_key().get_key("other", TypeDesc::I32);
    storage.push_value(&y, json!(6))?;
    assert_eq!(target.fetch_value(&target_key)?, json!({"scratch": 5, "other": 6}));

    assert_eq!(storage.fetch_value(&x)?, json!(5));
    Ok(())
}
