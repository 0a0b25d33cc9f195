use serde_json::json;

use crate::backend::MemoryBackend;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::{CellStorage, MapStorage, RootStorage, Storage};
use crate::types::TypeDesc;

#[test]
fn test_map_storage_push_fetch_remove() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let key = config.root_key().get_key("port", TypeDesc::I32);
    let storage = MapStorage::new(config.root_cell());

    assert!(!storage.exists(&key));
    storage.push_value(&key, json!(8080))?;

    assert!(storage.exists(&key));
    assert_eq!(storage.fetch_value(&key)?, json!(8080));
    assert_eq!(config.raw().get("port"), Some(&json!(8080)));

    assert_eq!(storage.remove_value(&key)?, Some(json!(8080)));
    assert!(!storage.exists(&key));
    assert!(config.raw().is_empty());
    Ok(())
}

#[test]
fn test_fetch_absent_is_key_not_found() {
    let config = Config::new(MemoryBackend::new());
    let key = config.root_key().get_key("missing", TypeDesc::STRING);
    let storage = MapStorage::new(config.root_cell());

    match storage.fetch_value(&key) {
        Err(Error::KeyNotFound { key }) => assert_eq!(key, "missing"),
        other => panic!("expected KeyNotFound, got {:?}", other),
    }
}

#[test]
fn test_null_value_exists() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let key = config.root_key().get_key("nothing", TypeDesc::Any);
    let storage = MapStorage::new(config.root_cell());

    storage.push_value(&key, json!(null))?;
    assert!(storage.exists(&key), "Present null is distinct from absence");
    Ok(())
}

#[test]
fn test_root_storage_holds_whole_map() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let root = config.root_key();
    let storage = RootStorage::new(config.root_cell());

    storage.push_value(&root, json!({"a": 1, "b": [true]}))?;
    assert_eq!(config.raw().get("b"), Some(&json!([true])));
    assert_eq!(storage.fetch_value(&root)?, json!({"a": 1, "b": [true]}));

    // A non-map root is rejected and the previous map kept
    assert!(storage.push_value(&root, json!([1, 2])).is_err());
    assert_eq!(config.raw().len(), 2);
    Ok(())
}

#[test]
fn test_cell_storage_failed_edit_leaves_cell_empty() {
    let config = Config::new(MemoryBackend::new());
    let key = config.root_key().get_key("staged", TypeDesc::Any);
    let cell = CellStorage::new();

    let result = cell.modify(&key, &mut |_| Err(Error::serialization("staged", "boom")));
    assert!(result.is_err());
    assert!(!cell.exists(&key));

    let cell = CellStorage::with_value(json!("kept"));
    assert_eq!(cell.take(), Some(json!("kept")));
    assert_eq!(cell.take(), None);
}
