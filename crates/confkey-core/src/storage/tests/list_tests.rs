use std::rc::Rc;

use serde_json::json;

use crate::backend::MemoryBackend;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::key::element_name;
use crate::storage::{CellStorage, IndexStorage, ListStorage, MapStorage, Storage};
use crate::types::TypeDesc;

#[test]
fn test_list_storage_repushes_ordered_list() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let list_key = config.root_key().get_key("items", TypeDesc::list(TypeDesc::I32));
    let backing = Rc::new(CellStorage::new());
    let list: Rc<dyn Storage + '_> = Rc::new(ListStorage::new(backing.clone(), list_key.clone()));

    let first = list_key.emulate(element_name(&list_key, 0), TypeDesc::I32, list.clone());
    let second = list_key.emulate(element_name(&list_key, 1), TypeDesc::I32, list.clone());

    list.push_value(&first, json!(10))?;
    assert_eq!(backing.fetch_value(&list_key)?, json!([10]));

    list.push_value(&second, json!(20))?;
    list.push_value(&first, json!(11))?;
    assert_eq!(backing.fetch_value(&list_key)?, json!([11, 20]));

    // Reads come from the element slots, keyed by identity
    assert_eq!(list.fetch_value(&second)?, json!(20));
    let third = list_key.emulate(element_name(&list_key, 2), TypeDesc::I32, list.clone());
    assert!(!list.exists(&third));
    Ok(())
}

#[test]
fn test_list_storage_seeded_slots_do_not_push() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let list_key = config.root_key().get_key("items", TypeDesc::raw_list());
    let backing = Rc::new(CellStorage::new());
    let list = Rc::new(ListStorage::new(backing.clone(), list_key.clone()));
    let shared: Rc<dyn Storage + '_> = list.clone();

    let elem = list_key.emulate(element_name(&list_key, 0), TypeDesc::Any, shared);
    list.insert_raw(&elem, json!("a"));

    assert_eq!(list.len(), 1);
    assert_eq!(list.fetch_value(&elem)?, json!("a"));
    assert!(backing.take().is_none());
    Ok(())
}

#[test]
fn test_index_storage_bounds() -> Result<()> {
    let config = Config::new(MemoryBackend::new());
    let list_key = config.root_key().get_key("items", TypeDesc::list(TypeDesc::I32));
    let outer: Rc<dyn Storage + '_> = Rc::new(MapStorage::new(config.root_cell()));
    let at = |index| {
        let storage: Rc<dyn Storage + '_> = Rc::new(IndexStorage::new(outer.clone(), list_key.clone(), index));
        (list_key.emulate(element_name(&list_key, index), TypeDesc::I32, storage.clone()), storage)
    };

    let (elem, storage) = at(1);
    assert!(matches!(storage.fetch_value(&elem), Err(Error::KeyNotFound { .. })));

    outer.push_value(&list_key, json!([1, 2, 3]))?;
    assert_eq!(storage.fetch_value(&elem)?, json!(2));

    storage.push_value(&elem, json!(20))?;
    assert_eq!(config.raw().get("items"), Some(&json!([1, 20, 3])));

    let (past_end, storage) = at(3);
    match storage.push_value(&past_end, json!(4)) {
        Err(Error::IndexOutOfBounds { index, len, .. }) => {
            assert_eq!((index, len), (3, 3));
        }
        other => panic!("expected IndexOutOfBounds, got {:?}", other),
    }
    assert!(!storage.exists(&past_end));
    assert_eq!(config.raw().get("items"), Some(&json!([1, 20, 3])));
    Ok(())
}
