use std::rc::Rc;

use serde_json::Value;

use super::object_error;
use crate::error::{Error, Result};
use crate::key::{DynKey, element_name};
use crate::serializer::{Serializer, Serializers};
use crate::storage::{AutoPushMapStorage, CellStorage, ListStorage, Storage};
use crate::types::TypeDesc;
use crate::value::{Object, RawMap, raw_kind, scalar_key};

/// Serializer for lists of any element type.
///
/// Elements are written through per-index emulated keys (`<name>:<index>`) into a
/// [`ListStorage`] staged off to the side; the finished list reaches the real storage
/// in one push, so a failing element leaves the key untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListSerializer;

fn element_desc(desc: &TypeDesc) -> TypeDesc {
    match desc {
        TypeDesc::List(elem) => elem.as_ref().clone(),
        _ => TypeDesc::Any,
    }
}

impl Serializer for ListSerializer {
    fn serialize(
        &self,
        value: Object,
        key: &DynKey<'_>,
        desc: &TypeDesc,
        storage: &dyn Storage,
        serializers: &Serializers,
    ) -> Result<()> {
        let items = value.into_list().map_err(|err| object_error(key, err))?;
        let elem = element_desc(desc);

        let stage = Rc::new(CellStorage::new());
        let list: Rc<dyn Storage + '_> = Rc::new(ListStorage::new(stage.clone(), key.clone()));
        for (index, item) in items.into_iter().enumerate() {
            let elem_key = key.emulate(element_name(key, index), elem.clone(), list.clone());
            serializers.write(&elem_key, item)?;
        }

        let raw = stage.take().unwrap_or_else(|| Value::Array(Vec::new()));
        storage.push_value(key, raw)
    }

    fn deserialize(
        &self,
        key: &DynKey<'_>,
        desc: &TypeDesc,
        storage: &dyn Storage,
        serializers: &Serializers,
    ) -> Result<Object> {
        let items = match storage.fetch_value(key)? {
            Value::Array(items) => items,
            other => {
                return Err(Error::serialization(
                    key,
                    format!("expected a list, found {}", raw_kind(&other)),
                ));
            }
        };
        let elem = element_desc(desc);

        let list = Rc::new(ListStorage::new(Rc::new(CellStorage::new()), key.clone()));
        let shared: Rc<dyn Storage + '_> = list.clone();
        let mut elem_keys = Vec::with_capacity(items.len());
        for (index, raw) in items.into_iter().enumerate() {
            let elem_key = key.emulate(element_name(key, index), elem.clone(), shared.clone());
            list.insert_raw(&elem_key, raw);
            elem_keys.push(elem_key);
        }

        elem_keys
            .iter()
            .map(|elem_key| serializers.read(elem_key))
            .collect::<Result<Vec<_>>>()
            .map(Object::List)
    }
}

/// Serializer for maps of any key and value types.
///
/// Each entry side goes through its own fresh scratch section, so nothing is shared
/// between entries. Serialized keys must be scalars and are stored in string form;
/// reading coerces them back through the key type. The finished map reaches the real
/// storage in one push.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapSerializer;

fn entry_descs(desc: &TypeDesc) -> (TypeDesc, TypeDesc) {
    match desc {
        TypeDesc::Map(key, value) => (key.as_ref().clone(), value.as_ref().clone()),
        _ => (TypeDesc::Any, TypeDesc::Any),
    }
}

fn scratch<'c>(key: &DynKey<'c>) -> Rc<dyn Storage + 'c> {
    Rc::new(AutoPushMapStorage::new(Rc::new(CellStorage::new()), key.clone()))
}

fn write_side(key: &DynKey<'_>, desc: &TypeDesc, value: Object, serializers: &Serializers) -> Result<Value> {
    let storage = scratch(key);
    let side = key.get_as_with(desc.clone(), storage.clone());
    serializers.write(&side, value)?;
    storage.fetch_value(&side)
}

fn read_side(key: &DynKey<'_>, desc: &TypeDesc, raw: Value, serializers: &Serializers) -> Result<Object> {
    let storage = scratch(key);
    let side = key.get_as_with(desc.clone(), storage.clone());
    storage.push_value(&side, raw)?;
    serializers.read(&side)
}

impl Serializer for MapSerializer {
    fn serialize(
        &self,
        value: Object,
        key: &DynKey<'_>,
        desc: &TypeDesc,
        storage: &dyn Storage,
        serializers: &Serializers,
    ) -> Result<()> {
        let entries = value.into_entries().map_err(|err| object_error(key, err))?;
        let (key_desc, value_desc) = entry_descs(desc);

        let mut output = RawMap::new();
        for (entry_key, entry_value) in entries {
            let raw_key = write_side(key, &key_desc, entry_key, serializers)?;
            let name = scalar_key(raw_key).map_err(|err| {
                Error::serialization_with(key, format!("map key of type '{}' is not a scalar", key_desc), err)
            })?;
            let raw_value = write_side(key, &value_desc, entry_value, serializers)?;
            output.insert(name, raw_value);
        }

        storage.push_value(key, Value::Object(output))
    }

    fn deserialize(
        &self,
        key: &DynKey<'_>,
        desc: &TypeDesc,
        storage: &dyn Storage,
        serializers: &Serializers,
    ) -> Result<Object> {
        let map = match storage.fetch_value(key)? {
            Value::Object(map) => map,
            other => {
                return Err(Error::serialization(
                    key,
                    format!("expected a map, found {}", raw_kind(&other)),
                ));
            }
        };
        let (key_desc, value_desc) = entry_descs(desc);

        let mut entries = Vec::with_capacity(map.len());
        for (name, raw_value) in map {
            let entry_key = read_side(key, &key_desc, Value::String(name), serializers)?;
            let entry_value = read_side(key, &value_desc, raw_value, serializers)?;
            entries.push((entry_key, entry_value));
        }
        Ok(Object::Map(entries))
    }
}
