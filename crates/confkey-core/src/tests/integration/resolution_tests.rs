#![cfg(test)]

use std::sync::Arc;

use serde_json::{Value, json};

use super::common::memory_config;
use crate::backend::{Backend, BackendError, MemoryBackend};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::key::DynKey;
use crate::serializer::{Serializer, Serializers};
use crate::storage::Storage;
use crate::types::TypeDesc;
use crate::value::{Object, RawMap};

/// Records which registration handled a value.
struct Via(&'static str);

impl Serializer for Via {
    fn serialize(
        &self,
        _value: Object,
        key: &DynKey<'_>,
        _desc: &TypeDesc,
        storage: &dyn Storage,
        _serializers: &Serializers,
    ) -> Result<()> {
        storage.push_value(key, json!({ "via": self.0 }))
    }

    fn deserialize(
        &self,
        key: &DynKey<'_>,
        _desc: &TypeDesc,
        storage: &dyn Storage,
        _serializers: &Serializers,
    ) -> Result<Object> {
        match storage.fetch_value(key)? {
            Value::Object(map) if map.get("via") == Some(&json!(self.0)) => Ok(Object::String(self.0.to_string())),
            _ => Err(Error::serialization(key, format!("not written via {}", self.0))),
        }
    }
}

fn shape_defaults() -> Result<Arc<Serializers>> {
    let mut defaults = Serializers::with_defaults();
    defaults.register(TypeDesc::named("Shape"), Via("shape"))?;
    defaults.declare_supertype("Circle", "Shape");
    defaults.declare_supertype("Square", "Shape");
    Ok(Arc::new(defaults))
}

#[test]
fn test_interface_registration_covers_subtypes() -> Result<()> {
    let defaults = shape_defaults()?;
    let config = memory_config(&defaults);
    let circle = config.root_key().get_key("circle", TypeDesc::named("Circle"));
    circle.set_value(Object::Bool(true))?;

    assert_eq!(config.raw().get("circle"), Some(&json!({"via": "shape"})));
    assert_eq!(circle.get_value()?.into_string().ok().as_deref(), Some("shape"));
    Ok(())
}

#[test]
fn test_exact_registration_takes_precedence() -> Result<()> {
    let defaults = shape_defaults()?;
    let mut config = memory_config(&defaults);
    config.serializers_mut().register(TypeDesc::named("Circle"), Via("circle"))?;

    let root = config.root_key();
    root.get_key("circle", TypeDesc::named("Circle")).set_value(Object::Bool(true))?;
    root.get_key("square", TypeDesc::named("Square")).set_value(Object::Bool(true))?;

    assert_eq!(config.raw().get("circle"), Some(&json!({"via": "circle"})));
    assert_eq!(config.raw().get("square"), Some(&json!({"via": "shape"})));

    // Another config over the same defaults is unaffected
    let other = memory_config(&defaults);
    other.root_key().get_key("circle", TypeDesc::named("Circle")).set_value(Object::Bool(true))?;
    assert_eq!(other.raw().get("circle"), Some(&json!({"via": "shape"})));
    Ok(())
}

#[test]
fn test_subtype_lists_use_interface_serializer() -> Result<()> {
    let defaults = shape_defaults()?;
    let config = memory_config(&defaults);
    let shapes = config.root_key().get_key("shapes", TypeDesc::list(TypeDesc::named("Circle")));
    shapes.set_value(Object::List(vec![Object::Bool(true), Object::Bool(false)]))?;

    assert_eq!(
        config.raw().get("shapes"),
        Some(&json!([{"via": "shape"}, {"via": "shape"}]))
    );
    Ok(())
}

#[test]
fn test_ambiguous_interfaces_are_reported() -> Result<()> {
    let mut defaults = Serializers::with_defaults();
    defaults.register(TypeDesc::named("Shape"), Via("shape"))?;
    defaults.register(TypeDesc::named("Printable"), Via("printable"))?;
    let mut config = memory_config(&Arc::new(defaults));
    config.serializers_mut().declare_supertype("Circle", "Shape");
    config.serializers_mut().declare_supertype("Circle", "Printable");

    let result = config
        .root_key()
        .get_key("circle", TypeDesc::named("Circle"))
        .set_value(Object::Bool(true));
    match result {
        Err(Error::AmbiguousSerializer { candidates, .. }) => {
            assert!(candidates.contains(&TypeDesc::named("Shape")));
            assert!(candidates.contains(&TypeDesc::named("Printable")));
        }
        other => panic!("expected AmbiguousSerializer, got {:?}", other),
    }
    assert!(config.raw().is_empty());

    // A local exact registration settles it
    config.serializers_mut().register(TypeDesc::named("Circle"), Via("circle"))?;
    config
        .root_key()
        .get_key("circle", TypeDesc::named("Circle"))
        .set_value(Object::Bool(true))?;
    assert_eq!(config.raw().get("circle"), Some(&json!({"via": "circle"})));
    Ok(())
}

/// Backend that nests everything under an `app` section and stores nothing raw.
#[derive(Debug, Default)]
struct SectionBackend {
    inner: MemoryBackend,
}

impl Backend for SectionBackend {
    fn name(&self) -> &str {
        "section"
    }

    fn save(&self, root: &RawMap) -> std::result::Result<(), BackendError> {
        self.inner.save(root)
    }

    fn load(&self) -> std::result::Result<RawMap, BackendError> {
        self.inner.load()
    }

    fn supports(&self, _desc: &TypeDesc) -> bool {
        false
    }

    fn register_serializers(&self, serializers: &mut Serializers) {
        serializers.declare_supertype("Circle", "Shape");
    }

    fn resolve_root<'c>(&self, default: DynKey<'c>) -> DynKey<'c> {
        default.get_key_section("app")
    }
}

#[test]
fn test_backend_hooks() -> Result<()> {
    let mut defaults = Serializers::with_defaults();
    defaults.register(TypeDesc::named("Shape"), Via("shape"))?;
    let config = Config::with_serializers(SectionBackend::default(), Arc::new(defaults));

    config.key::<i32>("level").set_value(3)?;
    config.root_key().get_key("circle", TypeDesc::named("Circle")).set_value(Object::Bool(true))?;
    assert_eq!(
        config.raw().get("app"),
        Some(&json!({"level": 3, "circle": {"via": "shape"}}))
    );

    // Without raw support, untyped values need a serializer
    match config.key::<Value>("blob").set_value(json!([1])) {
        Err(Error::UnsupportedValueType { key, backend, .. }) => {
            assert_eq!(key, "app.blob");
            assert_eq!(backend, "section");
        }
        other => panic!("expected UnsupportedValueType, got {:?}", other),
    }
    Ok(())
}
