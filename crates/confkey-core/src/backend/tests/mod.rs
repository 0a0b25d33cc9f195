
use serde_json::{Value, json};

use crate::value::RawMap;

// Root map used by round trip tests; avoids nulls, which TOML cannot hold
pub(super) fn sample_root() -> RawMap {
    let sample = json!({
        "name": "demo",
        "port": 8080,
        "ratio": 0.25,
        "enabled": true,
        "items": [1, 2, 3],
        "user": {"name": "Ann", "tags": ["a", "b"]},
    });
    match sample {
        Value::Object(map) => map,
        _ => RawMap::new(),
    }
}
