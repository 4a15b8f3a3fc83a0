//! Deterministic JSON serialization.
//!
//! Object keys are emitted in sorted order regardless of how the input map
//! was built, so unchanged input always yields byte-identical text.

use serde_json::{Map, Value};

/// Recursively rebuild `value` with object keys in sorted order.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Compact form, e.g. `{"a":1,"b":2}`.
pub fn stable_stringify(value: &Value) -> String {
    sort_keys(value).to_string()
}

/// Two-space indented form.
pub fn stable_stringify_pretty(value: &Value) -> String {
    format!("{:#}", sort_keys(value))
}
