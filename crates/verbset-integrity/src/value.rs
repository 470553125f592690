//! Helpers for reading loosely-typed JSON.
//!
//! The integrity checks run on data that may already have failed its
//! schema, so they inspect `serde_json::Value` directly instead of
//! deserializing into structs that would reject the whole file.

use serde_json::{Map, Value};

/// Render a value for an issue message: strings in single quotes, anything
/// else as compact JSON.
pub fn quoted(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        other => other.to_string(),
    }
}

/// Single-quote a string for an issue message.
pub fn quote(s: &str) -> String {
    format!("'{s}'")
}

/// Truthiness of a JSON value: `null`, `false`, zero, and empty strings,
/// arrays and objects are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Look up `key`, treating an explicit `null` like an absent field.
pub fn field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

/// Look up `key` as a non-empty string.
pub fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
