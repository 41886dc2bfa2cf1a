//! Response-shape normalization.
//!
//! Jumpseller list endpoints answer either `{"orders": [...]}` or a bare array
//! whose elements may be wrapped as `{"order": {...}}`. Single-resource
//! endpoints wrap the record under its singular key.

use serde::de::DeserializeOwned;
use serde_json::Value;
use vendor_portal_core::upstream::UpstreamError;

/// Flatten a list response into records.
///
/// Elements that are not decodable records are dropped; a body of any other
/// shape yields an empty list.
pub fn collection<T: DeserializeOwned>(
    body: Option<Value>,
    plural: &str,
    singular: &str,
) -> Vec<T> {
    let items = match body {
        Some(Value::Object(mut map)) => match map.remove(plural) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    items
        .into_iter()
        .map(|item| unwrap_key(item, singular))
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

/// Extract a single record wrapped under `key`.
///
/// # Errors
///
/// Returns [`UpstreamError::ResponseParseFailed`] unless the body is an object
/// holding a decodable record object under `key`.
pub fn resource<T: DeserializeOwned>(body: Option<Value>, key: &str) -> Result<T, UpstreamError> {
    let Some(Value::Object(mut map)) = body else {
        return Err(UpstreamError::ResponseParseFailed(format!(
            "expected an object wrapping `{key}`"
        )));
    };
    match map.remove(key) {
        Some(value @ Value::Object(_)) => serde_json::from_value(value)
            .map_err(|e| UpstreamError::ResponseParseFailed(e.to_string())),
        Some(_) => Err(UpstreamError::ResponseParseFailed(format!(
            "`{key}` is not an object"
        ))),
        None => Err(UpstreamError::ResponseParseFailed(format!(
            "response has no `{key}` object"
        ))),
    }
}

fn unwrap_key(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    }
}
