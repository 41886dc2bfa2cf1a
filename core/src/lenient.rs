//! Tolerant decoding for upstream fields.
//!
//! The commerce platform has shipped several schema versions: amounts arrive as
//! numbers or numeric strings, flags as booleans or integers, nested objects are
//! sometimes missing or `null`. These helpers are used with
//! `#[serde(default, deserialize_with = "...")]` so that a field with an
//! unexpected type decodes to "absent" instead of failing the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::commerce::RecordId;

/// Interpret a JSON value as a number.
///
/// Numbers and numeric strings are accepted; everything else (including
/// non-finite values) yields `None`.
#[must_use]
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Interpret a JSON value as a truthy flag.
#[must_use]
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Decode an optional number, tolerating numeric strings.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// Decode an optional flag using [`truthy`]. `null` stays `None`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(truthy))
}

/// Decode an optional string. Numbers are rendered as text; other types are dropped.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Decode an identifier that may be numeric or textual.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn record_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => Some(
            n.as_i64()
                .map_or_else(|| RecordId::Text(n.to_string()), RecordId::Number),
        ),
        Some(Value::String(s)) => Some(RecordId::Text(s)),
        _ => None,
    })
}

/// Decode a nested object. Anything that is not an object of the right shape is `None`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// Decode a list, skipping elements that do not decode. A non-list is empty.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}
