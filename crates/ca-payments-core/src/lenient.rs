//! Tolerant field decoders for payloads sent by the vendor widget.
//!
//! The widget is not versioned with this crate. A field with an unexpected
//! shape decodes to its default instead of failing the whole payload, so a
//! flow the consumer completed is never reported as an error.
//!
//! Use with `#[serde(default, deserialize_with = "...")]`.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Decode a field, or its default when it has the wrong shape.
///
/// # Errors
///
/// Only if the input is not valid JSON at all.
pub fn or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a string field. Numbers and booleans keep their text form.
///
/// # Errors
///
/// Only if the input is not valid JSON at all.
pub fn string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Optional variant of [`string`].
///
/// # Errors
///
/// Only if the input is not valid JSON at all.
pub fn opt_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(Value::deserialize(deserializer)?))
}

/// Decode an amount. Numeric strings such as `"12.50"` are accepted.
///
/// # Errors
///
/// Only if the input is not valid JSON at all.
pub fn amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Optional variant of [`amount`].
///
/// # Errors
///
/// Only if the input is not valid JSON at all.
pub fn opt_amount<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?))
}

fn text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
