//! Field deserializers that accept whatever the template editor stored.
//!
//! A mistyped leaf value degrades to its default instead of rejecting the
//! whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::document::NodeId;
use crate::style::PropValue;

/// Integer, integral float or numeric string; anything else is `0`
pub(crate) fn id<'de, D>(deserializer: D) -> Result<NodeId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Any number or numeric string; anything else is `0.0`
pub(crate) fn position<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Strings as-is, numbers and booleans in their JSON form, everything else absent
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Scalar style values; `null`, arrays and objects are absent
pub(crate) fn prop<'de, D>(deserializer: D) -> Result<Option<PropValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => Some(PropValue::Bool(b)),
        Value::Number(n) => Some(PropValue::Number(n)),
        Value::String(s) => Some(PropValue::Text(s)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// An enum that fails to deserialize is treated as absent
pub(crate) fn variant<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
