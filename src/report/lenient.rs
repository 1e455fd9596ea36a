//! Tolerant field deserializers for records owned by the remote service.
//!
//! A field with an unexpected JSON type must not cost the whole report, so
//! display fields accept any scalar and flags accept anything.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::ConditionResults;

/// Any JSON value as display text. Strings pass through, `null` is absent,
/// everything else is shown in its JSON form (`54`, `54.0`, `true`).
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Only a real boolean counts; anything else leaves the flag unknown.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool())
}

/// A `results` value that is not an object means every flag is unknown.
pub(crate) fn results<'de, D>(deserializer: D) -> Result<ConditionResults, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        raw @ Value::Object(_) => Ok(serde_json::from_value(raw).unwrap_or_default()),
        _ => Ok(ConditionResults::default()),
    }
}
