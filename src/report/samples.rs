//! Sample normalization
//!
//! Reports carry ECG samples in whatever shape the service stored them:
//! a JSON array, a JSON array encoded as a string, a comma/semicolon
//! delimited string, or an index-keyed object. [`normalize_samples`] turns
//! any of these into one `Vec<f64>`, or `None` when anything is malformed.
//! Partial results are never returned.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SampleError {
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
    #[error("non-finite sample value")]
    NotFinite,
    #[error("invalid JSON array: {0}")]
    InvalidJson(String),
    #[error("unsupported sample element: {0}")]
    UnsupportedElement(&'static str),
}

/// Array-like containers that can hand over their elements in order.
pub trait ToList {
    /// `None` when the value is not array-like at all.
    fn to_list(&self) -> Option<Vec<Value>>;
}

/// Objects keyed by element index (`{"0": 0.1, "1": 0.2}`), as written by
/// column/series serializers. The keys must be exactly `0..n` in canonical
/// decimal form; gaps, duplicates like `"01"` and `"1"`, or any other key
/// mean the object is not array-like.
impl ToList for Map<String, Value> {
    fn to_list(&self) -> Option<Vec<Value>> {
        if self.is_empty() {
            return None;
        }
        let mut slots: Vec<Option<Value>> = vec![None; self.len()];
        for (key, value) in self {
            let index = key.parse::<usize>().ok().filter(|i| i.to_string() == *key)?;
            let slot = slots.get_mut(index)?;
            if slot.is_some() {
                return None;
            }
            *slot = Some(value.clone());
        }
        slots.into_iter().collect()
    }
}

/// `None` = strategy does not apply, `Some(Err)` = applies but the data is bad.
type Attempt = Option<Result<Vec<f64>, SampleError>>;
type Strategy = fn(&Value) -> Attempt;

/// Tried in order; the first strategy that applies decides the outcome.
const STRATEGIES: [(&str, Strategy); 4] = [
    ("sequence", from_sequence),
    ("array-like", from_array_like),
    ("json text", from_json_text),
    ("delimited text", from_delimited_text),
];

/// Normalize raw report samples into an ordered list of finite floats.
///
/// Returns `None` for absent/null input, for input no strategy understands,
/// for any malformed element, and for an empty result.
pub fn normalize_samples(raw: Option<&Value>) -> Option<Vec<f64>> {
    let raw = raw.filter(|value| !value.is_null())?;

    for (name, strategy) in STRATEGIES {
        if let Some(outcome) = strategy(raw) {
            return match outcome {
                Ok(samples) if !samples.is_empty() => Some(samples),
                Ok(_) => None,
                Err(err) => {
                    tracing::debug!(strategy = name, error = %err, "discarding malformed samples");
                    None
                }
            };
        }
    }
    None
}

/// Normalize any in-process array-like value.
pub fn normalize_list(list: &dyn ToList) -> Option<Vec<f64>> {
    let values = list.to_list()?;
    from_values(&values).ok().filter(|samples| !samples.is_empty())
}

fn from_sequence(raw: &Value) -> Attempt {
    raw.as_array().map(|values| from_values(values))
}

fn from_array_like(raw: &Value) -> Attempt {
    let values = raw.as_object()?.to_list()?;
    Some(from_values(&values))
}

fn from_json_text(raw: &Value) -> Attempt {
    let text = raw.as_str()?.trim();
    if !text.starts_with('[') {
        return None;
    }
    let parsed = match serde_json::from_str::<Value>(text) {
        Ok(parsed) => parsed,
        Err(err) => return Some(Err(SampleError::InvalidJson(err.to_string()))),
    };
    Some(match parsed.as_array() {
        Some(values) => from_values(values),
        None => Err(SampleError::InvalidJson("not an array".to_string())),
    })
}

fn from_delimited_text(raw: &Value) -> Attempt {
    let text = raw.as_str()?;
    Some(
        text.split(|c| c == ',' || c == ';')
            .filter(|fragment| !fragment.trim().is_empty())
            .map(parse_fragment)
            .collect(),
    )
}

fn from_values(values: &[Value]) -> Result<Vec<f64>, SampleError> {
    values.iter().map(to_sample).collect()
}

fn to_sample(value: &Value) -> Result<f64, SampleError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| SampleError::InvalidNumber(n.to_string()))
            .and_then(finite),
        Value::String(s) => parse_fragment(s),
        Value::Null => Err(SampleError::UnsupportedElement("null")),
        Value::Bool(_) => Err(SampleError::UnsupportedElement("boolean")),
        Value::Array(_) => Err(SampleError::UnsupportedElement("array")),
        Value::Object(_) => Err(SampleError::UnsupportedElement("object")),
    }
}

fn parse_fragment(fragment: &str) -> Result<f64, SampleError> {
    let trimmed = fragment.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| SampleError::InvalidNumber(trimmed.to_string()))
        .and_then(finite)
}

fn finite(value: f64) -> Result<f64, SampleError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SampleError::NotFinite)
    }
}
