//! JSON text bridge over `serde_json`.
//!
//! Parsing goes straight into [`Value`] so the numeric subtype of every
//! literal survives; `2.0` stays a float and `2` an integer.

use serde_json::error::Category;

use crate::error::{RecordError, Result};
use crate::value::Value;

/// Parses one JSON document.
///
/// Malformed text fails with `Json`; integers outside the `i64` range fail
/// with `Serialization`.
pub fn parse(json: &str) -> Result<Value> {
    serde_json::from_str(json).map_err(|err| match err.classify() {
        Category::Data => RecordError::Serialization(err.to_string()),
        _ => RecordError::Json(err),
    })
}

/// Compact output, no whitespace between tokens.
pub fn to_string(value: &Value) -> Result<String> {
    serde_json::to_string(value).map_err(output_error)
}

pub fn to_string_pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(output_error)
}

// The only failure `Value` can raise on output is a non-finite float.
fn output_error(err: serde_json::Error) -> RecordError {
    RecordError::Serialization(err.to_string())
}
