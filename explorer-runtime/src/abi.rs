//! ABI fixture normalization.
//!
//! Fixtures come in two shapes: a bare array of ABI entries, or a compiler
//! artifact object carrying the array under `abi`. Both normalize to the
//! array form before being handed to the decoder.

use alloy::json_abi::JsonAbi;
use serde_json::Value;

use crate::error::ExplorerError;

/// Return the ABI entry array of a raw fixture.
pub fn extract(raw: &Value) -> Result<Vec<Value>, ExplorerError> {
    match raw {
        Value::Array(entries) => Ok(entries.clone()),
        Value::Object(fields) => match fields.get("abi") {
            Some(Value::Array(entries)) => Ok(entries.clone()),
            Some(_) => Err(ExplorerError::MalformedAbi(
                "`abi` field is not an array".into(),
            )),
            None => Err(ExplorerError::MalformedAbi(
                "object has no `abi` field".into(),
            )),
        },
        other => Err(ExplorerError::MalformedAbi(format!(
            "expected array or object, got {}",
            json_kind(other)
        ))),
    }
}

/// Extract and parse a raw fixture into a [`JsonAbi`].
pub fn parse(raw: &Value) -> Result<JsonAbi, ExplorerError> {
    let entries = extract(raw)?;
    serde_json::from_value(Value::Array(entries))
        .map_err(|e| ExplorerError::MalformedAbi(e.to_string()))
}

/// Parse fixture text (as embedded with `include_str!`).
pub fn parse_fixture(text: &str) -> Result<JsonAbi, ExplorerError> {
    let raw: Value =
        serde_json::from_str(text).map_err(|e| ExplorerError::MalformedAbi(e.to_string()))?;
    parse(&raw)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
