//! JSON shaping for resolver output.
//!
//! JSON numbers are doubles on the consumer side, so every integer that could
//! exceed 2^53 leaves the service as an exact decimal string.

use alloy::primitives::U256;
use serde::Serialize;
use serde_json::Value;

use crate::error::ExplorerError;

/// Largest integer a JSON consumer can hold without loss (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Serialize to a JSON value and apply [`normalize`].
pub fn to_json<T: Serialize>(value: &T) -> Result<Value, ExplorerError> {
    let mut value = serde_json::to_value(value)?;
    normalize(&mut value);
    Ok(value)
}

/// Replace every integer outside the safe range with its decimal string.
pub fn normalize(value: &mut Value) {
    match value {
        Value::Number(n) => {
            let unsafe_repr = if let Some(u) = n.as_u64() {
                (u > MAX_SAFE_INTEGER).then(|| u.to_string())
            } else if let Some(i) = n.as_i64() {
                (i.unsigned_abs() > MAX_SAFE_INTEGER).then(|| i.to_string())
            } else {
                None
            };
            if let Some(repr) = unsafe_repr {
                *value = Value::String(repr);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize),
        Value::Object(fields) => fields.values_mut().for_each(normalize),
        _ => {}
    }
}

/// Rewrite hex quantities (`"0x1b4"`) stored directly under `fields` of an
/// object into decimal strings. Non-object values and non-hex entries are
/// left untouched.
pub fn rewrite_quantities(value: &mut Value, fields: &[&str]) {
    let Value::Object(map) = value else {
        return;
    };
    for field in fields {
        if let Some(entry) = map.get_mut(*field)
            && let Some(decimal) = entry.as_str().and_then(hex_quantity_to_decimal)
        {
            *entry = Value::String(decimal);
        }
    }
}

/// `"0x1b4"` -> `"436"`. `"0x"` is zero.
pub fn hex_quantity_to_decimal(hex: &str) -> Option<String> {
    let digits = hex.strip_prefix("0x").or_else(|| hex.strip_prefix("0X"))?;
    if digits.is_empty() {
        return Some("0".into());
    }
    U256::from_str_radix(digits, 16).ok().map(|v| v.to_string())
}

/// Exact `value / 10^decimals` with trailing fractional zeros removed.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let scale = decimals as usize;

    let (int_part, frac_part) = if digits.len() > scale {
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        (int_part.to_string(), frac_part.to_string())
    } else {
        ("0".to_string(), format!("{digits:0>scale$}"))
    };

    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part
    } else {
        format!("{int_part}.{frac_part}")
    }
}

/// Native-currency formatting: 18 decimals, always at least one fractional
/// digit (`"1.0"`).
pub fn format_ether(value: U256) -> String {
    let formatted = format_units(value, 18);
    if formatted.contains('.') {
        formatted
    } else {
        format!("{formatted}.0")
    }
}
