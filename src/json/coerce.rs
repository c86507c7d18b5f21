//! Lossy coercions between JSON value types.
//!
//! Both accessor families share these rules: booleans convert to and from
//! the literal strings `true`/`false` (case-insensitive), numeric strings
//! convert through a decimal parse, and integers obtained from doubles or
//! numeric strings truncate toward zero. The double-based string-to-integer
//! path loses precision above 2^53; that is an accepted, historical
//! conversion, not a defect to fix here.

use crate::json::error::JsonError;
use crate::json::value::Value;

pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Str(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::Str(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

pub fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Double(d) => Some(*d),
        Value::Int(i) => Some(*i as f64),
        Value::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Double(d) => Some(*d as i64),
        Value::Str(s) => s.trim().parse::<f64>().ok().map(|d| d as i64),
        _ => None,
    }
}

/// Converts any scalar to its string form. `Null`, arrays, and objects do
/// not coerce.
pub fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Int(i) => Some(i.to_string()),
        Value::Double(d) => number_to_string(*d).ok(),
        _ => None,
    }
}

/// Returns the input if it is a JSON-permissible number; fails otherwise.
pub fn check_double(d: f64) -> Result<f64, JsonError> {
    if d.is_finite() {
        Ok(d)
    } else {
        Err(JsonError::NumericRange(d))
    }
}

/// Encodes a double as a JSON number literal. Integral values print without
/// a fraction, and negative zero prints as `-0`.
pub fn number_to_string(d: f64) -> Result<String, JsonError> {
    check_double(d)?;
    if d == 0.0 && d.is_sign_negative() {
        return Ok("-0".to_string());
    }
    let truncated = d as i64;
    if truncated as f64 == d {
        return Ok(truncated.to_string());
    }
    Ok(d.to_string())
}
