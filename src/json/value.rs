//! Dynamic JSON value tree.
//!
//! [`Value`] is a closed sum type, so consumers pattern-match exhaustively
//! instead of downcasting. Two kinds of "nothing" are distinguished: the
//! absence of a key (no mapping at all) and [`Value::Null`], the explicit
//! JSON null sentinel. `get_*` accessors fail on both; `opt_*` accessors
//! substitute defaults for both.

use std::fmt;

use crate::json::coerce;
use crate::json::error::JsonError;
use crate::json::stringer::{self, JsonStringer};
use crate::json::tokener::JsonTokener;

/// A single JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The explicit JSON null sentinel.
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
    Array(JsonArray),
    Object(JsonObject),
}

impl Value {
    /// Parses `text` into a value with the default tokener settings.
    pub fn parse(text: &str) -> Result<Value, JsonError> {
        JsonTokener::new(text).next_value()
    }

    /// Wraps a double, rejecting NaN and infinities.
    pub fn double(d: f64) -> Result<Value, JsonError> {
        coerce::check_double(d)?;
        Ok(Value::Double(d))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The name of this value's type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Encodes this value as a compact JSON string. Returns an empty string
    /// if the value contains a non-finite number.
    pub fn to_json(&self) -> String {
        match self {
            Value::Object(o) => o.to_json(),
            Value::Array(a) => a.to_json(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Double(d) => coerce::number_to_string(*d).unwrap_or_default(),
            Value::Str(s) => stringer::quote(s),
        }
    }

    /// Encodes this value as an indented, human-readable JSON string.
    /// Scalars render the same as [`to_json`](Value::to_json).
    pub fn to_json_pretty(&self, indent_spaces: usize) -> Result<String, JsonError> {
        match self {
            Value::Object(o) => o.to_json_pretty(indent_spaces),
            Value::Array(a) => a.to_json_pretty(indent_spaces),
            Value::Double(d) => coerce::number_to_string(*d),
            other => Ok(other.to_json()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<JsonArray> for Value {
    fn from(a: JsonArray) -> Self {
        Value::Array(a)
    }
}

impl From<JsonObject> for Value {
    fn from(o: JsonObject) -> Self {
        Value::Object(o)
    }
}

/// An ordered mapping from unique string names to JSON values.
///
/// Insertion order is preserved; replacing an existing name keeps its
/// original position. This matters for the token cache, which identifies an
/// envelope by its first key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject {
    pairs: Vec<(String, Value)>,
}

impl JsonObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `text`, failing unless the top-level value is an object.
    pub fn parse(text: &str) -> Result<JsonObject, JsonError> {
        match Value::parse(text)? {
            Value::Object(o) => Ok(o),
            other => Err(JsonError::type_mismatch(other.type_name(), "object")),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Maps `name` to `value`, replacing any existing mapping in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
        self
    }

    /// Maps `name` to a double, rejecting NaN and infinities.
    pub fn insert_double(&mut self, name: impl Into<String>, d: f64) -> Result<&mut Self, JsonError> {
        Ok(self.insert(name, Value::double(d)?))
    }

    /// Removes the mapping for `name`, returning its value if present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.pairs.iter().position(|(k, _)| k == name)?;
        Some(self.pairs.remove(index).1)
    }

    /// Returns true if this object has a mapping for `name`, including a
    /// mapping to [`Value::Null`].
    pub fn has(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// Returns true if `name` is unmapped or mapped to [`Value::Null`].
    pub fn is_null(&self, name: &str) -> bool {
        matches!(self.opt(name), None | Some(Value::Null))
    }

    pub fn opt(&self, name: &str) -> Option<&Value> {
        self.pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn get(&self, name: &str) -> Result<&Value, JsonError> {
        self.opt(name)
            .ok_or_else(|| JsonError::MissingKey(name.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, JsonError> {
        coerce::to_bool(self.get(name)?).ok_or_else(|| JsonError::type_mismatch(name, "boolean"))
    }

    pub fn opt_bool(&self, name: &str) -> bool {
        self.opt_bool_or(name, false)
    }

    pub fn opt_bool_or(&self, name: &str, fallback: bool) -> bool {
        self.opt(name).and_then(coerce::to_bool).unwrap_or(fallback)
    }

    pub fn get_i64(&self, name: &str) -> Result<i64, JsonError> {
        coerce::to_i64(self.get(name)?).ok_or_else(|| JsonError::type_mismatch(name, "long"))
    }

    pub fn opt_i64(&self, name: &str) -> i64 {
        self.opt_i64_or(name, 0)
    }

    pub fn opt_i64_or(&self, name: &str, fallback: i64) -> i64 {
        self.opt(name).and_then(coerce::to_i64).unwrap_or(fallback)
    }

    pub fn get_f64(&self, name: &str) -> Result<f64, JsonError> {
        coerce::to_f64(self.get(name)?).ok_or_else(|| JsonError::type_mismatch(name, "double"))
    }

    pub fn opt_f64(&self, name: &str) -> f64 {
        self.opt_f64_or(name, f64::NAN)
    }

    pub fn opt_f64_or(&self, name: &str, fallback: f64) -> f64 {
        self.opt(name).and_then(coerce::to_f64).unwrap_or(fallback)
    }

    pub fn get_string(&self, name: &str) -> Result<String, JsonError> {
        coerce::to_string(self.get(name)?).ok_or_else(|| JsonError::type_mismatch(name, "string"))
    }

    pub fn opt_string(&self, name: &str) -> String {
        self.opt_string_or(name, "")
    }

    pub fn opt_string_or(&self, name: &str, fallback: &str) -> String {
        self.opt(name)
            .and_then(coerce::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn get_object(&self, name: &str) -> Result<&JsonObject, JsonError> {
        match self.get(name)? {
            Value::Object(o) => Ok(o),
            _ => Err(JsonError::type_mismatch(name, "object")),
        }
    }

    pub fn opt_object(&self, name: &str) -> Option<&JsonObject> {
        match self.opt(name) {
            Some(Value::Object(o)) => Some(o),
            _ => None,
        }
    }

    pub fn get_array(&self, name: &str) -> Result<&JsonArray, JsonError> {
        match self.get(name)? {
            Value::Array(a) => Ok(a),
            _ => Err(JsonError::type_mismatch(name, "array")),
        }
    }

    pub fn opt_array(&self, name: &str) -> Option<&JsonArray> {
        match self.opt(name) {
            Some(Value::Array(a)) => Some(a),
            _ => None,
        }
    }

    pub(crate) fn write_to(&self, stringer: &mut JsonStringer) -> Result<(), JsonError> {
        stringer.object()?;
        for (name, value) in self.entries() {
            stringer.key(name)?;
            stringer.value(value)?;
        }
        stringer.end_object()?;
        Ok(())
    }

    /// Encodes this object as a compact JSON string, such as
    /// `{"query":"Pizza","locations":[94043,90210]}`. Returns an empty
    /// string if the object contains a non-finite number.
    pub fn to_json(&self) -> String {
        let mut stringer = JsonStringer::new();
        match self.write_to(&mut stringer) {
            Ok(()) => stringer.finish(),
            Err(_) => String::new(),
        }
    }

    /// Encodes this object as an indented, human-readable JSON string.
    pub fn to_json_pretty(&self, indent_spaces: usize) -> Result<String, JsonError> {
        let mut stringer = JsonStringer::with_indent(indent_spaces);
        self.write_to(&mut stringer)?;
        Ok(stringer.finish())
    }
}

impl fmt::Display for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

/// An ordered sequence of JSON values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonArray {
    values: Vec<Value>,
}

impl JsonArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `text`, failing unless the top-level value is an array.
    pub fn parse(text: &str) -> Result<JsonArray, JsonError> {
        match Value::parse(text)? {
            Value::Array(a) => Ok(a),
            other => Err(JsonError::type_mismatch(other.type_name(), "array")),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push(&mut self, value: impl Into<Value>) -> &mut Self {
        self.values.push(value.into());
        self
    }

    /// Appends a double, rejecting NaN and infinities.
    pub fn push_double(&mut self, d: f64) -> Result<&mut Self, JsonError> {
        Ok(self.push(Value::double(d)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    pub fn opt(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get(&self, index: usize) -> Result<&Value, JsonError> {
        self.opt(index)
            .ok_or_else(|| JsonError::MissingKey(format!("index {index}")))
    }

    pub fn get_bool(&self, index: usize) -> Result<bool, JsonError> {
        coerce::to_bool(self.get(index)?)
            .ok_or_else(|| JsonError::type_mismatch(format!("index {index}"), "boolean"))
    }

    pub fn opt_bool(&self, index: usize) -> bool {
        self.opt(index).and_then(coerce::to_bool).unwrap_or(false)
    }

    pub fn get_i64(&self, index: usize) -> Result<i64, JsonError> {
        coerce::to_i64(self.get(index)?)
            .ok_or_else(|| JsonError::type_mismatch(format!("index {index}"), "long"))
    }

    pub fn opt_i64(&self, index: usize) -> i64 {
        self.opt(index).and_then(coerce::to_i64).unwrap_or(0)
    }

    pub fn get_f64(&self, index: usize) -> Result<f64, JsonError> {
        coerce::to_f64(self.get(index)?)
            .ok_or_else(|| JsonError::type_mismatch(format!("index {index}"), "double"))
    }

    pub fn opt_f64(&self, index: usize) -> f64 {
        self.opt(index).and_then(coerce::to_f64).unwrap_or(f64::NAN)
    }

    pub fn get_string(&self, index: usize) -> Result<String, JsonError> {
        coerce::to_string(self.get(index)?)
            .ok_or_else(|| JsonError::type_mismatch(format!("index {index}"), "string"))
    }

    pub fn opt_string(&self, index: usize) -> String {
        self.opt(index)
            .and_then(coerce::to_string)
            .unwrap_or_default()
    }

    pub fn get_object(&self, index: usize) -> Result<&JsonObject, JsonError> {
        match self.get(index)? {
            Value::Object(o) => Ok(o),
            _ => Err(JsonError::type_mismatch(format!("index {index}"), "object")),
        }
    }

    pub fn get_array(&self, index: usize) -> Result<&JsonArray, JsonError> {
        match self.get(index)? {
            Value::Array(a) => Ok(a),
            _ => Err(JsonError::type_mismatch(format!("index {index}"), "array")),
        }
    }

    pub(crate) fn write_to(&self, stringer: &mut JsonStringer) -> Result<(), JsonError> {
        stringer.array()?;
        for value in self.iter() {
            stringer.value(value)?;
        }
        stringer.end_array()?;
        Ok(())
    }

    /// Encodes this array as a compact JSON string, such as
    /// `[94043,90210]`. Returns an empty string if the array contains a
    /// non-finite number.
    pub fn to_json(&self) -> String {
        let mut stringer = JsonStringer::new();
        match self.write_to(&mut stringer) {
            Ok(()) => stringer.finish(),
            Err(_) => String::new(),
        }
    }

    /// Encodes this array as an indented, human-readable JSON string.
    pub fn to_json_pretty(&self, indent_spaces: usize) -> Result<String, JsonError> {
        let mut stringer = JsonStringer::with_indent(indent_spaces);
        self.write_to(&mut stringer)?;
        Ok(stringer.finish())
    }
}

impl fmt::Display for JsonArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl FromIterator<Value> for JsonArray {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_position_on_replace() {
        let mut object = JsonObject::new();
        object.insert("a", 1).insert("b", 2).insert("a", 3);

        let keys: Vec<&str> = object.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(object.get_i64("a").unwrap(), 3);
    }

    #[test]
    fn test_null_mapping_vs_absence() {
        let mut object = JsonObject::new();
        object.insert("gone", Value::Null);

        assert!(object.has("gone"));
        assert!(object.is_null("gone"));
        assert!(object.is_null("never"));
        assert!(matches!(object.get("never"), Err(JsonError::MissingKey(_))));
        // present but null: get succeeds, conversion does not
        assert!(object.get("gone").is_ok());
        assert!(matches!(
            object.get_string("gone"),
            Err(JsonError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_opt_defaults() {
        let object = JsonObject::new();
        assert!(!object.opt_bool("missing"));
        assert_eq!(object.opt_i64("missing"), 0);
        assert!(object.opt_f64("missing").is_nan());
        assert_eq!(object.opt_string("missing"), "");
        assert_eq!(object.opt_string_or("missing", "x"), "x");
    }

    #[test]
    fn test_coercing_accessors() {
        let mut object = JsonObject::new();
        object.insert("n", "12");
        object.insert("b", "TRUE");
        object.insert("i", 7);

        assert_eq!(object.get_i64("n").unwrap(), 12);
        assert_eq!(object.get_f64("n").unwrap(), 12.0);
        assert!(object.get_bool("b").unwrap());
        assert_eq!(object.get_string("i").unwrap(), "7");
    }

    #[test]
    fn test_insert_double_rejects_nan() {
        let mut object = JsonObject::new();
        assert!(matches!(
            object.insert_double("d", f64::NAN),
            Err(JsonError::NumericRange(_))
        ));
    }

    #[test]
    fn test_array_accessors() {
        let mut array = JsonArray::new();
        array.push(1).push("two").push(Value::Null);

        assert_eq!(array.len(), 3);
        assert_eq!(array.get_i64(0).unwrap(), 1);
        assert_eq!(array.get_string(1).unwrap(), "two");
        assert!(array.get(2).unwrap().is_null());
        assert!(matches!(array.get(3), Err(JsonError::MissingKey(_))));
    }
}
