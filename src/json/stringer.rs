//! Stack-based JSON writer.
//!
//! Stringers only encode well-formed JSON: lexical scopes must be balanced,
//! arrays may not contain keys, and objects must alternate keys and values.
//! Calls that would produce malformed output fail with
//! [`JsonError::Nesting`].
//!
//! String escaping covers the quote, backslash, slash, tab, backspace,
//! newline, and carriage-return characters. Other control characters below
//! 0x20 are written through unescaped; that is a preserved limitation of
//! the historical encoder this one is compatible with.

use crate::json::coerce;
use crate::json::error::JsonError;
use crate::json::value::Value;

/// Lexical scoping elements, used to insert separators and detect nesting
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// An array with no elements yet.
    EmptyArray,
    /// An array with at least one element; a comma is due before the next.
    NonemptyArray,
    /// An object with no name/value pairs yet.
    EmptyObject,
    /// An object whose most recent element is a key awaiting its value.
    DanglingKey,
    /// An object with at least one pair; a comma is due before the next.
    NonemptyObject,
}

/// Encodes a single top-level array or object.
///
/// ```rust
/// use vrtnet::json::stringer::JsonStringer;
///
/// let mut stringer = JsonStringer::new();
/// stringer.object().unwrap();
/// stringer.key("uid").unwrap().value(&"u1".into()).unwrap();
/// stringer.end_object().unwrap();
/// assert_eq!(stringer.finish(), "{\"uid\":\"u1\"}");
/// ```
pub struct JsonStringer {
    out: String,
    stack: Vec<Scope>,
    /// A full set of spaces for one level of indentation, or `None` for
    /// compact output.
    indent: Option<String>,
}

impl Default for JsonStringer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonStringer {
    /// Creates a compact stringer.
    pub fn new() -> Self {
        Self { out: String::new(), stack: Vec::new(), indent: None }
    }

    /// Creates a pretty-printing stringer indenting by `indent_spaces` per
    /// nesting level.
    pub fn with_indent(indent_spaces: usize) -> Self {
        Self {
            out: String::new(),
            stack: Vec::new(),
            indent: Some(" ".repeat(indent_spaces)),
        }
    }

    /// Begins encoding a new array. Must be paired with [`end_array`].
    ///
    /// [`end_array`]: JsonStringer::end_array
    pub fn array(&mut self) -> Result<&mut Self, JsonError> {
        self.open(Scope::EmptyArray, '[')
    }

    /// Ends encoding the current array.
    pub fn end_array(&mut self) -> Result<&mut Self, JsonError> {
        self.close(Scope::EmptyArray, Scope::NonemptyArray, ']')
    }

    /// Begins encoding a new object. Must be paired with [`end_object`].
    ///
    /// [`end_object`]: JsonStringer::end_object
    pub fn object(&mut self) -> Result<&mut Self, JsonError> {
        self.open(Scope::EmptyObject, '{')
    }

    /// Ends encoding the current object.
    pub fn end_object(&mut self) -> Result<&mut Self, JsonError> {
        self.close(Scope::EmptyObject, Scope::NonemptyObject, '}')
    }

    /// Encodes the key (property name) for the forthcoming value.
    pub fn key(&mut self, name: &str) -> Result<&mut Self, JsonError> {
        self.before_key()?;
        self.string(name);
        Ok(self)
    }

    /// Encodes `value`, recursing into arrays and objects.
    pub fn value(&mut self, value: &Value) -> Result<&mut Self, JsonError> {
        match value {
            Value::Object(object) => object.write_to(self)?,
            Value::Array(array) => array.write_to(self)?,
            scalar => {
                if self.stack.is_empty() {
                    return Err(JsonError::Nesting("value written outside any scope"));
                }
                self.before_value()?;
                match scalar {
                    Value::Null => self.out.push_str("null"),
                    Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
                    Value::Int(i) => self.out.push_str(&i.to_string()),
                    Value::Double(d) => self.out.push_str(&coerce::number_to_string(*d)?),
                    Value::Str(s) => self.string(s),
                    Value::Object(_) | Value::Array(_) => unreachable!(),
                }
            }
        }
        Ok(self)
    }

    /// Returns the encoded JSON string. Unterminated scopes yield
    /// undefined (but non-panicking) output.
    pub fn finish(self) -> String {
        self.out
    }

    /// Enters a new scope by appending any separator and the open bracket.
    fn open(&mut self, empty: Scope, open_bracket: char) -> Result<&mut Self, JsonError> {
        if self.stack.is_empty() && !self.out.is_empty() {
            return Err(JsonError::Nesting("multiple top-level roots"));
        }
        self.before_value()?;
        self.stack.push(empty);
        self.out.push(open_bracket);
        Ok(self)
    }

    /// Closes the current scope by appending any newline and the close
    /// bracket.
    fn close(
        &mut self,
        empty: Scope,
        nonempty: Scope,
        close_bracket: char,
    ) -> Result<&mut Self, JsonError> {
        let context = self.peek()?;
        if context != nonempty && context != empty {
            return Err(JsonError::Nesting("mismatched close"));
        }
        self.stack.pop();
        if context == nonempty {
            self.newline();
        }
        self.out.push(close_bracket);
        Ok(self)
    }

    fn peek(&self) -> Result<Scope, JsonError> {
        self.stack
            .last()
            .copied()
            .ok_or(JsonError::Nesting("no open scope"))
    }

    fn replace_top(&mut self, scope: Scope) {
        let last = self.stack.len() - 1;
        self.stack[last] = scope;
    }

    /// Inserts any separator due before a name and marks the key dangling.
    fn before_key(&mut self) -> Result<(), JsonError> {
        match self.peek()? {
            Scope::NonemptyObject => self.out.push(','),
            Scope::EmptyObject => {}
            _ => return Err(JsonError::Nesting("key written outside an object")),
        }
        self.newline();
        self.replace_top(Scope::DanglingKey);
        Ok(())
    }

    /// Inserts any separator due before a value and advances the scope.
    fn before_value(&mut self) -> Result<(), JsonError> {
        let Some(&context) = self.stack.last() else {
            return Ok(()); // first top-level value
        };
        match context {
            Scope::EmptyArray => {
                self.replace_top(Scope::NonemptyArray);
                self.newline();
            }
            Scope::NonemptyArray => {
                self.out.push(',');
                self.newline();
            }
            Scope::DanglingKey => {
                self.out.push_str(if self.indent.is_none() { ":" } else { ": " });
                self.replace_top(Scope::NonemptyObject);
            }
            _ => return Err(JsonError::Nesting("value written where a key is required")),
        }
        Ok(())
    }

    fn newline(&mut self) {
        let Some(indent) = &self.indent else { return };
        self.out.push('\n');
        for _ in 0..self.stack.len() {
            self.out.push_str(indent);
        }
    }

    fn string(&mut self, value: &str) {
        self.out.push('"');
        for c in value.chars() {
            match c {
                '"' | '\\' | '/' => {
                    self.out.push('\\');
                    self.out.push(c);
                }
                '\t' => self.out.push_str("\\t"),
                '\u{0008}' => self.out.push_str("\\b"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                _ => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}

/// Encodes `data` as a quoted JSON string literal, applying escapes.
pub fn quote(data: &str) -> String {
    let mut stringer = JsonStringer::new();
    stringer.string(data);
    stringer.out
}
