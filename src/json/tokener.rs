//! Recursive-descent JSON tokener.
//!
//! The tokener owns an explicit character cursor that advances through the
//! input; no state is shared between instances, so parses are reentrant.
//! Nesting depth is bounded to keep stack usage under control; inputs
//! deeper than the configured maximum fail with
//! [`JsonError::NestingTooDeep`].

use crate::json::error::JsonError;
use crate::json::value::{JsonArray, JsonObject, Value};

/// Default limit on nested arrays/objects.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Characters that terminate an unquoted literal.
const LITERAL_TERMINATORS: &[char] = &['{', '}', '[', ']', '/', '\\', ':', ',', '=', ';', '#', ' ', '\t'];

/// Parses a JSON-encoded string into a [`Value`] tree.
///
/// The grammar is lenient: strings may be single-quoted, literals may be
/// unquoted (with hex `0x` and octal `0` integer prefixes), C-style and
/// end-of-line comments are skipped, object names may be separated from
/// values by `=` or `=>`, elements may be separated by `;`, and trailing
/// commas are tolerated. In arrays, a stray separator stands for an explicit
/// null element: `[,]` parses as two nulls.
///
/// Each tokener parses a single input. Example:
///
/// ```rust
/// use vrtnet::json::tokener::JsonTokener;
///
/// let value = JsonTokener::new("{\"query\": \"Pizza\"}").next_value().unwrap();
/// ```
pub struct JsonTokener {
    chars: Vec<char>,
    /// The index of the next character to be consumed. When the input is
    /// exhausted, this equals the input's length.
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl JsonTokener {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Overrides the nesting depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the next value from the input: an object, array, string,
    /// boolean, integer, double, or null.
    pub fn next_value(&mut self) -> Result<Value, JsonError> {
        match self.next_clean()? {
            None => Err(self.syntax("End of input")),
            Some('{') => self.read_object(),
            Some('[') => self.read_array(),
            Some(quote @ ('\'' | '"')) => Ok(Value::Str(self.next_string(quote)?)),
            Some(_) => {
                self.pos -= 1;
                self.read_literal()
            }
        }
    }

    /// Returns the next non-whitespace character outside any comment, or
    /// `None` when the input is exhausted.
    fn next_clean(&mut self) -> Result<Option<char>, JsonError> {
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            self.pos += 1;
            match c {
                ' ' | '\t' | '\n' | '\r' => continue,
                '/' => {
                    if self.pos == self.chars.len() {
                        return Ok(Some(c));
                    }
                    let peek = self.chars[self.pos];
                    if peek != '*' && peek != '/' {
                        return Ok(Some(c));
                    }
                    self.skip_comment()?;
                }
                _ => return Ok(Some(c)),
            }
        }
        Ok(None)
    }

    /// Advances past the current comment. The opening slash has been read
    /// and the cursor sits on `*` or `/`.
    fn skip_comment(&mut self) -> Result<(), JsonError> {
        let style = self.chars[self.pos];
        self.pos += 1;
        if style == '*' {
            while self.pos + 1 < self.chars.len() {
                if self.chars[self.pos] == '*' && self.chars[self.pos + 1] == '/' {
                    self.pos += 2;
                    return Ok(());
                }
                self.pos += 1;
            }
            return Err(self.syntax("Unterminated comment"));
        }
        // end-of-line comment: skip to the next newline; a "\r\n" pair's
        // '\n' is consumed as whitespace by the caller
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            self.pos += 1;
            if c == '\r' || c == '\n' {
                break;
            }
        }
        Ok(())
    }

    /// Reads the string up to the closing `quote`, unescaping along the way.
    /// The opening quote has already been consumed; the closing quote is
    /// consumed but not returned.
    fn next_string(&mut self, quote: char) -> Result<String, JsonError> {
        let mut result = String::new();
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            self.pos += 1;
            if c == quote {
                return Ok(result);
            }
            if c == '\\' {
                if self.pos == self.chars.len() {
                    return Err(self.syntax("Unterminated escape sequence"));
                }
                result.push(self.read_escape_character()?);
            } else {
                result.push(c);
            }
        }
        Err(self.syntax("Unterminated string"))
    }

    /// Unescapes the character following a backslash. Supports `\uXXXX`
    /// escapes and the two-character escapes; any other escaped character
    /// stands for itself.
    fn read_escape_character(&mut self) -> Result<char, JsonError> {
        let escaped = self.chars[self.pos];
        self.pos += 1;
        match escaped {
            'u' => {
                if self.pos + 4 > self.chars.len() {
                    return Err(self.syntax("Unterminated escape sequence"));
                }
                let hex: String = self.chars[self.pos..self.pos + 4].iter().collect();
                self.pos += 4;
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.syntax("Invalid \\u escape sequence"))
            }
            't' => Ok('\t'),
            'b' => Ok('\u{0008}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            other => Ok(other),
        }
    }

    /// Reads a null, boolean, numeric, or unquoted string literal.
    /// Integral values without a decimal point are tried in base 16 (`0x`
    /// prefix), base 8 (leading `0`), and base 10, in that order, before
    /// falling back to a floating-point parse and finally a bare string.
    fn read_literal(&mut self) -> Result<Value, JsonError> {
        let literal = self.next_to(LITERAL_TERMINATORS);
        if literal.is_empty() {
            return Err(self.syntax("Expected literal value"));
        }
        if literal.eq_ignore_ascii_case("null") {
            return Ok(Value::Null);
        }
        if literal.eq_ignore_ascii_case("true") {
            return Ok(Value::Bool(true));
        }
        if literal.eq_ignore_ascii_case("false") {
            return Ok(Value::Bool(false));
        }

        if !literal.contains('.') {
            let (digits, base) = if let Some(hex) =
                literal.strip_prefix("0x").or_else(|| literal.strip_prefix("0X"))
            {
                (hex, 16)
            } else if literal.len() > 1 && literal.starts_with('0') {
                (&literal[1..], 8)
            } else {
                (literal.as_str(), 10)
            };
            if let Ok(n) = i64::from_str_radix(digits, base) {
                return Ok(Value::Int(n));
            }
            // fall through: exponents and overflowing integers may still
            // parse as floating point
        }
        if let Ok(d) = literal.parse::<f64>() {
            return Ok(Value::Double(d));
        }
        Ok(Value::Str(literal))
    }

    /// Returns the characters up to but not including any terminator or a
    /// newline. Does not consume the terminator.
    fn next_to(&mut self, excluded: &[char]) -> String {
        let start = self.pos;
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            if c == '\r' || c == '\n' || excluded.contains(&c) {
                break;
            }
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Reads the name/value pairs and the closing brace of an object. The
    /// opening brace has already been read.
    fn read_object(&mut self) -> Result<Value, JsonError> {
        self.enter()?;
        let mut result = JsonObject::new();
        loop {
            match self.next_clean()? {
                Some('}') => {
                    self.leave();
                    return Ok(Value::Object(result));
                }
                Some(_) => self.pos -= 1,
                None => return Err(self.syntax("Unterminated object")),
            }
            let name = match self.next_value()? {
                Value::Str(s) => s,
                _ => return Err(self.syntax("Names must be strings")),
            };
            // the name/value separator is ':' or '=', optionally "=>"
            match self.next_clean()? {
                Some(':') | Some('=') => {}
                _ => return Err(self.syntax("Expected ':' after a name")),
            }
            if self.pos < self.chars.len() && self.chars[self.pos] == '>' {
                self.pos += 1;
            }
            let value = self.next_value()?;
            result.insert(name, value);
            match self.next_clean()? {
                Some('}') => {
                    self.leave();
                    return Ok(Value::Object(result));
                }
                Some(';') | Some(',') => continue,
                _ => return Err(self.syntax("Unterminated object")),
            }
        }
    }

    /// Reads the values and the closing bracket of an array. The opening
    /// bracket has already been read. `[]` yields an empty array, but `[,]`
    /// yields a two-element array of nulls: a separator without a preceding
    /// value stands for null, as does a trailing separator.
    fn read_array(&mut self) -> Result<Value, JsonError> {
        self.enter()?;
        let mut result = JsonArray::new();
        let mut has_trailing_separator = false;
        loop {
            match self.next_clean()? {
                None => return Err(self.syntax("Unterminated array")),
                Some(']') => {
                    if has_trailing_separator {
                        result.push(Value::Null);
                    }
                    self.leave();
                    return Ok(Value::Array(result));
                }
                Some(',') | Some(';') => {
                    result.push(Value::Null);
                    has_trailing_separator = true;
                    continue;
                }
                Some(_) => self.pos -= 1,
            }
            let value = self.next_value()?;
            result.push(value);
            match self.next_clean()? {
                Some(']') => {
                    self.leave();
                    return Ok(Value::Array(result));
                }
                Some(',') | Some(';') => {
                    has_trailing_separator = true;
                    continue;
                }
                _ => return Err(self.syntax("Unterminated array")),
            }
        }
    }

    fn enter(&mut self) -> Result<(), JsonError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(JsonError::NestingTooDeep(self.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Builds a syntax error carrying the current position.
    fn syntax(&self, message: &str) -> JsonError {
        JsonError::Syntax { position: self.pos, message: message.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Value {
        JsonTokener::new(text).next_value().unwrap()
    }

    #[test]
    fn test_hex_and_octal_literals() {
        assert_eq!(parse("0x1F"), Value::Int(31));
        assert_eq!(parse("017"), Value::Int(15));
        assert_eq!(parse("-17"), Value::Int(-17));
    }

    #[test]
    fn test_exponent_falls_through_to_double() {
        assert_eq!(parse("5e-1"), Value::Double(0.5));
    }

    #[test]
    fn test_bare_string_literal() {
        assert_eq!(parse("hello"), Value::Str("hello".to_string()));
    }

    #[test]
    fn test_single_quoted_string() {
        assert_eq!(parse("'abc'"), Value::Str("abc".to_string()));
    }

    #[test]
    fn test_unicode_escape() {
        assert_eq!(parse("\"\\u0041\""), Value::Str("A".to_string()));
    }

    #[test]
    fn test_unknown_escape_stands_for_itself() {
        assert_eq!(parse("\"\\q\""), Value::Str("q".to_string()));
    }

    #[test]
    fn test_comments_skipped() {
        let value = parse("/* leading */ { \"a\": 1 // trailing\n }");
        assert_eq!(value, Value::Object({
            let mut o = JsonObject::new();
            o.insert("a", 1);
            o
        }));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = JsonTokener::new("/* oops").next_value().unwrap_err();
        assert!(matches!(err, JsonError::Syntax { .. }));
    }

    #[test]
    fn test_stray_array_separator_yields_null() {
        let value = parse("[,]");
        let Value::Array(array) = value else { panic!("expected array") };
        assert_eq!(array.len(), 2);
        assert!(array.get(0).unwrap().is_null());
        assert!(array.get(1).unwrap().is_null());
    }

    #[test]
    fn test_depth_limit() {
        let deep = "[".repeat(5) + &"]".repeat(5);
        let err = JsonTokener::new(&deep)
            .with_max_depth(4)
            .next_value()
            .unwrap_err();
        assert_eq!(err, JsonError::NestingTooDeep(4));

        assert!(JsonTokener::new(&deep).with_max_depth(5).next_value().is_ok());
    }

    #[test]
    fn test_end_of_input() {
        let err = JsonTokener::new("   ").next_value().unwrap_err();
        assert!(matches!(err, JsonError::Syntax { .. }));
    }

    #[test]
    fn test_names_must_be_strings() {
        let err = JsonTokener::new("{[]: 1}").next_value().unwrap_err();
        assert!(matches!(err, JsonError::Syntax { .. }));
    }

    #[test]
    fn test_arrow_separator() {
        let value = parse("{a => 1}");
        let Value::Object(object) = value else { panic!("expected object") };
        assert_eq!(object.get_i64("a").unwrap(), 1);
    }
}
