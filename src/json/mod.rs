//! Lenient JSON parsing and serialization.
//!
//! This module provides a small dynamic JSON codec used to decode API
//! responses and to encode cached token envelopes:
//!
//! - **Value model**: [`Value`](value::Value), a closed sum type over null,
//!   booleans, 64-bit integers, doubles, strings, arrays, and
//!   insertion-ordered objects
//! - **Parsing**: [`JsonTokener`](tokener::JsonTokener), a recursive-descent
//!   tokener with a bounded nesting depth
//! - **Serialization**: [`JsonStringer`](stringer::JsonStringer), a
//!   stack-based writer that enforces well-formed output
//!
//! The parser is deliberately lenient. It accepts single-quoted strings,
//! unquoted literals (including hex and octal integers), C-style and
//! end-of-line comments, `=`/`=>` as name separators, `;` as an element
//! separator, and trailing commas. A successful parse therefore does not
//! certify that the input was valid JSON.
//!
//! Accessors come in two families: `get_*` methods fail with
//! [`JsonError::TypeMismatch`] or [`JsonError::MissingKey`], while `opt_*`
//! methods never fail and substitute defaults.

pub mod coerce;
pub mod error;
pub mod stringer;
pub mod tokener;
pub mod value;

pub use error::JsonError;
pub use stringer::JsonStringer;
pub use tokener::JsonTokener;
pub use value::{JsonArray, JsonObject, Value};
