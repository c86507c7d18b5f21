use thiserror::Error;

/// Errors produced by the JSON tokener, accessors, and stringer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum JsonError {
    /// Malformed input. Carries the character position the tokener had
    /// reached when it gave up.
    #[error("{message} at character {position}")]
    Syntax { position: usize, message: String },

    /// A `get_*` accessor found a value it could not convert.
    #[error("value at {key} cannot be converted to {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// A `get_*` accessor found no mapping for the key or index.
    #[error("no value for {0}")]
    MissingKey(String),

    /// NaN or an infinity reached the value model or the serializer.
    #[error("forbidden numeric value: {0}")]
    NumericRange(f64),

    /// The tokener exceeded its configured nesting depth.
    #[error("nesting depth exceeds {0} levels")]
    NestingTooDeep(usize),

    /// The stringer was driven through an invalid scope sequence.
    #[error("nesting problem: {0}")]
    Nesting(&'static str),
}

impl JsonError {
    pub(crate) fn type_mismatch(key: impl Into<String>, expected: &'static str) -> Self {
        JsonError::TypeMismatch { key: key.into(), expected }
    }
}
