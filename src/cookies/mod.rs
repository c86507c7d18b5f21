//! `Set-Cookie` / `Set-Cookie2` header parsing.
//!
//! Parses cookie headers for the three commonly used cookie specifications:
//!
//! - **Netscape** (version 0): one key-value pair plus `Domain`, `Expires`,
//!   `Path`, and `Secure`. `Expires` timestamps are converted to a max-age
//!   offset from the current time.
//! - **RFC 2109** (version 1): replaces `Expires` with a `Max-Age` duration
//!   and adds `Comment` and `Version`.
//! - **RFC 2965** (version 1): adds `Discard`, `Port`, and `CommentURL`,
//!   and renames the header to `Set-Cookie2`, which may carry several
//!   cookies separated by commas.
//!
//! Unrecognized attributes are silently discarded. In particular the widely
//! served `HttpOnly` attribute, which appears in none of the three specs,
//! is tolerated and ignored.

pub mod cookie;
mod parser;

pub use cookie::{domain_matches, SetCookie};

use thiserror::Error;

/// Cookie parsing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CookieError {
    /// The header contained no parseable cookie at all.
    #[error("no cookies in {0:?}")]
    NoCookies(String),

    /// A cookie name was not followed by `=`.
    #[error("expected '=' after {0}")]
    ExpectedEquals(String),

    /// A quoted attribute value was never closed.
    #[error("unterminated string literal in {0:?}")]
    UnterminatedQuote(String),

    /// The cookie name was empty, non-ASCII, a reserved attribute word, or
    /// prefixed with `$`.
    #[error("invalid cookie name {0:?}")]
    InvalidName(String),

    /// An explicit `Version` attribute was neither 0 nor 1.
    #[error("cookie version must be 0 or 1, got {0}")]
    InvalidVersion(i64),

    /// A numeric attribute failed to parse.
    #[error("invalid {attribute} value {value:?}")]
    InvalidAttribute { attribute: &'static str, value: String },
}
