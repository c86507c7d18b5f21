//! Minimal HTTP plumbing for the token handshake.
//!
//! The resolver only needs two verbs and a handful of headers, so the
//! transport surface is a single async trait with plain request and
//! response records. Callers plug in whatever HTTP client they already
//! use; tests plug in a scripted transport.

pub mod formencode;
pub mod transport;

pub use formencode::{form_encode, form_encode_pairs};
pub use transport::{HttpTransport, Method, Request, Response, TransportError};
