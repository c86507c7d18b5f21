//! # vrtnet
//!
//! Session-token resolution for VRT streaming services.
//!
//! `vrtnet` implements the authentication core of a streaming client: the
//! multi-step login handshake against the identity provider, the exchange of
//! a login ticket for a session cookie, and the acquisition and caching of
//! short-lived player tokens. It carries its own protocol parsers: a lenient
//! JSON codec and a `Set-Cookie`/`Set-Cookie2` parser covering the Netscape,
//! RFC 2109, and RFC 2965 grammars.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vrtnet::base::kvstore::MemoryStore;
//! use vrtnet::token::resolver::{Credentials, ResolverConfig, TokenResolver};
//!
//! #[tokio::main]
//! async fn main() {
//!     let resolver = TokenResolver::new(
//!         Arc::new(MyTransport::new()),
//!         Arc::new(MemoryStore::new()),
//!         Credentials::new("user@example.com", "hunter2"),
//!         ResolverConfig::default(),
//!     );
//!     if let Some(token) = resolver
//!         .get_player_token("https://media.example/tokens", Some("ondemand"), false)
//!         .await
//!     {
//!         println!("player token: {token}");
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Key-value storage abstraction backing the token cache
//! - [`json`] - Lenient JSON value model, tokener, and stringer
//! - [`cookies`] - `Set-Cookie`/`Set-Cookie2` parsing and domain matching
//! - [`http`] - Form encoding and the abstract HTTP transport seam
//! - [`token`] - Token cache and the login/token-resolution flow
//!
//! The HTTP client itself, the persistence engine behind the key-value
//! store, and the media player consuming the tokens are external
//! collaborators and are not part of this crate.

pub mod base;
pub mod cookies;
pub mod http;
pub mod json;
pub mod token;
