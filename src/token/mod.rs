//! Session and player token resolution.
//!
//! Playback of a VRT stream needs a short-lived player token from
//! `token.vrt.be`. For on-demand streams the player token request must
//! carry a session token, which in turn is obtained by a two-step login
//! handshake against the accounts service. Both tokens are cached in a
//! [`KeyValueStore`] so repeated lookups within the token lifetime skip
//! the network entirely.
//!
//! [`KeyValueStore`]: crate::base::kvstore::KeyValueStore

pub mod cache;
pub mod resolver;

pub use cache::{CacheBehavior, TokenCache, TOKEN_TIMEOUT_MS};
pub use resolver::{Credentials, ResolverConfig, TokenError, TokenResolver};
