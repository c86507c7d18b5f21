//! Envelope-based token caching.
//!
//! Tokens are stored as small JSON envelopes pairing the token value with
//! its expiration date:
//!
//! ```json
//! {"X-VRT-Token": "abc...", "expirationDate": 1735689600000}
//! ```
//!
//! `expirationDate` is epoch milliseconds, but ISO 8601 strings written by
//! older clients are still read. A token is served until a fixed timeout
//! after its expiration date has passed, at which point the entry is
//! evicted.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

use crate::base::kvstore::KeyValueStore;
use crate::json::value::JsonObject;

/// How long past its expiration date a cached token is still served.
pub const TOKEN_TIMEOUT_MS: i64 = 1000 * 60 * 30;

/// Controls whether lookups may serve cached tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBehavior {
    /// Serve unexpired cached tokens.
    #[default]
    ServeCached,
    /// Never serve from the cache; every lookup misses. Writes and expiry
    /// eviction still happen, matching clients that historically populated
    /// the cache without reading it back.
    ForceRefresh,
}

/// Reads and writes token envelopes in a [`KeyValueStore`].
#[derive(Clone)]
pub struct TokenCache {
    store: Arc<dyn KeyValueStore>,
    behavior: CacheBehavior,
}

impl TokenCache {
    pub fn new(store: Arc<dyn KeyValueStore>, behavior: CacheBehavior) -> Self {
        Self { store, behavior }
    }

    /// Returns the cached token value, or `None` on a miss, an expired
    /// entry, or a malformed envelope. Expired entries are evicted.
    pub fn get_cached(&self, name: &str, variant: Option<&str>) -> Option<String> {
        let path = token_path(name, variant);
        let raw = self.store.get(&path)?;
        if raw.is_empty() {
            return None;
        }
        let envelope = JsonObject::parse(&raw).ok()?;
        let expiration_ms = envelope
            .get_i64("expirationDate")
            .ok()
            .or_else(|| parse_iso_expiration(&envelope))?;

        let age_ms = now_millis() - expiration_ms;
        if age_ms > TOKEN_TIMEOUT_MS {
            self.store.remove(&path);
            debug!(token = name, "token expired {} mins ago", age_ms / (1000 * 60));
            return None;
        }
        if self.behavior == CacheBehavior::ForceRefresh {
            return None;
        }
        let value = envelope.opt_string(name);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Stores a token envelope under the path derived from its first key.
    pub fn set_cached(&self, envelope: &JsonObject, variant: Option<&str>) {
        let Some(name) = envelope.keys().next() else { return };
        self.store
            .put(&token_path(name, variant), &envelope.to_json());
    }
}

/// Derives the storage key for a token: the variant prefix (if any)
/// followed by the token name with dashes stripped, so the session token
/// lives at `XVRTToken` and an on-demand player token at
/// `ondemand_vrtPlayerToken`.
pub(crate) fn token_path(name: &str, variant: Option<&str>) -> String {
    let prefix = variant.map(|v| format!("{v}_")).unwrap_or_default();
    format!("{prefix}{}", name.replace('-', ""))
}

fn parse_iso_expiration(envelope: &JsonObject) -> Option<i64> {
    let raw = envelope.get_string("expirationDate").ok()?;
    debug!(expiration = %raw, "non-numeric expirationDate");
    let parsed = OffsetDateTime::parse(&raw, &Rfc3339).ok()?;
    Some((parsed.unix_timestamp_nanos() / 1_000_000) as i64)
}

pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
