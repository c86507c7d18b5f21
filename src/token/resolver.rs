//! The login handshake and player-token exchange.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::base::kvstore::KeyValueStore;
use crate::cookies::{CookieError, SetCookie};
use crate::http::formencode::form_encode_pairs;
use crate::http::transport::{HttpTransport, Request, TransportError};
use crate::json::error::JsonError;
use crate::json::value::JsonObject;
use crate::token::cache::{now_millis, CacheBehavior, TokenCache};

pub const DEFAULT_API_KEY: &str =
    "3_qhEcPa5JGFROVwu5SWKqJ4mVOIkwlFNMSKwzPDAh8QZOtHqu6L4nD5Q7lk0eXOOG";
pub const DEFAULT_LOGIN_URL: &str = "https://accounts.vrt.be/accounts.login";
pub const DEFAULT_TOKEN_URL: &str = "https://token.vrt.be";

pub(crate) const SESSION_TOKEN_NAME: &str = "X-VRT-Token";
pub(crate) const PLAYER_TOKEN_NAME: &str = "vrtPlayerToken";

/// Failures of the login handshake or token exchange.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Json(#[from] JsonError),

    #[error(transparent)]
    Cookie(#[from] CookieError),

    /// The token exchange response carried no `Set-Cookie` header.
    #[error("token exchange response carried no Set-Cookie header")]
    MissingSetCookie,
}

/// Account credentials for the accounts service.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self { user: user.into(), pass: pass.into() }
    }
}

/// Endpoint and caching knobs, defaulting to the production services.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub login_url: String,
    pub token_exchange_url: String,
    pub api_key: String,
    pub cache_behavior: CacheBehavior,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            login_url: DEFAULT_LOGIN_URL.to_string(),
            token_exchange_url: DEFAULT_TOKEN_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            cache_behavior: CacheBehavior::default(),
        }
    }
}

/// Resolves player tokens, logging in and caching as needed.
///
/// A player token grants access to one stream endpoint. The "ondemand"
/// variant requires an authenticated session, so resolving it may first
/// run the full login handshake; other variants are anonymous.
pub struct TokenResolver {
    transport: Arc<dyn HttpTransport>,
    cache: TokenCache,
    credentials: Credentials,
    config: ResolverConfig,
}

impl TokenResolver {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn KeyValueStore>,
        credentials: Credentials,
        config: ResolverConfig,
    ) -> Self {
        let cache = TokenCache::new(store, config.cache_behavior);
        Self { transport, cache, credentials, config }
    }

    /// Runs the login handshake eagerly, priming the session token cache.
    /// Returns false (after logging the cause) when any step fails.
    pub async fn login(&self) -> bool {
        match self.fresh_session_token().await {
            Ok(_) => true,
            Err(error) => {
                warn!(%error, "login failed");
                false
            }
        }
    }

    /// Resolves a player token for `token_url`, serving from the cache
    /// when possible. With `refresh` the cache lookup is skipped and the
    /// token is fetched anew. Returns `None` (after logging the cause)
    /// when resolution fails.
    pub async fn get_player_token(
        &self,
        token_url: &str,
        variant: Option<&str>,
        refresh: bool,
    ) -> Option<String> {
        if !refresh {
            if let Some(token) = self.cache.get_cached(PLAYER_TOKEN_NAME, variant) {
                return Some(token);
            }
        }
        match self.fetch_player_token(token_url, variant).await {
            Ok(token) => Some(token),
            Err(error) => {
                warn!(%error, "player token resolution failed");
                None
            }
        }
    }

    async fn fetch_player_token(
        &self,
        token_url: &str,
        variant: Option<&str>,
    ) -> Result<String, TokenError> {
        let mut request = Request::post(token_url).header("Content-Type", "application/json");
        if variant == Some("ondemand") {
            let session_token = self.session_token().await?;
            request = request.header(
                "Cookie",
                format!("{SESSION_TOKEN_NAME}={session_token}"),
            );
        }

        let response = self.transport.execute(request).await?;
        let payload = JsonObject::parse(&response.body)?;
        self.cache.set_cached(&payload, variant);
        Ok(payload.get_string(PLAYER_TOKEN_NAME)?)
    }

    /// Returns a session token, from the cache or a fresh login.
    async fn session_token(&self) -> Result<String, TokenError> {
        if let Some(token) = self.cache.get_cached(SESSION_TOKEN_NAME, None) {
            return Ok(token);
        }
        self.fresh_session_token().await
    }

    async fn fresh_session_token(&self) -> Result<String, TokenError> {
        let login = self.fetch_login_payload().await?;
        self.exchange_login_for_session(&login).await
    }

    /// Step one of the handshake: authenticate against the accounts
    /// service, yielding the login payload with the one-shot login token.
    async fn fetch_login_payload(&self) -> Result<JsonObject, TokenError> {
        let query = form_encode_pairs([
            ("loginID", self.credentials.user.as_str()),
            ("password", self.credentials.pass.as_str()),
            ("sessionExpiration", "-1"),
            ("APIKey", self.config.api_key.as_str()),
            ("targetEnv", "jssdk"),
        ]);
        let url = format!("{}?{query}", self.config.login_url);
        let response = self.transport.execute(Request::get(url)).await?;
        Ok(JsonObject::parse(&response.body)?)
    }

    /// Step two: trade the login token for a session token, delivered in
    /// the Set-Cookie header of the token service response.
    async fn exchange_login_for_session(&self, login: &JsonObject) -> Result<String, TokenError> {
        let session_info = login.get_object("sessionInfo")?;
        let login_token = session_info.get_string("login_token")?;

        // The cookie value wraps both parts in literal braces.
        let login_cookie = format!("glt_{{{}}}={{{}}}", self.config.api_key, login_token);

        let mut body = JsonObject::new();
        body.insert("uid", login.get_string("UID")?.as_str());
        body.insert("uidsig", login.get_string("UIDSignature")?.as_str());
        body.insert("ts", login.get_string("signatureTimestamp")?.as_str());
        body.insert("email", self.credentials.user.as_str());

        let request = Request::post(&self.config.token_exchange_url)
            .header("Content-Type", "application/json")
            .header("Cookie", login_cookie)
            .body(body.to_json());
        let response = self.transport.execute(request).await?;

        let cookie_header = response
            .header("Set-Cookie")
            .ok_or(TokenError::MissingSetCookie)?;
        debug!(header = %cookie_header, "session cookie received");

        let envelope = session_envelope(cookie_header)?;
        self.cache.set_cached(&envelope, None);
        Ok(envelope.get_string(SESSION_TOKEN_NAME)?)
    }
}

/// Builds the cache envelope for a session cookie: the first cookie's
/// value plus an expiration date derived from its max-age.
fn session_envelope(cookie_header: &str) -> Result<JsonObject, TokenError> {
    let cookie = SetCookie::parse(cookie_header)?
        .into_iter()
        .next()
        .ok_or(TokenError::MissingSetCookie)?;
    let mut envelope = JsonObject::new();
    envelope.insert(SESSION_TOKEN_NAME, cookie.value.as_str());
    envelope.insert(
        "expirationDate",
        now_millis() + cookie.max_age.saturating_mul(1000),
    );
    Ok(envelope)
}
