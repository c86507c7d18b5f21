//! Token resolver integration tests against a scripted transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vrtnet::base::kvstore::MemoryStore;
use vrtnet::http::transport::{HttpTransport, Method, Request, Response, TransportError};
use vrtnet::token::{CacheBehavior, Credentials, ResolverConfig, TokenResolver};

/// Replays canned responses in order and records every request.
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<Response>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    fn new(responses: impl IntoIterator<Item = Response>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn recorded(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::ConnectionFailed("script exhausted".to_string()))
    }
}

fn ok(body: &str) -> Response {
    Response { status: 200, headers: Vec::new(), body: body.to_string() }
}

fn ok_with_cookie(body: &str, cookie: &str) -> Response {
    Response {
        status: 200,
        headers: vec![("Set-Cookie".to_string(), cookie.to_string())],
        body: body.to_string(),
    }
}

fn login_body() -> &'static str {
    "{\"UID\": \"u-1\", \"UIDSignature\": \"sig\", \"signatureTimestamp\": \"1700000000\", \
     \"sessionInfo\": {\"login_token\": \"lt-1\"}}"
}

fn resolver(transport: Arc<ScriptedTransport>) -> TokenResolver {
    TokenResolver::new(
        transport,
        Arc::new(MemoryStore::new()),
        Credentials::new("viewer@example.be", "hunter2"),
        ResolverConfig::default(),
    )
}

#[tokio::test]
async fn test_ondemand_handshake() {
    let transport = ScriptedTransport::new([
        ok(login_body()),
        ok_with_cookie("{}", "X-VRT-Token=session-1; Max-Age=3600; Path=/; HttpOnly"),
        ok("{\"vrtPlayerToken\": \"player-xyz\", \"expirationDate\": 9999999999999}"),
    ]);
    let resolver = resolver(transport.clone());

    let token = resolver
        .get_player_token("https://media.vrt.be/tokens", Some("ondemand"), false)
        .await;
    assert_eq!(token.as_deref(), Some("player-xyz"));

    let requests = transport.recorded();
    assert_eq!(requests.len(), 3);

    // step one: credentials go to the accounts service as a query string
    assert_eq!(requests[0].method, Method::Get);
    assert!(requests[0].url.starts_with("https://accounts.vrt.be/accounts.login?"));
    assert!(requests[0].url.contains("loginID=viewer%40example.be"));
    assert!(requests[0].url.contains("sessionExpiration=-1"));
    assert!(requests[0].url.contains("targetEnv=jssdk"));

    // step two: the login token rides in a brace-wrapped glt cookie
    assert_eq!(requests[1].method, Method::Post);
    assert_eq!(requests[1].url, "https://token.vrt.be");
    let glt = requests[1].header_value("Cookie").unwrap();
    assert!(glt.starts_with("glt_{"));
    assert!(glt.ends_with("}={lt-1}"));
    let body = requests[1].body.as_deref().unwrap();
    assert!(body.contains("\"uid\":\"u-1\""));
    assert!(body.contains("\"email\":\"viewer@example.be\""));

    // step three: the session token rides in a plain cookie
    assert_eq!(
        requests[2].header_value("Cookie"),
        Some("X-VRT-Token=session-1")
    );
    assert_eq!(
        requests[2].header_value("Content-Type"),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_second_lookup_is_served_from_cache() {
    let transport = ScriptedTransport::new([
        ok(login_body()),
        ok_with_cookie("{}", "X-VRT-Token=session-1; Max-Age=3600"),
        ok("{\"vrtPlayerToken\": \"player-xyz\", \"expirationDate\": 9999999999999}"),
    ]);
    let resolver = resolver(transport.clone());

    let first = resolver
        .get_player_token("https://media.vrt.be/tokens", Some("ondemand"), false)
        .await;
    let second = resolver
        .get_player_token("https://media.vrt.be/tokens", Some("ondemand"), false)
        .await;

    assert_eq!(first, second);
    assert_eq!(transport.request_count(), 3); // no extra traffic
}

#[tokio::test]
async fn test_refresh_skips_the_cache() {
    let transport = ScriptedTransport::new([
        ok(login_body()),
        ok_with_cookie("{}", "X-VRT-Token=session-1; Max-Age=3600"),
        ok("{\"vrtPlayerToken\": \"player-1\"}"),
        ok("{\"vrtPlayerToken\": \"player-2\"}"),
    ]);
    let resolver = resolver(transport.clone());

    let first = resolver
        .get_player_token("https://media.vrt.be/tokens", Some("ondemand"), false)
        .await;
    assert_eq!(first.as_deref(), Some("player-1"));

    // the cached session token is reused; only the player token refetches
    let second = resolver
        .get_player_token("https://media.vrt.be/tokens", Some("ondemand"), true)
        .await;
    assert_eq!(second.as_deref(), Some("player-2"));
    assert_eq!(transport.request_count(), 4);
}

#[tokio::test]
async fn test_live_variant_needs_no_session() {
    let transport =
        ScriptedTransport::new([ok("{\"vrtPlayerToken\": \"player-live\"}")]);
    let resolver = resolver(transport.clone());

    let token = resolver
        .get_player_token("https://media.vrt.be/tokens", Some("live"), false)
        .await;
    assert_eq!(token.as_deref(), Some("player-live"));

    let requests = transport.recorded();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].header_value("Cookie"), None);
}

#[tokio::test]
async fn test_login_primes_the_session_cache() {
    let transport = ScriptedTransport::new([
        ok(login_body()),
        ok_with_cookie("{}", "X-VRT-Token=session-1; Max-Age=3600"),
        ok("{\"vrtPlayerToken\": \"player-xyz\"}"),
    ]);
    let resolver = resolver(transport.clone());

    assert!(resolver.login().await);
    assert_eq!(transport.request_count(), 2);

    // the subsequent on-demand resolution skips the handshake
    let token = resolver
        .get_player_token("https://media.vrt.be/tokens", Some("ondemand"), false)
        .await;
    assert_eq!(token.as_deref(), Some("player-xyz"));
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn test_login_failure_reports_false() {
    let transport = ScriptedTransport::new([ok("{\"errorCode\": 403}")]);
    let resolver = resolver(transport.clone());

    // no sessionInfo in the login payload
    assert!(!resolver.login().await);
}

#[tokio::test]
async fn test_missing_set_cookie_fails_resolution() {
    let transport = ScriptedTransport::new([
        ok(login_body()),
        ok("{}"), // token exchange response without a Set-Cookie header
    ]);
    let resolver = resolver(transport.clone());

    let token = resolver
        .get_player_token("https://media.vrt.be/tokens", Some("ondemand"), false)
        .await;
    assert_eq!(token, None);
}

#[tokio::test]
async fn test_transport_failure_yields_none() {
    let transport = ScriptedTransport::new([]);
    let resolver = resolver(transport.clone());

    let token = resolver
        .get_player_token("https://media.vrt.be/tokens", Some("live"), false)
        .await;
    assert_eq!(token, None);
}

#[tokio::test]
async fn test_force_refresh_behavior_always_refetches() {
    let transport = ScriptedTransport::new([
        ok("{\"vrtPlayerToken\": \"player-1\"}"),
        ok("{\"vrtPlayerToken\": \"player-2\"}"),
    ]);
    let config = ResolverConfig {
        cache_behavior: CacheBehavior::ForceRefresh,
        ..ResolverConfig::default()
    };
    let resolver = TokenResolver::new(
        transport.clone(),
        Arc::new(MemoryStore::new()),
        Credentials::new("viewer@example.be", "hunter2"),
        config,
    );

    let first = resolver
        .get_player_token("https://media.vrt.be/tokens", Some("live"), false)
        .await;
    let second = resolver
        .get_player_token("https://media.vrt.be/tokens", Some("live"), false)
        .await;
    assert_eq!(first.as_deref(), Some("player-1"));
    assert_eq!(second.as_deref(), Some("player-2"));
}
