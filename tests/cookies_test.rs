//! Set-Cookie parsing integration tests.

use vrtnet::cookies::{domain_matches, CookieError, SetCookie};

#[test]
fn test_session_cookie_from_token_service() {
    // the shape served by the session-token exchange
    let cookies = SetCookie::parse(
        "X-VRT-Token=deadbeef.cafe; Max-Age=3600; Path=/; Domain=.vrt.be; Secure; HttpOnly",
    )
    .unwrap();

    assert_eq!(cookies.len(), 1);
    let cookie = &cookies[0];
    assert_eq!(cookie.name, "X-VRT-Token");
    assert_eq!(cookie.value, "deadbeef.cafe");
    assert_eq!(cookie.max_age, 3600);
    assert_eq!(cookie.path.as_deref(), Some("/"));
    assert_eq!(cookie.domain.as_deref(), Some(".vrt.be"));
    assert!(cookie.secure);
    assert_eq!(cookie.version, 1);
    assert!(!cookie.has_expired());
}

#[test]
fn test_version_heuristic() {
    // expires wins over max-age and over an explicit version
    let with_expires =
        SetCookie::parse("a=1; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Version=1").unwrap();
    assert_eq!(with_expires[0].version, 0);

    let with_max_age = SetCookie::parse("a=1; Max-Age=5").unwrap();
    assert_eq!(with_max_age[0].version, 1);

    let explicit = SetCookie::parse("a=1; Version=1").unwrap();
    assert_eq!(explicit[0].version, 1);

    let bare = SetCookie::parse("a=1").unwrap();
    assert_eq!(bare[0].version, 0);
}

#[test]
fn test_set_cookie2_version_and_splitting() {
    let cookies = SetCookie::parse("Set-Cookie2: a=1, b=2; Port=\"80,443\"").unwrap();
    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies[0].version, 1);
    assert_eq!(cookies[1].portlist.as_deref(), Some("80,443"));
}

#[test]
fn test_set_cookie2_version_attribute_is_ignored() {
    // the header prefix already fixes the version
    let cookies = SetCookie::parse("Set-Cookie2: a=1; Version=0").unwrap();
    assert_eq!(cookies[0].version, 1);
}

#[test]
fn test_expires_date_formats() {
    let rfc2822 = SetCookie::parse("a=1; Expires=Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
    assert!(rfc2822[0].max_age < 0);

    let iso = SetCookie::parse("a=1; Expires=2015-10-21T07:28:00Z").unwrap();
    assert!(iso[0].max_age < 0);

    let garbage = SetCookie::parse("a=1; Expires=whenever").unwrap();
    assert_eq!(garbage[0].max_age, 0);
    assert!(garbage[0].has_expired());
}

#[test]
fn test_expires_value_may_contain_commas() {
    // even in Set-Cookie2 headers the date's comma must not split cookies
    let cookies =
        SetCookie::parse("Set-Cookie2: a=1; Expires=Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
    assert_eq!(cookies.len(), 1);
}

#[test]
fn test_attribute_case_is_ignored() {
    let cookies = SetCookie::parse("a=1; MAX-AGE=7; pAtH=/x").unwrap();
    assert_eq!(cookies[0].max_age, 7);
    assert_eq!(cookies[0].path.as_deref(), Some("/x"));
}

#[test]
fn test_cookie_name_case_is_preserved() {
    let cookies = SetCookie::parse("X-VRT-Token=v").unwrap();
    assert_eq!(cookies[0].name, "X-VRT-Token");
}

#[test]
fn test_reserved_name_rejected() {
    assert!(matches!(
        SetCookie::parse("Expires=tomorrow"),
        Err(CookieError::InvalidName(_))
    ));
}

#[test]
fn test_request_header_round_trip() {
    let cookies = SetCookie::parse("a=1; Max-Age=5; Path=/p").unwrap();
    assert_eq!(cookies[0].to_string(), "a=\"1\";$Path=\"/p\"");

    let netscape = SetCookie::parse("a=1; Path=/p").unwrap();
    assert_eq!(netscape[0].to_string(), "a=1");
}

#[test]
fn test_domain_matching() {
    assert!(domain_matches(".vrt.be", "www.vrt.be"));
    assert!(domain_matches(".vrt.be", "vrt.be"));
    assert!(domain_matches("vrt.be", "vrt.be"));
    assert!(!domain_matches("vrt.be", "www.vrt.be"));
    assert!(!domain_matches(".be", "vrt.be")); // ".be" is not an FQDN pattern
    assert!(domain_matches(".local", "localhost"));
}
