//! A single cookie record parsed from a `Set-Cookie[2]` header.

use std::fmt;

use time::OffsetDateTime;

use crate::cookies::parser::CookieParser;
use crate::cookies::CookieError;

/// Attribute words that may not be used as cookie names.
const RESERVED_NAMES: &[&str] = &[
    "comment",    //           RFC 2109  RFC 2965
    "commenturl", //                     RFC 2965
    "discard",    //                     RFC 2965
    "domain",     // Netscape  RFC 2109  RFC 2965
    "expires",    // Netscape
    "max-age",    //           RFC 2109  RFC 2965
    "path",       // Netscape  RFC 2109  RFC 2965
    "port",       //                     RFC 2965
    "secure",     // Netscape  RFC 2109  RFC 2965
    "version",    //           RFC 2109  RFC 2965
];

/// An opaque name-value pair held by an HTTP client to maintain a stateful
/// session, with the attributes of the grammar it was parsed from.
///
/// Instances are produced by [`SetCookie::parse`] and are consumed within a
/// single resolver call; they are not stored long-term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    /// Non-empty printable ASCII without `;`, `,`, or a `$` prefix, and not
    /// a reserved attribute word.
    pub name: String,
    pub value: String,
    pub comment: Option<String>,
    pub comment_url: Option<String>,
    pub discard: bool,
    pub domain: Option<String>,
    /// Delta-seconds until expiry; `-1` means the cookie lasts for the
    /// session only.
    pub max_age: i64,
    pub path: Option<String>,
    /// Comma-separated port numbers. `None` permits any port; an empty
    /// string restricts the cookie to the originating request's port.
    pub portlist: Option<String>,
    pub secure: bool,
    /// 0 for Netscape-style cookies, 1 for RFC 2109/2965.
    pub version: u8,
}

impl SetCookie {
    /// Creates a cookie, validating the name. Leading and trailing
    /// whitespace around the name is trimmed.
    pub fn new(name: &str, value: &str) -> Result<Self, CookieError> {
        let trimmed = name.trim();
        if !is_valid_name(trimmed) {
            return Err(CookieError::InvalidName(name.to_string()));
        }
        Ok(Self {
            name: trimmed.to_string(),
            value: value.to_string(),
            comment: None,
            comment_url: None,
            discard: false,
            domain: None,
            max_age: -1,
            path: None,
            portlist: None,
            secure: false,
            version: 1,
        })
    }

    /// Parses a `Set-Cookie` or `Set-Cookie2` header into its cookies.
    /// Since the `Set-Cookie2` syntax allows several cookie definitions in
    /// one header, the result is a list; it is never empty.
    pub fn parse(header: &str) -> Result<Vec<SetCookie>, CookieError> {
        CookieParser::new(header).parse()
    }

    /// Returns true once this cookie's max-age has reached zero. A max-age
    /// of `-1` persists for the session and never counts as expired.
    pub fn has_expired(&self) -> bool {
        if self.max_age == -1 {
            return false;
        }
        self.max_age <= 0
    }

    /// Sets max-age from an absolute expiry timestamp, as an offset in
    /// whole seconds from the current time.
    pub(crate) fn set_expires(&mut self, expires: OffsetDateTime) {
        self.max_age = (expires - OffsetDateTime::now_utc()).whole_seconds();
    }

    pub(crate) fn set_version(&mut self, version: i64) -> Result<(), CookieError> {
        if version != 0 && version != 1 {
            return Err(CookieError::InvalidVersion(version));
        }
        self.version = version as u8;
        Ok(())
    }
}

/// Formats the cookie for a `Cookie` request header line: `name=value` for
/// version 0, a quoted value with `$Path`/`$Domain`/`$Port` attributes for
/// version 1.
impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version == 0 {
            return write!(f, "{}={}", self.name, self.value);
        }
        write!(f, "{}=\"{}\"", self.name, self.value)?;
        for (attribute, value) in [
            ("Path", &self.path),
            ("Domain", &self.domain),
            ("Port", &self.portlist),
        ] {
            if let Some(value) = value {
                write!(f, ";${}=\"{}\"", attribute, value)?;
            }
        }
        Ok(())
    }
}

fn is_valid_name(name: &str) -> bool {
    if name.is_empty()
        || name.starts_with('$')
        || RESERVED_NAMES.contains(&name.to_lowercase().as_str())
    {
        return false;
    }
    name.chars().all(|c| {
        let code = c as u32;
        code < 127 && c != ';' && c != ',' && (!c.is_whitespace() || c == ' ')
    })
}

/// Returns true if `host` matches the domain pattern `domain_pattern`.
///
/// The pattern is either a host name (`android.com`, `localhost`) or a
/// subdomain pattern with a leading dot (`.android.com`). The special
/// pattern `.local` matches every host without a TLD, such as `localhost`.
pub fn domain_matches(domain_pattern: &str, host: &str) -> bool {
    let a = host.to_lowercase();
    let b = domain_pattern.to_lowercase();

    // From RFC 2965: both host names are FQDN strings and match exactly.
    if a == b && is_fully_qualified_domain_name(&a, 0) {
        return true;
    }
    if !is_fully_qualified_domain_name(&a, 0) {
        return b == ".local";
    }
    // Not in RFC 2965: if prefixing the host with "." equals the pattern,
    // it matches, so ".google.com" also matches the host "google.com".
    if b.len() == 1 + a.len()
        && b.starts_with('.')
        && b.ends_with(&a)
        && is_fully_qualified_domain_name(&b, 1)
    {
        return true;
    }
    // From RFC 2965: x.y.com domain-matches .Y.com but not Y.com.
    a.len() > b.len()
        && a.ends_with(&b)
        && ((b.starts_with('.') && is_fully_qualified_domain_name(&b, 1)) || b == ".local")
}

/// Returns true if `s[first_character..]` contains a dot between its first
/// and last characters, exclusive. Both `android.com` and `co.uk` qualify,
/// but `android.com.`, `.com`, and `android` do not. This implements the
/// cookie spec's notion of an FQDN and is not general purpose; it also
/// returns true for IPv4 addresses.
fn is_fully_qualified_domain_name(s: &str, first_character: usize) -> bool {
    let bytes = s.as_bytes();
    let mut i = first_character + 1;
    while i < bytes.len() {
        if bytes[i] == b'.' {
            return i < bytes.len() - 1;
        }
        i += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(SetCookie::new("a", "1").is_ok());
        assert!(SetCookie::new("X-VRT-Token", "abc").is_ok());
        assert!(SetCookie::new(" padded ", "v").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert!(SetCookie::new("", "1").is_err());
        assert!(SetCookie::new("$name", "1").is_err());
        assert!(SetCookie::new("Domain", "1").is_err());
        assert!(SetCookie::new("MAX-AGE", "1").is_err());
        assert!(SetCookie::new("a;b", "1").is_err());
        assert!(SetCookie::new("a,b", "1").is_err());
        assert!(SetCookie::new("caf\u{00e9}", "1").is_err());
    }

    #[test]
    fn test_has_expired() {
        let mut cookie = SetCookie::new("a", "1").unwrap();
        assert!(!cookie.has_expired()); // session cookie

        cookie.max_age = 0;
        assert!(cookie.has_expired());

        cookie.max_age = 10;
        assert!(!cookie.has_expired());
    }

    #[test]
    fn test_domain_matches_subdomain_pattern() {
        assert!(domain_matches(".example.com", "foo.example.com"));
        assert!(domain_matches(".example.com", "example.com"));
        assert!(!domain_matches("example.com", "foo.example.com"));
    }

    #[test]
    fn test_domain_matches_exact_fqdn() {
        assert!(domain_matches("android.com", "android.com"));
        assert!(!domain_matches("android", "android"));
    }

    #[test]
    fn test_domain_matches_local() {
        assert!(domain_matches(".local", "localhost"));
        assert!(!domain_matches(".example.com", "localhost"));
    }

    #[test]
    fn test_domain_matches_is_case_insensitive() {
        assert!(domain_matches(".Example.COM", "foo.example.com"));
    }

    #[test]
    fn test_request_header_formats() {
        let mut cookie = SetCookie::new("a", "1").unwrap();
        cookie.version = 0;
        assert_eq!(cookie.to_string(), "a=1");

        cookie.version = 1;
        cookie.path = Some("/".to_string());
        cookie.domain = Some(".example.com".to_string());
        assert_eq!(
            cookie.to_string(),
            "a=\"1\";$Path=\"/\";$Domain=\".example.com\""
        );
    }
}
