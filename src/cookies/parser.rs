//! Header-string parser producing [`SetCookie`] records.

use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

use crate::cookies::cookie::SetCookie;
use crate::cookies::CookieError;

const ATTRIBUTE_NAME_TERMINATORS: &str = ",;= \t";
const WHITESPACE: &str = " \t";

pub(crate) struct CookieParser {
    input: String,
    pos: usize,
    // The cookie's version is set with an overly complex heuristic:
    // if it has an expires attribute, the version is 0. Otherwise, if it
    // has a max-age attribute, the version is 1. Otherwise, if the header
    // started with "Set-Cookie2", the version is 1. Otherwise, if it has
    // any explicit version attribute, the first one applies. Otherwise,
    // the version is 0.
    has_expires: bool,
    has_max_age: bool,
    has_version: bool,
}

impl CookieParser {
    pub(crate) fn new(header: &str) -> Self {
        Self {
            input: header.to_string(),
            pos: 0,
            has_expires: false,
            has_max_age: false,
            has_version: false,
        }
    }

    pub(crate) fn parse(mut self) -> Result<Vec<SetCookie>, CookieError> {
        let mut cookies: Vec<SetCookie> = Vec::with_capacity(2);

        // Headers are accepted with or without the "Set-Cookie:" or
        // "Set-Cookie2:" prefix.
        let mut pre2965 = true;
        if self.has_prefix("set-cookie2:") {
            self.pos += "set-cookie2:".len();
            pre2965 = false;
            self.has_version = true;
        } else if self.has_prefix("set-cookie:") {
            self.pos += "set-cookie:".len();
        }

        // Read a comma-separated list of cookies. Note that the values may
        // contain commas!
        //   <NAME> "=" <VALUE> ( ";" <ATTR NAME> ( "=" <ATTR VALUE> )? )*
        loop {
            let Some(name) = self.read_attribute_name(false) else {
                if cookies.is_empty() {
                    return Err(CookieError::NoCookies(self.input));
                }
                return Ok(cookies);
            };
            if !self.read_equals_sign() {
                return Err(CookieError::ExpectedEquals(name));
            }
            let value = self.read_attribute_value(if pre2965 { ";" } else { ",;" })?;
            let mut cookie = SetCookie::new(&name, &value)?;
            cookie.version = if pre2965 { 0 } else { 1 };

            // Read the attributes of the current cookie. Each iteration of
            // this loop enters with the input either exhausted or prefixed
            // with ';' or ',' as in ";path=/" and ",COOKIE2=value2".
            loop {
                self.skip_whitespace();
                if self.pos == self.input.len() {
                    break;
                }
                let current = self.input.as_bytes()[self.pos];
                if current == b',' {
                    self.pos += 1;
                    break; // a true comma delimiter; the current cookie is complete
                } else if current == b';' {
                    self.pos += 1;
                }
                let Some(attribute_name) = self.read_attribute_name(true) else {
                    continue; // empty attribute as in "Set-Cookie: foo=Foo;;path=/"
                };
                // Expires and port attribute values commonly include comma
                // delimiters, so those always scan until a semicolon.
                let terminators = if pre2965
                    || attribute_name == "expires"
                    || attribute_name == "port"
                {
                    ";"
                } else {
                    ";,"
                };
                let attribute_value = if self.read_equals_sign() {
                    Some(self.read_attribute_value(terminators)?)
                } else {
                    None
                };
                self.set_attribute(&mut cookie, &attribute_name, attribute_value.as_deref())?;
            }
            if self.has_expires {
                cookie.version = 0;
            } else if self.has_max_age {
                cookie.version = 1;
            }
            cookies.push(cookie);
        }
    }

    fn set_attribute(
        &mut self,
        cookie: &mut SetCookie,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), CookieError> {
        match name {
            "comment" if cookie.comment.is_none() => {
                cookie.comment = value.map(str::to_string);
            }
            "commenturl" if cookie.comment_url.is_none() => {
                cookie.comment_url = value.map(str::to_string);
            }
            "discard" => cookie.discard = true,
            "domain" if cookie.domain.is_none() => {
                cookie.domain = value.map(str::to_string);
            }
            "expires" => {
                self.has_expires = true;
                if cookie.max_age == -1 {
                    match value.and_then(parse_http_date) {
                        Some(date) => cookie.set_expires(date),
                        None => cookie.max_age = 0,
                    }
                }
            }
            "max-age" if cookie.max_age == -1 => {
                self.has_max_age = true;
                cookie.max_age = value
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| CookieError::InvalidAttribute {
                        attribute: "max-age",
                        value: value.unwrap_or("").to_string(),
                    })?;
            }
            "path" if cookie.path.is_none() => {
                cookie.path = value.map(str::to_string);
            }
            "port" if cookie.portlist.is_none() => {
                cookie.portlist = Some(value.unwrap_or("").to_string());
            }
            "secure" => cookie.secure = true,
            "version" if !self.has_version => {
                let version = value
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| CookieError::InvalidAttribute {
                        attribute: "version",
                        value: value.unwrap_or("").to_string(),
                    })?;
                cookie.set_version(version)?;
            }
            _ => {} // unrecognized attributes are silently discarded
        }
        Ok(())
    }

    fn has_prefix(&self, prefix: &str) -> bool {
        self.input
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }

    /// Returns the next attribute name, or `None` if the input has been
    /// exhausted. Returns with the cursor on the delimiter that follows.
    fn read_attribute_name(&mut self, lower_case: bool) -> Option<String> {
        self.skip_whitespace();
        let end = self.find(ATTRIBUTE_NAME_TERMINATORS);
        let result = if self.pos < end {
            let name = &self.input[self.pos..end];
            Some(if lower_case { name.to_lowercase() } else { name.to_string() })
        } else {
            None
        };
        self.pos = end;
        result
    }

    /// Returns true if an equals sign was read and consumed.
    fn read_equals_sign(&mut self) -> bool {
        self.skip_whitespace();
        if self.pos < self.input.len() && self.input.as_bytes()[self.pos] == b'=' {
            self.pos += 1;
            return true;
        }
        false
    }

    /// Reads an attribute value, by parsing either a quoted string or until
    /// the next character in `terminators`. The terminator character is not
    /// consumed.
    fn read_attribute_value(&mut self, terminators: &str) -> Result<String, CookieError> {
        self.skip_whitespace();
        // Quoted string: read 'til the close quote. The specs mention only
        // double quotes but single quotes are seen in the wild too.
        if self.pos < self.input.len() {
            let quote = self.input.as_bytes()[self.pos];
            if quote == b'"' || quote == b'\'' {
                self.pos += 1;
                let close_quote = self.input[self.pos..]
                    .find(quote as char)
                    .map(|offset| self.pos + offset)
                    .ok_or_else(|| CookieError::UnterminatedQuote(self.input.clone()))?;
                let result = self.input[self.pos..close_quote].to_string();
                self.pos = close_quote + 1;
                return Ok(result);
            }
        }
        let end = self.find(terminators);
        let result = self.input[self.pos..end].to_string();
        self.pos = end;
        Ok(result)
    }

    /// Returns the index of the next character in `chars`, or the end of
    /// the input.
    fn find(&self, chars: &str) -> usize {
        self.input[self.pos..]
            .find(|c| chars.contains(c))
            .map(|offset| self.pos + offset)
            .unwrap_or(self.input.len())
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() {
            if !WHITESPACE.contains(self.input.as_bytes()[self.pos] as char) {
                break;
            }
            self.pos += 1;
        }
    }
}

/// Parses an expires timestamp, trying RFC 3339 first and the RFC 2822
/// profile of HTTP dates second. The "GMT" zone abbreviation common in
/// Set-Cookie headers is normalized to a numeric offset beforehand.
fn parse_http_date(value: &str) -> Option<OffsetDateTime> {
    if let Ok(date) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(date);
    }
    let normalized = value.replace("GMT", "+0000");
    OffsetDateTime::parse(&normalized, &Rfc2822).ok()
}
