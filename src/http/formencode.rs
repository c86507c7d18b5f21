//! `application/x-www-form-urlencoded` encoding.

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Encodes `s` in x-www-form-urlencoded format. Letters, digits, and the
/// characters `-`, `_`, `.`, and `*` pass through unchanged, the space
/// character becomes `+`, and everything else is emitted as the `%XY`
/// hex encoding of its UTF-8 bytes.
pub fn form_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        if is_safe(c) {
            result.push(c);
        } else if c == ' ' {
            result.push('+');
        } else {
            let mut buffer = [0u8; 4];
            for &byte in c.encode_utf8(&mut buffer).as_bytes() {
                result.push('%');
                result.push(HEX[usize::from(byte >> 4)] as char);
                result.push(HEX[usize::from(byte & 0x0f)] as char);
            }
        }
    }
    result
}

/// Encodes key-value pairs as a query or form body, joining the encoded
/// `key=value` fragments with `&`.
pub fn form_encode_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut result = String::new();
    for (key, value) in pairs {
        if !result.is_empty() {
            result.push('&');
        }
        result.push_str(&form_encode(key));
        result.push('=');
        result.push_str(&form_encode(value));
    }
    result
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '*'
}
