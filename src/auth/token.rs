//! Session token extraction.

use std::borrow::Cow;
use std::fmt;

use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Header carrying the session token, both inbound and towards the backend.
pub const SESSION_TOKEN_HEADER: HeaderName = HeaderName::from_static("session_token");

/// Opaque credential presented by a client.
///
/// Kept as the raw header value, so tokens with obs-text bytes reach the
/// backend untouched. `Debug` redacts it so tokens stay out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(HeaderValue);

impl SessionToken {
    /// Read the token from `headers`.
    ///
    /// Header lookup is case-insensitive. Returns `None` only when the header
    /// is absent or holds nothing but whitespace.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(&SESSION_TOKEN_HEADER)?;
        if value.as_bytes().iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        Some(Self(value.clone()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The token as text, with non-UTF-8 bytes replaced.
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.0.as_bytes())
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: &str, value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
        map
    }

    #[test]
    fn test_extracts_token() {
        let token = SessionToken::from_headers(&headers("session_token", "good-token")).unwrap();
        assert_eq!(token.as_bytes(), b"good-token");
    }

    #[test]
    fn test_header_name_is_case_insensitive() {
        let token = SessionToken::from_headers(&headers("Session_Token", "abc")).unwrap();
        assert_eq!(token.to_str_lossy(), "abc");
    }

    #[test]
    fn test_absent_header() {
        assert!(SessionToken::from_headers(&HeaderMap::new()).is_none());
        assert!(SessionToken::from_headers(&headers("x-session-token", "abc")).is_none());
    }

    #[test]
    fn test_empty_and_blank_values() {
        assert!(SessionToken::from_headers(&headers("session_token", "")).is_none());
        assert!(SessionToken::from_headers(&headers("session_token", "   ")).is_none());
    }

    #[test]
    fn test_non_ascii_value_is_kept_verbatim() {
        let mut map = HeaderMap::new();
        map.insert(
            SESSION_TOKEN_HEADER,
            HeaderValue::from_bytes(b"caf\xc3\xa9").unwrap(),
        );
        let token = SessionToken::from_headers(&map).unwrap();
        assert_eq!(token.as_bytes(), b"caf\xc3\xa9");
        assert_eq!(token.to_str_lossy(), "caf\u{e9}");
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = SessionToken::from_headers(&headers("session_token", "secret-value")).unwrap();
        assert_eq!(format!("{token:?}"), "SessionToken(***)");
    }
}
