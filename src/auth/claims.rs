//! Unverified decoding of a compact token's claims payload.
//!
//! The signature is NOT checked and cannot be: the client has no key. Use
//! the result only for display (user name, identity for profile calls) on a
//! token this client obtained from its own login call, never to decide
//! whether a caller is trusted.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

/// Decode the payload (second segment) of a dot-separated token as JSON.
///
/// Returns `None` when the token has fewer than two segments, the payload
/// segment is empty, the base64url text is invalid, or the decoded bytes are
/// not JSON.
pub fn token_payload(token: &str) -> Option<Value> {
    let mut parts = token.split('.');
    let _header = parts.next()?;
    let payload = parts.next()?;
    if payload.is_empty() {
        return None;
    }

    // base64url: map back to the standard alphabet, then pad to a multiple of 4
    let standard = payload.replace('-', "+").replace('_', "/");
    let padding = (4 - standard.len() % 4) % 4;
    let padded = format!("{}{}", standard, "=".repeat(padding));

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(padded)
        .ok()?;
    serde_json::from_slice(&decoded).ok()
}

/// Claims the backend puts in its tokens.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "Id", default)]
    pub id: Option<i64>,
    #[serde(rename = "Identity", default)]
    pub identity: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    /// Expiry as Unix seconds.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Typed claims of `token`, unverified. `None` if the payload is unreadable.
    pub fn from_token(token: &str) -> Option<Self> {
        serde_json::from_value(token_payload(token)?).ok()
    }

    /// A token without `exp` never expires.
    pub fn is_expired_at(&self, unix_secs: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= unix_secs)
    }

    pub fn is_expired(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        self.is_expired_at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn b64url(bytes: &[u8]) -> String {
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    }

    fn make_token(payload: &str) -> String {
        format!(
            "{}.{}.fake-signature",
            b64url(b"{\"alg\":\"HS256\",\"typ\":\"JWT\"}"),
            b64url(payload.as_bytes())
        )
    }

    #[test]
    fn test_token_payload_extracts_claims() {
        let token = make_token(r#"{"name":"a"}"#);
        assert_eq!(token_payload(&token), Some(json!({"name": "a"})));
    }

    #[test]
    fn test_token_payload_two_segments_is_enough() {
        let token = format!("header.{}", b64url(br#"{"n":1}"#));
        assert_eq!(token_payload(&token), Some(json!({"n": 1})));
    }

    #[test]
    fn test_token_payload_url_safe_alphabet() {
        // `?>` and `~~` encode to `_` and `-` characters in base64url
        let token = make_token(r#"{"s":"?>~~"}"#);
        assert!(token.contains('_') || token.contains('-'));
        assert_eq!(token_payload(&token), Some(json!({"s": "?>~~"})));
    }

    #[test]
    fn test_token_payload_no_dot() {
        assert_eq!(token_payload("abc"), None);
    }

    #[test]
    fn test_token_payload_empty_segment() {
        assert_eq!(token_payload("abc..sig"), None);
        assert_eq!(token_payload("abc."), None);
    }

    #[test]
    fn test_token_payload_invalid_base64() {
        assert_eq!(token_payload("h.!!!!.s"), None);
        // length 1 mod 4 can never be valid
        assert_eq!(token_payload("h.abcde.s"), None);
    }

    #[test]
    fn test_token_payload_not_json() {
        let token = format!("h.{}.s", b64url(b"not json"));
        assert_eq!(token_payload(&token), None);
    }

    #[test]
    fn test_claims_from_backend_token() {
        let token = make_token(r#"{"exp":1700000000,"Id":7,"Identity":"u-7","Name":"alice"}"#);
        let claims = TokenClaims::from_token(&token).unwrap();
        assert_eq!(claims.id, Some(7));
        assert_eq!(claims.identity.as_deref(), Some("u-7"));
        assert_eq!(claims.name.as_deref(), Some("alice"));
        assert!(claims.is_expired_at(1_700_000_000));
        assert!(!claims.is_expired_at(1_699_999_999));
        assert!(claims.is_expired());
    }

    #[test]
    fn test_claims_without_exp_never_expire() {
        let token = make_token(r#"{"Name":"bob"}"#);
        let claims = TokenClaims::from_token(&token).unwrap();
        assert!(claims.exp.is_none());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_wrong_shape() {
        let token = make_token(r#"{"Id":"seven"}"#);
        assert!(TokenClaims::from_token(&token).is_none());
        let token = make_token("[1,2,3]");
        assert!(TokenClaims::from_token(&token).is_none());
    }
}
