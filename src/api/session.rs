//! Authenticated session state.
//!
//! A [`Session`] is the result of `com.atproto.server.createSession` (or a
//! refresh): the access/refresh JWT pair plus the account's DID and handle.
//! The access token's `exp` claim is decoded locally so callers can refresh
//! before the service starts rejecting requests. Sessions are held in
//! memory only; nothing is persisted.

use crate::error::{Result, SkygraphError};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// An authenticated session with the PDS.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer token for authenticated XRPC calls.
    pub access_jwt: String,
    /// Token accepted by `com.atproto.server.refreshSession`.
    pub refresh_jwt: String,
    /// The account's DID.
    pub did: String,
    /// The account's handle.
    pub handle: String,
}

/// Claims of interest in the access token payload.
#[derive(Debug, Deserialize)]
struct JwtClaims {
    exp: Option<u64>,
}

impl Session {
    /// Returns the access token's expiry as seconds since the Unix epoch.
    ///
    /// The JWT payload is decoded without signature verification; the
    /// service remains the authority on validity, this is only used to
    /// schedule refreshes.
    pub fn expires_at(&self) -> Result<u64> {
        let payload = self
            .access_jwt
            .split('.')
            .nth(1)
            .ok_or_else(|| SkygraphError::session("access token is not a JWT"))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| SkygraphError::session(format!("invalid JWT payload: {}", e)))?;
        let claims: JwtClaims = serde_json::from_slice(&bytes)
            .map_err(|e| SkygraphError::session(format!("invalid JWT claims: {}", e)))?;
        claims
            .exp
            .ok_or_else(|| SkygraphError::session("access token has no exp claim"))
    }

    /// Returns true if the access token has expired (or its expiry cannot
    /// be read, which forces a refresh).
    pub fn is_expired(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        match self.expires_at() {
            Ok(exp) => exp <= now,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an unsigned JWT with the given payload JSON.
    fn jwt_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap());
        format!("{}.{}.sig", header, body)
    }

    fn session_with_jwt(access_jwt: String) -> Session {
        Session {
            access_jwt,
            refresh_jwt: "refresh".into(),
            did: "did:plc:test".into(),
            handle: "test.bsky.social".into(),
        }
    }

    #[test]
    fn test_expires_at_decodes_exp_claim() {
        let jwt = jwt_with_payload(&serde_json::json!({ "exp": 1700000000u64, "sub": "did" }));
        let session = session_with_jwt(jwt);
        assert_eq!(session.expires_at().unwrap(), 1700000000);
    }

    #[test]
    fn test_expired_token() {
        let jwt = jwt_with_payload(&serde_json::json!({ "exp": 1000u64 }));
        assert!(session_with_jwt(jwt).is_expired());
    }

    #[test]
    fn test_future_token_not_expired() {
        let far_future = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 3600;
        let jwt = jwt_with_payload(&serde_json::json!({ "exp": far_future }));
        assert!(!session_with_jwt(jwt).is_expired());
    }

    #[test]
    fn test_malformed_token_treated_as_expired() {
        let session = session_with_jwt("not-a-jwt".into());
        assert!(session.expires_at().is_err());
        assert!(session.is_expired());
    }

    #[test]
    fn test_missing_exp_claim() {
        let jwt = jwt_with_payload(&serde_json::json!({ "sub": "did:plc:test" }));
        let session = session_with_jwt(jwt);
        assert!(session.expires_at().is_err());
    }

    #[test]
    fn test_session_deserializes_camel_case() {
        let session: Session = serde_json::from_value(serde_json::json!({
            "accessJwt": "a",
            "refreshJwt": "r",
            "did": "did:plc:x",
            "handle": "x.test"
        }))
        .unwrap();
        assert_eq!(session.handle, "x.test");
    }
}
