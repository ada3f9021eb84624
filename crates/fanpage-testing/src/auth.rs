//! Mock session helpers for integration tests.
//!
//! Real sessions are minted by the hosted auth provider. In tests, `MockSession`
//! signs an equivalent token with a known secret so requests pass the
//! `Session` extractor without a provider round-trip.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use fanpage_auth_types::token::SessionClaims;

/// Secret shared by test routers and `MockSession`.
pub const TEST_SESSION_SECRET: &str = "test-session-secret-for-unit-tests-only";

/// Configurable caller identity for test requests.
pub struct MockSession {
    pub user_id: Uuid,
    pub email: Option<String>,
    /// Seconds until expiry; negative values produce an already-expired token.
    pub ttl_secs: i64,
}

impl MockSession {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            email: None,
            ttl_secs: 3600,
        }
    }

    pub fn expired(user_id: Uuid) -> Self {
        Self {
            ttl_secs: -3600,
            ..Self::new(user_id)
        }
    }

    /// Signed session JWT.
    pub fn token(&self, secret: &str) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let claims = SessionClaims {
            sub: self.user_id.to_string(),
            exp: (now + self.ttl_secs).max(0) as u64,
            email: self.email.clone(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    /// `Authorization: Bearer ...` value.
    pub fn bearer(&self, secret: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token(secret))).unwrap()
    }

    /// Headers as the browser client would send them.
    pub fn headers(&self, secret: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, self.bearer(secret));
        map
    }
}
