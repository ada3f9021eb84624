//! Session JWT validation.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_TESTING", test))]
use serde::Serialize;
use uuid::Uuid;

/// Identity extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Errors returned by [`validate_session_token`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims issued by the hosted auth provider after email-OTP login.
///
/// # Fields
///
/// | Field | JWT claim | Rust type | Meaning |
/// |-------|-----------|-----------|---------|
/// | `sub` | `sub` | UUID string | profile ID |
/// | `exp` | `exp` | seconds since epoch | token expiration |
/// | `email` | custom | optional string | login address |
///
/// # Feature gate
///
/// [`Deserialize`] is always available. [`Serialize`] requires the
/// **`USE_ONLY_IN_TESTING`** cargo feature: services never mint sessions, the
/// auth provider does. Test helpers enable it to forge tokens.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_TESTING", test), derive(Serialize))]
pub struct SessionClaims {
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Validate a bearer session token, returning the caller identity.
///
/// Validation: HS256, `exp` and `sub` required, default 60s leeway. The
/// provider stamps an `aud` claim that differs per project, so it is not checked.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionInfo, SessionError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_) => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    })?;

    let claims = data.claims;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| SessionError::Malformed)?;
    Ok(SessionInfo {
        user_id,
        email: claims.email,
    })
}
