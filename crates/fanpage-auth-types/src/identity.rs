//! Bearer session extractor.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use crate::token::validate_session_token;

/// HMAC secret the auth provider signs session tokens with.
///
/// Services expose it from their state via `FromRef` so [`Session`] can be
/// extracted without knowing the concrete state type.
#[derive(Clone)]
pub struct SessionSecret(pub Arc<str>);

impl SessionSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }
}

/// Authenticated caller, taken from `Authorization: Bearer <jwt>`.
///
/// Returns 401 if the header is absent or the token does not validate.
/// Role checks (admin) happen in usecases against the caller's profile.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    SessionSecret: FromRef<S>,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send`; validate
    // synchronously and hand back a 'static future.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = SessionSecret::from_ref(state);
        let result = match parts.headers.typed_get::<Authorization<Bearer>>() {
            Some(Authorization(bearer)) => validate_session_token(bearer.token(), &secret.0)
                .map(|info| Self {
                    user_id: info.user_id,
                    email: info.email,
                })
                .map_err(|e| {
                    tracing::debug!(error = %e, "rejected session token");
                    StatusCode::UNAUTHORIZED
                }),
            None => Err(StatusCode::UNAUTHORIZED),
        };

        async move { result }
    }
}
