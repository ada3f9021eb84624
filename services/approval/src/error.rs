use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Approval service error variants.
///
/// `InvalidCode` deliberately covers unknown, expired, used and foreign codes
/// alike so callers cannot probe which codes exist.
#[derive(Debug, thiserror::Error)]
pub enum ApprovalServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("subject not found")]
    SubjectNotFound,
    #[error("address not found")]
    AddressNotFound,
    #[error("invalid code")]
    InvalidCode,
    #[error("invalid ttl")]
    InvalidTtl,
    #[error("account banned")]
    Banned,
    #[error("delivery failed")]
    Delivery { status: Option<u16>, body: String },
    #[error("internal error")]
    Store(#[from] anyhow::Error),
    /// Body, query or path that could not be extracted. `detail` is axum's own
    /// rejection text and safe to return.
    #[error("{detail}")]
    InvalidRequest { status: StatusCode, detail: String },
}

impl From<JsonRejection> for ApprovalServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApprovalServiceError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApprovalServiceError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl ApprovalServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::SubjectNotFound => "SUBJECT_NOT_FOUND",
            Self::AddressNotFound => "ADDRESS_NOT_FOUND",
            Self::InvalidCode => "INVALID_CODE",
            Self::InvalidTtl => "INVALID_TTL",
            Self::Banned => "BANNED",
            Self::Delivery { .. } => "DELIVERY_ERROR",
            Self::Store(_) => "STORE_ERROR",
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
        }
    }
}

impl IntoResponse for ApprovalServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::SubjectNotFound | Self::AddressNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCode | Self::InvalidTtl => StatusCode::BAD_REQUEST,
            Self::Banned => StatusCode::FORBIDDEN,
            Self::Delivery { .. } => StatusCode::BAD_GATEWAY,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequest { status, .. } => *status,
        };
        // tower-http TraceLayer already records method/uri/status for every request.
        // Only the operator-facing diagnostics that never reach the body are logged here.
        match &self {
            Self::Store(e) => {
                tracing::error!(error = %format!("{e:#}"), kind = self.kind(), "store error");
            }
            Self::Delivery { status, body } => {
                tracing::error!(?status, body = %body, kind = self.kind(), "delivery rejected");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
