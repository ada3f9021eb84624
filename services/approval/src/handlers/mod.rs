pub mod approval;
pub mod health;
pub mod profile;

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApprovalServiceError;

/// `Json` whose rejection renders as an [`ApprovalServiceError`] body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApprovalServiceError))]
pub struct AppJson<T>(pub T);

/// `Query` whose rejection renders as an [`ApprovalServiceError`] body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApprovalServiceError))]
pub struct AppQuery<T>(pub T);

/// `Path` whose rejection renders as an [`ApprovalServiceError`] body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApprovalServiceError))]
pub struct AppPath<T>(pub T);
