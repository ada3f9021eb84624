use axum::{
    Router,
    routing::{get, post, put},
};

use fanpage_core::health::healthz;
use fanpage_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    approval::{issue_code, list_codes, redeem_code, send_code},
    health::readyz,
    profile::{get_status, set_ban},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Approval codes
        .route("/approval/issue", post(issue_code))
        .route("/approval/send", post(send_code))
        .route("/approval/redeem", post(redeem_code))
        .route("/approval/codes", get(list_codes))
        .route("/approval/status", get(get_status))
        // Moderation
        .route("/profiles/{id}/ban", put(set_ban))
        .with_state(state)
        .layer(trace_layer())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
}
