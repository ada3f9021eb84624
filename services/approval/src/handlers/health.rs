use axum::{extract::State, http::StatusCode};

use fanpage_core::health::database_ready;

use crate::state::AppState;

/// `GET /readyz`: ready once the database answers.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    database_ready(&state.db).await
}
