use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fanpage_auth_types::identity::Session;
use fanpage_domain::profile::ApprovalState;

use crate::error::ApprovalServiceError;
use crate::handlers::{AppJson, AppPath};
use crate::state::AppState;
use crate::usecase::profile::{GetStatusUseCase, SetBanInput, SetBanUseCase};

// ── GET /approval/status ─────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub state: ApprovalState,
    pub approved: bool,
    #[serde(serialize_with = "fanpage_core::serde::opt_to_rfc3339_ms")]
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub banned: bool,
    pub ban_reason: Option<String>,
}

pub async fn get_status(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, ApprovalServiceError> {
    let usecase = GetStatusUseCase {
        profiles: state.profile_repo(),
    };
    let profile = usecase.execute(session.user_id).await?;
    Ok(Json(StatusResponse {
        state: profile.state(),
        approved: profile.approved,
        approved_at: profile.approved_at,
        banned: profile.banned,
        ban_reason: profile.ban_reason,
    }))
}

// ── PUT /profiles/{id}/ban ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetBanRequest {
    pub banned: bool,
    pub reason: Option<String>,
}

pub async fn set_ban(
    session: Session,
    State(state): State<AppState>,
    AppPath(subject_id): AppPath<Uuid>,
    AppJson(body): AppJson<SetBanRequest>,
) -> Result<StatusCode, ApprovalServiceError> {
    let usecase = SetBanUseCase {
        profiles: state.profile_repo(),
    };
    usecase
        .execute(
            session.user_id,
            SetBanInput {
                subject_id,
                banned: body.banned,
                reason: body.reason,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
