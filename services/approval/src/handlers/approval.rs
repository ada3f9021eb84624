use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fanpage_auth_types::identity::Session;

use crate::error::ApprovalServiceError;
use crate::handlers::{AppJson, AppQuery};
use crate::state::AppState;
use crate::usecase::audit::{CodeAuditEntry, ListCodesUseCase};
use crate::usecase::issue::{IssueCodeInput, IssueCodeUseCase};
use crate::usecase::redeem::RedeemCodeUseCase;
use crate::usecase::send::SendCodeUseCase;

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    fn ok() -> Json<Self> {
        Json(Self { ok: true })
    }
}

// ── POST /approval/issue ─────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub subject_id: Uuid,
    pub ttl_minutes: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    pub code: String,
    #[serde(serialize_with = "fanpage_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

pub async fn issue_code(
    session: Session,
    State(state): State<AppState>,
    AppJson(body): AppJson<IssueRequest>,
) -> Result<(StatusCode, Json<IssueResponse>), ApprovalServiceError> {
    let usecase = IssueCodeUseCase {
        profiles: state.profile_repo(),
        codes: state.approval_code_repo(),
        default_ttl_minutes: state.code_ttl_minutes,
    };
    let issued = usecase
        .execute(
            session.user_id,
            IssueCodeInput {
                subject_id: body.subject_id,
                ttl_minutes: body.ttl_minutes,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(IssueResponse {
            code: issued.code,
            expires_at: issued.expires_at,
        }),
    ))
}

// ── POST /approval/send ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub subject_id: Uuid,
}

pub async fn send_code(
    session: Session,
    State(state): State<AppState>,
    AppJson(body): AppJson<SendRequest>,
) -> Result<Json<OkResponse>, ApprovalServiceError> {
    let usecase = SendCodeUseCase {
        profiles: state.profile_repo(),
        codes: state.approval_code_repo(),
        mailer: state.mailer.clone(),
        ttl_minutes: state.code_ttl_minutes,
        site_name: state.site_name.clone(),
    };
    usecase.execute(session.user_id, body.subject_id).await?;
    Ok(OkResponse::ok())
}

// ── POST /approval/redeem ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RedeemRequest {
    pub code: String,
}

pub async fn redeem_code(
    session: Session,
    State(state): State<AppState>,
    AppJson(body): AppJson<RedeemRequest>,
) -> Result<Json<OkResponse>, ApprovalServiceError> {
    let usecase = RedeemCodeUseCase {
        codes: state.approval_code_repo(),
    };
    usecase.execute(session.user_id, &body.code).await?;
    Ok(OkResponse::ok())
}

// ── GET /approval/codes ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCodesQuery {
    pub subject_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAuditResponse {
    pub id: Uuid,
    pub code_hint: String,
    pub status: &'static str,
    pub issued_by: Uuid,
    #[serde(serialize_with = "fanpage_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "fanpage_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "fanpage_core::serde::opt_to_rfc3339_ms")]
    pub used_at: Option<chrono::DateTime<chrono::Utc>>,
    pub sent_to_email: Option<String>,
    #[serde(serialize_with = "fanpage_core::serde::opt_to_rfc3339_ms")]
    pub sent_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<CodeAuditEntry> for CodeAuditResponse {
    fn from(entry: CodeAuditEntry) -> Self {
        Self {
            id: entry.id,
            code_hint: entry.code_hint,
            status: entry.status.as_str(),
            issued_by: entry.issued_by,
            created_at: entry.created_at,
            expires_at: entry.expires_at,
            used_at: entry.used_at,
            sent_to_email: entry.sent_to_email,
            sent_at: entry.sent_at,
        }
    }
}

pub async fn list_codes(
    session: Session,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListCodesQuery>,
) -> Result<Json<Vec<CodeAuditResponse>>, ApprovalServiceError> {
    let usecase = ListCodesUseCase {
        profiles: state.profile_repo(),
        codes: state.approval_code_repo(),
    };
    let entries = usecase.execute(session.user_id, query.subject_id).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}
