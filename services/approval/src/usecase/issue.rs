use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use fanpage_domain::code::generate_code;

use crate::domain::repository::{ApprovalCodeRepository, ProfileRepository};
use crate::domain::types::{ApprovalCode, MAX_CODE_TTL_MINUTES};
use crate::error::ApprovalServiceError;
use crate::usecase::require_admin;

pub struct IssueCodeInput {
    pub subject_id: Uuid,
    /// Falls back to the configured default when `None`.
    pub ttl_minutes: Option<i64>,
}

/// Plaintext code, returned to the issuer exactly once.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub code: String,
    pub subject_id: Uuid,
    pub ttl_minutes: i64,
    pub expires_at: DateTime<Utc>,
}

pub struct IssueCodeUseCase<P, A>
where
    P: ProfileRepository,
    A: ApprovalCodeRepository,
{
    pub profiles: P,
    pub codes: A,
    pub default_ttl_minutes: i64,
}

impl<P, A> IssueCodeUseCase<P, A>
where
    P: ProfileRepository,
    A: ApprovalCodeRepository,
{
    pub async fn execute(
        &self,
        caller_id: Uuid,
        input: IssueCodeInput,
    ) -> Result<IssuedCode, ApprovalServiceError> {
        // 1. Caller must be an admin → 401 otherwise, before anything is written
        require_admin(&self.profiles, caller_id).await?;

        // 2. Reject nonsensical lifetimes → 400
        let ttl_minutes = input.ttl_minutes.unwrap_or(self.default_ttl_minutes);
        validate_ttl(ttl_minutes)?;

        // 3. Subject must exist → 404
        self.profiles
            .find_by_id(input.subject_id)
            .await?
            .ok_or(ApprovalServiceError::SubjectNotFound)?;

        // 4. Mint and persist
        mint_code(&self.codes, caller_id, input.subject_id, ttl_minutes).await
    }
}

pub(crate) fn validate_ttl(ttl_minutes: i64) -> Result<(), ApprovalServiceError> {
    if (1..=MAX_CODE_TTL_MINUTES).contains(&ttl_minutes) {
        Ok(())
    } else {
        Err(ApprovalServiceError::InvalidTtl)
    }
}

/// Generate a code for an already-validated subject and persist it.
///
/// Prior outstanding codes of the subject stay valid.
pub(crate) async fn mint_code<A: ApprovalCodeRepository>(
    codes: &A,
    issued_by: Uuid,
    subject_id: Uuid,
    ttl_minutes: i64,
) -> Result<IssuedCode, ApprovalServiceError> {
    let now = Utc::now();
    let record = ApprovalCode {
        id: Uuid::now_v7(),
        subject_id,
        code: generate_code(),
        issued_by,
        created_at: now,
        expires_at: now + Duration::minutes(ttl_minutes),
        used_at: None,
        sent_to_email: None,
        sent_at: None,
    };
    codes.create(&record).await?;

    info!(
        code_id = %record.id,
        %subject_id,
        %issued_by,
        ttl_minutes,
        "approval code issued"
    );
    Ok(IssuedCode {
        code: record.code,
        subject_id,
        ttl_minutes,
        expires_at: record.expires_at,
    })
}
