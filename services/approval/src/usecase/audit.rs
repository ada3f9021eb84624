use chrono::{DateTime, Utc};
use uuid::Uuid;

use fanpage_domain::code::code_hint;

use crate::domain::repository::{ApprovalCodeRepository, ProfileRepository};
use crate::domain::types::CodeStatus;
use crate::error::ApprovalServiceError;
use crate::usecase::require_admin;

/// One row of a subject's code history. The plaintext code is never included.
#[derive(Debug, Clone)]
pub struct CodeAuditEntry {
    pub id: Uuid,
    pub code_hint: String,
    pub status: CodeStatus,
    pub issued_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub sent_to_email: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
}

pub struct ListCodesUseCase<P, A>
where
    P: ProfileRepository,
    A: ApprovalCodeRepository,
{
    pub profiles: P,
    pub codes: A,
}

impl<P, A> ListCodesUseCase<P, A>
where
    P: ProfileRepository,
    A: ApprovalCodeRepository,
{
    pub async fn execute(
        &self,
        caller_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Vec<CodeAuditEntry>, ApprovalServiceError> {
        require_admin(&self.profiles, caller_id).await?;
        self.profiles
            .find_by_id(subject_id)
            .await?
            .ok_or(ApprovalServiceError::SubjectNotFound)?;

        let now = Utc::now();
        let entries = self
            .codes
            .list_by_subject(subject_id)
            .await?
            .into_iter()
            .map(|c| CodeAuditEntry {
                id: c.id,
                code_hint: code_hint(&c.code),
                status: c.status_at(now),
                issued_by: c.issued_by,
                created_at: c.created_at,
                expires_at: c.expires_at,
                used_at: c.used_at,
                sent_to_email: c.sent_to_email,
                sent_at: c.sent_at,
            })
            .collect();
        Ok(entries)
    }
}
