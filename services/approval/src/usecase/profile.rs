use tracing::info;
use uuid::Uuid;

use crate::domain::repository::ProfileRepository;
use crate::domain::types::Profile;
use crate::error::ApprovalServiceError;
use crate::usecase::require_admin;

// ── GetStatus ────────────────────────────────────────────────────────────────

pub struct GetStatusUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> GetStatusUseCase<P> {
    pub async fn execute(&self, caller_id: Uuid) -> Result<Profile, ApprovalServiceError> {
        self.profiles
            .find_by_id(caller_id)
            .await?
            .ok_or(ApprovalServiceError::SubjectNotFound)
    }
}

// ── SetBan ───────────────────────────────────────────────────────────────────

pub struct SetBanInput {
    pub subject_id: Uuid,
    pub banned: bool,
    /// Ignored when lifting a ban.
    pub reason: Option<String>,
}

pub struct SetBanUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> SetBanUseCase<P> {
    pub async fn execute(&self, caller_id: Uuid, input: SetBanInput) -> Result<(), ApprovalServiceError> {
        require_admin(&self.profiles, caller_id).await?;

        let reason = if input.banned {
            input
                .reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
        } else {
            None
        };
        let found = self
            .profiles
            .set_ban(input.subject_id, input.banned, reason)
            .await?;
        if !found {
            return Err(ApprovalServiceError::SubjectNotFound);
        }

        info!(
            subject_id = %input.subject_id,
            %caller_id,
            banned = input.banned,
            "profile ban updated"
        );
        Ok(())
    }
}
