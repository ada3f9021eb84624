pub mod audit;
pub mod issue;
pub mod profile;
pub mod redeem;
pub mod send;

use uuid::Uuid;

use crate::domain::repository::ProfileRepository;
use crate::domain::types::Profile;
use crate::error::ApprovalServiceError;

/// Load the caller's profile and require the admin flag.
///
/// A caller without a profile is treated like a non-admin.
pub(crate) async fn require_admin<P: ProfileRepository>(
    profiles: &P,
    caller_id: Uuid,
) -> Result<Profile, ApprovalServiceError> {
    match profiles.find_by_id(caller_id).await? {
        Some(profile) if profile.admin => Ok(profile),
        _ => {
            tracing::warn!(%caller_id, "admin operation refused");
            Err(ApprovalServiceError::Unauthorized)
        }
    }
}
