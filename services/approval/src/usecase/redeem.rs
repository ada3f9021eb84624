use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use fanpage_domain::code::normalize_code;

use crate::domain::repository::ApprovalCodeRepository;
use crate::domain::types::RedeemOutcome;
use crate::error::ApprovalServiceError;

pub struct RedeemCodeUseCase<A: ApprovalCodeRepository> {
    pub codes: A,
}

impl<A: ApprovalCodeRepository> RedeemCodeUseCase<A> {
    /// Consume `raw_code` on behalf of `caller_id` and approve the caller.
    ///
    /// The code must have been issued for the caller. Input is matched after
    /// trimming and case folding; anything that cannot be an issued code fails
    /// without touching the store.
    pub async fn execute(&self, caller_id: Uuid, raw_code: &str) -> Result<(), ApprovalServiceError> {
        let code = normalize_code(raw_code).ok_or(ApprovalServiceError::InvalidCode)?;

        match self.codes.redeem(&code, caller_id, Utc::now()).await? {
            RedeemOutcome::Redeemed { subject_id } => {
                info!(%subject_id, "approval code redeemed");
                Ok(())
            }
            RedeemOutcome::Invalid => Err(ApprovalServiceError::InvalidCode),
            RedeemOutcome::Banned => {
                info!(%caller_id, "redemption refused for banned profile");
                Err(ApprovalServiceError::Banned)
            }
        }
    }
}
