#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{ApprovalCode, OutboundEmail, Profile, RedeemOutcome};
use crate::error::ApprovalServiceError;

/// Repository for account profiles.
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, ApprovalServiceError>;

    /// Set or clear a ban. Returns `false` if the profile does not exist.
    async fn set_ban(
        &self,
        id: Uuid,
        banned: bool,
        reason: Option<&str>,
    ) -> Result<bool, ApprovalServiceError>;
}

/// Append-only store of approval codes.
pub trait ApprovalCodeRepository: Send + Sync {
    async fn create(&self, code: &ApprovalCode) -> Result<(), ApprovalServiceError>;

    /// All codes ever issued for a subject, newest first.
    async fn list_by_subject(
        &self,
        subject_id: Uuid,
    ) -> Result<Vec<ApprovalCode>, ApprovalServiceError>;

    /// Stamp the newest unredeemed code of a subject as delivered.
    /// Returns `false` if there was none.
    async fn mark_sent(
        &self,
        subject_id: Uuid,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, ApprovalServiceError>;

    /// Atomically validate and consume `code` for `caller_id`.
    ///
    /// Implementations must perform the lookup, ban check, code consumption and
    /// profile approval as one unit: either all of it is visible or none of it.
    /// Of any number of concurrent calls for the same code at most one returns
    /// `Redeemed`.
    async fn redeem(
        &self,
        code: &str,
        caller_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<RedeemOutcome, ApprovalServiceError>;
}

/// Out-of-band delivery channel for approval codes.
pub trait Mailer: Send + Sync {
    /// Returns once the channel accepted the message.
    async fn send(&self, email: &OutboundEmail) -> Result<(), ApprovalServiceError>;
}
