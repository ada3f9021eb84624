use chrono::{DateTime, Utc};
use uuid::Uuid;

use fanpage_domain::profile::ApprovalState;

/// Account profile fields relevant to approval decisions.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub banned: bool,
    pub ban_reason: Option<String>,
    pub admin: bool,
}

impl Profile {
    pub fn state(&self) -> ApprovalState {
        ApprovalState::from_flags(self.approved, self.banned)
    }

    /// Deliverable contact address, if any.
    pub fn contact_address(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

/// One-time code that approves its subject when redeemed.
#[derive(Debug, Clone)]
pub struct ApprovalCode {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub code: String,
    pub issued_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub sent_to_email: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl ApprovalCode {
    pub fn status_at(&self, now: DateTime<Utc>) -> CodeStatus {
        if self.used_at.is_some() {
            CodeStatus::Redeemed
        } else if self.expires_at <= now {
            CodeStatus::Expired
        } else {
            CodeStatus::Active
        }
    }
}

/// Audit view of a code. `Expired` is computed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeStatus {
    Active,
    Redeemed,
    Expired,
}

impl CodeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Redeemed => "redeemed",
            Self::Expired => "expired",
        }
    }
}

/// Result of the store's atomic check-and-consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// Code consumed and subject approved in the same transaction.
    Redeemed { subject_id: Uuid },
    /// No active code matched; nothing changed.
    Invalid,
    /// Subject is banned; nothing changed.
    Banned,
}

/// Message handed to the delivery channel.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Code lifetime when the issuer does not choose one (24 hours).
pub const DEFAULT_CODE_TTL_MINUTES: i64 = 1440;

/// Longest lifetime an issuer may choose (30 days).
pub const MAX_CODE_TTL_MINUTES: i64 = 43_200;
