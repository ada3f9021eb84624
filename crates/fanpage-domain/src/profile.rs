//! Profile approval state.

use serde::{Deserialize, Serialize};

/// Feature-gating state of a profile as seen by the rest of the app.
///
/// A ban overrides approval: a banned profile is `Banned` whether or not it was
/// approved before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    Pending,
    Approved,
    Banned,
}

impl ApprovalState {
    pub fn from_flags(approved: bool, banned: bool) -> Self {
        match (approved, banned) {
            (_, true) => Self::Banned,
            (true, false) => Self::Approved,
            (false, false) => Self::Pending,
        }
    }
}
