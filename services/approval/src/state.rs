use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use fanpage_auth_types::identity::SessionSecret;

use crate::infra::db::{DbApprovalCodeRepository, DbProfileRepository};
use crate::infra::mail::HttpMailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub session_secret: SessionSecret,
    pub mailer: HttpMailer,
    pub code_ttl_minutes: i64,
    pub site_name: String,
}

impl AppState {
    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn approval_code_repo(&self) -> DbApprovalCodeRepository {
        DbApprovalCodeRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for SessionSecret {
    fn from_ref(state: &AppState) -> Self {
        state.session_secret.clone()
    }
}
