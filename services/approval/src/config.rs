use serde::Deserialize;

use fanpage_core::config::Config;

use crate::domain::types::DEFAULT_CODE_TTL_MINUTES;

/// Approval service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct ApprovalConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret the auth provider signs session JWTs with. Env var: `SESSION_JWT_SECRET`.
    pub session_jwt_secret: String,
    /// TCP port to listen on (default 3120). Env var: `APPROVAL_PORT`.
    #[serde(default = "default_port")]
    pub approval_port: u16,
    /// Lifetime of a code when the issuer does not pick one (default 1440). Env var: `CODE_TTL_MINUTES`.
    #[serde(default = "default_code_ttl")]
    pub code_ttl_minutes: i64,
    /// Email API endpoint. Env var: `MAIL_API_URL`.
    #[serde(default = "default_mail_api_url")]
    pub mail_api_url: String,
    /// Email API bearer key. Env var: `MAIL_API_KEY`.
    pub mail_api_key: String,
    /// Sender address, e.g. `Fan Page <noreply@example.com>`. Env var: `MAIL_FROM`.
    pub mail_from: String,
    /// Display name used in outbound messages. Env var: `SITE_NAME`.
    #[serde(default = "default_site_name")]
    pub site_name: String,
}

impl Config for ApprovalConfig {}

fn default_port() -> u16 {
    3120
}

fn default_code_ttl() -> i64 {
    DEFAULT_CODE_TTL_MINUTES
}

fn default_mail_api_url() -> String {
    "https://api.resend.com/emails".to_owned()
}

fn default_site_name() -> String {
    "Fan Page".to_owned()
}
