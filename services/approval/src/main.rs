use sea_orm::Database;
use tracing::info;

use fanpage_auth_types::identity::SessionSecret;
use fanpage_core::config::Config;
use fanpage_core::tracing::init_tracing;

use fanpage_approval::config::ApprovalConfig;
use fanpage_approval::infra::mail::HttpMailer;
use fanpage_approval::router::build_router;
use fanpage_approval::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ApprovalConfig::from_env()?;

    let db = Database::connect(&config.database_url).await?;

    let mailer = HttpMailer::new(config.mail_api_url, config.mail_api_key, config.mail_from)?;

    let state = AppState {
        db,
        session_secret: SessionSecret::new(config.session_jwt_secret),
        mailer,
        code_ttl_minutes: config.code_ttl_minutes,
        site_name: config.site_name,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.approval_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("approval service listening on {addr}");
    axum::serve(listener, router).await?;
    Ok(())
}
