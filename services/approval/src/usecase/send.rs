use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::repository::{ApprovalCodeRepository, Mailer, ProfileRepository};
use crate::domain::types::OutboundEmail;
use crate::error::ApprovalServiceError;
use crate::usecase::issue::{IssuedCode, mint_code, validate_ttl};
use crate::usecase::require_admin;

pub struct SendCodeUseCase<P, A, M>
where
    P: ProfileRepository,
    A: ApprovalCodeRepository,
    M: Mailer,
{
    pub profiles: P,
    pub codes: A,
    pub mailer: M,
    pub ttl_minutes: i64,
    /// Display name used in the message, e.g. "Fan Page".
    pub site_name: String,
}

impl<P, A, M> SendCodeUseCase<P, A, M>
where
    P: ProfileRepository,
    A: ApprovalCodeRepository,
    M: Mailer,
{
    /// Issue a fresh code for `subject_id` and email it to the subject.
    ///
    /// Success means the delivery channel accepted the message. Recording the
    /// delivery on the code row is best-effort.
    pub async fn execute(&self, caller_id: Uuid, subject_id: Uuid) -> Result<(), ApprovalServiceError> {
        require_admin(&self.profiles, caller_id).await?;
        validate_ttl(self.ttl_minutes)?;

        // Resolve the contact address before minting so a failed lookup leaves no row.
        let subject = self
            .profiles
            .find_by_id(subject_id)
            .await?
            .ok_or(ApprovalServiceError::SubjectNotFound)?;
        let address = subject
            .contact_address()
            .ok_or(ApprovalServiceError::AddressNotFound)?
            .to_owned();

        let issued = mint_code(&self.codes, caller_id, subject_id, self.ttl_minutes).await?;
        let email = compose_code_email(
            &self.site_name,
            subject.display_name.as_deref(),
            &address,
            &issued,
        );
        self.mailer.send(&email).await?;

        match self.codes.mark_sent(subject_id, &address, Utc::now()).await {
            Ok(true) => {}
            Ok(false) => warn!(%subject_id, "no unredeemed code left to mark as sent"),
            Err(e) => warn!(%subject_id, error = %e, "failed to mark approval code as sent"),
        }

        info!(%subject_id, %caller_id, "approval code sent");
        Ok(())
    }
}

/// Build the approval email for a freshly issued code.
pub fn compose_code_email(
    site_name: &str,
    display_name: Option<&str>,
    to: &str,
    issued: &IssuedCode,
) -> OutboundEmail {
    let greeting = match display_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("Hi {name},"),
        None => "Hi,".to_owned(),
    };
    let validity = format_validity(issued.ttl_minutes);
    let expires = issued.expires_at.format("%Y-%m-%d %H:%M UTC");

    let text = format!(
        "{greeting}\n\n\
         Your {site_name} approval code is:\n\n    {code}\n\n\
         Enter it on the site to unlock your account. \
         The code is valid for {validity} (until {expires}) and can be used once.\n\n\
         If you did not sign up for {site_name}, ignore this email.\n",
        code = issued.code,
    );
    let html = format!(
        "<p>{greeting}</p>\
         <p>Your {site_name} approval code is:</p>\
         <p style=\"font-size:24px;font-family:monospace;letter-spacing:4px\"><strong>{code}</strong></p>\
         <p>Enter it on the site to unlock your account. \
         The code is valid for {validity} (until {expires}) and can be used once.</p>\
         <p>If you did not sign up for {site_name}, ignore this email.</p>",
        greeting = escape_html(&greeting),
        site_name = escape_html(site_name),
        code = issued.code,
    );

    OutboundEmail {
        to: to.to_owned(),
        subject: format!("Your {site_name} approval code"),
        text,
        html,
    }
}

/// Human-readable lifetime: whole hours when possible, minutes otherwise.
fn format_validity(ttl_minutes: i64) -> String {
    match ttl_minutes {
        60 => "1 hour".to_owned(),
        m if m % 60 == 0 => format!("{} hours", m / 60),
        1 => "1 minute".to_owned(),
        m => format!("{m} minutes"),
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
