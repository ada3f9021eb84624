use anyhow::Context as _;
use reqwest::Client;
use serde::Serialize;

use crate::domain::repository::Mailer;
use crate::domain::types::OutboundEmail;
use crate::error::ApprovalServiceError;

/// Upper bound on how much of a rejection body is kept for diagnostics.
const MAX_ERROR_BODY: usize = 2048;

/// Mailer backed by a JSON email API (Resend wire format).
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> Result<Self, ApprovalServiceError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("build mail client")?;
        Ok(Self {
            client,
            api_url,
            api_key,
            from,
        })
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

impl Mailer for HttpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), ApprovalServiceError> {
        let request = SendEmailRequest {
            from: &self.from,
            to: [&email.to],
            subject: &email.subject,
            text: &email.text,
            html: &email.html,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApprovalServiceError::Delivery {
                status: None,
                body: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let mut body = match response.text().await {
            Ok(body) => body,
            Err(e) => format!("<unreadable body: {e}>"),
        };
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        Err(ApprovalServiceError::Delivery {
            status: Some(status.as_u16()),
            body,
        })
    }
}
