use base64::{engine::general_purpose, Engine as _};
use reqwest::Client as HttpClient;
use serde::Serialize;

use crate::config::MailConfig;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub attachment: Option<EmailAttachment>,
}

#[derive(Serialize)]
struct AttachmentPayload {
    filename: String,
    content: String,
}

#[derive(Serialize)]
struct SendPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentPayload>,
}

/// Thin client for the provider's HTTP send API. One POST per email, no
/// retry, no backoff; callers decide whether a failure matters.
#[derive(Clone)]
pub struct Mailer {
    http: HttpClient,
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            http: HttpClient::new(),
            config,
        }
    }

    pub async fn send(&self, email: OutboundEmail) -> Result<(), AppError> {
        if email.to.is_empty() {
            return Err(AppError::Internal(
                "No recipients configured for outbound email".to_string(),
            ));
        }

        let attachments = email
            .attachment
            .into_iter()
            .map(|a| AttachmentPayload {
                filename: a.filename,
                content: general_purpose::STANDARD.encode(&a.content),
            })
            .collect();

        let payload = SendPayload {
            from: &self.config.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            attachments,
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Email send failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Internal(format!(
                "Email provider returned {status}: {body}"
            )));
        }

        Ok(())
    }
}
