//! Brevo transactional email delivery for verification codes.

use reqwest::Client;
use serde::Serialize;

use rydroo_domain::email::Email;

use crate::domain::repository::OtpSender;
use crate::domain::types::OTP_TTL_SECS;
use crate::error::AuthServiceError;

const SENDER_NAME: &str = "Rydroo";
const SUBJECT: &str = "Verify your email";

#[derive(Clone)]
pub struct BrevoOtpSender {
    pub client: Client,
    pub api_url: String,
    pub api_key: String,
    pub sender_email: String,
}

#[derive(Serialize)]
struct Contact<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Contact<'a>,
    to: [Contact<'a>; 1],
    subject: &'a str,
    html_content: String,
}

fn render_html(code: &str) -> String {
    format!(
        "<h2>Email Verification</h2><h1>{code}</h1><p>This code expires in {} minutes</p>",
        OTP_TTL_SECS / 60
    )
}

impl OtpSender for BrevoOtpSender {
    async fn send(&self, email: &Email, code: &str) -> Result<(), AuthServiceError> {
        let body = SendEmailRequest {
            sender: Contact {
                name: Some(SENDER_NAME),
                email: &self.sender_email,
            },
            to: [Contact {
                name: None,
                email: email.as_str(),
            }],
            subject: SUBJECT,
            html_content: render_html(code),
        };

        let resp = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthServiceError::DeliveryFailed(e.into()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(AuthServiceError::DeliveryFailed(anyhow::anyhow!(
                "brevo returned {status}: {detail}"
            )));
        }
        Ok(())
    }
}
