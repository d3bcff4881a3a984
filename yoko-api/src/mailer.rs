//! Confirmation email through Mailchimp Transactional (Mandrill)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use yoko_common::config::MailSettings;

const MANDRILL_SEND_URL: &str = "https://mandrillapp.com/api/1.0/messages/send";
const USER_AGENT: &str = concat!("yoko-api/", env!("CARGO_PKG_VERSION"));
const CONFIRMATION_SUBJECT: &str = "Application Received - TheYoko";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Email sending is not configured")]
    Disabled,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Message to {0} was {1}")]
    Rejected(String, String),
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    key: &'a str,
    message: Message<'a>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    from_email: &'a str,
    subject: &'a str,
    text: String,
    to: Vec<Recipient<'a>>,
}

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    email: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

/// Per-recipient entry of a send response
#[derive(Debug, Deserialize)]
struct SendResult {
    email: String,
    status: String,
    #[serde(default)]
    reject_reason: Option<String>,
}

fn confirmation_text(name: &str) -> String {
    format!(
        "Hello {},\n\nThank you for your application to TheYoko. We have received your \
         submission and our team will review it shortly.\n\nBest regards,\nTheYoko Team",
        name
    )
}

/// Mandrill HTTP client
#[derive(Debug, Clone)]
pub struct MailchimpClient {
    http_client: reqwest::Client,
    api_key: String,
    from_email: String,
}

impl MailchimpClient {
    pub fn new(api_key: String, from_email: String) -> Result<Self, MailError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MailError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            from_email,
        })
    }

    fn confirmation_request<'a>(&'a self, to: &'a str, name: &str) -> SendRequest<'a> {
        SendRequest {
            key: &self.api_key,
            message: Message {
                from_email: &self.from_email,
                subject: CONFIRMATION_SUBJECT,
                text: confirmation_text(name),
                to: vec![Recipient { email: to, kind: "to" }],
            },
        }
    }

    pub async fn send_confirmation(&self, to: &str, name: &str) -> Result<(), MailError> {
        let request = self.confirmation_request(to, name);

        let response = self
            .http_client
            .post(MANDRILL_SEND_URL)
            .json(&request)
            .send()
            .await
            .map_err(|e| MailError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Api(status.as_u16(), body));
        }

        let results: Vec<SendResult> = response
            .json()
            .await
            .map_err(|e| MailError::Api(status.as_u16(), e.to_string()))?;

        check_results(&results)?;

        debug!(recipient = to, "Mandrill accepted confirmation email");
        Ok(())
    }
}

fn check_results(results: &[SendResult]) -> Result<(), MailError> {
    for result in results {
        if result.status == "rejected" || result.status == "invalid" {
            let reason = match &result.reject_reason {
                Some(reason) => format!("{} ({})", result.status, reason),
                None => result.status.clone(),
            };
            return Err(MailError::Rejected(result.email.clone(), reason));
        }
    }
    Ok(())
}

/// Outbound mail, or a no-op when no API key is configured
#[derive(Debug, Clone)]
pub enum Mailer {
    Mailchimp(MailchimpClient),
    Disabled,
}

impl Mailer {
    pub fn from_settings(settings: &MailSettings) -> Result<Self, MailError> {
        match &settings.api_key {
            Some(key) => {
                info!("Confirmation emails enabled (from {})", settings.from_email);
                Ok(Mailer::Mailchimp(MailchimpClient::new(
                    key.clone(),
                    settings.from_email.clone(),
                )?))
            }
            None => {
                info!("No Mailchimp API key configured; confirmation emails disabled");
                Ok(Mailer::Disabled)
            }
        }
    }

    pub fn disabled() -> Self {
        Mailer::Disabled
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Mailer::Mailchimp(_))
    }

    pub async fn send_confirmation(&self, to: &str, name: &str) -> Result<(), MailError> {
        match self {
            Mailer::Mailchimp(client) => client.send_confirmation(to, name).await,
            Mailer::Disabled => Err(MailError::Disabled),
        }
    }
}
