use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::config::EmailConfig;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Email request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Email has no recipients")]
    NoRecipients,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError>;
}

/// Sends through a Resend-compatible `POST /emails` endpoint
pub struct ResendMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ResendMailer {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        if email.to.is_empty() {
            return Err(MailerError::NoRecipients);
        }

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?
            .error_for_status()?;

        tracing::info!(
            "Email '{}' accepted for {:?} (HTTP {})",
            email.subject,
            email.to,
            response.status()
        );
        Ok(())
    }
}

/// Used when no API key is configured: the email is only logged
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        if email.to.is_empty() {
            return Err(MailerError::NoRecipients);
        }
        tracing::info!(
            "Email delivery disabled; would send '{}' to {:?}",
            email.subject,
            email.to
        );
        Ok(())
    }
}

pub fn mailer_from_config(config: &EmailConfig) -> Arc<dyn Mailer> {
    match config.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        Some(api_key) => Arc::new(ResendMailer::new(config.api_url.clone(), api_key.to_string())),
        None => {
            tracing::warn!("No email API key configured, outgoing email will only be logged");
            Arc::new(LogMailer)
        }
    }
}

/// Keeps every email it is asked to send
#[cfg(test)]
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: tokio::sync::Mutex<Vec<OutgoingEmail>>,
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}
