//! Transactional mail client for activity reports.

use reqwest::Client;
use thiserror::Error;

/// Mail API settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// HTTP endpoint of the transactional mail API.
    pub endpoint: String,

    /// API key sent as a bearer token.
    pub api_key: String,

    /// Sender address.
    pub sender: String,

    /// Report recipients.
    pub recipients: Vec<String>,
}

/// Errors that can occur when sending mail.
#[derive(Debug, Error)]
pub enum MailError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The mail API returned a non-2xx response.
    #[error("unexpected response from mail API: {0}")]
    UnexpectedResponse(String),
}

/// HTTP client for a JSON transactional mail API.
#[derive(Debug)]
pub struct MailClient {
    config: MailConfig,
    http: Client,
}

impl MailClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Send a plain-text message to the configured recipients.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or a non-2xx response.
    pub async fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
        let payload = serde_json::json!({
            "from": self.config.sender,
            "to": self.config.recipients,
            "subject": subject,
            "text": body,
        });

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(MailError::UnexpectedResponse(format!(
                "send failed with status {status}: {text}"
            )));
        }

        Ok(())
    }
}
