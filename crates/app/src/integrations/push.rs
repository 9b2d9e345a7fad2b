//! Expo push notification client.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Expo push HTTP endpoint.
pub const EXPO_PUSH_ENDPOINT: &str = "https://exp.host/--/api/v2/push/send";

const EXPO_TOKEN_PREFIX: &str = "ExponentPushToken[";

/// Whether a token looks like an Expo push token. Anything else is refused
/// before it reaches the wire.
#[must_use]
pub fn is_expo_push_token(token: &str) -> bool {
    token.starts_with(EXPO_TOKEN_PREFIX)
}

/// Notification content for one device.
#[derive(Debug, Clone)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

/// Errors that can occur when sending a push notification.
#[derive(Debug, Error)]
pub enum ExpoPushError {
    /// The recipient token is not an Expo push token.
    #[error("not an Expo push token")]
    InvalidToken,

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Expo accepted the request but reported a delivery error.
    #[error("push rejected: {0}")]
    Rejected(String),

    /// Expo returned a non-2xx response.
    #[error("unexpected response from Expo: {0}")]
    UnexpectedResponse(String),
}

/// HTTP client for the Expo push API.
#[derive(Debug, Clone)]
pub struct ExpoPushClient {
    endpoint: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    data: PushTicket,
}

#[derive(Debug, Deserialize)]
struct PushTicket {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

impl ExpoPushClient {
    /// Create a client against the public Expo endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::with_endpoint(EXPO_PUSH_ENDPOINT.to_string())
    }

    /// Create a client against a custom endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: String) -> Self {
        Self {
            endpoint,
            http: Client::new(),
        }
    }

    /// Deliver a notification to one device token.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed token, an HTTP failure, or a ticket
    /// Expo marks as errored.
    pub async fn send(
        &self,
        to: &str,
        notification: &PushNotification,
    ) -> Result<(), ExpoPushError> {
        if !is_expo_push_token(to) {
            return Err(ExpoPushError::InvalidToken);
        }

        let message = serde_json::json!({
            "to": to,
            "sound": "default",
            "title": notification.title,
            "body": notification.body,
            "data": notification.data,
            "priority": "high",
            "channelId": "default",
            "badge": 1,
        });

        let response = self.http.post(&self.endpoint).json(&message).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ExpoPushError::UnexpectedResponse(format!(
                "push send failed with status {status}: {text}"
            )));
        }

        let parsed: PushResponse = response.json().await?;

        if parsed.data.status != "ok" {
            return Err(ExpoPushError::Rejected(
                parsed.data.message.unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        Ok(())
    }
}

impl Default for ExpoPushClient {
    fn default() -> Self {
        Self::new()
    }
}
