//! Google OAuth2 access tokens minted from a long-lived refresh token.

use jiff::{SignedDuration, Timestamp};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before the reported expiry so in-flight requests never
/// carry a token that dies mid-call.
const EXPIRY_MARGIN: SignedDuration = SignedDuration::from_secs(60);

/// OAuth2 client credentials plus the offline refresh token.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Mints and caches short-lived access tokens.
#[derive(Debug)]
pub struct GoogleAuthenticator {
    config: GoogleOAuthConfig,
    endpoint: String,
    http: Client,
    cached: Mutex<Option<CachedToken>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Timestamp,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Errors from the token endpoint.
#[derive(Debug, Error)]
pub enum GoogleAuthError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint refused the refresh token.
    #[error("token refresh failed with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl GoogleAuthenticator {
    /// Create an authenticator against the Google token endpoint.
    #[must_use]
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self::with_endpoint(config, TOKEN_ENDPOINT.to_string())
    }

    /// Create an authenticator against a custom token endpoint.
    #[must_use]
    pub fn with_endpoint(config: GoogleOAuthConfig, endpoint: String) -> Self {
        Self {
            config,
            endpoint,
            http: Client::new(),
            cached: Mutex::new(None),
        }
    }

    /// A valid access token, refreshed when the cached one is near expiry.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or a rejected refresh token.
    pub async fn access_token(&self) -> Result<String, GoogleAuthError> {
        let mut cached = self.cached.lock().await;
        let now = Timestamp::now();

        if let Some(token) = cached.as_ref() {
            if token.expires_at > now {
                return Ok(token.access_token.clone());
            }
        }

        let response = self
            .http
            .post(&self.endpoint)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", self.config.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();

            return Err(GoogleAuthError::Rejected { status, body });
        }

        let parsed: TokenResponse = response.json().await?;

        let expires_at = now
            .saturating_add(SignedDuration::from_secs(parsed.expires_in))
            .expect("SignedDuration never exceeds hour units")
            .saturating_sub(EXPIRY_MARGIN)
            .expect("EXPIRY_MARGIN is a SignedDuration, which never exceeds hour units");

        *cached = Some(CachedToken {
            access_token: parsed.access_token.clone(),
            expires_at,
        });

        Ok(parsed.access_token)
    }
}
