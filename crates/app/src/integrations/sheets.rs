//! Google Sheets client: per-condominium registration log tabs.

use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;

use crate::integrations::oauth::{GoogleAuthError, GoogleAuthenticator};

const SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Errors that can occur when talking to Sheets.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Could not obtain an access token.
    #[error(transparent)]
    Auth(#[from] GoogleAuthError),

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The target tab does not exist.
    #[error("sheet tab not found")]
    MissingTab,

    /// Sheets returned a non-2xx response.
    #[error("unexpected response from Sheets: {0}")]
    UnexpectedResponse(String),
}

/// HTTP client for the Sheets v4 API, bound to one spreadsheet.
#[derive(Debug)]
pub struct SheetsClient {
    auth: Arc<GoogleAuthenticator>,
    http: Client,
    spreadsheet_id: String,
}

impl SheetsClient {
    /// Create a client bound to one spreadsheet.
    #[must_use]
    pub fn new(auth: Arc<GoogleAuthenticator>, spreadsheet_id: String) -> Self {
        Self {
            auth,
            http: Client::new(),
            spreadsheet_id,
        }
    }

    /// Append one row to a tab, creating the tab on first use.
    ///
    /// # Errors
    ///
    /// Returns an error when both the append and the create-then-retry fail.
    pub async fn append_row(&self, tab: &str, values: &[String]) -> Result<(), SheetsError> {
        match self.try_append(tab, values).await {
            Err(SheetsError::MissingTab) => {
                self.ensure_tab(tab).await?;
                self.try_append(tab, values).await
            }
            other => other,
        }
    }

    async fn try_append(&self, tab: &str, values: &[String]) -> Result<(), SheetsError> {
        let token = self.auth.access_token().await?;

        let url = format!(
            "{SHEETS_ENDPOINT}/{}/values/{}:append",
            self.spreadsheet_id,
            quote_range(tab),
        );

        let body = serde_json::json!({ "values": [values] });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();

        // A range pointing at an absent tab comes back as a 400 parse error.
        if status.as_u16() == 400 && text.contains("Unable to parse range") {
            return Err(SheetsError::MissingTab);
        }

        Err(SheetsError::UnexpectedResponse(format!(
            "append failed with status {status}: {text}"
        )))
    }

    async fn ensure_tab(&self, tab: &str) -> Result<(), SheetsError> {
        let token = self.auth.access_token().await?;

        let url = format!("{SHEETS_ENDPOINT}/{}:batchUpdate", self.spreadsheet_id);

        let body = serde_json::json!({
            "requests": [{ "addSheet": { "properties": { "title": tab } } }],
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();

        // Two registrations can race on first use of a tab.
        if status.as_u16() == 400 && text.contains("already exists") {
            return Ok(());
        }

        Err(SheetsError::UnexpectedResponse(format!(
            "tab creation failed with status {status}: {text}"
        )))
    }
}

/// A1-notation range for a whole tab, with the title quoted.
fn quote_range(tab: &str) -> String {
    format!("'{}'!A1", tab.replace('\'', "''"))
}
