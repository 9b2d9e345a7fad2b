//! Google Drive client: evidence folder hierarchy and photo uploads.

use std::{collections::HashMap, sync::Arc};

use aldaba::evidence::EvidencePath;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::integrations::oauth::{GoogleAuthError, GoogleAuthenticator};

const FILES_ENDPOINT: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_ENDPOINT: &str = "https://www.googleapis.com/upload/drive/v3/files";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Errors that can occur when talking to Drive.
#[derive(Debug, Error)]
pub enum DriveError {
    /// Could not obtain an access token.
    #[error(transparent)]
    Auth(#[from] GoogleAuthError),

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Drive returned a non-2xx response.
    #[error("unexpected response from Drive: {0}")]
    UnexpectedResponse(String),
}

/// A file stored in Drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_id: String,
    pub name: String,
}

/// HTTP client for the Drive v3 API.
///
/// Folder lookups walk `root / condominium / casa / year / month / day`; the
/// day-folder ID is cached per path so repeat registrations for the same
/// house and day skip the whole chain.
#[derive(Debug)]
pub struct DriveClient {
    auth: Arc<GoogleAuthenticator>,
    http: Client,
    root_folder_id: String,
    folder_cache: Mutex<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileRef>,
}

#[derive(Debug, Deserialize)]
struct FileRef {
    id: String,
    #[serde(default)]
    name: String,
}

impl DriveClient {
    /// Create a client rooted at the given shared folder.
    #[must_use]
    pub fn new(auth: Arc<GoogleAuthenticator>, root_folder_id: String) -> Self {
        Self {
            auth,
            http: Client::new(),
            root_folder_id,
            folder_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Ensure the folder hierarchy for `path` exists and return the day
    /// folder's ID.
    ///
    /// # Errors
    ///
    /// Returns an error when a lookup or folder creation fails.
    pub async fn ensure_folder_path(&self, path: &EvidencePath) -> Result<String, DriveError> {
        let key = path.cache_key();

        if let Some(folder_id) = self.folder_cache.lock().await.get(&key) {
            return Ok(folder_id.clone());
        }

        let mut parent = self.root_folder_id.clone();

        for segment in path.segments() {
            parent = match self.find_child_folder(&parent, &segment).await? {
                Some(folder_id) => folder_id,
                None => self.create_folder(&parent, &segment).await?,
            };
        }

        self.folder_cache.lock().await.insert(key, parent.clone());

        Ok(parent)
    }

    /// Upload a JPEG into a folder.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure or an unexpected response body.
    pub async fn upload_photo(
        &self,
        folder_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<UploadedFile, DriveError> {
        let token = self.auth.access_token().await?;

        let metadata = serde_json::json!({
            "name": file_name,
            "parents": [folder_id],
        });

        let boundary = format!("upload_{}", Uuid::new_v4().simple());
        let body = multipart_related(&boundary, &metadata.to_string(), bytes);

        let response = self
            .http
            .post(UPLOAD_ENDPOINT)
            .bearer_auth(&token)
            .query(&[("uploadType", "multipart"), ("fields", "id, name")])
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(DriveError::UnexpectedResponse(format!(
                "upload failed with status {status}: {text}"
            )));
        }

        let parsed: FileRef = response.json().await?;

        Ok(UploadedFile {
            file_id: parsed.id,
            name: parsed.name,
        })
    }

    async fn find_child_folder(
        &self,
        parent: &str,
        name: &str,
    ) -> Result<Option<String>, DriveError> {
        let token = self.auth.access_token().await?;

        let query = format!(
            "'{parent}' in parents and name = '{}' and mimeType = '{FOLDER_MIME}' and trashed = false",
            escape_query_value(name),
        );

        let response = self
            .http
            .get(FILES_ENDPOINT)
            .bearer_auth(&token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id, name)"),
                ("spaces", "drive"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(DriveError::UnexpectedResponse(format!(
                "folder lookup failed with status {status}: {text}"
            )));
        }

        let parsed: FileList = response.json().await?;

        Ok(parsed.files.into_iter().next().map(|file| file.id))
    }

    async fn create_folder(&self, parent: &str, name: &str) -> Result<String, DriveError> {
        let token = self.auth.access_token().await?;

        let body = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME,
            "parents": [parent],
        });

        let response = self
            .http
            .post(FILES_ENDPOINT)
            .bearer_auth(&token)
            .query(&[("fields", "id, name")])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(DriveError::UnexpectedResponse(format!(
                "folder creation failed with status {status}: {text}"
            )));
        }

        let parsed: FileRef = response.json().await?;

        Ok(parsed.id)
    }
}

/// Escape a value embedded in a Drive `q` search expression.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Build a `multipart/related` body: JSON metadata part, then the media part.
fn multipart_related(boundary: &str, metadata_json: &str, media: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(media.len() + metadata_json.len() + 256);

    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata_json}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("--{boundary}\r\nContent-Type: image/jpeg\r\n\r\n").as_bytes());
    body.extend_from_slice(media);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    body
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn query_values_escape_quotes() {
        assert_eq!(escape_query_value("Casa 12"), "Casa 12");
        assert_eq!(escape_query_value("O'Brien"), "O\\'Brien");
        assert_eq!(escape_query_value("a\\b"), "a\\\\b");
    }

    #[test]
    fn multipart_body_wraps_metadata_and_media() -> TestResult {
        let body = multipart_related("b0undary", r#"{"name":"x.jpg"}"#, &[0xFF, 0xD8]);
        let text = String::from_utf8_lossy(&body);

        assert!(text.starts_with("--b0undary\r\n"), "got {text}");
        assert!(
            text.contains("Content-Type: application/json; charset=UTF-8"),
            "got {text}"
        );
        assert!(text.contains("Content-Type: image/jpeg"), "got {text}");
        assert!(text.ends_with("\r\n--b0undary--\r\n"), "got {text}");

        Ok(())
    }
}
