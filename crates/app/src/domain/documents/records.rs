//! Document Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Upload lifecycle of a document's photo evidence.
///
/// Records are created `procesando` and flip to `activo` (or `error`) when
/// the background sync finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Photos still uploading in the background.
    #[serde(rename = "procesando")]
    Processing,

    /// Evidence stored; the record is live.
    #[serde(rename = "activo")]
    Active,

    /// The background sync failed; evidence may be missing.
    #[serde(rename = "error")]
    Failed,
}

impl DocumentStatus {
    /// Wire/storage spelling of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "procesando",
            Self::Active => "activo",
            Self::Failed => "error",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a stored status outside the document lifecycle.
#[derive(Debug, Error)]
#[error("unknown document status: {0}")]
pub struct UnknownDocumentStatus(pub String);

impl FromStr for DocumentStatus {
    type Err = UnknownDocumentStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "procesando" => Ok(Self::Processing),
            "activo" => Ok(Self::Active),
            "error" => Ok(Self::Failed),
            other => Err(UnknownDocumentStatus(other.to_string())),
        }
    }
}

/// Worker Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRecord {
    pub uuid: Uuid,
    pub house_number: String,
    pub condominium: String,
    pub name: String,
    pub worker_type: String,
    pub photo_file_id: Option<String>,
    pub status: DocumentStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// INE Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IneRecord {
    pub uuid: Uuid,
    pub house_number: String,
    pub condominium: String,
    pub first_name: String,
    pub last_name: String,
    pub ine_number: String,
    pub curp: String,
    pub front_file_id: Option<String>,
    pub back_file_id: Option<String>,
    pub notes: String,
    pub status: DocumentStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn status_round_trips_through_str() -> TestResult {
        for status in [
            DocumentStatus::Processing,
            DocumentStatus::Active,
            DocumentStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<DocumentStatus>()?, status);
        }

        assert!("listo".parse::<DocumentStatus>().is_err());

        Ok(())
    }
}
