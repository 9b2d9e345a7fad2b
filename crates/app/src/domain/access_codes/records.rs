//! Access Code Records

use aldaba::lifecycle::{CodeStatus, Verdict};
use jiff::Timestamp;
use uuid::Uuid;

/// QR Code Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCodeRecord {
    pub uuid: Uuid,
    pub code: String,
    pub house_number: String,
    pub condominium: String,
    pub visitor_name: String,
    pub resident_name: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub is_used: bool,
    pub status: CodeStatus,
}

/// Where a known code points, echoed back to the gate and carried into the
/// push notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    pub house_number: String,
    pub condominium: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Result of a validation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// The gate verdict.
    pub verdict: Verdict,

    /// Present for every known code, absent for [`Verdict::Unknown`].
    pub context: Option<ValidationContext>,
}

impl From<&QrCodeRecord> for ValidationContext {
    fn from(record: &QrCodeRecord) -> Self {
        Self {
            house_number: record.house_number.clone(),
            condominium: record.condominium.clone(),
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}
