//! Push Token Records

use jiff::Timestamp;
use uuid::Uuid;

/// Push Token Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTokenRecord {
    pub uuid: Uuid,
    pub house_number: String,
    pub condominium: String,
    pub push_token: String,
    pub platform: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Upsert result; `inserted` distinguishes first registration from refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTokenUpsert {
    pub record: PushTokenRecord,
    pub inserted: bool,
}
