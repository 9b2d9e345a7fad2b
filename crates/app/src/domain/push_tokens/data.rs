//! Push Tokens Data

/// New Push Token Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPushToken {
    pub house_number: String,
    pub condominium: String,
    pub push_token: String,
    pub platform: String,
}
