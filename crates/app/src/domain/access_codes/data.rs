//! Access Codes Data

/// New QR Code Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQrCode {
    pub house_number: String,
    pub condominium: String,
    pub visitor_name: String,
    pub resident_name: String,
}
