//! Documents Data

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use thiserror::Error;

/// Error decoding a photo payload.
#[derive(Debug, Error)]
pub enum PhotoDecodeError {
    #[error("photo payload is not valid base64")]
    Base64(#[from] base64::DecodeError),

    #[error("photo payload is empty")]
    Empty,
}

/// Decoded photo bytes, ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoPayload {
    bytes: Vec<u8>,
}

impl PhotoPayload {
    /// Decode a base64 photo, tolerating a `data:image/...;base64,` prefix.
    ///
    /// # Errors
    ///
    /// Returns an error when the payload is empty or not valid base64.
    pub fn from_base64(input: &str) -> Result<Self, PhotoDecodeError> {
        let encoded = input
            .split_once(";base64,")
            .map_or(input, |(_, rest)| rest)
            .trim();

        if encoded.is_empty() {
            return Err(PhotoDecodeError::Empty);
        }

        let bytes = BASE64.decode(encoded)?;

        Ok(Self { bytes })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for PhotoPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhotoPayload({} bytes)", self.bytes.len())
    }
}

/// New Worker Data
#[derive(Debug, Clone)]
pub struct NewWorker {
    pub house_number: String,
    pub condominium: String,
    pub name: String,
    pub worker_type: Option<String>,
    pub photo: Option<PhotoPayload>,
}

/// New INE Data
#[derive(Debug, Clone)]
pub struct NewIne {
    pub house_number: String,
    pub condominium: String,
    pub first_name: String,
    pub last_name: String,
    pub ine_number: String,
    pub curp: String,
    pub front_photo: Option<PhotoPayload>,
    pub back_photo: Option<PhotoPayload>,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    // 1x1 JPEG-ish bytes, enough for decode tests.
    const PIXEL: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

    #[test]
    fn decodes_plain_base64() -> TestResult {
        let encoded = BASE64.encode(PIXEL);
        let photo = PhotoPayload::from_base64(&encoded)?;

        assert_eq!(photo.as_bytes(), PIXEL);

        Ok(())
    }

    #[test]
    fn strips_data_url_prefix() -> TestResult {
        let encoded = format!("data:image/jpeg;base64,{}", BASE64.encode(PIXEL));
        let photo = PhotoPayload::from_base64(&encoded)?;

        assert_eq!(photo.as_bytes(), PIXEL);

        Ok(())
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(matches!(
            PhotoPayload::from_base64("data:image/jpeg;base64,"),
            Err(PhotoDecodeError::Empty)
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(PhotoPayload::from_base64("not-base64!!!").is_err());
    }
}
