//! Drive folder paths and file names for photo evidence.
//!
//! Photos land under `root / {condominium} / Casa {house} / {year} / {month}
//! / {day}`, so a guard browsing the drive can walk from complex to date.

use jiff::{Timestamp, civil::Date, tz::TimeZone};

/// Which side of a document a photo shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSide {
    /// Front of an ID card.
    Front,

    /// Back of an ID card.
    Back,

    /// A single worker photo.
    Portrait,
}

impl PhotoSide {
    /// File-name label for the side.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Front => "frontal",
            Self::Back => "trasera",
            Self::Portrait => "foto",
        }
    }
}

/// Folder location for one registration's evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidencePath {
    /// Condominium the registration belongs to.
    pub condominium: String,

    /// House within the condominium.
    pub house_number: String,

    /// UTC date of the registration.
    pub date: Date,
}

impl EvidencePath {
    /// Locate evidence for a registration happening at `now`.
    #[must_use]
    pub fn new(condominium: &str, house_number: &str, now: Timestamp) -> Self {
        Self {
            condominium: condominium.to_string(),
            house_number: house_number.to_string(),
            date: now.to_zoned(TimeZone::UTC).date(),
        }
    }

    /// Folder names from the condominium root down to the day folder.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        vec![
            self.condominium.clone(),
            format!("Casa {}", self.house_number),
            format!("{:04}", self.date.year()),
            format!("{:02}", self.date.month()),
            format!("{:02}", self.date.day()),
        ]
    }

    /// Cache key for the day folder's drive ID.
    #[must_use]
    pub fn cache_key(&self) -> String {
        self.segments().join("/")
    }
}

/// File name for an uploaded photo.
///
/// Carries the record kind, house, instant, and side so files in the same day
/// folder never collide and stay searchable.
#[must_use]
pub fn photo_file_name(prefix: &str, house_number: &str, now: Timestamp, side: PhotoSide) -> String {
    format!(
        "{prefix}_{house_number}_{}_{}.jpg",
        now.as_millisecond(),
        side.label()
    )
}
