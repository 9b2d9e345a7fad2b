//! Access-code lifecycle and validation state machine.
//!
//! A code is created `activo`, may be marked `usado` exactly once, and is
//! reported `expirado` when a validation attempt arrives after its expiry.
//! `invalido` is the verdict for an unknown code and is never stored.

use std::{fmt, str::FromStr};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a code stays valid after creation.
pub const VALIDITY_WINDOW: SignedDuration = SignedDuration::from_hours(24);

/// Stored lifecycle state of an access code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeStatus {
    /// Freshly issued, not yet presented at the gate.
    #[serde(rename = "activo")]
    Active,

    /// Presented and accepted; single use is spent.
    #[serde(rename = "usado")]
    Used,

    /// A validation attempt arrived after `expires_at`.
    #[serde(rename = "expirado")]
    Expired,
}

impl CodeStatus {
    /// Wire/storage spelling of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "activo",
            Self::Used => "usado",
            Self::Expired => "expirado",
        }
    }
}

impl fmt::Display for CodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a status string that is not part of the lifecycle.
#[derive(Debug, Error)]
#[error("unknown code status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for CodeStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "activo" => Ok(Self::Active),
            "usado" => Ok(Self::Used),
            "expirado" => Ok(Self::Expired),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Outcome of presenting a code at the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The code is active and inside its validity window. Entry is granted
    /// and the code must be marked used.
    Granted,

    /// The code was already spent.
    AlreadyUsed,

    /// The validity window has passed.
    Expired,

    /// No such code exists.
    Unknown,
}

impl Verdict {
    /// Whether entry is granted.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Spelling used in the validation response (`estado`).
    ///
    /// Note `Granted` reports `valido`, which is a response-only state; the
    /// stored status becomes [`CodeStatus::Used`] at the same moment.
    #[must_use]
    pub const fn estado(self) -> &'static str {
        match self {
            Self::Granted => "valido",
            Self::AlreadyUsed => "usado",
            Self::Expired => "expirado",
            Self::Unknown => "invalido",
        }
    }

    /// Human message shown on the gate device.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Granted => "Código QR válido",
            Self::AlreadyUsed => "Código QR ya fue utilizado",
            Self::Expired => "Código QR expirado",
            Self::Unknown => "Código QR no encontrado o inválido",
        }
    }
}

/// Assess a stored code against the clock.
///
/// A spent code reports [`Verdict::AlreadyUsed`] even when it has also
/// expired since. The expiry test is strict: a code presented at exactly
/// `expires_at` is still valid.
#[must_use]
pub fn assess(is_used: bool, expires_at: Timestamp, now: Timestamp) -> Verdict {
    if is_used {
        Verdict::AlreadyUsed
    } else if now > expires_at {
        Verdict::Expired
    } else {
        Verdict::Granted
    }
}

/// Expiry for a code created at `created_at`.
#[must_use]
pub fn expiry(created_at: Timestamp) -> Timestamp {
    created_at
        .saturating_add(VALIDITY_WINDOW)
        .expect("VALIDITY_WINDOW is a SignedDuration, which never exceeds hour units")
}

/// Build the unique code string for a new registration.
///
/// Format: `QR-{unix_millis}-{house}-{suffix}`. The caller supplies the
/// random suffix so this stays deterministic under test.
#[must_use]
pub fn compose_code(now: Timestamp, house_number: &str, suffix: &str) -> String {
    format!("QR-{}-{}-{}", now.as_millisecond(), house_number, suffix)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn ts(value: &str) -> Result<Timestamp, jiff::Error> {
        value.parse()
    }

    #[test]
    fn fresh_code_is_granted() -> TestResult {
        let created = ts("2026-08-07T10:00:00Z")?;
        let verdict = assess(false, expiry(created), ts("2026-08-07T18:00:00Z")?);

        assert_eq!(verdict, Verdict::Granted);
        assert!(verdict.is_valid());
        assert_eq!(verdict.estado(), "valido");

        Ok(())
    }

    #[test]
    fn spent_code_reports_used() -> TestResult {
        let created = ts("2026-08-07T10:00:00Z")?;
        let verdict = assess(true, expiry(created), ts("2026-08-07T11:00:00Z")?);

        assert_eq!(verdict, Verdict::AlreadyUsed);
        assert!(!verdict.is_valid());

        Ok(())
    }

    #[test]
    fn spent_code_wins_over_expiry() -> TestResult {
        let created = ts("2026-08-01T10:00:00Z")?;
        let verdict = assess(true, expiry(created), ts("2026-08-07T11:00:00Z")?);

        assert_eq!(verdict, Verdict::AlreadyUsed);

        Ok(())
    }

    #[test]
    fn stale_code_reports_expired() -> TestResult {
        let created = ts("2026-08-05T10:00:00Z")?;
        let verdict = assess(false, expiry(created), ts("2026-08-07T11:00:00Z")?);

        assert_eq!(verdict, Verdict::Expired);
        assert_eq!(verdict.estado(), "expirado");

        Ok(())
    }

    #[test]
    fn expiry_boundary_is_inclusive() -> TestResult {
        let created = ts("2026-08-06T10:00:00Z")?;
        let at_boundary = expiry(created);

        assert_eq!(assess(false, at_boundary, at_boundary), Verdict::Granted);

        let one_second_late = at_boundary.saturating_add(SignedDuration::from_secs(1))?;

        assert_eq!(
            assess(false, at_boundary, one_second_late),
            Verdict::Expired
        );

        Ok(())
    }

    #[test]
    fn expiry_is_24_hours_after_creation() -> TestResult {
        let created = ts("2026-08-07T10:00:00Z")?;

        assert_eq!(expiry(created), ts("2026-08-08T10:00:00Z")?);

        Ok(())
    }

    #[test]
    fn composed_code_carries_house_and_suffix() -> TestResult {
        let now = ts("2026-08-07T10:00:00Z")?;
        let code = compose_code(now, "42", "k3x9p");

        assert_eq!(code, format!("QR-{}-42-k3x9p", now.as_millisecond()));

        Ok(())
    }

    #[test]
    fn status_round_trips_through_str() -> TestResult {
        for status in [CodeStatus::Active, CodeStatus::Used, CodeStatus::Expired] {
            assert_eq!(status.as_str().parse::<CodeStatus>()?, status);
        }

        assert!("invalido".parse::<CodeStatus>().is_err());

        Ok(())
    }

    #[test]
    fn status_serializes_to_spanish_spelling() -> TestResult {
        assert_eq!(serde_json::to_value(CodeStatus::Active)?, "activo");
        assert_eq!(serde_json::to_value(CodeStatus::Used)?, "usado");
        assert_eq!(serde_json::to_value(CodeStatus::Expired)?, "expirado");

        Ok(())
    }
}
