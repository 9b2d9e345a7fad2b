//! Per-day gate activity tallies.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Tallies for a single UTC day, as shown on the guard station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounters {
    /// Codes issued since 00:00 UTC.
    pub generated: i64,

    /// Codes validated (marked used) since 00:00 UTC.
    pub validated: i64,

    /// Validation attempts denied for expiry since 00:00 UTC.
    pub denied: i64,
}

/// Start of the UTC day containing `now`.
///
/// # Errors
///
/// Returns an error only when the computed instant falls outside the
/// representable timestamp range.
pub fn utc_day_start(now: Timestamp) -> Result<Timestamp, jiff::Error> {
    let day = now.as_second().div_euclid(SECONDS_PER_DAY);

    Timestamp::from_second(day * SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn day_start_truncates_to_utc_midnight() -> TestResult {
        let now: Timestamp = "2026-08-07T18:43:21Z".parse()?;

        assert_eq!(utc_day_start(now)?, "2026-08-07T00:00:00Z".parse()?);

        Ok(())
    }

    #[test]
    fn day_start_is_identity_at_midnight() -> TestResult {
        let midnight: Timestamp = "2026-08-07T00:00:00Z".parse()?;

        assert_eq!(utc_day_start(midnight)?, midnight);

        Ok(())
    }

    #[test]
    fn day_start_handles_pre_epoch_instants() -> TestResult {
        let now: Timestamp = "1969-12-31T22:00:00Z".parse()?;

        assert_eq!(utc_day_start(now)?, "1969-12-31T00:00:00Z".parse()?);

        Ok(())
    }
}
