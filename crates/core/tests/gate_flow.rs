//! End-to-end lifecycle walks a code through issue, validate, and re-present.

use aldaba::{
    counters::utc_day_start,
    lifecycle::{CodeStatus, Verdict, assess, compose_code, expiry},
};
use jiff::{SignedDuration, Timestamp};
use testresult::TestResult;

#[test]
fn issued_code_is_spent_exactly_once() -> TestResult {
    let issued_at: Timestamp = "2026-08-07T08:00:00Z".parse()?;
    let code = compose_code(issued_at, "17", "w0rd5");
    let expires_at = expiry(issued_at);

    assert!(code.starts_with("QR-"), "got {code}");

    // First presentation, two hours later: granted.
    let first = assess(false, expires_at, issued_at.saturating_add(SignedDuration::from_hours(2))?);

    assert_eq!(first, Verdict::Granted);

    // The gate marks the code used; a second presentation is refused.
    let second = assess(true, expires_at, issued_at.saturating_add(SignedDuration::from_hours(3))?);

    assert_eq!(second, Verdict::AlreadyUsed);
    assert_eq!(second.estado(), CodeStatus::Used.as_str());

    Ok(())
}

#[test]
fn unused_code_expires_after_a_day() -> TestResult {
    let issued_at: Timestamp = "2026-08-07T08:00:00Z".parse()?;
    let expires_at = expiry(issued_at);

    let next_evening = issued_at.saturating_add(SignedDuration::from_hours(30))?;
    let verdict = assess(false, expires_at, next_evening);

    assert_eq!(verdict, Verdict::Expired);

    // The denial lands on the counter day of the attempt, not the issue day.
    assert_eq!(utc_day_start(next_evening)?, "2026-08-08T00:00:00Z".parse()?);

    Ok(())
}
