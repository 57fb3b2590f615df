//! Job expiry: when a posting stops being active.
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::error::AppError;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Absolute expiry for a new posting, or `None` if it never expires.
///
/// A finite `expires_in_hours` wins over `expires_at`. Blank `expires_at`
/// counts as absent.
pub fn compute_expiry(
    expires_in_hours: Option<f64>,
    expires_at: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    if let Some(hours) = expires_in_hours.filter(|h| h.is_finite()) {
        return after_hours(now, hours).map(Some);
    }
    match expires_at.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_timestamp(raw).map(Some),
        None => Ok(None),
    }
}

/// Expired once `now` is strictly past the expiry
pub fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_some_and(|exp| now > exp)
}

fn after_hours(now: DateTime<Utc>, hours: f64) -> Result<DateTime<Utc>, AppError> {
    let out_of_range = || AppError::InvalidInput("expiresInHours is out of range".to_string());

    let millis = (hours * MILLIS_PER_HOUR).round();
    // i64::MAX as f64 rounds up, so the comparison must be strict
    if millis.abs() >= i64::MAX as f64 {
        return Err(out_of_range());
    }
    let delta = TimeDelta::try_milliseconds(millis as i64).ok_or_else(out_of_range)?;
    now.checked_add_signed(delta).ok_or_else(out_of_range)
}

/// RFC 3339, a zone-less date-time taken as UTC, or a bare date at UTC midnight
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    Err(AppError::InvalidInput(format!("expiresAt `{raw}` is not a date or date-time")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_hours_take_precedence() {
        let exp = compute_expiry(Some(1.0), Some("2030-01-01T00:00:00Z"), now()).unwrap();
        assert_eq!(exp, Some(now() + TimeDelta::hours(1)));
    }

    #[test]
    fn test_fractional_and_negative_hours() {
        assert_eq!(
            compute_expiry(Some(0.5), None, now()).unwrap(),
            Some(now() + TimeDelta::minutes(30))
        );
        assert_eq!(
            compute_expiry(Some(-2.0), None, now()).unwrap(),
            Some(now() - TimeDelta::hours(2))
        );
    }

    #[test]
    fn test_non_finite_hours_fall_through() {
        assert_eq!(compute_expiry(Some(f64::NAN), None, now()).unwrap(), None);
        assert_eq!(
            compute_expiry(Some(f64::INFINITY), Some("2030-01-01"), now()).unwrap(),
            Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_huge_hours_rejected() {
        assert!(matches!(
            compute_expiry(Some(1e300), None, now()),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_absolute_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 7, 4, 18, 30, 0).unwrap();
        for raw in [
            "2025-07-04T18:30:00Z",
            "2025-07-04T20:30:00+02:00",
            "2025-07-04T18:30:00",
            "2025-07-04T18:30",
        ] {
            assert_eq!(compute_expiry(None, Some(raw), now()).unwrap(), Some(expected), "{raw}");
        }
        assert_eq!(
            compute_expiry(None, Some("2025-07-04"), now()).unwrap(),
            Some(Utc.with_ymd_and_hms(2025, 7, 4, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_absent_or_blank_never_expires() {
        assert_eq!(compute_expiry(None, None, now()).unwrap(), None);
        assert_eq!(compute_expiry(None, Some("   "), now()).unwrap(), None);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            compute_expiry(None, Some("next tuesday"), now()),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_is_expired_boundary() {
        let exp = now();
        assert!(!is_expired(None, now()));
        assert!(!is_expired(Some(exp), exp));
        assert!(is_expired(Some(exp), exp + TimeDelta::milliseconds(1)));
        assert!(!is_expired(Some(exp), exp - TimeDelta::seconds(1)));
    }
}
