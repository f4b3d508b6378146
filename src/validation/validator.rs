//! Turns a [`RawTemperatureRequest`] into a [`ValidationRequest`], checking each
//! domain rule in a fixed order and stopping at the first failure.

use crate::types::request::{LatLon, RawTemperatureRequest, ValidationRequest};
use crate::validation::error::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use log::debug;
use serde_json::Value;

/// Longest window, in days, between `start_date` and `end_date`.
///
/// Earlier iterations of the product used 30 days and 5 years; 365 days is the
/// limit the server enforced. Which one the product wants is still open.
pub const MAX_WINDOW_DAYS: i64 = 365;

/// The provider's earliest supported record.
pub const EARLIEST_START_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1990, 1, 1) {
    Some(date) => date,
    None => panic!("invalid earliest start date"),
};

/// Hours the provider needs before a day's readings are final.
pub const DATA_AVAILABILITY_LAG_HOURS: i64 = 24;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The default maximum window as a [`TimeDelta`].
pub fn default_max_window() -> TimeDelta {
    TimeDelta::days(MAX_WINDOW_DAYS)
}

/// Validates a raw request against the domain rules.
///
/// Rules are checked in this order, and the first one that fails is returned:
///
/// 1. `latitude` is a finite number in `[-90, 90]`
/// 2. `longitude` is a finite number in `[-180, 180]`
/// 3. `start_date` and `end_date` are `YYYY-MM-DD` calendar dates
/// 4. `start_date` is not before [`EARLIEST_START_DATE`]
/// 5. `end_date` (at midnight UTC) is not after `now - 24h`
/// 6. `start_date` is not after `end_date`
/// 7. `end_date - start_date` does not exceed `max_window`
///
/// `now` is passed in rather than read from the clock so the cutoff is reproducible.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tempstats::{default_max_window, validate, RawTemperatureRequest, ValidationError};
///
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
///
/// let raw = RawTemperatureRequest::new(-23.55, -46.63, "2024-01-01", "2024-03-31");
/// let request = validate(&raw, now, default_max_window()).unwrap();
/// assert_eq!(request.span().num_days(), 90);
///
/// let raw = RawTemperatureRequest::new(91.0, -46.63, "2024-01-01", "2024-03-31");
/// assert_eq!(
///     validate(&raw, now, default_max_window()),
///     Err(ValidationError::LatitudeOutOfRange(91.0))
/// );
/// ```
pub fn validate(
    raw: &RawTemperatureRequest,
    now: DateTime<Utc>,
    max_window: TimeDelta,
) -> Result<ValidationRequest, ValidationError> {
    let result = check_rules(raw, now, max_window);
    if let Err(e) = &result {
        debug!("Rejected temperature request: {}", e);
    }
    result
}

fn check_rules(
    raw: &RawTemperatureRequest,
    now: DateTime<Utc>,
    max_window: TimeDelta,
) -> Result<ValidationRequest, ValidationError> {
    let latitude = finite_number(&raw.latitude).ok_or(ValidationError::LatitudeNotNumber)?;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ValidationError::LatitudeOutOfRange(latitude));
    }

    let longitude = finite_number(&raw.longitude).ok_or(ValidationError::LongitudeNotNumber)?;
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ValidationError::LongitudeOutOfRange(longitude));
    }

    let start = parse_date(&raw.start_date)
        .ok_or_else(|| ValidationError::InvalidStartDate(describe(&raw.start_date)))?;
    let end = parse_date(&raw.end_date)
        .ok_or_else(|| ValidationError::InvalidEndDate(describe(&raw.end_date)))?;

    if start < EARLIEST_START_DATE {
        return Err(ValidationError::StartTooEarly {
            start,
            earliest: EARLIEST_START_DATE,
        });
    }

    let cutoff = now - TimeDelta::hours(DATA_AVAILABILITY_LAG_HOURS);
    if end.and_time(NaiveTime::MIN).and_utc() > cutoff {
        return Err(ValidationError::EndAfterCutoff { end, cutoff });
    }

    if start > end {
        return Err(ValidationError::StartAfterEnd { start, end });
    }

    let span = end - start;
    if span > max_window {
        return Err(ValidationError::WindowTooLarge {
            days: span.num_days(),
            max_days: max_window.num_days(),
        });
    }

    Ok(ValidationRequest::new(LatLon(latitude, longitude), start, end))
}

fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    value
        .as_str()
        .filter(|s| is_iso_date_shape(s))
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
}

/// `%Y-%m-%d` alone also takes `2024-1-5`, `+2024-01-01` and surrounding blanks.
fn is_iso_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}
