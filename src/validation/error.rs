use crate::validation::validator::DATA_AVAILABILITY_LAG_HOURS;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// A rule the inbound request broke. The first failing rule wins.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("latitude must be a number")]
    LatitudeNotNumber,

    #[error("latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),

    #[error("longitude must be a number")]
    LongitudeNotNumber,

    #[error("longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),

    #[error("start_date must be a valid YYYY-MM-DD date, got {0}")]
    InvalidStartDate(String),

    #[error("end_date must be a valid YYYY-MM-DD date, got {0}")]
    InvalidEndDate(String),

    #[error("start_date must not be before {earliest}, got {start}")]
    StartTooEarly { start: NaiveDate, earliest: NaiveDate },

    #[error(
        "end_date must be at least {lag} hours before now (latest allowed {cutoff}), got {end}",
        lag = DATA_AVAILABILITY_LAG_HOURS
    )]
    EndAfterCutoff { end: NaiveDate, cutoff: DateTime<Utc> },

    #[error("start_date ({start}) must not be after end_date ({end})")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[error("the time window must not exceed {max_days} days, got {days} days")]
    WindowTooLarge { days: i64, max_days: i64 },
}
