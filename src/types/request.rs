//! Inbound request types: the untyped body as received, and the validated,
//! immutable request produced from it.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use tempstats::LatLon;
///
/// let sao_paulo = LatLon(-23.5505, -46.6333);
/// assert_eq!(sao_paulo.0, -23.5505); // Latitude
/// assert_eq!(sao_paulo.1, -46.6333); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

/// The request body exactly as a caller sent it.
///
/// Every field is kept as an untyped JSON value so that the validator, not the
/// deserializer, decides what is acceptable and reports it with a field-specific
/// message. Missing fields deserialize to `null`.
///
/// # Examples
///
/// ```
/// use tempstats::RawTemperatureRequest;
///
/// let body = r#"{"latitude": -23.55, "longitude": -46.63, "start_date": "2024-01-01", "end_date": "2024-01-31"}"#;
/// let raw: RawTemperatureRequest = serde_json::from_str(body).unwrap();
/// assert_eq!(raw.start_date, "2024-01-01");
///
/// let partial: RawTemperatureRequest = serde_json::from_str(r#"{"latitude": 10}"#).unwrap();
/// assert!(partial.end_date.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawTemperatureRequest {
    #[serde(default)]
    pub latitude: Value,
    #[serde(default)]
    pub longitude: Value,
    #[serde(default)]
    pub start_date: Value,
    #[serde(default)]
    pub end_date: Value,
}

impl RawTemperatureRequest {
    /// Convenience constructor for callers that already hold Rust values.
    ///
    /// Non-finite floats become `null`, which the validator rejects as "not a number".
    pub fn new(
        latitude: f64,
        longitude: f64,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            latitude: Value::from(latitude),
            longitude: Value::from(longitude),
            start_date: Value::String(start_date.into()),
            end_date: Value::String(end_date.into()),
        }
    }
}

/// A request that passed every validation rule.
///
/// Only [`crate::validate`] produces values of this type, and its fields cannot be
/// changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationRequest {
    location: LatLon,
    start: NaiveDate,
    end: NaiveDate,
}

impl ValidationRequest {
    pub(crate) fn new(location: LatLon, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            location,
            start,
            end,
        }
    }

    pub fn location(&self) -> LatLon {
        self.location
    }

    pub fn latitude(&self) -> f64 {
        self.location.0
    }

    pub fn longitude(&self) -> f64 {
        self.location.1
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Elapsed time between the start and end dates.
    pub fn span(&self) -> TimeDelta {
        self.end - self.start
    }
}
