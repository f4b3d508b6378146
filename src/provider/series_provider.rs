use crate::provider::error::ProviderError;
use crate::types::request::{LatLon, ValidationRequest};
use crate::types::time_series::TimeSeries;
use async_trait::async_trait;
use chrono::NaiveDate;

/// What to ask the provider for: a point, an inclusive date window and the
/// timezone the hourly readings should be aligned to.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesQuery {
    pub location: LatLon,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub timezone: String,
}

impl SeriesQuery {
    pub fn new(request: &ValidationRequest, timezone: impl Into<String>) -> Self {
        Self {
            location: request.location(),
            start: request.start(),
            end: request.end(),
            timezone: timezone.into(),
        }
    }
}

/// The external source of hourly temperature readings.
///
/// Implementations report every kind of failure (network, HTTP status, bad or
/// empty payload) as a [`ProviderError`]. A returned series is never empty.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    async fn fetch_series(&self, query: &SeriesQuery) -> Result<TimeSeries, ProviderError>;
}
