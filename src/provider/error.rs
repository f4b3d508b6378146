use crate::types::error::SeriesError;
use std::time::Duration;
use thiserror::Error;

/// Any way the external data provider can fail to hand back a usable series.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}{}", reason_suffix(.reason))]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        /// The provider's own explanation, when the error body carried one.
        reason: Option<String>,
        #[source]
        source: reqwest::Error,
    },

    #[error("Provider did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Failed to parse provider payload")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Provider returned an invalid UTC offset of {0} seconds")]
    InvalidOffset(i32),

    #[error("Provider returned an out of range timestamp {0}")]
    InvalidTimestamp(i64),

    #[error("Provider returned an invalid series")]
    InvalidSeries(#[from] SeriesError),

    #[error("Provider returned no temperature readings for the requested window")]
    EmptySeries,
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(": {}", r))
        .unwrap_or_default()
}
