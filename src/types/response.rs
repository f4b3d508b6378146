//! Outbound payloads for a successful analysis and for a failed one.

use crate::error::AnalyzerError;
use crate::types::statistics::Statistics;
use crate::types::time_series::TimeSeries;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

/// The chart-ready series together with statistics over the full series.
///
/// `timestamps` and `temperatures` describe the (possibly downsampled) series;
/// `statistics` always describes every reading the provider returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResponse {
    pub timestamps: Vec<String>,
    pub temperatures: Vec<f64>,
    pub statistics: Statistics,
}

impl TemperatureResponse {
    pub fn new(chart_series: TimeSeries, statistics: Statistics) -> Self {
        let (timestamps, temperatures) = chart_series.into_parts();
        Self {
            timestamps: timestamps
                .iter()
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, false))
                .collect(),
            temperatures,
            statistics,
        }
    }
}

/// Body returned to callers when any stage of the pipeline fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&AnalyzerError> for ErrorResponse {
    fn from(err: &AnalyzerError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
