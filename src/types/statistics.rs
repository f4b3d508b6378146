use serde::{Deserialize, Serialize};

/// The three quartiles of a series, computed with the exclusive method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

/// Descriptive statistics over a full (never downsampled) temperature series.
///
/// Serializes with the field names callers expect, e.g. `stdDev`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub mean: f64,
    pub median: f64,
    /// Every value sharing the highest frequency, ascending. Never empty.
    pub mode: Vec<f64>,
    /// Population variance.
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub quartiles: Quartiles,
    pub iqr: f64,
}
