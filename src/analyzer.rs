//! This module provides the main entry point of the crate: [`TemperatureAnalyzer`],
//! which validates a request, fetches the hourly readings from a provider, computes
//! statistics over them and downsamples the series for charting.

use crate::downsample::downsampler::{downsample_by, DownsampleFactor};
use crate::error::AnalyzerError;
use crate::provider::error::ProviderError;
use crate::provider::open_meteo::OpenMeteoProvider;
use crate::provider::series_provider::{SeriesProvider, SeriesQuery};
use crate::types::request::RawTemperatureRequest;
use crate::types::response::TemperatureResponse;
use crate::types::statistics::Statistics;
use crate::types::time_series::TimeSeries;
use crate::validation::validator::{default_max_window, validate};
use bon::{bon, Builder};
use chrono::{DateTime, TimeDelta, Utc};
use log::{info, warn};
use std::time::Duration;

/// How long the provider gets to answer before the request fails.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Timezone the hourly readings are aligned to unless configured otherwise.
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Settings for a [`TemperatureAnalyzer`]. Every field has a default.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use std::time::Duration;
/// use tempstats::{AnalyzerConfig, MAX_WINDOW_DAYS};
///
/// let config = AnalyzerConfig::default();
/// assert_eq!(config.max_window, TimeDelta::days(MAX_WINDOW_DAYS));
///
/// let config = AnalyzerConfig::builder()
///     .max_window(TimeDelta::days(30))
///     .provider_timeout(Duration::from_secs(5))
///     .timezone("UTC")
///     .build();
/// assert_eq!(config.timezone, "UTC");
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct AnalyzerConfig {
    /// Longest accepted window between start and end date.
    #[builder(default = default_max_window())]
    pub max_window: TimeDelta,
    /// Upper bound on a single provider call.
    #[builder(default = DEFAULT_PROVIDER_TIMEOUT)]
    pub provider_timeout: Duration,
    /// IANA timezone passed to the provider.
    #[builder(into, default = DEFAULT_TIMEZONE.to_string())]
    pub timezone: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Runs the validate, fetch, summarize and downsample pipeline for one request at a time.
///
/// The analyzer only holds its configuration and the provider, and never mutates
/// either, so one instance can serve any number of concurrent requests through `&self`.
///
/// # Examples
///
/// ```no_run
/// use tempstats::{AnalyzerError, RawTemperatureRequest, TemperatureAnalyzer};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), AnalyzerError> {
/// let analyzer = TemperatureAnalyzer::open_meteo();
///
/// let raw = RawTemperatureRequest::new(-23.55, -46.63, "2024-01-01", "2024-06-30");
/// let response = analyzer.analyze(&raw).await?;
///
/// println!("Mean temperature: {:.1}", response.statistics.mean);
/// println!("{} chart points", response.temperatures.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TemperatureAnalyzer<P = OpenMeteoProvider> {
    provider: P,
    config: AnalyzerConfig,
}

impl TemperatureAnalyzer<OpenMeteoProvider> {
    /// An analyzer backed by the public Open-Meteo archive, with default settings.
    pub fn open_meteo() -> Self {
        Self {
            provider: OpenMeteoProvider::default(),
            config: AnalyzerConfig::default(),
        }
    }
}

#[bon]
impl<P: SeriesProvider> TemperatureAnalyzer<P> {
    /// Creates an analyzer around any [`SeriesProvider`].
    ///
    /// # Arguments
    ///
    /// * `.provider(P)`: **Required.** Where hourly readings come from.
    /// * `.config(AnalyzerConfig)`: Optional. Defaults to [`AnalyzerConfig::default()`].
    #[builder]
    pub fn new(provider: P, config: Option<AnalyzerConfig>) -> Self {
        Self {
            provider,
            config: config.unwrap_or_default(),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes `raw` against the current time.
    ///
    /// # Errors
    ///
    /// * [`AnalyzerError::Validation`] if the request breaks a rule; the provider is not called.
    /// * [`AnalyzerError::Provider`] if the fetch fails, times out or returns no readings.
    /// * [`AnalyzerError::Statistics`] if statistics are requested over no readings.
    /// * [`AnalyzerError::Downsample`] if no downsample factor covers the requested span.
    ///
    /// No partial response is returned alongside an error.
    pub async fn analyze(
        &self,
        raw: &RawTemperatureRequest,
    ) -> Result<TemperatureResponse, AnalyzerError> {
        self.analyze_at(raw, Utc::now()).await
    }

    /// Same as [`TemperatureAnalyzer::analyze`], with `now` deciding the data cutoff.
    pub async fn analyze_at(
        &self,
        raw: &RawTemperatureRequest,
        now: DateTime<Utc>,
    ) -> Result<TemperatureResponse, AnalyzerError> {
        let request = validate(raw, now, self.config.max_window)?;
        // Decided from the validated span alone, before anything is downloaded.
        let factor = DownsampleFactor::for_request(&request)?;

        let query = SeriesQuery::new(&request, self.config.timezone.as_str());
        let series = self.fetch(&query).await?;

        // Statistics always describe the full series, only the chart gets downsampled.
        let statistics = Statistics::compute(series.values())?;
        let chart_series = downsample_by(series, factor);

        info!(
            "Analyzed {} to {}: {} chart points, mean {:.2}",
            request.start(),
            request.end(),
            chart_series.len(),
            statistics.mean
        );
        Ok(TemperatureResponse::new(chart_series, statistics))
    }

    async fn fetch(&self, query: &SeriesQuery) -> Result<TimeSeries, ProviderError> {
        let timeout = self.config.provider_timeout;
        let result = match tokio::time::timeout(timeout, self.provider.fetch_series(query)).await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(timeout)),
        };

        match result {
            Ok(series) if series.is_empty() => {
                warn!("Provider returned an empty series for {:?}", query);
                Err(ProviderError::EmptySeries)
            }
            Ok(series) => Ok(series),
            Err(e) => {
                warn!("Fetching temperatures for {:?} failed: {}", query, e);
                Err(e)
            }
        }
    }
}
