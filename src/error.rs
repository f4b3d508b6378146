use crate::downsample::error::DownsampleError;
use crate::provider::error::ProviderError;
use crate::statistics::error::StatisticsError;
use crate::validation::error::ValidationError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error fetching weather data: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Statistics(#[from] StatisticsError),

    #[error(transparent)]
    Downsample(#[from] DownsampleError),
}

impl AnalyzerError {
    /// The HTTP status class a caller should answer with.
    ///
    /// Validation failures are the caller's fault; provider failures are not, so
    /// they map to a gateway status instead.
    pub fn status(&self) -> StatusCode {
        match self {
            AnalyzerError::Validation(_) => StatusCode::BAD_REQUEST,
            AnalyzerError::Provider(ProviderError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AnalyzerError::Provider(_) => StatusCode::BAD_GATEWAY,
            AnalyzerError::Downsample(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AnalyzerError::Statistics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
