mod analyzer;
mod downsample;
mod error;
mod provider;
mod statistics;
mod types;
mod validation;

pub use analyzer::*;
pub use error::AnalyzerError;

pub use validation::error::ValidationError;
pub use validation::validator::{
    default_max_window, validate, DATA_AVAILABILITY_LAG_HOURS, EARLIEST_START_DATE,
    MAX_WINDOW_DAYS,
};

pub use statistics::engine::{iqr, max, mean, median, min, mode, quartiles, std_dev, variance};
pub use statistics::error::StatisticsError;

pub use downsample::downsampler::{downsample, downsample_by, DownsampleFactor, MAX_SPAN_MONTHS};
pub use downsample::error::DownsampleError;

pub use provider::error::ProviderError;
pub use provider::open_meteo::{OpenMeteoProvider, OPEN_METEO_ARCHIVE_URL};
pub use provider::series_provider::{SeriesProvider, SeriesQuery};

pub use types::error::SeriesError;
pub use types::request::{LatLon, RawTemperatureRequest, ValidationRequest};
pub use types::response::{ErrorResponse, TemperatureResponse};
pub use types::statistics::{Quartiles, Statistics};
pub use types::time_series::TimeSeries;
