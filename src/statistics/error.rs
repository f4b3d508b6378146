use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsError {
    #[error("Cannot compute statistics over an empty series")]
    EmptySeries,
}
