use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DownsampleError {
    #[error("Span from {start} to {end} is {max_months} months or longer, no downsample factor is defined for it")]
    SpanTooLarge {
        start: NaiveDate,
        end: NaiveDate,
        max_months: u32,
    },

    #[error("Span end {end} is before its start {start}")]
    InvertedSpan { start: NaiveDate, end: NaiveDate },
}
