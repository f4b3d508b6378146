//! Reduces a long series to something a chart can draw, by averaging fixed-size
//! buckets of consecutive readings. The bucket width comes from the requested span.

use crate::downsample::error::DownsampleError;
use crate::types::request::ValidationRequest;
use crate::types::time_series::TimeSeries;
use chrono::{Months, NaiveDate};
use log::debug;
use std::fmt;
use std::num::NonZeroUsize;

/// `(span shorter than this many calendar months, factor)`, checked in order.
const FACTOR_STEPS: [(u32, usize); 8] = [
    (3, 1),
    (6, 2),
    (9, 3),
    (12, 4),
    (18, 6),
    (24, 8),
    (36, 12),
    (60, 24),
];

/// Spans of this many calendar months or more have no factor.
pub const MAX_SPAN_MONTHS: u32 = FACTOR_STEPS[FACTOR_STEPS.len() - 1].0;

/// The number of consecutive readings averaged into one chart point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DownsampleFactor(NonZeroUsize);

impl DownsampleFactor {
    /// Leaves the series untouched.
    pub const IDENTITY: DownsampleFactor = DownsampleFactor(NonZeroUsize::MIN);

    /// Returns `None` for zero.
    pub fn new(factor: usize) -> Option<Self> {
        NonZeroUsize::new(factor).map(Self)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Picks the factor for the span between `start` and `end`.
    ///
    /// The span is measured in calendar months elapsed from `start`:
    ///
    /// | span shorter than | factor |
    /// |---|---|
    /// | 3 months | 1 |
    /// | 6 months | 2 |
    /// | 9 months | 3 |
    /// | 12 months | 4 |
    /// | 18 months | 6 |
    /// | 24 months | 8 |
    /// | 36 months | 12 |
    /// | 60 months | 24 |
    ///
    /// # Errors
    ///
    /// * [`DownsampleError::SpanTooLarge`] for spans of [`MAX_SPAN_MONTHS`] or more.
    /// * [`DownsampleError::InvertedSpan`] when `end` is before `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tempstats::DownsampleFactor;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(); // 100 days
    /// assert_eq!(DownsampleFactor::for_span(start, end).unwrap().get(), 2);
    /// ```
    pub fn for_span(start: NaiveDate, end: NaiveDate) -> Result<Self, DownsampleError> {
        if end < start {
            return Err(DownsampleError::InvertedSpan { start, end });
        }

        for (months, factor) in FACTOR_STEPS {
            let Some(limit) = start.checked_add_months(Months::new(months)) else {
                break;
            };
            if end < limit {
                let factor = Self::new(factor).unwrap_or(Self::IDENTITY);
                debug!(
                    "Span {} to {} is under {} months, downsample factor {}",
                    start, end, months, factor
                );
                return Ok(factor);
            }
        }

        Err(DownsampleError::SpanTooLarge {
            start,
            end,
            max_months: MAX_SPAN_MONTHS,
        })
    }

    /// Picks the factor for a validated request's span.
    pub fn for_request(request: &ValidationRequest) -> Result<Self, DownsampleError> {
        Self::for_span(request.start(), request.end())
    }
}

impl fmt::Display for DownsampleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Averages consecutive, non-overlapping buckets of `factor` readings.
///
/// Each output point has the first timestamp of its bucket and the mean of its
/// values. A trailing bucket with fewer than `factor` readings is dropped. A factor
/// of one returns `series` itself.
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, Duration, FixedOffset};
/// use tempstats::{downsample_by, DownsampleFactor, TimeSeries};
///
/// let t0 = DateTime::<FixedOffset>::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
/// let timestamps = (0..5).map(|h| t0 + Duration::hours(h)).collect();
/// let series = TimeSeries::new(timestamps, vec![1.0, 3.0, 5.0, 7.0, 9.0]).unwrap();
///
/// let reduced = downsample_by(series, DownsampleFactor::new(2).unwrap());
/// assert_eq!(reduced.values(), &[2.0, 6.0]);
/// assert_eq!(reduced.timestamps()[1], t0 + Duration::hours(2));
/// ```
pub fn downsample_by(series: TimeSeries, factor: DownsampleFactor) -> TimeSeries {
    if factor == DownsampleFactor::IDENTITY {
        return series;
    }

    let width = factor.get();
    let timestamps = series.timestamps().iter().step_by(width);
    let buckets = series.values().chunks_exact(width);

    let (timestamps, values): (Vec<_>, Vec<_>) = timestamps
        .zip(buckets)
        .map(|(&ts, bucket)| (ts, bucket.iter().sum::<f64>() / width as f64))
        .unzip();

    TimeSeries::from_ordered_parts(timestamps, values)
}

/// Downsamples `series` with the factor chosen for the span `start..=end`.
///
/// The factor depends only on the span, never on how many readings `series` holds.
pub fn downsample(
    series: TimeSeries,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<TimeSeries, DownsampleError> {
    let factor = DownsampleFactor::for_span(start, end)?;
    Ok(downsample_by(series, factor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, FixedOffset, TimeDelta, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn factor_after_days(days: i64) -> Result<usize, DownsampleError> {
        let start = date(2023, 1, 1);
        DownsampleFactor::for_span(start, start + TimeDelta::days(days)).map(DownsampleFactor::get)
    }

    fn hourly_series(values: Vec<f64>) -> TimeSeries {
        let start: DateTime<FixedOffset> = FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2023, 1, 1, 0, 0, 0)
            .unwrap();
        let timestamps = (0..values.len())
            .map(|h| start + Duration::hours(h as i64))
            .collect();
        TimeSeries::new(timestamps, values).unwrap()
    }

    #[test]
    fn test_factor_examples() {
        assert_eq!(factor_after_days(0), Ok(1));
        assert_eq!(factor_after_days(100), Ok(2));
        // 400 days is past 12 months but short of 18.
        assert_eq!(factor_after_days(400), Ok(6));
    }

    #[test]
    fn test_factor_table_boundaries() {
        let start = date(2023, 1, 15);
        let cases = [
            (date(2023, 4, 14), 1),
            (date(2023, 4, 15), 2),
            (date(2023, 7, 14), 2),
            (date(2023, 7, 15), 3),
            (date(2023, 10, 15), 4),
            (date(2024, 1, 15), 6),
            (date(2024, 7, 15), 8),
            (date(2025, 1, 15), 12),
            (date(2026, 1, 15), 24),
            (date(2028, 1, 14), 24),
        ];
        for (end, expected) in cases {
            assert_eq!(
                DownsampleFactor::for_span(start, end).map(DownsampleFactor::get),
                Ok(expected),
                "span {} to {}",
                start,
                end
            );
        }
    }

    #[test]
    fn test_span_too_large() {
        let start = date(2020, 1, 1);
        assert_eq!(
            DownsampleFactor::for_span(start, date(2025, 1, 1)),
            Err(DownsampleError::SpanTooLarge {
                start,
                end: date(2025, 1, 1),
                max_months: 60
            })
        );
        assert!(DownsampleFactor::for_span(start, date(2024, 12, 31)).is_ok());
    }

    #[test]
    fn test_inverted_span() {
        assert!(matches!(
            DownsampleFactor::for_span(date(2024, 2, 1), date(2024, 1, 1)),
            Err(DownsampleError::InvertedSpan { .. })
        ));
    }

    #[test]
    fn test_identity_returns_series_unchanged() {
        let series = hourly_series(vec![1.5, 2.5, 3.5]);
        let expected = series.clone();
        assert_eq!(downsample_by(series, DownsampleFactor::IDENTITY), expected);
    }

    #[test]
    fn test_trailing_partial_bucket_dropped() {
        let series = hourly_series((1..=10).map(f64::from).collect());
        let first_timestamps: Vec<_> = series.timestamps().iter().step_by(3).copied().collect();

        let reduced = downsample_by(series, DownsampleFactor::new(3).unwrap());

        assert_eq!(reduced.len(), 3);
        assert_eq!(reduced.values(), &[2.0, 5.0, 8.0]);
        assert_eq!(reduced.timestamps(), &first_timestamps[..3]);
    }

    #[test]
    fn test_series_shorter_than_factor() {
        let reduced = downsample_by(
            hourly_series(vec![1.0, 2.0]),
            DownsampleFactor::new(4).unwrap(),
        );
        assert!(reduced.is_empty());
    }

    #[test]
    fn test_downsample_uses_span_not_length() {
        // Six months and a bit: factor 3, even though only six readings came back.
        let series = hourly_series(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let reduced = downsample(series, date(2023, 1, 1), date(2023, 7, 10)).unwrap();
        assert_eq!(reduced.values(), &[2.0, 5.0]);
    }

    #[test]
    fn test_zero_factor_rejected() {
        assert_eq!(DownsampleFactor::new(0), None);
        assert_eq!(DownsampleFactor::IDENTITY.get(), 1);
    }
}
