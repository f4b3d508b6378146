//! Contains [`TimeSeries`], the ordered container of hourly temperature readings
//! that flows from the provider through statistics and downsampling.

use crate::types::error::SeriesError;
use chrono::{DateTime, FixedOffset};

/// An ordered sequence of `(timestamp, value)` readings.
///
/// Timestamps are instants carrying the UTC offset the provider reported them in,
/// so they can be rendered back in the local time of the requested timezone.
///
/// A `TimeSeries` can only be built through [`TimeSeries::new`], which guarantees:
///
/// * `timestamps.len() == values.len()`
/// * timestamps are strictly increasing
///
/// An empty series is a valid value. Consumers that need readings (the
/// statistics engine, the provider) reject empty series themselves.
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, FixedOffset};
/// use tempstats::TimeSeries;
///
/// let t0 = DateTime::<FixedOffset>::parse_from_rfc3339("2024-01-01T00:00:00-03:00").unwrap();
/// let t1 = DateTime::<FixedOffset>::parse_from_rfc3339("2024-01-01T01:00:00-03:00").unwrap();
///
/// let series = TimeSeries::new(vec![t0, t1], vec![21.5, 20.9]).unwrap();
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.values(), &[21.5, 20.9]);
///
/// // Out of order timestamps are rejected.
/// assert!(TimeSeries::new(vec![t1, t0], vec![21.5, 20.9]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<FixedOffset>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Creates a new `TimeSeries`, checking its ordering and length invariants.
    ///
    /// # Errors
    ///
    /// * [`SeriesError::LengthMismatch`] if the two vectors differ in length.
    /// * [`SeriesError::NonIncreasing`] if a timestamp is not strictly after its predecessor.
    pub fn new(
        timestamps: Vec<DateTime<FixedOffset>>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        if timestamps.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                timestamps: timestamps.len(),
                values: values.len(),
            });
        }

        if let Some(index) = timestamps.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(SeriesError::NonIncreasing {
                index: index + 1,
                previous: timestamps[index],
                current: timestamps[index + 1],
            });
        }

        Ok(Self { timestamps, values })
    }

    /// Builds a series from parts already known to satisfy the invariants.
    pub(crate) fn from_ordered_parts(
        timestamps: Vec<DateTime<FixedOffset>>,
        values: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self { timestamps, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<FixedOffset>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterates over `(timestamp, value)` pairs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<FixedOffset>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Consumes the series, returning its timestamps and values.
    pub fn into_parts(self) -> (Vec<DateTime<FixedOffset>>, Vec<f64>) {
        (self.timestamps, self.values)
    }
}
