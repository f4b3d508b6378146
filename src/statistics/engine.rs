//! Descriptive statistics over a slice of temperature readings.
//!
//! Every function rejects an empty slice with [`StatisticsError::EmptySeries`]
//! before doing any arithmetic, so no caller ever sees a `NaN` produced by a
//! division by zero. Inputs are never mutated; order-dependent statistics sort a copy.

use crate::statistics::error::StatisticsError;
use crate::types::statistics::{Quartiles, Statistics};
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

fn ensure_non_empty(xs: &[f64]) -> Result<(), StatisticsError> {
    if xs.is_empty() {
        Err(StatisticsError::EmptySeries)
    } else {
        Ok(())
    }
}

fn sorted_copy(xs: &[f64]) -> Vec<f64> {
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Median of an already sorted slice. `None` when the slice is empty.
fn median_of_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Exclusive-method quartiles of an already sorted, non-empty slice.
///
/// The slice is split at `n / 2`; for odd `n` the middle element belongs to neither
/// half. A single reading has two empty halves, so all three quartiles are that reading.
fn quartiles_of_sorted(sorted: &[f64]) -> Option<Quartiles> {
    let q2 = median_of_sorted(sorted)?;
    let mid = sorted.len() / 2;
    let lower = &sorted[..mid];
    let upper = if sorted.len() % 2 == 0 {
        &sorted[mid..]
    } else {
        &sorted[mid + 1..]
    };
    Some(Quartiles {
        q1: median_of_sorted(lower).unwrap_or(q2),
        q2,
        q3: median_of_sorted(upper).unwrap_or(q2),
    })
}

fn mean_unchecked(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn variance_unchecked(xs: &[f64]) -> f64 {
    let m = mean_unchecked(xs);
    xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64
}

/// Arithmetic mean.
pub fn mean(xs: &[f64]) -> Result<f64, StatisticsError> {
    ensure_non_empty(xs)?;
    Ok(mean_unchecked(xs))
}

/// Middle value of the sorted readings, or the mean of the two middle values
/// when the count is even.
///
/// # Examples
///
/// ```
/// use tempstats::median;
///
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Ok(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Ok(2.5));
/// ```
pub fn median(xs: &[f64]) -> Result<f64, StatisticsError> {
    median_of_sorted(&sorted_copy(xs)).ok_or(StatisticsError::EmptySeries)
}

/// All values that occur with the highest frequency, sorted ascending.
///
/// The result does not depend on the order of the input.
///
/// # Examples
///
/// ```
/// use tempstats::mode;
///
/// assert_eq!(mode(&[2.0, 1.0, 2.0, 1.0, 3.0]), Ok(vec![1.0, 2.0]));
/// ```
pub fn mode(xs: &[f64]) -> Result<Vec<f64>, StatisticsError> {
    ensure_non_empty(xs)?;

    let mut counts: BTreeMap<OrderedFloat<f64>, usize> = BTreeMap::new();
    for &x in xs {
        *counts.entry(OrderedFloat(x)).or_insert(0) += 1;
    }
    let max_count = counts.values().copied().max().unwrap_or(0);

    Ok(counts
        .into_iter()
        .filter(|&(_, count)| count == max_count)
        .map(|(value, _)| value.into_inner())
        .collect())
}

/// Population variance: the mean squared deviation, divided by `n`.
pub fn variance(xs: &[f64]) -> Result<f64, StatisticsError> {
    ensure_non_empty(xs)?;
    Ok(variance_unchecked(xs))
}

/// Population standard deviation.
pub fn std_dev(xs: &[f64]) -> Result<f64, StatisticsError> {
    variance(xs).map(f64::sqrt)
}

pub fn min(xs: &[f64]) -> Result<f64, StatisticsError> {
    xs.iter()
        .copied()
        .reduce(f64::min)
        .ok_or(StatisticsError::EmptySeries)
}

pub fn max(xs: &[f64]) -> Result<f64, StatisticsError> {
    xs.iter()
        .copied()
        .reduce(f64::max)
        .ok_or(StatisticsError::EmptySeries)
}

/// Quartiles by the exclusive method.
///
/// `q2` is the median. The sorted readings are split at `n / 2`: the lower half is
/// everything before that index, the upper half everything from it when `n` is even
/// and everything after it when `n` is odd. `q1` and `q3` are the medians of the halves.
///
/// # Examples
///
/// ```
/// use tempstats::{quartiles, Quartiles};
///
/// assert_eq!(
///     quartiles(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]),
///     Ok(Quartiles { q1: 2.0, q2: 4.0, q3: 6.0 })
/// );
/// ```
pub fn quartiles(xs: &[f64]) -> Result<Quartiles, StatisticsError> {
    quartiles_of_sorted(&sorted_copy(xs)).ok_or(StatisticsError::EmptySeries)
}

/// Interquartile range, `q3 - q1`.
pub fn iqr(xs: &[f64]) -> Result<f64, StatisticsError> {
    quartiles(xs).map(|q| q.q3 - q.q1)
}

impl Statistics {
    /// Computes every statistic over `xs`, sorting a single copy for the
    /// order-dependent ones.
    ///
    /// # Errors
    ///
    /// Returns [`StatisticsError::EmptySeries`] when `xs` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempstats::Statistics;
    ///
    /// let stats = Statistics::compute(&[1.0, 2.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(stats.mean, 2.0);
    /// assert_eq!(stats.mode, vec![2.0]);
    /// assert_eq!(stats.iqr, 1.0);
    /// ```
    pub fn compute(xs: &[f64]) -> Result<Self, StatisticsError> {
        ensure_non_empty(xs)?;

        let sorted = sorted_copy(xs);
        let quartiles = quartiles_of_sorted(&sorted).ok_or(StatisticsError::EmptySeries)?;
        let variance = variance_unchecked(xs);

        Ok(Statistics {
            mean: mean_unchecked(xs),
            median: quartiles.q2,
            mode: mode(xs)?,
            variance,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            quartiles,
            iqr: quartiles.q3 - quartiles.q1,
        })
    }
}
