//! Descriptive statistics over BD values.
//!
//! BD computations can legitimately return NaN (non-overlapping curves), so
//! aggregation works on the finite subset and reports how many values were
//! left out.

use serde::{Deserialize, Serialize};

/// Descriptive statistics for a set of BD values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of finite values aggregated.
    pub count: usize,
    /// Number of non-finite values that were left out.
    pub skipped: usize,
    /// Mean value.
    pub mean: f64,
    /// Median value.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 75th percentile.
    pub p75: f64,
}

impl Summary {
    /// Compute summary statistics over the finite values of a slice.
    ///
    /// Returns `None` if no value is finite.
    ///
    /// # Example
    ///
    /// ```
    /// use bd_metric::stats::Summary;
    ///
    /// let summary = Summary::compute(&[-4.0, f64::NAN, -2.0, -6.0]).unwrap();
    /// assert_eq!(summary.count, 3);
    /// assert_eq!(summary.skipped, 1);
    /// assert!((summary.mean + 4.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        let (&min, &max) = (sorted.first()?, sorted.last()?);

        let count = sorted.len();
        let mean = mean(&sorted);
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            skipped: values.len() - count,
            mean,
            median: percentile_sorted(&sorted, 0.5),
            std_dev: variance.sqrt(),
            min,
            max,
            p25: percentile_sorted(&sorted, 0.25),
            p75: percentile_sorted(&sorted, 0.75),
        })
    }
}

/// Arithmetic mean; 0 for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; for even lengths the average of the two middle values.
///
/// ```
/// use bd_metric::stats::median;
///
/// assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
/// assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
/// ```
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, 0.5)
}

/// Percentile (`p` in `[0, 1]`) of pre-sorted values, linear interpolation
/// between closest ranks.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [only] => *only,
        _ => {
            let idx = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
            let lower = idx.floor() as usize;
            let upper = idx.ceil() as usize;
            let frac = idx - lower as f64;
            sorted[lower] * (1.0 - frac) + sorted[upper] * frac
        }
    }
}
