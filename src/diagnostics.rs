//! Pointwise comparison of two fitted curves.
//!
//! A BD value condenses the gap between two curves into one number. For
//! inspection, [`relative_difference`] samples the gap along the whole
//! domain so a renderer can plot where one codec gains or loses.

use serde::Serialize;

use crate::engine::BdKind;
use crate::interpolation::Interpolate;
use crate::overlap::Overlap;

/// Number of samples used when the caller does not care.
pub const DEFAULT_SAMPLES: usize = 100;

/// One sample of the curve gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifferenceSample {
    /// Abscissa (distortion for BD-Rate curves, log10 rate otherwise).
    pub x: f64,
    /// Anchor curve value at `x`.
    pub anchor: f64,
    /// Test curve value at `x`.
    pub test: f64,
    /// Relative gap of test over anchor, in percent.
    pub percent: f64,
    /// True if `x` lies where both curves were sampled. Values outside are
    /// extrapolated.
    pub in_overlap: bool,
}

/// Sampled gap between two curves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelativeDifference {
    /// Curve kind the samples were computed for.
    pub kind: BdKind,
    /// Common domain of the two curves.
    pub overlap: Overlap,
    /// Samples ordered by `x`.
    pub samples: Vec<DifferenceSample>,
}

impl RelativeDifference {
    /// Samples inside the common domain.
    pub fn overlapping(&self) -> impl Iterator<Item = &DifferenceSample> {
        self.samples.iter().filter(|s| s.in_overlap)
    }
}

/// Sample the gap between `anchor` and `test` at `samples` evenly spaced
/// points across the union of their domains.
///
/// For [`BdKind::Rate`] curves the values are `log10(rate)` and the gap is
/// `(10^(test - anchor) - 1) * 100`, the local counterpart of BD-Rate. For
/// [`BdKind::Linear`] curves the gap is `(test - anchor) / |anchor| * 100`.
/// At least two samples (the union end points) are always returned.
///
/// # Example
///
/// ```
/// use bd_metric::diagnostics::relative_difference;
/// use bd_metric::engine::BdKind;
/// use bd_metric::interpolation::{Interpolant, InterpolationMethod};
///
/// let anchor = Interpolant::build(InterpolationMethod::Pchip, &[30.0, 40.0], &[3.0, 4.0]).unwrap();
/// let test = Interpolant::build(InterpolationMethod::Pchip, &[30.0, 40.0], &[2.0, 3.0]).unwrap();
/// let diff = relative_difference(&anchor, &test, BdKind::Rate, 5);
/// assert_eq!(diff.samples.len(), 5);
/// assert!(diff.samples.iter().all(|s| (s.percent + 90.0).abs() < 1e-9));
/// ```
pub fn relative_difference<A, T>(
    anchor: &A,
    test: &T,
    kind: BdKind,
    samples: usize,
) -> RelativeDifference
where
    A: Interpolate + ?Sized,
    T: Interpolate + ?Sized,
{
    let (a_min, a_max) = anchor.domain();
    let (t_min, t_max) = test.domain();
    let overlap = Overlap::between((a_min, a_max), (t_min, t_max));
    let lo = a_min.min(t_min);
    let hi = a_max.max(t_max);

    let n = samples.max(2);
    let dx = (hi - lo) / (n - 1) as f64;

    let samples = (0..n)
        .map(|i| {
            // Pin the last sample to the exact end point
            let x = if i == n - 1 { hi } else { lo + dx * i as f64 };
            let a = anchor.evaluate(x);
            let t = test.evaluate(x);
            DifferenceSample {
                x,
                anchor: a,
                test: t,
                percent: gap_percent(kind, a, t),
                in_overlap: !overlap.is_empty() && x >= overlap.min && x <= overlap.max,
            }
        })
        .collect();

    RelativeDifference {
        kind,
        overlap,
        samples,
    }
}

fn gap_percent(kind: BdKind, anchor: f64, test: f64) -> f64 {
    match kind {
        BdKind::Rate => (10_f64.powf(test - anchor) - 1.0) * 100.0,
        BdKind::Linear => (test - anchor) / anchor.abs() * 100.0,
    }
}
