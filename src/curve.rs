//! Rate-distortion curves and sample normalization.
//!
//! Measured RD points usually arrive ordered from highest to lowest quality
//! setting, i.e. with descending rate. Interpolation needs increasing
//! abscissae, so [`normalize`] reverses both sequences together when the
//! independent variable runs backwards.

use serde::Serialize;

use crate::error::{CurveRole, Error, Result};

/// Minimum number of samples for any interpolation strategy.
pub const MIN_POINTS: usize = 2;

/// Bring an `(x, y)` sample sequence into increasing `x` order.
///
/// If `x` ends lower than it starts, both sequences are reversed. This is
/// only valid when `y` runs in the same direction, which is checked on the
/// end points; a descending `x` paired with a non-descending `y` yields
/// [`Error::MonotonicityViolation`].
///
/// Sequences that already increase are returned unchanged, so normalization
/// is idempotent.
///
/// # Example
///
/// ```
/// use bd_metric::curve::normalize;
/// use bd_metric::CurveRole;
///
/// let (x, y) = normalize(CurveRole::Anchor, &[4.0, 2.0, 1.0], &[30.0, 25.0, 20.0]).unwrap();
/// assert_eq!(x, vec![1.0, 2.0, 4.0]);
/// assert_eq!(y, vec![20.0, 25.0, 30.0]);
/// ```
pub fn normalize(curve: CurveRole, x: &[f64], y: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    let (Some(&x_first), Some(&x_last)) = (x.first(), x.last()) else {
        return Ok((x.to_vec(), y.to_vec()));
    };

    if x_last < x_first {
        let descending_y = match (y.first(), y.last()) {
            (Some(&y_first), Some(&y_last)) => y_last < y_first,
            _ => false,
        };
        if !descending_y {
            return Err(Error::MonotonicityViolation { curve });
        }
        let x = x.iter().rev().copied().collect();
        let y = y.iter().rev().copied().collect();
        Ok((x, y))
    } else {
        Ok((x.to_vec(), y.to_vec()))
    }
}

/// A validated rate-distortion curve, normalized to increasing rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RdCurve {
    rate: Vec<f64>,
    distortion: Vec<f64>,
}

impl RdCurve {
    /// Validate and normalize a curve from parallel rate and distortion arrays.
    ///
    /// Rejects mismatched lengths, fewer than [`MIN_POINTS`] samples,
    /// non-finite values, and non-positive rates (their logarithm is undefined).
    pub fn new(curve: CurveRole, rate: &[f64], distortion: &[f64]) -> Result<Self> {
        if rate.len() != distortion.len() {
            return Err(Error::ShapeMismatch {
                curve,
                rate: rate.len(),
                distortion: distortion.len(),
            });
        }
        if rate.len() < MIN_POINTS {
            return Err(Error::TooFewPoints {
                curve,
                points: rate.len(),
                required: MIN_POINTS,
            });
        }
        if let Some(index) = rate.iter().position(|r| !r.is_finite() || *r <= 0.0) {
            return Err(Error::InvalidSample {
                curve,
                index,
                value: rate[index],
            });
        }
        if let Some(index) = distortion.iter().position(|d| !d.is_finite()) {
            return Err(Error::InvalidSample {
                curve,
                index,
                value: distortion[index],
            });
        }

        let (rate, distortion) = normalize(curve, rate, distortion)?;
        Ok(Self { rate, distortion })
    }

    /// Rates in increasing order.
    #[must_use]
    pub fn rate(&self) -> &[f64] {
        &self.rate
    }

    /// Distortion values, parallel to [`Self::rate`].
    #[must_use]
    pub fn distortion(&self) -> &[f64] {
        &self.distortion
    }

    /// Base-10 logarithm of each rate.
    #[must_use]
    pub fn log_rate(&self) -> Vec<f64> {
        self.rate.iter().map(|r| r.log10()).collect()
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rate.len()
    }

    /// Always false for a constructed curve; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rate.is_empty()
    }
}
