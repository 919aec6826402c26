//! Piecewise cubic polynomials over sorted breakpoints.
//!
//! Shared representation for the local strategies (PCHIP, Akima) and the
//! two-point linear fallback. Each segment stores its polynomial in the local
//! variable `d = x - x_i`, so evaluation and the closed-form integral are both
//! short Horner evaluations.

use serde::Serialize;

use super::Interpolate;
use crate::error::{Error, Result};

/// Fewest breakpoints that define a segment.
const MIN_POINTS: usize = 2;

/// Piecewise cubic interpolant.
///
/// Outside the breakpoint range the first and last segment polynomials are
/// extended, so evaluation and integration are defined on the whole real line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PiecewiseCubic {
    breakpoints: Vec<f64>,
    /// `[c0, c1, c2, c3]` per segment: `c0 + c1*d + c2*d^2 + c3*d^3`.
    coefficients: Vec<[f64; 4]>,
    /// Integral from the first breakpoint to each breakpoint.
    #[serde(skip)]
    cumulative: Vec<f64>,
}

impl PiecewiseCubic {
    /// Build a cubic Hermite interpolant from values and first derivatives at
    /// each breakpoint.
    ///
    /// `x` must be strictly increasing and all three slices must have the
    /// same length of at least 2.
    ///
    /// # Example
    ///
    /// ```
    /// use bd_metric::interpolation::{Interpolate, PiecewiseCubic};
    ///
    /// let p = PiecewiseCubic::hermite(&[0.0, 1.0], &[0.0, 1.0], &[0.0, 3.0])?;
    /// assert!((p.evaluate(0.5) - 0.125).abs() < 1e-12);
    /// assert!(PiecewiseCubic::hermite(&[0.0, 1.0], &[0.0, 1.0], &[0.0]).is_err());
    /// # Ok::<(), bd_metric::Error>(())
    /// ```
    pub fn hermite(x: &[f64], y: &[f64], slopes: &[f64]) -> Result<Self> {
        check_samples("hermite", x, y, MIN_POINTS)?;
        if slopes.len() != x.len() {
            return Err(Error::Interpolation {
                method: "hermite".to_string(),
                reason: format!("{} abscissae but {} slopes", x.len(), slopes.len()),
            });
        }
        if slopes.iter().any(|v| !v.is_finite()) {
            return Err(Error::Interpolation {
                method: "hermite".to_string(),
                reason: "slopes must be finite".to_string(),
            });
        }

        let coefficients = x
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let h = w[1] - w[0];
                let secant = (y[i + 1] - y[i]) / h;
                [
                    y[i],
                    slopes[i],
                    (3.0 * secant - 2.0 * slopes[i] - slopes[i + 1]) / h,
                    (slopes[i] + slopes[i + 1] - 2.0 * secant) / (h * h),
                ]
            })
            .collect();
        Ok(Self::from_coefficients(x.to_vec(), coefficients))
    }

    /// Build a piecewise linear interpolant through the samples.
    ///
    /// Same preconditions as [`Self::hermite`] on `x` and `y`.
    pub fn linear(x: &[f64], y: &[f64]) -> Result<Self> {
        check_samples("linear", x, y, MIN_POINTS)?;
        let coefficients = x
            .windows(2)
            .enumerate()
            .map(|(i, w)| [y[i], (y[i + 1] - y[i]) / (w[1] - w[0]), 0.0, 0.0])
            .collect();
        Ok(Self::from_coefficients(x.to_vec(), coefficients))
    }

    fn from_coefficients(breakpoints: Vec<f64>, coefficients: Vec<[f64; 4]>) -> Self {
        let mut cumulative = Vec::with_capacity(breakpoints.len());
        cumulative.push(0.0);
        let mut total = 0.0;
        for (i, c) in coefficients.iter().enumerate() {
            total += primitive(c, breakpoints[i + 1] - breakpoints[i]);
            cumulative.push(total);
        }

        Self {
            breakpoints,
            coefficients,
            cumulative,
        }
    }

    /// Breakpoints (the sample abscissae).
    #[must_use]
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Per-segment coefficients in increasing power of `x - x_i`.
    #[must_use]
    pub fn coefficients(&self) -> &[[f64; 4]] {
        &self.coefficients
    }

    /// Index of the segment whose polynomial applies at `x`.
    fn segment(&self, x: f64) -> usize {
        let upper = self.breakpoints.partition_point(|&b| b <= x);
        upper.saturating_sub(1).min(self.coefficients.len() - 1)
    }

    /// Integral from the first breakpoint to `x`.
    fn antiderivative(&self, x: f64) -> f64 {
        let i = self.segment(x);
        self.cumulative[i] + primitive(&self.coefficients[i], x - self.breakpoints[i])
    }
}

impl Interpolate for PiecewiseCubic {
    fn evaluate(&self, x: f64) -> f64 {
        let i = self.segment(x);
        let c = &self.coefficients[i];
        let d = x - self.breakpoints[i];
        c[0] + d * (c[1] + d * (c[2] + d * c[3]))
    }

    fn integrate(&self, lower: f64, upper: f64) -> f64 {
        self.antiderivative(upper) - self.antiderivative(lower)
    }

    fn domain(&self) -> (f64, f64) {
        (
            self.breakpoints[0],
            self.breakpoints[self.breakpoints.len() - 1],
        )
    }
}

/// Integral of one segment polynomial from its left breakpoint to offset `d`.
fn primitive(c: &[f64; 4], d: f64) -> f64 {
    d * (c[0] + d * (c[1] / 2.0 + d * (c[2] / 3.0 + d * c[3] / 4.0)))
}

/// Check the preconditions shared by the piecewise strategies: equal lengths,
/// at least `min_points` samples, finite values, strictly increasing `x`.
pub(crate) fn check_samples(method: &str, x: &[f64], y: &[f64], min_points: usize) -> Result<()> {
    let fail = |reason: String| {
        Err(Error::Interpolation {
            method: method.to_string(),
            reason,
        })
    };

    if x.len() != y.len() {
        return fail(format!("{} abscissae but {} values", x.len(), y.len()));
    }
    if x.len() < min_points {
        return fail(format!(
            "{} points given, at least {} required",
            x.len(),
            min_points
        ));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return fail("samples must be finite".to_string());
    }
    check_increasing(method, x)
}

/// Check that `x` is strictly increasing.
fn check_increasing(method: &str, x: &[f64]) -> Result<()> {
    match x.windows(2).position(|w| w[1] <= w[0]) {
        Some(i) => Err(Error::Interpolation {
            method: method.to_string(),
            reason: format!(
                "abscissae must be strictly increasing (violated at index {})",
                i + 1
            ),
        }),
        None => Ok(()),
    }
}
