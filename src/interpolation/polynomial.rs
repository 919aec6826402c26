//! Global cubic least-squares fit.
//!
//! The classic Bjontegaard formulation: one degree-3 polynomial fitted to all
//! samples. Smooth, and exact for four points, but free to swing near the
//! ends of the domain where RD curves flatten out.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use super::Interpolate;
use crate::error::{Error, Result};

/// Number of polynomial coefficients (degree 3).
const TERMS: usize = 4;

/// Degree-3 least-squares polynomial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CubicFit {
    /// Coefficients in increasing power: `c0 + c1*x + c2*x^2 + c3*x^3`.
    coefficients: [f64; TERMS],
    /// Range of the fitted abscissae.
    domain: (f64, f64),
    /// Numerical rank of the design matrix; below 4 the fit is the
    /// minimum-norm solution.
    rank: usize,
}

impl CubicFit {
    /// Fit a cubic to the samples by least squares.
    ///
    /// The Vandermonde columns are scaled to unit norm before an SVD solve;
    /// singular values below `n * EPSILON * sigma_max` are discarded. With
    /// fewer than four distinct abscissae the system is rank-deficient and
    /// the minimum-norm coefficients are returned.
    ///
    /// # Example
    ///
    /// ```
    /// use bd_metric::interpolation::{CubicFit, Interpolate};
    ///
    /// let x = [0.0, 1.0, 2.0, 3.0, 4.0];
    /// let y: Vec<f64> = x.iter().map(|v| v * v * v - 2.0 * v).collect();
    /// let fit = CubicFit::fit(&x, &y).unwrap();
    /// assert!((fit.evaluate(2.5) - (15.625 - 5.0)).abs() < 1e-9);
    /// ```
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        let fail = |reason: String| Error::Interpolation {
            method: "cubic".to_string(),
            reason,
        };

        if x.len() != y.len() {
            return Err(fail(format!(
                "{} abscissae but {} values",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(fail("no samples".to_string()));
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(fail("samples must be finite".to_string()));
        }

        let n = x.len();
        let power = |v: f64, j: usize| v.powi(j as i32);
        let scale: Vec<f64> = (0..TERMS)
            .map(|j| {
                let norm = x.iter().map(|&v| power(v, j).powi(2)).sum::<f64>().sqrt();
                if norm > 0.0 { norm } else { 1.0 }
            })
            .collect();

        let design = DMatrix::from_fn(n, TERMS, |i, j| power(x[i], j) / scale[j]);
        let rhs = DVector::from_column_slice(y);

        let svd = design.svd(true, true);
        let cutoff = n as f64 * f64::EPSILON * svd.singular_values.max();
        let rank = svd.singular_values.iter().filter(|s| **s > cutoff).count();
        let solution = svd
            .solve(&rhs, cutoff)
            .map_err(|reason| fail(reason.to_string()))?;

        if rank < TERMS {
            log::debug!(
                "cubic fit over {} samples is rank-deficient (rank {}), using minimum norm",
                n,
                rank
            );
        }

        let mut coefficients = [0.0; TERMS];
        for (j, c) in coefficients.iter_mut().enumerate() {
            *c = solution[j] / scale[j];
        }

        let lo = x.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            coefficients,
            domain: (lo, hi),
            rank,
        })
    }

    /// Coefficients in increasing power of `x`.
    #[must_use]
    pub fn coefficients(&self) -> [f64; 4] {
        self.coefficients
    }

    /// Numerical rank of the least-squares system (4 for a well-posed fit).
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Antiderivative with zero constant term.
    fn antiderivative(&self, x: f64) -> f64 {
        let c = &self.coefficients;
        x * (c[0] + x * (c[1] / 2.0 + x * (c[2] / 3.0 + x * c[3] / 4.0)))
    }
}

impl Interpolate for CubicFit {
    fn evaluate(&self, x: f64) -> f64 {
        let c = &self.coefficients;
        c[0] + x * (c[1] + x * (c[2] + x * c[3]))
    }

    /// Returns exactly `0.0` for coincident bounds.
    fn integrate(&self, lower: f64, upper: f64) -> f64 {
        if lower == upper {
            return 0.0;
        }
        self.antiderivative(upper) - self.antiderivative(lower)
    }

    fn domain(&self) -> (f64, f64) {
        self.domain
    }
}
