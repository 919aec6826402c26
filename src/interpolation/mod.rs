//! Curve interpolation strategies for BD integration.
//!
//! A BD metric needs a continuous curve through a handful of measured RD
//! points. Three strategies are available, selected by [`InterpolationMethod`]:
//!
//! - [`InterpolationMethod::Cubic`]: one global least-squares cubic
//!   ([`CubicFit`]). Smooth, but may overshoot near the ends of the range.
//! - [`InterpolationMethod::Pchip`]: shape-preserving piecewise cubic Hermite
//!   ([`pchip`]). The default.
//! - [`InterpolationMethod::Akima`]: local Akima spline ([`akima`]), robust to
//!   a single outlying point. Falls back to linear interpolation for two
//!   points.
//!
//! All strategies produce an [`Interpolant`], which implements
//! [`Interpolate`]: point evaluation and closed-form definite integration.

pub mod akima;
pub mod pchip;
mod piecewise;
mod polynomial;

pub use piecewise::PiecewiseCubic;
pub use polynomial::CubicFit;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Evaluation and integration of a fitted curve.
pub trait Interpolate {
    /// Value of the curve at `x`.
    fn evaluate(&self, x: f64) -> f64;

    /// Definite integral from `lower` to `upper`.
    ///
    /// Bounds need not be ordered: `integrate(a, b) == -integrate(b, a)`.
    fn integrate(&self, lower: f64, upper: f64) -> f64;

    /// Range of the samples the curve was fitted to.
    fn domain(&self) -> (f64, f64);

    /// Evaluate at every point of `xs`.
    fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

/// Interpolation strategy used for BD calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Global cubic least-squares polynomial.
    Cubic,
    /// Piecewise Cubic Hermite Interpolating Polynomial.
    #[default]
    Pchip,
    /// Akima spline.
    Akima,
}

impl InterpolationMethod {
    /// All methods, in the order they are usually reported.
    pub const ALL: [Self; 3] = [Self::Cubic, Self::Pchip, Self::Akima];

    /// Lowercase method name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cubic => "cubic",
            Self::Pchip => "pchip",
            Self::Akima => "akima",
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterpolationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cubic" => Ok(Self::Cubic),
            "pchip" => Ok(Self::Pchip),
            "akima" => Ok(Self::Akima),
            other => Err(Error::InvalidMethod(other.to_string())),
        }
    }
}

/// A fitted curve produced by one of the interpolation strategies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Interpolant {
    /// Global cubic polynomial.
    Cubic(CubicFit),
    /// Piecewise cubic Hermite.
    Pchip(PiecewiseCubic),
    /// Akima spline.
    Akima(PiecewiseCubic),
    /// Straight segments; the Akima fallback for two samples.
    Linear(PiecewiseCubic),
}

impl Interpolant {
    /// Fit `method` to the samples.
    ///
    /// `x` must be increasing for the piecewise methods (see
    /// [`crate::curve::normalize`]).
    ///
    /// # Example
    ///
    /// ```
    /// use bd_metric::interpolation::{Interpolant, InterpolationMethod, Interpolate};
    ///
    /// let f = Interpolant::build(InterpolationMethod::Akima, &[30.0, 40.0], &[2.0, 3.0]).unwrap();
    /// assert!(matches!(f, Interpolant::Linear(_)));
    /// assert!((f.evaluate(35.0) - 2.5).abs() < 1e-12);
    /// ```
    pub fn build(method: InterpolationMethod, x: &[f64], y: &[f64]) -> Result<Self> {
        match method {
            InterpolationMethod::Cubic => Ok(Self::Cubic(CubicFit::fit(x, y)?)),
            InterpolationMethod::Pchip => Ok(Self::Pchip(pchip::fit(x, y)?)),
            InterpolationMethod::Akima if x.len() < akima::MIN_POINTS => {
                piecewise::check_samples("akima", x, y, pchip::MIN_POINTS)?;
                Ok(Self::Linear(PiecewiseCubic::linear(x, y)?))
            }
            InterpolationMethod::Akima => Ok(Self::Akima(akima::fit(x, y)?)),
        }
    }

    /// The method this interpolant was requested with.
    #[must_use]
    pub fn method(&self) -> InterpolationMethod {
        match self {
            Self::Cubic(_) => InterpolationMethod::Cubic,
            Self::Pchip(_) => InterpolationMethod::Pchip,
            Self::Akima(_) | Self::Linear(_) => InterpolationMethod::Akima,
        }
    }

    fn inner(&self) -> &dyn Interpolate {
        match self {
            Self::Cubic(f) => f,
            Self::Pchip(f) | Self::Akima(f) | Self::Linear(f) => f,
        }
    }
}

impl Interpolate for Interpolant {
    fn evaluate(&self, x: f64) -> f64 {
        self.inner().evaluate(x)
    }

    fn integrate(&self, lower: f64, upper: f64) -> f64 {
        self.inner().integrate(lower, upper)
    }

    fn domain(&self) -> (f64, f64) {
        self.inner().domain()
    }
}
