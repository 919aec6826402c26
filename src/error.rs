//! Error types for BD metric operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for BD metric operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which of the two compared curves an error or warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveRole {
    /// The reference codec/configuration.
    Anchor,
    /// The codec/configuration under evaluation.
    Test,
}

impl fmt::Display for CurveRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anchor => f.write_str("anchor"),
            Self::Test => f.write_str("test"),
        }
    }
}

/// Errors that can occur while computing a BD metric.
///
/// All variants are fatal for the call that produced them. Empty or
/// insufficient curve overlap is not an error; it is reported through
/// [`crate::overlap::OverlapWarning`] on the result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Rate and distortion arrays of one curve have different lengths.
    #[error(
        "Number of rate and distortion points for {curve} does not match: {rate} rates, {distortion} distortions"
    )]
    ShapeMismatch {
        /// Curve with mismatched arrays.
        curve: CurveRole,
        /// Number of rate values.
        rate: usize,
        /// Number of distortion values.
        distortion: usize,
    },

    /// Anchor and test have a different number of points while matching
    /// point counts are required.
    #[error(
        "Number of rate-distortion points for anchor ({anchor}) and test ({test}) does not match but matching points are required"
    )]
    PointCountMismatch {
        /// Anchor point count.
        anchor: usize,
        /// Test point count.
        test: usize,
    },

    /// Unknown interpolation method name.
    #[error("Invalid interpolation method '{0}'. Only 'akima', 'pchip' and 'cubic' are allowed")]
    InvalidMethod(String),

    /// The independent variable is descending but the dependent one is not,
    /// so both sequences cannot be reversed together.
    #[error("Monotonicity violation in {curve} curve: x is descending but y is not")]
    MonotonicityViolation {
        /// Offending curve.
        curve: CurveRole,
    },

    /// Not enough samples to build an interpolant.
    #[error("Too few points for {curve} curve: {points} (at least {required} required)")]
    TooFewPoints {
        /// Offending curve.
        curve: CurveRole,
        /// Number of points supplied.
        points: usize,
        /// Minimum number of points.
        required: usize,
    },

    /// A sample is non-finite, or a rate is not strictly positive.
    #[error("Invalid sample in {curve} curve at index {index}: {value}")]
    InvalidSample {
        /// Offending curve.
        curve: CurveRole,
        /// Index of the sample.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// An interpolant could not be built from the given samples.
    #[error("Interpolation failed ({method}): {reason}")]
    Interpolation {
        /// Interpolation method name.
        method: String,
        /// Reason for the failure.
        reason: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
