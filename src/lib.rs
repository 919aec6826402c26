//! # bd-metric
//!
//! Bjontegaard-Delta metrics for comparing video and image codecs.
//!
//! Given rate-distortion points of an anchor and a test codec, BD-Rate is the
//! average rate difference at equal quality and BD-PSNR the average quality
//! difference at equal rate. Both are computed by fitting a curve through each
//! set of points and integrating over the range where the curves overlap.
//!
//! ## Quick Start
//!
//! ```rust
//! use bd_metric::{BdConfig, InterpolationMethod, bd_psnr, bd_rate};
//!
//! let rate_anchor = [9487.76, 4593.60, 2486.44, 1358.24];
//! let psnr_anchor = [40.037, 38.615, 36.845, 34.851];
//! let rate_test = [9787.80, 4469.00, 2451.52, 1356.24];
//! let psnr_test = [40.121, 38.651, 36.970, 34.987];
//!
//! let config = BdConfig::builder()
//!     .method(InterpolationMethod::Akima)
//!     .build();
//!
//! let rate = bd_rate(&rate_anchor, &psnr_anchor, &rate_test, &psnr_test, &config)?;
//! let psnr = bd_psnr(&rate_anchor, &psnr_anchor, &rate_test, &psnr_test, &config)?;
//! assert!(rate.value < 0.0); // test codec saves rate
//! assert!(psnr.value > 0.0); // and gains quality
//! # Ok::<(), bd_metric::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`curve`]: RD curve validation and normalization
//! - [`interpolation`]: Cubic, PCHIP and Akima curve fitting
//! - [`overlap`]: Integration interval and overlap warnings
//! - [`engine`]: The BD integral itself
//! - [`metric`]: BD-Rate, BD-PSNR and configuration
//! - [`diagnostics`]: Pointwise curve gap for plotting
//! - [`stats`]: Descriptive statistics over BD values
//! - [`batch`]: Evaluation of many sequences at once

pub mod batch;
pub mod curve;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod interpolation;
pub mod metric;
pub mod overlap;
pub mod stats;

// Re-export commonly used types
pub use batch::{BatchReport, SequencePair, SequenceResult, evaluate_batch};
pub use curve::RdCurve;
pub use diagnostics::{DifferenceSample, RelativeDifference, relative_difference};
pub use engine::BdKind;
pub use error::{CurveRole, Error, Result};
pub use interpolation::{Interpolant, Interpolate, InterpolationMethod};
pub use metric::{
    BdConfig, BdConfigBuilder, BdResult, InterpolantPair, MethodComparison, bd_linear, bd_psnr,
    bd_rate, compare_methods,
};
pub use overlap::{Overlap, OverlapWarning};
pub use stats::Summary;
