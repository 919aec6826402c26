//! Bjontegaard-Delta computation.
//!
//! ## Methodology
//!
//! Both curves are fitted with the same interpolation strategy, integrated
//! over the interval where both were sampled, and the difference of the
//! integrals is divided by the interval width:
//!
//! ```text
//! avg = (∫ f_test - ∫ f_anchor) / (overlap_max - overlap_min)
//! ```
//!
//! For BD-Rate the curves map distortion to `log10(rate)`, so `avg` is an
//! average log-rate difference, reported as `(10^avg - 1) * 100` percent.
//! For BD-PSNR and other linear metrics the curves map `log10(rate)` to the
//! metric and `avg` is reported unchanged, in metric units.

use std::f64::consts::LN_10;

use serde::{Deserialize, Serialize};

use crate::curve::RdCurve;
use crate::error::Result;
use crate::interpolation::{Interpolant, Interpolate, InterpolationMethod};
use crate::overlap::{Overlap, OverlapWarning};

/// Upper clamp for the average log10 rate difference before exponentiation.
///
/// Equivalent to a natural-log difference of 200; badly formed input can
/// otherwise produce an exponent large enough to overflow.
pub const MAX_LOG10_DIFF: f64 = 200.0 / LN_10;

/// Which BD quantity to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BdKind {
    /// Average rate difference at equal quality, in percent.
    Rate,
    /// Average metric difference at equal rate, in metric units (dB for PSNR).
    Linear,
}

/// Raw output of one BD computation.
#[derive(Debug, Clone)]
pub struct Delta {
    /// Converted BD value (percent for [`BdKind::Rate`], metric units otherwise).
    /// NaN when the curves do not overlap.
    pub value: f64,
    /// Average difference of the integrals before unit conversion.
    pub average: f64,
    /// Integration interval.
    pub overlap: Overlap,
    /// Overlap warning, if any.
    pub warning: Option<OverlapWarning>,
    /// Fitted anchor curve.
    pub anchor: Interpolant,
    /// Fitted test curve.
    pub test: Interpolant,
}

/// Compute a BD metric for two validated curves.
///
/// Interpolants are always built, even when the overlap turns out to be
/// empty, so callers can still inspect the fitted curves.
pub fn compute(
    kind: BdKind,
    anchor: &RdCurve,
    test: &RdCurve,
    method: InterpolationMethod,
    min_overlap: f64,
) -> Result<Delta> {
    let anchor_log = anchor.log_rate();
    let test_log = test.log_rate();

    let delta = match kind {
        BdKind::Rate => bjontegaard_delta(
            anchor.distortion(),
            &anchor_log,
            test.distortion(),
            &test_log,
            method,
            min_overlap,
        )?,
        BdKind::Linear => bjontegaard_delta(
            &anchor_log,
            anchor.distortion(),
            &test_log,
            test.distortion(),
            method,
            min_overlap,
        )?,
    };

    let value = match kind {
        BdKind::Rate => log_diff_to_percent(delta.average),
        BdKind::Linear => delta.average,
    };

    if let Some(warning) = &delta.warning {
        log::warn!("BD-{:?} ({}): {}", kind, method, warning);
    }

    Ok(Delta { value, ..delta })
}

/// Average vertical gap between two fitted curves over their common domain.
///
/// `base_*` are the abscissae (the integration variable) and `metric_*` the
/// integrated values. Abscissae must be increasing for the piecewise methods.
/// The returned [`Delta::value`] equals [`Delta::average`]; unit conversion is
/// done by [`compute`].
pub fn bjontegaard_delta(
    base_anchor: &[f64],
    metric_anchor: &[f64],
    base_test: &[f64],
    metric_test: &[f64],
    method: InterpolationMethod,
    min_overlap: f64,
) -> Result<Delta> {
    let anchor = Interpolant::build(method, base_anchor, metric_anchor)?;
    let test = Interpolant::build(method, base_test, metric_test)?;

    let overlap = Overlap::between(anchor.domain(), test.domain());
    let warning = overlap.check(min_overlap);

    let average = if overlap.is_empty() {
        f64::NAN
    } else {
        let integrated_anchor = anchor.integrate(overlap.min, overlap.max);
        let integrated_test = test.integrate(overlap.min, overlap.max);
        (integrated_test - integrated_anchor) / overlap.width()
    };

    Ok(Delta {
        value: average,
        average,
        overlap,
        warning,
        anchor,
        test,
    })
}

/// Convert an average log10 rate difference to a percentage.
///
/// The exponent is clamped to [`MAX_LOG10_DIFF`]. NaN passes through.
///
/// # Example
///
/// ```
/// use bd_metric::engine::log_diff_to_percent;
///
/// assert!((log_diff_to_percent(1.0) - 900.0).abs() < 1e-9);
/// assert!(log_diff_to_percent(0.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn log_diff_to_percent(average: f64) -> f64 {
    // f64::min would swallow NaN
    let exponent = if average > MAX_LOG10_DIFF {
        MAX_LOG10_DIFF
    } else {
        average
    };
    (10_f64.powf(exponent) - 1.0) * 100.0
}
