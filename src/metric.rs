//! Public BD metric entry points.
//!
//! - [`bd_rate`]: average bitrate difference at equal quality, in percent.
//!   Negative means the test codec needs less rate.
//! - [`bd_psnr`]: average PSNR difference at equal rate, in dB.
//! - [`bd_linear`]: the same computation for any other quality metric.
//! - [`compare_methods`]: both metrics for every interpolation method.
//!
//! Inputs are parallel rate and distortion arrays in any consistent order.
//! Array shapes are validated before any interpolation.

use serde::{Deserialize, Serialize};

use crate::curve::RdCurve;
use crate::engine::{self, BdKind, Delta};
use crate::error::{CurveRole, Error, Result};
use crate::interpolation::{Interpolant, InterpolationMethod};
use crate::overlap::{DEFAULT_MIN_OVERLAP, Overlap, OverlapWarning, clamp_min_overlap};

/// Configuration for a BD computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BdConfig {
    /// Interpolation strategy (default: PCHIP).
    pub method: InterpolationMethod,
    /// Require anchor and test to have the same number of points (default: true).
    pub require_matching_points: bool,
    /// Minimum overlap ratio before a warning is attached (default: 0.75).
    /// Clamped to `[0, 1]` when used.
    pub min_overlap: f64,
    /// Return the fitted curves with the result (default: false).
    pub keep_interpolants: bool,
}

impl Default for BdConfig {
    fn default() -> Self {
        Self {
            method: InterpolationMethod::default(),
            require_matching_points: true,
            min_overlap: DEFAULT_MIN_OVERLAP,
            keep_interpolants: false,
        }
    }
}

impl BdConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> BdConfigBuilder {
        BdConfigBuilder::default()
    }

    /// Default configuration with the method given by name.
    ///
    /// # Example
    ///
    /// ```
    /// use bd_metric::{BdConfig, InterpolationMethod};
    ///
    /// let config = BdConfig::for_method("akima").unwrap();
    /// assert_eq!(config.method, InterpolationMethod::Akima);
    /// assert!(BdConfig::for_method("spline").is_err());
    /// ```
    pub fn for_method(name: &str) -> Result<Self> {
        Ok(Self {
            method: name.parse()?,
            ..Self::default()
        })
    }
}

/// Builder for [`BdConfig`].
#[derive(Debug, Default)]
pub struct BdConfigBuilder {
    method: Option<InterpolationMethod>,
    require_matching_points: Option<bool>,
    min_overlap: Option<f64>,
    keep_interpolants: Option<bool>,
}

impl BdConfigBuilder {
    /// Set the interpolation method.
    #[must_use]
    pub fn method(mut self, method: InterpolationMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Require anchor and test point counts to match.
    #[must_use]
    pub fn require_matching_points(mut self, require: bool) -> Self {
        self.require_matching_points = Some(require);
        self
    }

    /// Set the minimum overlap ratio. Clamped to `[0, 1]` (NaN gives the
    /// default); 0 disables the warning.
    #[must_use]
    pub fn min_overlap(mut self, ratio: f64) -> Self {
        self.min_overlap = Some(clamp_min_overlap(ratio));
        self
    }

    /// Keep the fitted interpolants in the result.
    #[must_use]
    pub fn keep_interpolants(mut self, keep: bool) -> Self {
        self.keep_interpolants = Some(keep);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> BdConfig {
        let defaults = BdConfig::default();
        BdConfig {
            method: self.method.unwrap_or(defaults.method),
            require_matching_points: self
                .require_matching_points
                .unwrap_or(defaults.require_matching_points),
            min_overlap: self.min_overlap.unwrap_or(defaults.min_overlap),
            keep_interpolants: self.keep_interpolants.unwrap_or(defaults.keep_interpolants),
        }
    }
}

/// Fitted anchor and test curves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpolantPair {
    /// Anchor curve.
    pub anchor: Interpolant,
    /// Test curve.
    pub test: Interpolant,
}

/// Result of a BD computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BdResult {
    /// BD value: percent for BD-Rate, metric units otherwise. NaN when the
    /// curves do not overlap.
    pub value: f64,
    /// Which quantity `value` measures.
    pub kind: BdKind,
    /// Interpolation method used.
    pub method: InterpolationMethod,
    /// Integration interval and overlap ratio.
    pub overlap: Overlap,
    /// Overlap warning, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<OverlapWarning>,
    /// Fitted curves, when requested with [`BdConfig::keep_interpolants`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolants: Option<InterpolantPair>,
}

impl BdResult {
    /// True if the value is a usable number.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.value.is_finite()
    }

    fn from_delta(kind: BdKind, method: InterpolationMethod, delta: Delta, keep: bool) -> Self {
        Self {
            value: delta.value,
            kind,
            method,
            overlap: delta.overlap,
            warning: delta.warning,
            interpolants: keep.then_some(InterpolantPair {
                anchor: delta.anchor,
                test: delta.test,
            }),
        }
    }
}

/// Check array shapes of both curves.
///
/// Runs before any curve is built, so shape errors are reported even when the
/// sample values are also invalid.
pub fn check_points(
    rate_anchor: &[f64],
    dist_anchor: &[f64],
    rate_test: &[f64],
    dist_test: &[f64],
    require_matching_points: bool,
) -> Result<()> {
    if rate_anchor.len() != dist_anchor.len() {
        return Err(Error::ShapeMismatch {
            curve: CurveRole::Anchor,
            rate: rate_anchor.len(),
            distortion: dist_anchor.len(),
        });
    }
    if rate_test.len() != dist_test.len() {
        return Err(Error::ShapeMismatch {
            curve: CurveRole::Test,
            rate: rate_test.len(),
            distortion: dist_test.len(),
        });
    }
    if require_matching_points && rate_anchor.len() != rate_test.len() {
        return Err(Error::PointCountMismatch {
            anchor: rate_anchor.len(),
            test: rate_test.len(),
        });
    }
    Ok(())
}

fn evaluate(
    kind: BdKind,
    rate_anchor: &[f64],
    dist_anchor: &[f64],
    rate_test: &[f64],
    dist_test: &[f64],
    config: &BdConfig,
) -> Result<BdResult> {
    check_points(
        rate_anchor,
        dist_anchor,
        rate_test,
        dist_test,
        config.require_matching_points,
    )?;
    let anchor = RdCurve::new(CurveRole::Anchor, rate_anchor, dist_anchor)?;
    let test = RdCurve::new(CurveRole::Test, rate_test, dist_test)?;

    let delta = engine::compute(kind, &anchor, &test, config.method, config.min_overlap)?;
    Ok(BdResult::from_delta(
        kind,
        config.method,
        delta,
        config.keep_interpolants,
    ))
}

/// Calculate the Bjontegaard-Delta rate.
///
/// Average rate difference of `test` over `anchor` at equal distortion, in
/// percent. Negative values mean the test codec needs less rate.
///
/// # Example
///
/// ```
/// use bd_metric::{bd_rate, BdConfig};
///
/// let rate_anchor = [9487.76, 4593.60, 2486.44, 1358.24];
/// let psnr_anchor = [40.037, 38.615, 36.845, 34.851];
/// let rate_test = [9787.80, 4469.00, 2451.52, 1356.24];
/// let psnr_test = [40.121, 38.651, 36.970, 34.987];
///
/// let result = bd_rate(&rate_anchor, &psnr_anchor, &rate_test, &psnr_test, &BdConfig::default())?;
/// assert!((result.value - -4.4175).abs() < 1e-3);
/// # Ok::<(), bd_metric::Error>(())
/// ```
pub fn bd_rate(
    rate_anchor: &[f64],
    dist_anchor: &[f64],
    rate_test: &[f64],
    dist_test: &[f64],
    config: &BdConfig,
) -> Result<BdResult> {
    evaluate(
        BdKind::Rate,
        rate_anchor,
        dist_anchor,
        rate_test,
        dist_test,
        config,
    )
}

/// Calculate the Bjontegaard-Delta PSNR.
///
/// Average distortion difference of `test` over `anchor` at equal rate, in
/// the distortion metric's units (dB for PSNR).
pub fn bd_psnr(
    rate_anchor: &[f64],
    dist_anchor: &[f64],
    rate_test: &[f64],
    dist_test: &[f64],
    config: &BdConfig,
) -> Result<BdResult> {
    bd_linear(rate_anchor, dist_anchor, rate_test, dist_test, config)
}

/// Calculate the Bjontegaard-Delta of an arbitrary quality metric.
///
/// Identical to [`bd_psnr`]; use it for metrics such as SSIM or VMAF where
/// "PSNR" would be misleading. Higher-is-better metrics give positive values
/// when the test codec is better.
pub fn bd_linear(
    rate_anchor: &[f64],
    metric_anchor: &[f64],
    rate_test: &[f64],
    metric_test: &[f64],
    config: &BdConfig,
) -> Result<BdResult> {
    evaluate(
        BdKind::Linear,
        rate_anchor,
        metric_anchor,
        rate_test,
        metric_test,
        config,
    )
}

/// BD values of one interpolation method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodComparison {
    /// Interpolation method.
    pub method: InterpolationMethod,
    /// BD-Rate in percent.
    pub bd_rate: BdResult,
    /// BD-PSNR in metric units.
    pub bd_psnr: BdResult,
}

/// Compute BD-Rate and BD-PSNR with every interpolation method.
///
/// `config.method` is ignored. Useful to judge how sensitive a comparison is
/// to the curve model: large disagreement between methods usually points at
/// a badly shaped or sparsely sampled RD curve.
pub fn compare_methods(
    rate_anchor: &[f64],
    dist_anchor: &[f64],
    rate_test: &[f64],
    dist_test: &[f64],
    config: &BdConfig,
) -> Result<Vec<MethodComparison>> {
    InterpolationMethod::ALL
        .iter()
        .map(|&method| -> Result<MethodComparison> {
            let config = BdConfig {
                method,
                ..config.clone()
            };
            Ok(MethodComparison {
                method,
                bd_rate: bd_rate(rate_anchor, dist_anchor, rate_test, dist_test, &config)?,
                bd_psnr: bd_psnr(rate_anchor, dist_anchor, rate_test, dist_test, &config)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE_ANCHOR: [f64; 4] = [9487.76, 4593.60, 2486.44, 1358.24];
    const PSNR_ANCHOR: [f64; 4] = [40.037, 38.615, 36.845, 34.851];
    const RATE_TEST: [f64; 4] = [9787.80, 4469.00, 2451.52, 1356.24];
    const PSNR_TEST: [f64; 4] = [40.121, 38.651, 36.970, 34.987];

    type Facade = fn(&[f64], &[f64], &[f64], &[f64], &BdConfig) -> Result<BdResult>;
    const FACADES: [Facade; 3] = [bd_rate, bd_psnr, bd_linear];

    fn config(method: InterpolationMethod) -> BdConfig {
        BdConfig::builder().method(method).build()
    }

    #[test]
    fn test_config_defaults() {
        let config = BdConfig::default();
        assert_eq!(config.method, InterpolationMethod::Pchip);
        assert!(config.require_matching_points);
        assert_eq!(config.min_overlap, 0.75);
        assert!(!config.keep_interpolants);
        assert_eq!(BdConfig::builder().build(), config);
    }

    #[test]
    fn test_builder_clamps_min_overlap() {
        let high = BdConfig::builder().min_overlap(1.5).build();
        assert_eq!(high.min_overlap, 1.0);
        let low = BdConfig::builder().min_overlap(-1.0).build();
        assert_eq!(low.min_overlap, 0.0);
        let nan = BdConfig::builder().min_overlap(f64::NAN).build();
        assert_eq!(nan.min_overlap, DEFAULT_MIN_OVERLAP);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: BdConfig = serde_json::from_str(r#"{"method": "akima"}"#).unwrap();
        assert_eq!(config.method, InterpolationMethod::Akima);
        assert!(config.require_matching_points);
    }

    #[test]
    fn test_deserialized_min_overlap_is_clamped() {
        let config: BdConfig = serde_json::from_str(r#"{"min_overlap": 5.0}"#).unwrap();
        assert_eq!(config.min_overlap, 5.0);

        let same = bd_rate(
            &RATE_ANCHOR,
            &PSNR_ANCHOR,
            &RATE_ANCHOR,
            &PSNR_ANCHOR,
            &config,
        )
        .unwrap();
        assert!(same.value.abs() < 1e-9);
        assert!(same.warning.is_none());

        let shifted = bd_rate(&RATE_ANCHOR, &PSNR_ANCHOR, &RATE_TEST, &PSNR_TEST, &config)
            .unwrap();
        assert!(shifted.value.is_finite());
        assert!(matches!(
            shifted.warning,
            Some(OverlapWarning::InsufficientOverlap { minimum, .. }) if minimum == 1.0
        ));
    }

    #[test]
    fn test_regression_pchip() {
        let result = bd_rate(
            &RATE_ANCHOR,
            &PSNR_ANCHOR,
            &RATE_TEST,
            &PSNR_TEST,
            &config(InterpolationMethod::Pchip),
        )
        .unwrap();
        assert!(result.value > -10.0 && result.value < 0.0);
        assert!((result.value - -4.417485350589045).abs() < 1e-6);
        assert_eq!(result.kind, BdKind::Rate);
        assert!(result.is_valid());
        assert!(result.interpolants.is_none());
    }

    #[test]
    fn test_regression_high_bitrates() {
        let rate_anchor = [82472.76, 26875.24, 9487.76, 4593.6];
        let psnr_anchor = [43.825, 41.404, 40.037, 38.615];
        let rate_test = [99896.96, 33952.04, 9787.8, 4469.0];
        let psnr_test = [44.731, 41.875, 40.121, 38.651];

        let expected = [
            (InterpolationMethod::Pchip, -4.472182002761816, 0.08887484704747745),
            (InterpolationMethod::Akima, -4.085760940414785, 0.08990284924946274),
            (InterpolationMethod::Cubic, -4.69943759127005, 0.09540440298876443),
        ];
        for (method, rate, psnr) in expected {
            let config = config(method);
            let r = bd_rate(&rate_anchor, &psnr_anchor, &rate_test, &psnr_test, &config).unwrap();
            let p = bd_psnr(&rate_anchor, &psnr_anchor, &rate_test, &psnr_test, &config).unwrap();
            assert!((r.value - rate).abs() < 1e-6, "{method}: {}", r.value);
            assert!((p.value - psnr).abs() < 1e-6, "{method}: {}", p.value);
        }
    }

    #[test]
    fn test_zero_gap_for_identical_curves() {
        for method in InterpolationMethod::ALL {
            for facade in FACADES {
                let result = facade(
                    &RATE_ANCHOR,
                    &PSNR_ANCHOR,
                    &RATE_ANCHOR,
                    &PSNR_ANCHOR,
                    &config(method),
                )
                .unwrap();
                assert!(result.value.abs() < 1e-9, "{method}: {}", result.value);
                assert!(result.warning.is_none());
            }
        }
    }

    #[test]
    fn test_swap_symmetry() {
        for method in InterpolationMethod::ALL {
            let config = config(method);
            let forward = bd_rate(&RATE_ANCHOR, &PSNR_ANCHOR, &RATE_TEST, &PSNR_TEST, &config)
                .unwrap();
            let backward = bd_rate(&RATE_TEST, &PSNR_TEST, &RATE_ANCHOR, &PSNR_ANCHOR, &config)
                .unwrap();
            let product = (1.0 + forward.value / 100.0) * (1.0 + backward.value / 100.0);
            assert!((product - 1.0).abs() < 1e-9, "{method}: {product}");

            let forward = bd_psnr(&RATE_ANCHOR, &PSNR_ANCHOR, &RATE_TEST, &PSNR_TEST, &config)
                .unwrap();
            let backward = bd_psnr(&RATE_TEST, &PSNR_TEST, &RATE_ANCHOR, &PSNR_ANCHOR, &config)
                .unwrap();
            assert!((forward.value + backward.value).abs() < 1e-9);
        }
    }

    #[test]
    fn test_methods_agree_on_smooth_data() {
        // log10(rate) = 0.1 * psnr - 0.5 + small curvature, densely sampled
        let psnr: Vec<f64> = (0..10).map(|i| 30.0 + f64::from(i)).collect();
        let rate_anchor: Vec<f64> = psnr
            .iter()
            .map(|q| 10_f64.powf(0.1 * q - 0.5 + 0.001 * (q - 35.0).powi(2)))
            .collect();
        // Test codec needs 10% less rate everywhere
        let rate_test: Vec<f64> = rate_anchor.iter().map(|r| r * 0.9).collect();

        let values: Vec<f64> = InterpolationMethod::ALL
            .iter()
            .map(|&m| {
                bd_rate(&rate_anchor, &psnr, &rate_test, &psnr, &config(m))
                    .unwrap()
                    .value
            })
            .collect();
        for v in &values {
            assert!((v - -10.0).abs() < 1.0, "{values:?}");
        }
        let spread = values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            - values.iter().copied().fold(f64::INFINITY, f64::min);
        assert!(spread < 2.0);
    }

    #[test]
    fn test_invalid_method_name() {
        // Facades take a typed `InterpolationMethod`; names are only parsed
        // through `FromStr` and `BdConfig::for_method`.
        let parsed = "spline".parse::<InterpolationMethod>();
        assert!(matches!(
            parsed,
            Err(Error::InvalidMethod(ref name)) if name == "spline"
        ));
        let config = BdConfig::for_method("spline");
        assert!(matches!(
            config,
            Err(Error::InvalidMethod(ref name)) if name == "spline"
        ));

        let config = BdConfig::for_method("akima").unwrap();
        assert_eq!(config.method, InterpolationMethod::Akima);
    }

    #[test]
    fn test_length_mismatch_before_interpolation() {
        for facade in FACADES {
            // The NaN would be rejected during curve validation; the shape check comes first
            let err = facade(
                &[1.0, 2.0, 3.0],
                &[f64::NAN, 2.0],
                &RATE_TEST,
                &PSNR_TEST,
                &BdConfig::default(),
            )
            .unwrap_err();
            assert!(matches!(
                err,
                Error::ShapeMismatch {
                    curve: CurveRole::Anchor,
                    ..
                }
            ));
        }
        let err = bd_rate(
            &RATE_ANCHOR,
            &PSNR_ANCHOR,
            &RATE_TEST,
            &[1.0],
            &BdConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                curve: CurveRole::Test,
                ..
            }
        ));
    }

    #[test]
    fn test_matching_points_mode() {
        let rate_test = &RATE_TEST[..3];
        let psnr_test = &PSNR_TEST[..3];

        let strict = BdConfig::default();
        let err = bd_rate(&RATE_ANCHOR, &PSNR_ANCHOR, rate_test, psnr_test, &strict).unwrap_err();
        assert!(matches!(
            err,
            Error::PointCountMismatch { anchor: 4, test: 3 }
        ));

        let relaxed = BdConfig::builder().require_matching_points(false).build();
        let result = bd_rate(&RATE_ANCHOR, &PSNR_ANCHOR, rate_test, psnr_test, &relaxed).unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn test_disjoint_curves() {
        let psnr_low = [30.0, 31.0, 32.0, 33.0];
        let psnr_high = [40.0, 41.0, 42.0, 43.0];
        let rates = [1000.0, 2000.0, 4000.0, 8000.0];
        let config = BdConfig::default();
        let result = bd_rate(&rates, &psnr_low, &rates, &psnr_high, &config).unwrap();
        assert!(result.value.is_nan());
        assert!(!result.is_valid());
        assert_eq!(result.warning, Some(OverlapWarning::EmptyOverlap));
    }

    #[test]
    fn test_descending_distortion_with_ascending_rate() {
        let err = bd_rate(
            &[1000.0, 500.0, 250.0],
            &[30.0, 35.0, 40.0],
            &[1000.0, 500.0, 250.0],
            &[30.0, 35.0, 40.0],
            &BdConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MonotonicityViolation { .. }));
    }

    #[test]
    fn test_keep_interpolants() {
        let config = BdConfig::builder().keep_interpolants(true).build();
        let result = bd_rate(&RATE_ANCHOR, &PSNR_ANCHOR, &RATE_TEST, &PSNR_TEST, &config).unwrap();
        let pair = result.interpolants.expect("interpolants requested");
        assert!(matches!(pair.anchor, Interpolant::Pchip(_)));
        assert!(matches!(pair.test, Interpolant::Pchip(_)));
    }

    #[test]
    fn test_compare_methods() {
        let rows = compare_methods(
            &RATE_ANCHOR,
            &PSNR_ANCHOR,
            &RATE_TEST,
            &PSNR_TEST,
            &BdConfig::default(),
        )
        .unwrap();
        let methods: Vec<_> = rows.iter().map(|r| r.method).collect();
        assert_eq!(methods, InterpolationMethod::ALL.to_vec());
        for row in &rows {
            assert_eq!(row.bd_rate.method, row.method);
            assert!(row.bd_rate.value < 0.0);
            assert!(row.bd_psnr.value > 0.0);
        }
    }

    #[test]
    fn test_result_serializes_nan_as_null() {
        let result = bd_rate(
            &[1000.0, 2000.0],
            &[30.0, 31.0],
            &[1000.0, 2000.0],
            &[40.0, 41.0],
            &BdConfig::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["value"].is_null());
        assert_eq!(json["warning"]["kind"], "empty_overlap");
        assert_eq!(json["kind"], "rate");
    }
}
