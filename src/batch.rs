//! Evaluation of many sequence pairs at once.
//!
//! Codec comparisons are usually run over a test set: one anchor/test RD
//! curve pair per sequence. [`evaluate_batch`] computes BD-Rate and BD-PSNR
//! for each pair (in parallel with the `parallel` feature) and aggregates the
//! finite results into a [`BatchReport`].

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interpolation::InterpolationMethod;
use crate::metric::{BdConfig, bd_psnr, bd_rate};
use crate::overlap::OverlapWarning;
use crate::stats::Summary;

/// Anchor and test RD points of one sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencePair {
    /// Sequence identifier.
    pub name: String,
    /// Anchor rates.
    pub rate_anchor: Vec<f64>,
    /// Anchor distortion values.
    pub dist_anchor: Vec<f64>,
    /// Test rates.
    pub rate_test: Vec<f64>,
    /// Test distortion values.
    pub dist_test: Vec<f64>,
}

/// BD values of one sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceResult {
    /// Sequence identifier.
    pub name: String,
    /// BD-Rate in percent; NaN (`null` in JSON) without overlap.
    pub bd_rate: f64,
    /// BD-PSNR in metric units; NaN (`null` in JSON) without overlap.
    pub bd_psnr: f64,
    /// Overlap warnings raised by either computation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<OverlapWarning>,
}

/// Per-sequence results plus aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Interpolation method used for every sequence.
    pub method: InterpolationMethod,
    /// Results in input order.
    pub sequences: Vec<SequenceResult>,
    /// Statistics over the finite BD-Rate values.
    pub bd_rate: Option<Summary>,
    /// Statistics over the finite BD-PSNR values.
    pub bd_psnr: Option<Summary>,
}

impl BatchReport {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sequences with at least one warning.
    pub fn flagged(&self) -> impl Iterator<Item = &SequenceResult> {
        self.sequences.iter().filter(|s| !s.warnings.is_empty())
    }
}

impl SequencePair {
    /// Compute BD-Rate and BD-PSNR for this pair.
    pub fn evaluate(&self, config: &BdConfig) -> Result<SequenceResult> {
        let rate = bd_rate(
            &self.rate_anchor,
            &self.dist_anchor,
            &self.rate_test,
            &self.dist_test,
            config,
        )?;
        let psnr = bd_psnr(
            &self.rate_anchor,
            &self.dist_anchor,
            &self.rate_test,
            &self.dist_test,
            config,
        )?;

        Ok(SequenceResult {
            name: self.name.clone(),
            bd_rate: rate.value,
            bd_psnr: psnr.value,
            warnings: rate.warning.into_iter().chain(psnr.warning).collect(),
        })
    }
}

/// Evaluate every pair with the same configuration.
///
/// Fails on the first invalid pair; overlap problems are reported per
/// sequence instead.
///
/// # Example
///
/// ```
/// use bd_metric::batch::{SequencePair, evaluate_batch};
/// use bd_metric::BdConfig;
///
/// let pair = SequencePair {
///     name: "foreman".to_string(),
///     rate_anchor: vec![9487.76, 4593.60, 2486.44, 1358.24],
///     dist_anchor: vec![40.037, 38.615, 36.845, 34.851],
///     rate_test: vec![9787.80, 4469.00, 2451.52, 1356.24],
///     dist_test: vec![40.121, 38.651, 36.970, 34.987],
/// };
/// let report = evaluate_batch(&[pair], &BdConfig::default())?;
/// assert_eq!(report.sequences.len(), 1);
/// assert!(report.bd_rate.is_some());
/// # Ok::<(), bd_metric::Error>(())
/// ```
pub fn evaluate_batch(pairs: &[SequencePair], config: &BdConfig) -> Result<BatchReport> {
    #[cfg(feature = "parallel")]
    let sequences = pairs
        .par_iter()
        .map(|pair| pair.evaluate(config))
        .collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let sequences = pairs
        .iter()
        .map(|pair| pair.evaluate(config))
        .collect::<Result<Vec<_>>>()?;

    let rates: Vec<f64> = sequences.iter().map(|s| s.bd_rate).collect();
    let psnrs: Vec<f64> = sequences.iter().map(|s| s.bd_psnr).collect();
    let report = BatchReport {
        method: config.method,
        bd_rate: Summary::compute(&rates),
        bd_psnr: Summary::compute(&psnrs),
        sequences,
    };

    log::debug!(
        "evaluated {} sequences with {}, {} flagged",
        report.sequences.len(),
        report.method,
        report.flagged().count()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn pair(name: &str, scale: f64) -> SequencePair {
        SequencePair {
            name: name.to_string(),
            rate_anchor: vec![8000.0, 4000.0, 2000.0, 1000.0],
            dist_anchor: vec![42.0, 39.0, 36.0, 33.0],
            rate_test: vec![
                8000.0 * scale,
                4000.0 * scale,
                2000.0 * scale,
                1000.0 * scale,
            ],
            dist_test: vec![42.0, 39.0, 36.0, 33.0],
        }
    }

    #[test]
    fn test_batch_results_in_input_order() {
        let pairs: Vec<_> = (0..8)
            .map(|i| pair(&format!("seq{i}"), 1.0 - 0.01 * f64::from(i)))
            .collect();
        let report = evaluate_batch(&pairs, &BdConfig::default()).unwrap();
        assert_eq!(report.sequences.len(), 8);
        for (i, result) in report.sequences.iter().enumerate() {
            assert_eq!(result.name, format!("seq{i}"));
            assert!(
                (result.bd_rate - -(i as f64)).abs() < 1e-9,
                "{}",
                result.bd_rate
            );
            assert!(result.bd_psnr > -1e-12);
        }
        let summary = report.bd_rate.unwrap();
        assert_eq!(summary.count, 8);
        assert!((summary.mean - -3.5).abs() < 1e-9);
    }

    #[test]
    fn test_batch_skips_nan_in_summary() {
        let mut disjoint = pair("disjoint", 1.0);
        disjoint.dist_test = vec![62.0, 59.0, 56.0, 53.0];
        let pairs = vec![pair("good", 0.9), disjoint];

        let report = evaluate_batch(&pairs, &BdConfig::default()).unwrap();
        let flagged = &report.sequences[1];
        assert!(flagged.bd_rate.is_nan());
        assert!(flagged.warnings.contains(&OverlapWarning::EmptyOverlap));
        assert_eq!(report.flagged().count(), 1);

        let summary = report.bd_rate.unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_batch_propagates_errors() {
        let mut broken = pair("broken", 1.0);
        broken.dist_test.pop();
        let err = evaluate_batch(&[pair("ok", 1.0), broken], &BdConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_empty_batch() {
        let report = evaluate_batch(&[], &BdConfig::default()).unwrap();
        assert!(report.sequences.is_empty());
        assert!(report.bd_rate.is_none());
    }

    #[test]
    fn test_report_json() {
        let mut disjoint = pair("disjoint", 1.0);
        disjoint.dist_test = vec![62.0, 59.0, 56.0, 53.0];
        let report = evaluate_batch(&[disjoint], &BdConfig::default()).unwrap();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["method"], "pchip");
        assert!(value["sequences"][0]["bd_rate"].is_null());
        assert_eq!(
            value["sequences"][0]["warnings"][0]["kind"],
            "empty_overlap"
        );
    }

    #[test]
    fn test_pairs_from_json() {
        let json = r#"[{
            "name": "a",
            "rate_anchor": [100.0, 200.0],
            "dist_anchor": [30.0, 35.0],
            "rate_test": [90.0, 180.0],
            "dist_test": [30.0, 35.0]
        }]"#;
        let pairs: Vec<SequencePair> = serde_json::from_str(json).unwrap();
        let report = evaluate_batch(&pairs, &BdConfig::default()).unwrap();
        assert!((report.sequences[0].bd_rate - -10.0).abs() < 1e-9);
    }
}
