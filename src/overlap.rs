//! Integration interval shared by two RD curves.
//!
//! BD metrics only compare curves where both were actually measured. The
//! overlap is the intersection of the two sample ranges; its size relative to
//! the union of the ranges tells how representative the result is.

use serde::{Deserialize, Serialize};

/// Default minimum overlap ratio before a result is flagged.
pub const DEFAULT_MIN_OVERLAP: f64 = 0.75;

/// Bring a minimum overlap ratio into `[0, 1]`. NaN falls back to
/// [`DEFAULT_MIN_OVERLAP`].
///
/// ```
/// use bd_metric::overlap::{DEFAULT_MIN_OVERLAP, clamp_min_overlap};
///
/// assert_eq!(clamp_min_overlap(5.0), 1.0);
/// assert_eq!(clamp_min_overlap(-0.5), 0.0);
/// assert_eq!(clamp_min_overlap(f64::NAN), DEFAULT_MIN_OVERLAP);
/// ```
#[must_use]
pub fn clamp_min_overlap(ratio: f64) -> f64 {
    if ratio.is_nan() {
        DEFAULT_MIN_OVERLAP
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Intersection of two curve domains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    /// Lower bound of the intersection.
    pub min: f64,
    /// Upper bound of the intersection. Below `min` when the domains are disjoint.
    pub max: f64,
    /// Intersection width relative to the union width, in `[0, 1]`.
    pub ratio: f64,
}

/// Non-fatal condition attached to a BD result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlapWarning {
    /// The curves share no interval of positive width; the result is NaN.
    EmptyOverlap,
    /// The curves overlap on less than the requested fraction of their
    /// combined range; the result is computed on the small overlap.
    InsufficientOverlap {
        /// Actual overlap ratio.
        ratio: f64,
        /// Requested minimum ratio.
        minimum: f64,
    },
}

impl std::fmt::Display for OverlapWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOverlap => write!(f, "Curves do not overlap. BD cannot be calculated."),
            Self::InsufficientOverlap { ratio, minimum } => write!(
                f,
                "Insufficient curve overlap: {:.2}%. Minimum overlap: {:.2}%",
                ratio * 100.0,
                minimum * 100.0
            ),
        }
    }
}

impl Overlap {
    /// Compute the overlap of two `(min, max)` domains.
    ///
    /// # Example
    ///
    /// ```
    /// use bd_metric::overlap::Overlap;
    ///
    /// let overlap = Overlap::between((30.0, 40.0), (35.0, 45.0));
    /// assert_eq!((overlap.min, overlap.max), (35.0, 40.0));
    /// assert!((overlap.ratio - 1.0 / 3.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn between(a: (f64, f64), b: (f64, f64)) -> Self {
        let min = a.0.max(b.0);
        let max = a.1.min(b.1);
        let union = a.1.max(b.1) - a.0.min(b.0);

        let ratio = if union > 0.0 {
            ((max - min).max(0.0) / union).min(1.0)
        } else {
            0.0
        };

        Self { min, max, ratio }
    }

    /// Width of the intersection; zero or negative when there is none.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// True if there is no interval of positive width to integrate over.
    ///
    /// Domains that touch in a single point count as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.ratio == 0.0
    }

    /// Classify the overlap against a minimum ratio.
    ///
    /// `min_ratio` goes through [`clamp_min_overlap`] first, so a ratio above
    /// 1 cannot flag fully overlapping curves.
    #[must_use]
    pub fn check(&self, min_ratio: f64) -> Option<OverlapWarning> {
        let min_ratio = clamp_min_overlap(min_ratio);
        if self.is_empty() {
            Some(OverlapWarning::EmptyOverlap)
        } else if self.ratio < min_ratio {
            Some(OverlapWarning::InsufficientOverlap {
                ratio: self.ratio,
                minimum: min_ratio,
            })
        } else {
            None
        }
    }
}
