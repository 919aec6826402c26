//! Akima spline interpolation.
//!
//! The derivative at each sample is a weighted average of the two adjacent
//! secants, weighted by how much the secants on the far side change. A single
//! outlying RD point therefore only bends the curve locally instead of
//! making a global fit swing.

use super::piecewise::{PiecewiseCubic, check_samples};
use crate::error::Result;

/// Minimum number of samples for the Akima scheme. Two-point curves fall back
/// to linear interpolation (see [`super::Interpolant::build`]).
pub const MIN_POINTS: usize = 3;

/// Relative threshold below which both weights are considered zero.
const WEIGHT_EPSILON: f64 = 1e-9;

/// Fit an Akima spline through strictly increasing `x` (at least 3 points).
pub fn fit(x: &[f64], y: &[f64]) -> Result<PiecewiseCubic> {
    check_samples("akima", x, y, MIN_POINTS)?;
    PiecewiseCubic::hermite(x, y, &slopes(x, y))
}

/// Derivative estimates at each sample.
fn slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let secants: Vec<f64> = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| (yw[1] - yw[0]) / (xw[1] - xw[0]))
        .collect();

    // Two phantom secants on each side, extrapolated linearly
    let s = secants.len();
    let before_1 = 2.0 * secants[0] - secants[1];
    let before_2 = 2.0 * before_1 - secants[0];
    let after_1 = 2.0 * secants[s - 1] - secants[s - 2];
    let after_2 = 2.0 * after_1 - secants[s - 1];

    let mut m = Vec::with_capacity(s + 4);
    m.push(before_2);
    m.push(before_1);
    m.extend_from_slice(&secants);
    m.push(after_1);
    m.push(after_2);

    // Sample i sits between extended secants m[i + 1] and m[i + 2]
    let weights: Vec<(f64, f64)> = (0..n)
        .map(|i| ((m[i + 3] - m[i + 2]).abs(), (m[i + 1] - m[i]).abs()))
        .collect();
    let max_total = weights
        .iter()
        .map(|(left, right)| left + right)
        .fold(f64::NEG_INFINITY, f64::max);

    weights
        .iter()
        .enumerate()
        .map(|(i, &(w_left, w_right))| {
            let total = w_left + w_right;
            if total > WEIGHT_EPSILON * max_total {
                (w_left * m[i + 1] + w_right * m[i + 2]) / total
            } else {
                0.5 * (m[i + 3] + m[i])
            }
        })
        .collect()
}
