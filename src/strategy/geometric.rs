//! Geometric progression breaks.

use super::ClassificationError;
use crate::types::BreakSet;

/// Breaks at `min * (max/min)^(i/k)` for `i = 1..=k`.
///
/// Requires a strictly positive minimum; zero or negative observations make
/// the progression undefined and fail with
/// [`ClassificationError::DegenerateRange`].
pub fn breaks(values: &[f64], k: usize) -> Result<BreakSet, ClassificationError> {
    let min = values[0];
    let max = values[values.len() - 1];
    if min <= 0.0 {
        return Err(ClassificationError::degenerate(
            "geometric",
            format!("minimum observation must be positive, got {min}"),
        ));
    }

    let ratio = max / min;
    let thresholds = (1..=k)
        .map(|i| {
            if i == k {
                max
            } else {
                min * ratio.powf(i as f64 / k as f64)
            }
        })
        .collect();
    BreakSet::new(thresholds)
}
