//! Equal-interval (arithmetic progression) breaks.

use super::ClassificationError;
use crate::types::BreakSet;

/// Breaks at `min + i*(max-min)/k` for `i = 1..=k`.
///
/// `values` must be sorted, distinct and hold at least `k` entries. The last
/// break is exactly `max`.
pub fn breaks(values: &[f64], k: usize) -> Result<BreakSet, ClassificationError> {
    let min = values[0];
    let max = values[values.len() - 1];
    let step = (max - min) / k as f64;

    let thresholds = (1..=k)
        .map(|i| if i == k { max } else { min + i as f64 * step })
        .collect();
    BreakSet::new(thresholds)
}
