//! Jenks natural breaks.
//!
//! Finds the partition of the sorted distinct values into `k` contiguous,
//! non-empty groups that minimises the total within-class sum of squared
//! deviations from the class means.
//!
//! ## Algorithm
//!
//! Dynamic programming over the cost of the last class:
//!
//! ```text
//! cost[0][0] = 0
//! cost[j][i] = min over m in [j-1, i) of cost[j-1][m] + ssd(values[m..i])
//! ```
//!
//! For each `i` the candidate last class `values[m..i]` is grown one value at
//! a time while `m` walks down from `i-1`, with its mean and squared
//! deviation accumulated incrementally (Welford). Each segment's deviation is
//! taken about its own mean, which stays exact enough for case counts in the
//! billions where global sums of squares cancel. The argmin split points are
//! recorded and walked back from `cost[k][n]` to recover the class upper
//! bounds.
//!
//! Ties keep the smallest split index, so equal inputs always produce the
//! same partition.

use super::ClassificationError;
use crate::types::BreakSet;

/// Running mean and sum of squared deviations of a growing segment.
#[derive(Debug, Default, Clone, Copy)]
struct Segment {
    count: f64,
    mean: f64,
    m2: f64,
}

impl Segment {
    fn push(&mut self, value: f64) {
        self.count += 1.0;
        let delta = value - self.mean;
        self.mean += delta / self.count;
        self.m2 += delta * (value - self.mean);
    }
}

/// Sum of squared deviations of `values` from their mean, in two passes.
fn ssd(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean) * (v - mean)).sum()
}

/// Natural breaks over sorted distinct `values` (at least `k` of them).
pub fn breaks(values: &[f64], k: usize) -> Result<BreakSet, ClassificationError> {
    let n = values.len();

    // cost[j][i]: best total SSD for the first i values in j classes.
    let mut cost = vec![vec![f64::INFINITY; n + 1]; k + 1];
    let mut split = vec![vec![0usize; n + 1]; k + 1];
    cost[0][0] = 0.0;

    for i in 1..=n {
        let mut segment = Segment::default();
        for m in (0..i).rev() {
            segment.push(values[m]);
            // The first m values must fill j-1 non-empty classes.
            for j in 1..=k.min(m + 1) {
                let prev = cost[j - 1][m];
                if !prev.is_finite() {
                    continue;
                }
                let candidate = prev + segment.m2;
                if candidate <= cost[j][i] {
                    cost[j][i] = candidate;
                    split[j][i] = m;
                }
            }
        }
    }

    let mut thresholds = vec![0.0; k];
    let mut end = n;
    for j in (1..=k).rev() {
        thresholds[j - 1] = values[end - 1];
        end = split[j][end];
    }

    BreakSet::new(thresholds)
}

/// Goodness of variance fit for a break set over `values`.
///
/// `1 - (within-class SSD / total SSD)`; 1.0 is a perfect fit. Returns 1.0 for
/// inputs with zero total variance.
pub fn goodness_of_variance_fit(values: &[f64], breaks: &BreakSet) -> f64 {
    if values.is_empty() {
        return 1.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let total = ssd(&sorted);
    if total == 0.0 {
        return 1.0;
    }

    let mut within = 0.0;
    let mut start = 0;
    for upper in breaks.thresholds() {
        let end = sorted.partition_point(|v| v <= upper);
        if end > start {
            within += ssd(&sorted[start..end]);
            start = end;
        }
    }
    within += ssd(&sorted[start..]);
    1.0 - within / total
}
