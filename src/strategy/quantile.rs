//! Quantile (equal-count) breaks.

use super::ClassificationError;
use crate::types::BreakSet;

/// Breaks at the values of nearest rank `ceil(i*n/k)` for `i = 1..=k`.
///
/// With `n >= k` distinct sorted values the ranks are strictly increasing,
/// so the breaks never repeat. The last rank is `n`, i.e. the maximum.
pub fn breaks(values: &[f64], k: usize) -> Result<BreakSet, ClassificationError> {
    let n = values.len();
    let thresholds = (1..=k)
        .map(|i| {
            let rank = (i * n).div_ceil(k);
            values[rank - 1]
        })
        .collect();
    BreakSet::new(thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        let values: Vec<f64> = (1..=12).map(f64::from).collect();
        let b = breaks(&values, 4).unwrap();
        assert_eq!(b.thresholds(), &[3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn test_uneven_split_uses_ceiling_rank() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        // ranks ceil(10/3)=4, ceil(20/3)=7, 10
        let b = breaks(&values, 3).unwrap();
        assert_eq!(b.thresholds(), &[4.0, 7.0, 10.0]);
    }

    #[test]
    fn test_n_equals_k_uses_every_value() {
        let b = breaks(&[1.0, 5.0, 9.0], 3).unwrap();
        assert_eq!(b.thresholds(), &[1.0, 5.0, 9.0]);
    }
}
