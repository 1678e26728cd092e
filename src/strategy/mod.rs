//! Class break strategies.
//!
//! Every strategy takes a sequence of observations and a class count `k` and
//! returns a [`BreakSet`] of exactly `k` strictly ascending thresholds.
//!
//! ## Shared preconditions
//!
//! Observations are reduced to their sorted distinct values before any
//! strategy runs. Computation fails with
//! [`ClassificationError::InsufficientData`] when fewer than `k` distinct
//! values remain, so every strategy can rely on `n >= k >= 2` distinct,
//! finite, sorted inputs.
//!
//! | Method | Algorithm | Cost |
//! |--------|-----------|------|
//! | `equal_interval` | `min + i*(max-min)/k` | O(k) |
//! | `geometric` | `min * (max/min)^(i/k)` | O(k) |
//! | `quantile` | nearest-rank values at `i*n/k` | O(k) |
//! | `natural_breaks` | Jenks optimal partition (DP) | O(n²·k) |
//! | `pretty` | equal steps rounded to 1-2-5 magnitudes | O(k) |

pub mod equal_interval;
pub mod geometric;
pub mod jenks;
pub mod pretty;
pub mod quantile;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::BreakSet;

/// Error type for break computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassificationError {
    /// Fewer distinct observations than requested classes.
    #[error("Insufficient data: {distinct} distinct observations for {classes} classes")]
    InsufficientData {
        /// Number of distinct usable observations.
        distinct: usize,
        /// Requested class count.
        classes: usize,
    },
    /// Strategy-specific precondition violated.
    #[error("Degenerate range for {method}: {reason}")]
    DegenerateRange {
        /// Strategy or component that rejected the input.
        method: &'static str,
        /// What was wrong with the input.
        reason: String,
    },
    /// Class count below 2.
    #[error("Class count must be at least 2, got {0}")]
    InvalidClassCount(usize),
}

impl ClassificationError {
    /// Create a degenerate-range error.
    pub fn degenerate(method: &'static str, reason: impl Into<String>) -> Self {
        Self::DegenerateRange {
            method,
            reason: reason.into(),
        }
    }
}

/// Classification method, selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// Equal-width classes (arithmetic progression).
    #[serde(alias = "arithmetic")]
    EqualInterval,
    /// Geometric progression between min and max.
    #[default]
    Geometric,
    /// Equal-count classes.
    Quantile,
    /// Jenks natural breaks.
    #[serde(alias = "jenks")]
    NaturalBreaks,
    /// Equal steps rounded to human-friendly magnitudes.
    Pretty,
}

impl ClassificationMethod {
    /// All methods, in declaration order.
    pub const ALL: [ClassificationMethod; 5] = [
        Self::EqualInterval,
        Self::Geometric,
        Self::Quantile,
        Self::NaturalBreaks,
        Self::Pretty,
    ];

    /// Configuration name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EqualInterval => "equal_interval",
            Self::Geometric => "geometric",
            Self::Quantile => "quantile",
            Self::NaturalBreaks => "natural_breaks",
            Self::Pretty => "pretty",
        }
    }

    /// Compute `k` class breaks for `observations`.
    pub fn compute(&self, observations: &[f64], k: usize) -> Result<BreakSet, ClassificationError> {
        let values = distinct_sorted(observations, k)?;

        let breaks = match self {
            Self::EqualInterval => equal_interval::breaks(&values, k),
            Self::Geometric => geometric::breaks(&values, k),
            Self::Quantile => quantile::breaks(&values, k),
            Self::NaturalBreaks => jenks::breaks(&values, k),
            Self::Pretty => pretty::breaks(&values, k),
        }?;

        tracing::debug!(
            method = self.name(),
            classes = k,
            distinct = values.len(),
            breaks = ?breaks.thresholds(),
            "Computed class breaks"
        );
        Ok(breaks)
    }
}

impl fmt::Display for ClassificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClassificationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal_interval" | "arithmetic" => Ok(Self::EqualInterval),
            "geometric" => Ok(Self::Geometric),
            "quantile" => Ok(Self::Quantile),
            "natural_breaks" | "jenks" => Ok(Self::NaturalBreaks),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown classification method: {other}")),
        }
    }
}

/// Sorted distinct observations, validated against `k`.
pub(crate) fn distinct_sorted(observations: &[f64], k: usize) -> Result<Vec<f64>, ClassificationError> {
    if k < 2 {
        return Err(ClassificationError::InvalidClassCount(k));
    }
    if let Some(bad) = observations.iter().find(|v| !v.is_finite()) {
        return Err(ClassificationError::degenerate(
            "observations",
            format!("non-finite observation {bad}"),
        ));
    }

    let mut values = observations.to_vec();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();

    if values.len() < k {
        return Err(ClassificationError::InsufficientData {
            distinct: values.len(),
            classes: k,
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_sorted_dedups() {
        let v = distinct_sorted(&[3.0, 1.0, 3.0, 2.0], 2).unwrap();
        assert_eq!(v, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_insufficient_distinct_values() {
        let err = ClassificationMethod::Quantile
            .compute(&[1.0, 1.0, 2.0, 3.0], 6)
            .unwrap_err();
        assert_eq!(err, ClassificationError::InsufficientData { distinct: 3, classes: 6 });
    }

    #[test]
    fn test_empty_observations_fail() {
        for method in ClassificationMethod::ALL {
            assert!(matches!(
                method.compute(&[], 3),
                Err(ClassificationError::InsufficientData { distinct: 0, .. })
            ));
        }
    }

    #[test]
    fn test_class_count_below_two() {
        assert_eq!(
            ClassificationMethod::EqualInterval.compute(&[1.0, 2.0], 1),
            Err(ClassificationError::InvalidClassCount(1))
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = ClassificationMethod::Pretty
            .compute(&[1.0, f64::NAN, 3.0], 2)
            .unwrap_err();
        assert!(matches!(err, ClassificationError::DegenerateRange { .. }));
    }

    #[test]
    fn test_every_method_yields_k_ascending_breaks() {
        let obs: Vec<f64> = (1..=40).map(|i| (i * i) as f64).collect();
        for method in ClassificationMethod::ALL {
            let breaks = method.compute(&obs, 6).unwrap();
            assert_eq!(breaks.len(), 6, "{method}");
            assert!(breaks.thresholds().windows(2).all(|w| w[0] < w[1]), "{method}");
            assert_eq!(breaks.class_of(1600.0).get(), 5, "{method}");
        }
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("jenks".parse::<ClassificationMethod>(), Ok(ClassificationMethod::NaturalBreaks));
        assert_eq!("Arithmetic".parse::<ClassificationMethod>(), Ok(ClassificationMethod::EqualInterval));
        assert!("kmeans".parse::<ClassificationMethod>().is_err());

        let m: ClassificationMethod = serde_json::from_str("\"natural_breaks\"").unwrap();
        assert_eq!(m, ClassificationMethod::NaturalBreaks);
        assert_eq!(serde_json::to_string(&ClassificationMethod::Pretty).unwrap(), "\"pretty\"");
    }
}
