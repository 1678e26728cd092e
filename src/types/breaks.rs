//! Class break thresholds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::float_fingerprint;
use crate::strategy::ClassificationError;

/// Index of a class bucket in `[0, k-1]`.
///
/// Class 0 is the least severe bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassIndex(usize);

impl ClassIndex {
    /// Create a class index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered upper bounds of `k` classes.
///
/// ## Invariants
///
/// - Non-empty, every threshold finite
/// - Strictly ascending: `b[0] < b[1] < ... < b[k-1]`
///
/// Class `i` holds values in `(b[i-1], b[i]]`; class 0 additionally absorbs
/// everything at or below `b[0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct BreakSet(Vec<f64>);

impl BreakSet {
    /// Create a break set, validating the ordering invariants.
    pub fn new(thresholds: Vec<f64>) -> Result<Self, ClassificationError> {
        if thresholds.is_empty() {
            return Err(ClassificationError::degenerate("breaks", "empty break set"));
        }
        if let Some(bad) = thresholds.iter().find(|b| !b.is_finite()) {
            return Err(ClassificationError::degenerate(
                "breaks",
                format!("non-finite threshold {bad}"),
            ));
        }
        if let Some(pair) = thresholds.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ClassificationError::degenerate(
                "breaks",
                format!("thresholds not strictly ascending: {} >= {}", pair[0], pair[1]),
            ));
        }
        Ok(Self(thresholds))
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a break set has at least one class.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Thresholds in ascending order.
    pub fn thresholds(&self) -> &[f64] {
        &self.0
    }

    /// Highest threshold (upper bound of the top class).
    pub fn upper(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Lowest threshold (upper bound of class 0).
    pub fn lower(&self) -> f64 {
        self.0[0]
    }

    /// Class of `value`: the first class whose upper bound is `>= value`,
    /// clamped to the top class for values above `b[k-1]`.
    ///
    /// Total over all `f64`; NaN lands in class 0.
    pub fn class_of(&self, value: f64) -> ClassIndex {
        let idx = self.0.partition_point(|b| *b < value);
        ClassIndex(idx.min(self.0.len() - 1))
    }

    /// Stable hex fingerprint of the thresholds.
    ///
    /// Hashes the exact threshold bits, so break sets that differ in any
    /// threshold fingerprint differently.
    pub fn fingerprint(&self) -> String {
        float_fingerprint(self.0.iter().copied())
    }
}

impl TryFrom<Vec<f64>> for BreakSet {
    type Error = ClassificationError;

    fn try_from(thresholds: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(thresholds)
    }
}

impl From<BreakSet> for Vec<f64> {
    fn from(breaks: BreakSet) -> Self {
        breaks.0
    }
}
