//! Classification policy: method, class count, palette and zero handling.
//!
//! ## Float Normalization for Deterministic Hashing
//!
//! Palette alphas are quantized to integers before hashing (multiply by
//! 1e6 and round to i64), so `params_hash` is stable across platforms and
//! serializer settings.

use serde::{Deserialize, Serialize};

use crate::canonical::{canonical_hash_hex, quantize};
use crate::config::ConfigError;
use crate::strategy::ClassificationMethod;
use crate::types::Palette;
use crate::DEFAULT_POLICY_VERSION;

/// Default number of classes.
pub const DEFAULT_CLASS_COUNT: usize = 6;

/// How an observation of exactly zero is treated.
///
/// Zero never takes part in break computation (geometric progressions are
/// undefined there). The policy only decides what a zero-valued feature is
/// drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPolicy {
    /// Zero counts as missing data.
    #[default]
    NoData,
    /// Zero is a real observation in the lowest class.
    LowestClass,
}

/// Quantized policy parameters for deterministic hashing.
#[derive(Serialize)]
struct QuantizedPolicyParams<'a> {
    version: &'a str,
    method: &'static str,
    class_count: usize,
    palette: Vec<(u8, u8, u8, i64)>,
    zero_policy: ZeroPolicy,
}

/// Classification policy.
///
/// ## Parameters
///
/// - `method`: break strategy, one active per classification run
/// - `class_count`: number of classes `k` (at least 2)
/// - `palette`: `k` colours from lightest to most severe
/// - `zero_policy`: whether zero is NoData or class 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Break strategy.
    pub method: ClassificationMethod,
    /// Number of classes.
    pub class_count: usize,
    /// One colour per class.
    pub palette: Palette,
    /// Treatment of zero observations.
    pub zero_policy: ZeroPolicy,
}

impl ClassificationPolicy {
    /// Create a validated policy.
    pub fn new(
        method: ClassificationMethod,
        class_count: usize,
        palette: Palette,
    ) -> Result<Self, ConfigError> {
        let policy = Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            method,
            class_count,
            palette,
            zero_policy: ZeroPolicy::default(),
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Default policy with a different method.
    pub fn with_method(method: ClassificationMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Set the zero policy.
    pub fn zero_policy(mut self, zero_policy: ZeroPolicy) -> Self {
        self.zero_policy = zero_policy;
        self
    }

    /// Check class count and palette length.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.class_count < 2 {
            return Err(ConfigError::InvalidClassCount(self.class_count));
        }
        if self.palette.len() != self.class_count {
            return Err(ConfigError::PaletteLength {
                palette: self.palette.len(),
                classes: self.class_count,
            });
        }
        Ok(())
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Compute a hash of the policy parameters.
    ///
    /// Two policies with the same hash produce the same breaks and colours
    /// for the same observations.
    pub fn params_hash(&self) -> Result<String, ConfigError> {
        let quantized = QuantizedPolicyParams {
            version: &self.version,
            method: self.method.name(),
            class_count: self.class_count,
            palette: self
                .palette
                .colors()
                .iter()
                .map(|c| (c.r, c.g, c.b, quantize(c.a as f64)))
                .collect(),
            zero_policy: self.zero_policy,
        };
        canonical_hash_hex(&quantized).map_err(|e| ConfigError::Hash(e.to_string()))
    }
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            method: ClassificationMethod::default(),
            class_count: DEFAULT_CLASS_COUNT,
            palette: Palette::reds(),
            zero_policy: ZeroPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    #[test]
    fn test_default_policy() {
        let policy = ClassificationPolicy::default();
        assert_eq!(policy.method, ClassificationMethod::Geometric);
        assert_eq!(policy.class_count, 6);
        assert_eq!(policy.zero_policy, ZeroPolicy::NoData);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_new_rejects_bad_class_count() {
        let palette = Palette::new(vec![Rgba::opaque(0, 0, 0)]);
        assert_eq!(
            ClassificationPolicy::new(ClassificationMethod::Quantile, 1, palette),
            Err(ConfigError::InvalidClassCount(1))
        );
    }

    #[test]
    fn test_policy_params_hash_determinism() {
        let policy1 = ClassificationPolicy::default();
        let policy2 = ClassificationPolicy::default();

        assert_eq!(policy1.params_hash().unwrap(), policy2.params_hash().unwrap());
    }

    #[test]
    fn test_policy_params_hash_changes() {
        let policy1 = ClassificationPolicy::default();
        let policy2 = ClassificationPolicy::with_method(ClassificationMethod::NaturalBreaks);
        let policy3 = ClassificationPolicy::default().zero_policy(ZeroPolicy::LowestClass);

        let h1 = policy1.params_hash().unwrap();
        assert_ne!(h1, policy2.params_hash().unwrap());
        assert_ne!(h1, policy3.params_hash().unwrap());
    }
}
