//! Feature classification.
//!
//! Applies a [`ClassificationPolicy`] across a collection of features:
//!
//! 1. Collect the distinct, finite, strictly positive observations
//! 2. If none remain, every feature is NoData and no strategy runs
//! 3. Otherwise compute the [`BreakSet`] and build a [`ClassBreaksTable`]
//! 4. Assign each feature with a positive observation its class via
//!    `class_of`; features without one are NoData (zero follows
//!    [`ZeroPolicy`])
//!
//! Classification is side-effect free: the same features and policy always
//! yield the same assignments. The optional break cache only avoids
//! recomputing breaks for an observation set already seen.

use lru::LruCache;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use xxhash_rust::xxh64::Xxh64;

use crate::canonical::{distinct_bits, exact_bits, hex_digest};
use crate::config::ConfigError;
use crate::policy::{ClassificationPolicy, FeatureStyle, StylePolicy, ZeroPolicy};
use crate::strategy::ClassificationError;
use crate::table::ClassBreaksTable;
use crate::types::{BreakSet, ClassIndex, Feature, FeatureId, Rgba};

/// Class assigned to a single feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassAssignment {
    /// Feature falls into a class.
    Class {
        /// Class index.
        index: ClassIndex,
        /// Palette colour of the class.
        color: Rgba,
    },
    /// Feature has no usable observation.
    NoData,
}

impl ClassAssignment {
    /// Class index, if any.
    pub fn class_index(&self) -> Option<ClassIndex> {
        match self {
            Self::Class { index, .. } => Some(*index),
            Self::NoData => None,
        }
    }

    /// Whether this is the NoData assignment.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

/// Result of classifying one feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Breaks table; `None` when no feature had a usable observation.
    table: Option<ClassBreaksTable>,
    /// Per-feature assignments in `FeatureId` order.
    assignments: BTreeMap<FeatureId, ClassAssignment>,
    /// Fingerprint of the (id, observation) input pairs.
    input_fingerprint: String,
}

impl Classification {
    /// Classification where every feature is NoData.
    pub fn all_no_data(features: &[Feature]) -> Self {
        Self {
            table: None,
            assignments: features
                .iter()
                .map(|f| (f.id.clone(), ClassAssignment::NoData))
                .collect(),
            input_fingerprint: input_fingerprint(features),
        }
    }

    /// The breaks table, if one was built.
    pub fn table(&self) -> Option<&ClassBreaksTable> {
        self.table.as_ref()
    }

    /// The computed breaks, if any.
    pub fn breaks(&self) -> Option<&BreakSet> {
        self.table.as_ref().map(|t| t.breaks())
    }

    /// Assignment of a feature. `None` for unknown features.
    pub fn get(&self, id: &FeatureId) -> Option<ClassAssignment> {
        self.assignments.get(id).copied()
    }

    /// All assignments in `FeatureId` order.
    pub fn assignments(&self) -> &BTreeMap<FeatureId, ClassAssignment> {
        &self.assignments
    }

    /// Number of classified features.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no features were classified.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Fingerprint of the input features and observations.
    pub fn input_fingerprint(&self) -> &str {
        &self.input_fingerprint
    }

    /// Number of features per class, index 0 first.
    pub fn class_counts(&self) -> Vec<usize> {
        let k = self.table.as_ref().map_or(0, |t| t.num_classes());
        let mut counts = vec![0; k];
        for index in self.assignments.values().filter_map(|a| a.class_index()) {
            if let Some(c) = counts.get_mut(index.get()) {
                *c += 1;
            }
        }
        counts
    }

    /// Resolve the full render style of a feature.
    ///
    /// The selected feature always takes the selected style; unknown and
    /// NoData features take the no-data style.
    pub fn style_for(
        &self,
        id: &FeatureId,
        selected: Option<&FeatureId>,
        styles: &StylePolicy,
    ) -> FeatureStyle {
        if selected == Some(id) {
            return styles.selected;
        }
        match self.get(id) {
            Some(ClassAssignment::Class { color, .. }) => styles.region(color),
            Some(ClassAssignment::NoData) | None => styles.no_data(),
        }
    }
}

/// Configuration for the break-set cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_entries: usize,
    /// Whether to enable the cache.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 64,
            enabled: true,
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Current number of entries in the cache.
    pub len: usize,
    /// Maximum capacity of the cache.
    pub cap: usize,
}

/// Cached break set together with the exact observation set it was
/// computed from. A hit is only served when the stored set matches.
#[derive(Debug, Clone)]
struct CachedBreaks {
    observations: Vec<u64>,
    breaks: BreakSet,
}

/// Classifies feature collections under one policy.
///
/// Thread-safe; the optional cache sits behind a `parking_lot::RwLock`.
pub struct FeatureClassifier {
    policy: ClassificationPolicy,
    params_hash: String,
    cache: Option<Arc<RwLock<LruCache<u64, CachedBreaks>>>>,
}

impl FeatureClassifier {
    /// Create a classifier without caching. Fails fast on invalid policy.
    pub fn new(policy: ClassificationPolicy) -> Result<Self, ConfigError> {
        Self::with_cache(policy, CacheConfig { max_entries: 0, enabled: false })
    }

    /// Create a classifier with a break-set cache.
    pub fn with_cache(policy: ClassificationPolicy, config: CacheConfig) -> Result<Self, ConfigError> {
        policy.validate()?;
        let cache = if config.enabled {
            NonZeroUsize::new(config.max_entries)
                .map(|size| Arc::new(RwLock::new(LruCache::new(size))))
        } else {
            None
        };
        let params_hash = policy.params_hash()?;
        Ok(Self {
            policy,
            params_hash,
            cache,
        })
    }

    /// Get the policy.
    pub fn policy(&self) -> &ClassificationPolicy {
        &self.policy
    }

    /// Observations that take part in break computation: finite and
    /// strictly positive. Duplicates are left for the strategy to drop.
    pub fn usable_observations(features: &[Feature]) -> Vec<f64> {
        features
            .iter()
            .filter_map(|f| f.observation)
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect()
    }

    /// Compute breaks for `observations`, consulting the cache first.
    pub fn compute_breaks(&self, observations: &[f64]) -> Result<BreakSet, ClassificationError> {
        let Some(cache) = &self.cache else {
            return self.policy.method.compute(observations, self.policy.class_count);
        };

        let bits = distinct_bits(observations);
        let key = self.cache_key(&bits);
        if let Some(hit) = cache.read().peek(&key) {
            if hit.observations == bits {
                tracing::trace!(key, "Break set cache hit");
                return Ok(hit.breaks.clone());
            }
        }

        let breaks = self
            .policy
            .method
            .compute(observations, self.policy.class_count)?;

        cache.write().put(
            key,
            CachedBreaks {
                observations: bits,
                breaks: breaks.clone(),
            },
        );
        Ok(breaks)
    }

    /// Classify `features`.
    ///
    /// Errors from the strategy (too few distinct values, degenerate range)
    /// propagate; see [`Self::classify_or_no_data`] for the fail-open form.
    pub fn classify(&self, features: &[Feature]) -> Result<Classification, ClassificationError> {
        let observations = Self::usable_observations(features);
        let table = if observations.is_empty() {
            tracing::debug!(features = features.len(), "No usable observations, skipping break computation");
            None
        } else {
            let breaks = self.compute_breaks(&observations)?;
            // Palette length was validated against class_count at construction.
            let table = ClassBreaksTable::new(breaks, self.policy.palette.clone())
                .map_err(|e| ClassificationError::degenerate("palette", e.to_string()))?;
            Some(table)
        };

        let assignments = features
            .iter()
            .map(|f| (f.id.clone(), self.assign(f, table.as_ref())))
            .collect();

        let classification = Classification {
            table,
            assignments,
            input_fingerprint: input_fingerprint(features),
        };
        tracing::debug!(
            method = %self.policy.method,
            features = classification.len(),
            counts = ?classification.class_counts(),
            "Classified features"
        );
        Ok(classification)
    }

    /// Classify `features`, falling back to all-NoData on error.
    pub fn classify_or_no_data(&self, features: &[Feature]) -> Classification {
        match self.classify(features) {
            Ok(classification) => classification,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    method = %self.policy.method,
                    class_count = self.policy.class_count,
                    "Classification failed, rendering all features as no data"
                );
                Classification::all_no_data(features)
            }
        }
    }

    fn cache_key(&self, bits: &[u64]) -> u64 {
        let mut hasher = Xxh64::new(0);
        hasher.update(self.params_hash.as_bytes());
        for b in bits {
            hasher.update(&b.to_le_bytes());
        }
        hasher.digest()
    }

    fn assign(&self, feature: &Feature, table: Option<&ClassBreaksTable>) -> ClassAssignment {
        let value = match feature.observation {
            Some(v) => v,
            None => return ClassAssignment::NoData,
        };

        if value == 0.0 {
            return match self.policy.zero_policy {
                ZeroPolicy::NoData => ClassAssignment::NoData,
                ZeroPolicy::LowestClass => ClassAssignment::Class {
                    index: ClassIndex::new(0),
                    color: self.policy.palette.colors()[0],
                },
            };
        }
        if !value.is_finite() || value < 0.0 {
            tracing::debug!(feature = %feature.id, value, "Ignoring unusable observation");
            return ClassAssignment::NoData;
        }

        match table {
            Some(table) => {
                let (index, color) = table.classify_value(value);
                ClassAssignment::Class { index, color }
            }
            None => ClassAssignment::NoData,
        }
    }

    /// Get cache statistics.
    ///
    /// Returns `None` if caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| {
            let cache = cache.read();
            CacheStats {
                len: cache.len(),
                cap: cache.cap().get(),
            }
        })
    }

    /// Clear the break-set cache.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.write().clear();
        }
    }
}

/// Fingerprint of the exact (id, observation) pairs in id order.
pub(crate) fn input_fingerprint(features: &[Feature]) -> String {
    let pairs: BTreeMap<&str, Option<f64>> = features
        .iter()
        .map(|f| (f.id.as_str(), f.observation))
        .collect();

    let mut hasher = Xxh64::new(0);
    for (id, observation) in pairs {
        hasher.update(&(id.len() as u64).to_le_bytes());
        hasher.update(id.as_bytes());
        match observation {
            Some(v) => {
                hasher.update(&[1]);
                hasher.update(&exact_bits(v).to_le_bytes());
            }
            None => hasher.update(&[0]),
        }
    }
    hex_digest(&hasher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ClassificationMethod;
    use crate::types::{Extent, Palette};

    fn feature(id: &str, value: Option<f64>) -> Feature {
        Feature {
            id: FeatureId::new(id),
            extent: Extent::new(0.0, 0.0, 1.0, 1.0),
            observation: value,
        }
    }

    fn classifier(method: ClassificationMethod) -> FeatureClassifier {
        FeatureClassifier::new(ClassificationPolicy::with_method(method)).unwrap()
    }

    fn spread() -> Vec<Feature> {
        [10.0, 20.0, 30.0, 40.0, 50.0, 60.0]
            .iter()
            .enumerate()
            .map(|(i, v)| feature(&format!("C{i}"), Some(*v)))
            .collect()
    }

    #[test]
    fn test_no_observations_gives_all_no_data() {
        let features = vec![feature("A", None), feature("B", Some(0.0))];
        let result = classifier(ClassificationMethod::Geometric).classify(&features).unwrap();
        assert!(result.table().is_none());
        assert!(result.assignments().values().all(|a| a.is_no_data()));
    }

    #[test]
    fn test_equal_interval_assignment() {
        let mut features = spread();
        features.push(feature("NONE", None));
        let result = classifier(ClassificationMethod::EqualInterval)
            .classify(&features)
            .unwrap();

        assert_eq!(result.get(&FeatureId::new("C0")).unwrap().class_index(), Some(ClassIndex::new(0)));
        assert_eq!(result.get(&FeatureId::new("C5")).unwrap().class_index(), Some(ClassIndex::new(5)));
        assert!(result.get(&FeatureId::new("NONE")).unwrap().is_no_data());
        assert_eq!(result.class_counts(), vec![1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_duplicates_removed_before_breaks() {
        let features: Vec<Feature> = (0..12)
            .map(|i| feature(&format!("D{i}"), Some(((i % 3) + 1) as f64)))
            .collect();
        // only 3 distinct values for 6 classes
        let err = classifier(ClassificationMethod::Quantile).classify(&features).unwrap_err();
        assert_eq!(err, ClassificationError::InsufficientData { distinct: 3, classes: 6 });
    }

    #[test]
    fn test_fail_open() {
        let features = vec![feature("A", Some(1.0)), feature("B", Some(2.0))];
        let result = classifier(ClassificationMethod::NaturalBreaks).classify_or_no_data(&features);
        assert_eq!(result.len(), 2);
        assert!(result.assignments().values().all(|a| a.is_no_data()));
    }

    #[test]
    fn test_zero_policy() {
        let mut features = spread();
        features.push(feature("ZERO", Some(0.0)));
        features.push(feature("NEG", Some(-5.0)));

        let default = classifier(ClassificationMethod::Geometric).classify(&features).unwrap();
        assert!(default.get(&FeatureId::new("ZERO")).unwrap().is_no_data());
        assert!(default.get(&FeatureId::new("NEG")).unwrap().is_no_data());

        let policy = ClassificationPolicy::with_method(ClassificationMethod::Geometric)
            .zero_policy(ZeroPolicy::LowestClass);
        let lowest = FeatureClassifier::new(policy).unwrap().classify(&features).unwrap();
        assert_eq!(
            lowest.get(&FeatureId::new("ZERO")).unwrap().class_index(),
            Some(ClassIndex::new(0))
        );
        assert!(lowest.get(&FeatureId::new("NEG")).unwrap().is_no_data());
    }

    #[test]
    fn test_idempotent() {
        let c = classifier(ClassificationMethod::NaturalBreaks);
        let a = c.classify(&spread()).unwrap();
        let b = c.classify(&spread()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.input_fingerprint(), b.input_fingerprint());
    }

    #[test]
    fn test_cache_hit_returns_same_breaks() {
        let c = FeatureClassifier::with_cache(ClassificationPolicy::default(), CacheConfig::default())
            .unwrap();
        let first = c.classify(&spread()).unwrap();
        assert_eq!(c.cache_stats().unwrap().len, 1);

        let second = c.classify(&spread()).unwrap();
        assert_eq!(first.breaks(), second.breaks());
        assert_eq!(c.cache_stats().unwrap().len, 1);

        c.clear_cache();
        assert_eq!(c.cache_stats().unwrap().len, 0);
    }

    fn cached() -> FeatureClassifier {
        FeatureClassifier::with_cache(
            ClassificationPolicy::with_method(ClassificationMethod::EqualInterval),
            CacheConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_cache_separates_nearly_equal_sets() {
        let c = cached();
        let a = c.compute_breaks(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.000_000_1]).unwrap();
        let b = c.compute_breaks(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.000_000_2]).unwrap();
        assert_eq!(a.upper(), 6.000_000_1);
        assert_eq!(b.upper(), 6.000_000_2);
        assert_eq!(c.cache_stats().unwrap().len, 2);
    }

    #[test]
    fn test_cache_separates_large_sets() {
        let c = cached();
        let low: Vec<f64> = (1..=6).map(|i| i as f64 * 1e13).collect();
        let high: Vec<f64> = (1..=6).map(|i| i as f64 * 1e14).collect();
        assert_eq!(c.compute_breaks(&low).unwrap().upper(), 6e13);
        assert_eq!(c.compute_breaks(&high).unwrap().upper(), 6e14);
    }

    #[test]
    fn test_input_fingerprint_sees_small_changes() {
        let before = vec![feature("A", Some(1e-7)), feature("B", Some(2e-7))];
        let after = vec![feature("A", Some(1e-7)), feature("B", Some(2.4e-7))];
        assert_ne!(input_fingerprint(&before), input_fingerprint(&after));

        let missing = vec![feature("A", Some(1e-7)), feature("B", None)];
        assert_ne!(input_fingerprint(&before), input_fingerprint(&missing));
    }

    #[test]
    fn test_invalid_policy_fails_at_construction() {
        let mut policy = ClassificationPolicy::default();
        policy.palette = Palette::new(vec![]);
        assert!(FeatureClassifier::new(policy).is_err());
    }

    #[test]
    fn test_style_for() {
        let styles = StylePolicy::default();
        let mut features = spread();
        features.push(feature("NONE", None));
        let result = classifier(ClassificationMethod::EqualInterval).classify(&features).unwrap();

        let c5 = FeatureId::new("C5");
        let style = result.style_for(&c5, None, &styles);
        assert_eq!(style.fill, Palette::reds().get(5).unwrap());

        let selected = result.style_for(&c5, Some(&c5), &styles);
        assert_eq!(selected, styles.selected);

        let none = result.style_for(&FeatureId::new("NONE"), Some(&c5), &styles);
        assert_eq!(none.fill, styles.no_data_fill);
    }
}
