//! In-memory feature store for testing.

use std::collections::BTreeMap;
use async_trait::async_trait;

use crate::types::{Feature, FeatureId};
use super::FeatureStore;

/// Error type for in-memory store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InMemoryError {
    /// Feature not found.
    #[error("Feature not found: {0}")]
    FeatureNotFound(FeatureId),
}

/// In-memory feature store.
///
/// Uses a BTreeMap for deterministic iteration order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeatureStore {
    features: BTreeMap<FeatureId, Feature>,
}

impl InMemoryFeatureStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a feature.
    pub fn add_feature(&mut self, feature: Feature) {
        self.features.insert(feature.id.clone(), feature);
    }

    /// Replace the observation of an existing feature.
    pub fn set_observation(
        &mut self,
        id: &FeatureId,
        observation: Option<f64>,
    ) -> Result<(), InMemoryError> {
        let feature = self
            .features
            .get_mut(id)
            .ok_or_else(|| InMemoryError::FeatureNotFound(id.clone()))?;
        feature.observation = observation;
        Ok(())
    }

    /// Get number of features.
    pub fn num_features(&self) -> usize {
        self.features.len()
    }
}

impl FromIterator<Feature> for InMemoryFeatureStore {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut store = Self::new();
        for feature in iter {
            store.add_feature(feature);
        }
        store
    }
}

#[async_trait]
impl FeatureStore for InMemoryFeatureStore {
    type Error = InMemoryError;

    async fn load_features(&self) -> Result<Vec<Feature>, Self::Error> {
        Ok(self.features.values().cloned().collect())
    }

    async fn get_feature(&self, id: &FeatureId) -> Result<Option<Feature>, Self::Error> {
        Ok(self.features.get(id).cloned())
    }
}
