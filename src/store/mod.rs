//! Feature storage backends.
//!
//! The kernel does not fetch data itself; the host supplies features through
//! a [`FeatureStore`], already deserialized and joined with their
//! observations.

pub mod memory;

use async_trait::async_trait;
use crate::types::{Feature, FeatureId};

/// Trait for feature storage backends.
///
/// Implementations must return features in a deterministic order.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync;

    /// Load every feature with its current observation.
    async fn load_features(&self) -> Result<Vec<Feature>, Self::Error>;

    /// Fetch a single feature by ID.
    async fn get_feature(&self, id: &FeatureId) -> Result<Option<Feature>, Self::Error>;
}

pub use memory::InMemoryFeatureStore;
