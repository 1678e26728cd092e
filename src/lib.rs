//! # choropleth-kernel
//!
//! Deterministic class breaks and region styling for choropleth maps.
//!
//! The kernel answers one question:
//!
//! > Given one observation per region, which colour class does each region
//! > fall into?
//!
//! ## Core Contract
//!
//! 1. Compute `k` ascending class breaks from the observed values with one
//!    of five strategies (equal interval, geometric, quantile, natural
//!    breaks, pretty)
//! 2. Map every feature to a class index and colour, or to no data
//! 3. Keep exactly one selected feature and frame it in the viewport
//!
//! ## Architecture
//!
//! ```text
//! FeatureStore → FeatureClassifier → ClassBreaksTable → Classification
//!                      ↓                                      ↓
//!              ClassificationMethod                      style_for
//!
//! SelectionController → ViewportFramer → FramingInstruction
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same observations + same policy → identical breaks and assignments
//! - Observation order never affects the breaks
//! - Observation sets and break sets are fingerprinted by exact value, so
//!   cached work is only reused for identical input

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod canonical;
pub mod strategy;
pub mod table;
pub mod policy;
pub mod config;
pub mod classifier;
pub mod framing;
pub mod selection;
pub mod store;
pub mod layer;

// Re-exports
pub use types::{
    BreakSet, ClassIndex, ColorParseError, Coordinate, Extent, Feature, FeatureId, Palette, Rgba,
};
pub use canonical::{
    canonical_hash, canonical_hash_hex, distinct_bits, exact_bits, float_fingerprint,
    observation_fingerprint, quantize, to_canonical_bytes,
};
pub use strategy::{ClassificationError, ClassificationMethod};
pub use table::{ClassBreaksTable, LegendEntry};
pub use policy::{
    ClassificationPolicy, FeatureStyle, FramingPolicy, StylePolicy, ZeroPolicy, DEFAULT_CLASS_COUNT,
};
pub use config::{ChoroplethConfig, ConfigError, ENV_CLASS_COUNT, ENV_METHOD};
pub use classifier::{
    CacheConfig, CacheStats, ClassAssignment, Classification, FeatureClassifier,
};
pub use framing::{FramingError, FramingInstruction, Viewport, ViewportFramer};
pub use selection::{
    SelectionChanged, SelectionCleared, SelectionController, SelectionState, SharedSelection,
};
pub use store::{FeatureStore, InMemoryFeatureStore};
pub use layer::{ChoroplethLayer, LayerError, ReloadOutcome};

/// Schema version for all serialized kernel types.
/// Increment on breaking changes to any schema type.
pub const CHOROPLETH_KERNEL_SCHEMA_VERSION: &str = "1.0.0";

/// Default policy version identifier.
pub const DEFAULT_POLICY_VERSION: &str = "classification_policy_v1";
