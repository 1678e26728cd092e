//! Geographic entities carrying an optional observation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::Extent;

/// Identifier of a map feature (typically an ISO country code).
///
/// Implements `Ord` so classifications iterate in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    /// Create a new feature identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FeatureId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FeatureId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A geographic feature with its extent and optional observation.
///
/// The geometry itself stays with the rendering surface; the kernel only
/// needs the bounding extent for framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature identifier.
    pub id: FeatureId,
    /// Bounding extent of the feature geometry.
    pub extent: Extent,
    /// Observed value (case count), if any data exists for the feature.
    #[serde(default)]
    pub observation: Option<f64>,
}

impl Feature {
    /// Create a feature with an observation.
    pub fn new(id: impl Into<FeatureId>, extent: Extent, observation: f64) -> Self {
        Self {
            id: id.into(),
            extent,
            observation: Some(observation),
        }
    }

    /// Create a feature without data.
    pub fn without_data(id: impl Into<FeatureId>, extent: Extent) -> Self {
        Self {
            id: id.into(),
            extent,
            observation: None,
        }
    }

    /// Whether an observation is attached.
    pub fn has_observation(&self) -> bool {
        self.observation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_deserializes_missing_observation() {
        let json = r#"{"id":"FRA","extent":{"min_x":-5.0,"min_y":41.0,"max_x":9.5,"max_y":51.0}}"#;
        let feature: Feature = serde_json::from_str(json).unwrap();
        assert_eq!(feature.id.as_str(), "FRA");
        assert!(!feature.has_observation());
    }

    #[test]
    fn test_feature_id_ordering() {
        let mut ids = vec![FeatureId::new("USA"), FeatureId::new("BRA"), FeatureId::new("IND")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "BRA");
        assert_eq!(ids[2].as_str(), "USA");
    }
}
