//! Framing policy: over-zoom guard, margin and the home view.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::types::Coordinate;

/// Default minimum resolution (projection units per pixel).
pub const DEFAULT_MIN_RESOLUTION: f64 = 0.025;
/// Default margin factor applied to the fitted resolution.
pub const DEFAULT_MARGIN: f64 = 1.15;
/// Default camera animation duration.
pub const DEFAULT_DURATION_MS: u64 = 1000;
/// Resolution at zoom 0 for a 256px tile over 360 degrees of longitude.
pub const DEFAULT_MAX_RESOLUTION: f64 = 360.0 / 256.0;

/// Framing constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingPolicy {
    /// Resolution below which framing stops zooming in.
    pub min_resolution: f64,
    /// Factor applied to the chosen resolution so the feature does not touch
    /// the viewport edge.
    pub margin: f64,
    /// Duration handed to the camera animation.
    pub duration_ms: u64,
    /// Resolution at zoom level 0.
    pub max_resolution: f64,
    /// Resolution ratio between consecutive zoom levels.
    pub zoom_factor: f64,
    /// Centre of the initial view.
    pub home_center: Coordinate,
    /// Zoom level of the initial view.
    pub home_zoom: f64,
}

impl FramingPolicy {
    /// Check all constants are finite and in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidFraming(format!("{name} must be positive, got {v}")))
            }
        };
        positive("min_resolution", self.min_resolution)?;
        positive("margin", self.margin)?;
        positive("max_resolution", self.max_resolution)?;
        if !(self.zoom_factor.is_finite() && self.zoom_factor > 1.0) {
            return Err(ConfigError::InvalidFraming(format!(
                "zoom_factor must be greater than 1, got {}",
                self.zoom_factor
            )));
        }
        if !self.home_center.is_finite() || !self.home_zoom.is_finite() {
            return Err(ConfigError::InvalidFraming("home view must be finite".to_string()));
        }
        Ok(())
    }
}

impl Default for FramingPolicy {
    fn default() -> Self {
        Self {
            min_resolution: DEFAULT_MIN_RESOLUTION,
            margin: DEFAULT_MARGIN,
            duration_ms: DEFAULT_DURATION_MS,
            max_resolution: DEFAULT_MAX_RESOLUTION,
            zoom_factor: 2.0,
            home_center: Coordinate::new(0.0, 50.0),
            home_zoom: 0.0,
        }
    }
}
