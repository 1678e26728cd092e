//! Region styling outside the class palette.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::types::Rgba;

/// Resolved style of one feature, ready for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStyle {
    /// Fill colour.
    pub fill: Rgba,
    /// Outline colour.
    pub stroke: Rgba,
    /// Outline width in pixels.
    pub stroke_width: f32,
    /// Draw order; higher is on top.
    pub z_index: i32,
}

/// Styling for no-data regions, region outlines and the selected region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePolicy {
    /// Fill for features without usable data.
    pub no_data_fill: Rgba,
    /// Outline of unselected regions.
    pub stroke: Rgba,
    /// Outline width of unselected regions.
    pub stroke_width: f32,
    /// Style of the selected region.
    pub selected: FeatureStyle,
}

impl StylePolicy {
    /// Base style for an unselected feature with the given fill.
    pub fn region(&self, fill: Rgba) -> FeatureStyle {
        FeatureStyle {
            fill,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
            z_index: 0,
        }
    }

    /// Base style for an unselected feature without data.
    pub fn no_data(&self) -> FeatureStyle {
        self.region(self.no_data_fill)
    }

    /// Stroke widths must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, width) in [
            ("stroke_width", self.stroke_width),
            ("selected.stroke_width", self.selected.stroke_width),
        ] {
            if !width.is_finite() || width < 0.0 {
                return Err(ConfigError::InvalidStyle(format!(
                    "{name} must be non-negative, got {width}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for StylePolicy {
    fn default() -> Self {
        Self {
            no_data_fill: Rgba::new(64, 64, 64, 0.6),
            stroke: Rgba::opaque(21, 21, 21),
            stroke_width: 1.0,
            selected: FeatureStyle {
                fill: Rgba::opaque(64, 64, 64),
                stroke: Rgba::opaque(255, 255, 0),
                stroke_width: 3.0,
                z_index: 10,
            },
        }
    }
}
