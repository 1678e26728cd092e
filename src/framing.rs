//! Viewport framing.
//!
//! Turns a feature extent into the resolution and centre the camera should
//! animate to. Pure: the result depends only on the extent, the viewport size
//! and the [`FramingPolicy`] constants.
//!
//! ## Algorithm
//!
//! 1. `fit = max(extent.width / viewport.width, extent.height / viewport.height)`
//! 2. If `fit` is below `min_resolution`, use `min_resolution * margin`;
//!    otherwise `fit * margin`
//! 3. Centre on the geometric centre of the extent

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::policy::FramingPolicy;
use crate::types::{Coordinate, Extent};

/// Error type for framing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FramingError {
    /// Viewport with a zero, negative or non-finite dimension.
    #[error("Invalid viewport size: {width}x{height}")]
    InvalidViewport {
        /// Width in pixels.
        width: f64,
        /// Height in pixels.
        height: f64,
    },
    /// Extent with a non-finite bound.
    #[error("Extent has non-finite bounds")]
    NonFiniteExtent,
}

/// Rendered size of the map viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn check(&self) -> Result<(), FramingError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(FramingError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Camera target handed to the map surface's animation API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramingInstruction {
    /// Target resolution in projection units per pixel.
    pub resolution: f64,
    /// Target centre.
    pub center: Coordinate,
    /// Animation duration.
    pub duration_ms: u64,
}

impl FramingInstruction {
    /// Zoom level equivalent of the target resolution.
    pub fn zoom(&self, max_resolution: f64, zoom_factor: f64) -> f64 {
        (max_resolution / self.resolution).ln() / zoom_factor.ln()
    }
}

/// Computes framing instructions from extents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportFramer {
    policy: FramingPolicy,
}

impl ViewportFramer {
    /// Create a framer from a validated policy.
    pub fn new(policy: FramingPolicy) -> Result<Self, ConfigError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// The framing policy.
    pub fn policy(&self) -> &FramingPolicy {
        &self.policy
    }

    /// Resolution at which `extent` exactly fills `viewport`.
    pub fn fit_resolution(extent: &Extent, viewport: &Viewport) -> f64 {
        (extent.width() / viewport.width).max(extent.height() / viewport.height)
    }

    /// Frame `extent` in `viewport`.
    pub fn frame(&self, extent: &Extent, viewport: &Viewport) -> Result<FramingInstruction, FramingError> {
        viewport.check()?;
        if !extent.is_finite() {
            return Err(FramingError::NonFiniteExtent);
        }

        let fit = Self::fit_resolution(extent, viewport);
        let base = if fit < self.policy.min_resolution {
            self.policy.min_resolution
        } else {
            fit
        };

        Ok(FramingInstruction {
            resolution: base * self.policy.margin,
            center: extent.center(),
            duration_ms: self.policy.duration_ms,
        })
    }

    /// Instruction returning the camera to the initial view.
    pub fn home(&self) -> FramingInstruction {
        FramingInstruction {
            resolution: self.policy.max_resolution
                / self.policy.zoom_factor.powf(self.policy.home_zoom),
            center: self.policy.home_center,
            duration_ms: self.policy.duration_ms,
        }
    }
}
