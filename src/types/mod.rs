//! Core types for the choropleth kernel.

pub mod geometry;
pub mod feature;
pub mod color;
pub mod breaks;

pub use geometry::{Coordinate, Extent};
pub use feature::{Feature, FeatureId};
pub use color::{ColorParseError, Palette, Rgba};
pub use breaks::{BreakSet, ClassIndex};
