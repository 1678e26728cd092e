//! Policy definitions for classification, styling and framing.

pub mod classification;
pub mod framing;
pub mod style;

pub use classification::{ClassificationPolicy, ZeroPolicy, DEFAULT_CLASS_COUNT};
pub use framing::FramingPolicy;
pub use style::{FeatureStyle, StylePolicy};
