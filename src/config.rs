//! Host-supplied configuration.
//!
//! All knobs live in [`ChoroplethConfig`], which deserializes from JSON with
//! per-field defaults and can be adjusted through environment variables:
//!
//! - `CHOROPLETH_METHOD`: classification method (`equal_interval`,
//!   `geometric`, `quantile`, `natural_breaks`, `pretty`)
//! - `CHOROPLETH_CLASS_COUNT`: number of classes
//!
//! Configuration is validated when it is loaded, never at classification
//! time.

use serde::{Deserialize, Serialize};

use crate::policy::{ClassificationPolicy, FramingPolicy, StylePolicy};

/// Environment variable overriding the classification method.
pub const ENV_METHOD: &str = "CHOROPLETH_METHOD";
/// Environment variable overriding the class count.
pub const ENV_CLASS_COUNT: &str = "CHOROPLETH_CLASS_COUNT";

/// Invalid configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Fewer than two classes requested.
    #[error("Class count must be at least 2, got {0}")]
    InvalidClassCount(usize),
    /// Palette does not hold one colour per class.
    #[error("Palette has {palette} colours for {classes} classes")]
    PaletteLength {
        /// Colours supplied.
        palette: usize,
        /// Classes configured.
        classes: usize,
    },
    /// Framing constant out of range.
    #[error("Invalid framing configuration: {0}")]
    InvalidFraming(String),
    /// Style constant out of range.
    #[error("Invalid style configuration: {0}")]
    InvalidStyle(String),
    /// Policy parameters could not be serialized for hashing.
    #[error("Failed to hash policy parameters: {0}")]
    Hash(String),
    /// Malformed configuration document.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
    /// Environment override with an unusable value.
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Complete configuration for classification, styling and framing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoroplethConfig {
    /// Break computation and palette.
    pub classification: ClassificationPolicy,
    /// Region and selection styling.
    pub style: StylePolicy,
    /// Camera framing constants.
    pub framing: FramingPolicy,
}

impl ChoroplethConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CHOROPLETH_*` environment overrides, then validate.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup, then validate.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_METHOD) {
            self.classification.method = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_METHOD,
                value: value.clone(),
            })?;
            tracing::info!(method = %self.classification.method, "Classification method overridden");
        }
        if let Some(value) = lookup(ENV_CLASS_COUNT) {
            self.classification.class_count =
                value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_CLASS_COUNT,
                    value: value.clone(),
                })?;
            tracing::info!(
                class_count = self.classification.class_count,
                "Class count overridden"
            );
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.classification.validate()?;
        self.style.validate()?;
        self.framing.validate()
    }
}
