//! Choropleth layer: the host-facing composition of store, classifier and
//! selection.
//!
//! The layer holds no subscriptions. The host calls [`ChoroplethLayer::reload`]
//! whenever its data source reports new observations and
//! [`ChoroplethLayer::select`] when the user picks a region, then forwards
//! the returned styles and framing instructions to the map surface.

use std::sync::Arc;

use crate::classifier::{input_fingerprint, Classification, FeatureClassifier};
use crate::config::{ChoroplethConfig, ConfigError};
use crate::framing::{FramingError, FramingInstruction, Viewport, ViewportFramer};
use crate::policy::{FeatureStyle, StylePolicy};
use crate::selection::{SelectionChanged, SelectionCleared, SelectionController};
use crate::store::FeatureStore;
use crate::strategy::ClassificationError;
use crate::types::FeatureId;

/// Error type for layer operations.
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// Requested feature is not in the store.
    #[error("Feature not found: {0}")]
    FeatureNotFound(FeatureId),
    /// Store error.
    #[error("Store error: {0}")]
    StoreError(String),
    /// Framing error.
    #[error("Framing error: {0}")]
    Framing(#[from] FramingError),
}

impl LayerError {
    /// Create a store error from any error type.
    pub fn from_store<E: std::error::Error>(e: E) -> Self {
        Self::StoreError(e.to_string())
    }
}

/// Outcome of a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Features or observations changed and were reclassified.
    Reclassified,
    /// Input identical to the current classification; nothing recomputed.
    Unchanged,
}

/// Choropleth layer over a feature store.
pub struct ChoroplethLayer<S: FeatureStore> {
    store: Arc<S>,
    classifier: FeatureClassifier,
    styles: StylePolicy,
    selection: SelectionController,
    classification: Option<Classification>,
    last_error: Option<ClassificationError>,
}

impl<S: FeatureStore> ChoroplethLayer<S> {
    /// Create a layer from a validated configuration.
    pub fn new(store: Arc<S>, config: ChoroplethConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier = FeatureClassifier::new(config.classification)?;
        let framer = ViewportFramer::new(config.framing)?;
        Ok(Self {
            store,
            classifier,
            styles: config.style,
            selection: SelectionController::new(framer),
            classification: None,
            last_error: None,
        })
    }

    /// Load features and reclassify them.
    ///
    /// Skips work when the loaded ids and observations fingerprint the same
    /// as the current classification. Classification failures do not fail
    /// the reload: every feature is rendered as no data and the error is kept
    /// in [`Self::last_error`].
    pub async fn reload(&mut self) -> Result<ReloadOutcome, LayerError> {
        let features = self.store.load_features().await.map_err(LayerError::from_store)?;

        let fingerprint = input_fingerprint(&features);
        if self.classification.as_ref().map(|c| c.input_fingerprint()) == Some(fingerprint.as_str()) {
            tracing::debug!(%fingerprint, "Reload input unchanged, keeping classification");
            return Ok(ReloadOutcome::Unchanged);
        }

        let classification = match self.classifier.classify(&features) {
            Ok(c) => {
                self.last_error = None;
                c
            }
            Err(e) => {
                tracing::warn!(error = %e, "Classification failed, rendering all features as no data");
                self.last_error = Some(e);
                Classification::all_no_data(&features)
            }
        };

        tracing::info!(
            features = features.len(),
            breaks = ?classification.breaks().map(|b| b.thresholds().to_vec()),
            "Layer reclassified"
        );
        self.classification = Some(classification);
        Ok(ReloadOutcome::Reclassified)
    }

    /// Current classification, if the layer has been loaded.
    pub fn classification(&self) -> Option<&Classification> {
        self.classification.as_ref()
    }

    /// Error from the most recent reload, if it fell back to no data.
    pub fn last_error(&self) -> Option<&ClassificationError> {
        self.last_error.as_ref()
    }

    /// Select a feature by id and frame it.
    pub async fn select(
        &mut self,
        id: &FeatureId,
        viewport: &Viewport,
    ) -> Result<SelectionChanged, LayerError> {
        let feature = self
            .store
            .get_feature(id)
            .await
            .map_err(LayerError::from_store)?
            .ok_or_else(|| LayerError::FeatureNotFound(id.clone()))?;
        Ok(self.selection.request_select(feature, viewport)?)
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) -> Option<SelectionCleared> {
        self.selection.clear()
    }

    /// Currently selected feature id.
    pub fn selected_id(&self) -> Option<&FeatureId> {
        self.selection.selected_id()
    }

    /// Framing instruction back to the initial view.
    pub fn home(&self) -> FramingInstruction {
        self.selection.framer().home()
    }

    /// Render style of a feature under the current classification and
    /// selection.
    pub fn style_for(&self, id: &FeatureId) -> FeatureStyle {
        let selected = self.selection.selected_id();
        match &self.classification {
            Some(c) => c.style_for(id, selected, &self.styles),
            None if selected == Some(id) => self.styles.selected,
            None => self.styles.no_data(),
        }
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
