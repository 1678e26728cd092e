//! Single-selection state machine.
//!
//! ```text
//! Unselected ──request_select──► Selected(f)
//! Selected(f) ──request_select──► Selected(g)   (f replaced atomically)
//! Selected(f) ──clear──────────► Unselected
//! ```
//!
//! The controller owns the selection; callers can only request changes. Each
//! accepted request returns the notification the host should dispatch. The
//! framing instruction is computed before any state changes, so a request
//! that fails leaves the previous selection untouched.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::framing::{FramingError, FramingInstruction, Viewport, ViewportFramer};
use crate::types::{Extent, Feature, FeatureId};

/// Current selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    Unselected,
    /// Exactly one feature selected.
    Selected(Feature),
}

/// Notification: a feature became selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionChanged {
    /// Newly selected feature.
    pub feature: FeatureId,
    /// Its extent.
    pub extent: Extent,
    /// Feature that was selected before, if any.
    pub previous: Option<FeatureId>,
    /// Where the camera should go.
    pub framing: FramingInstruction,
}

/// Notification: the selection was cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionCleared {
    /// Feature that was deselected.
    pub feature: FeatureId,
}

/// Selection controller.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
    framer: ViewportFramer,
}

impl SelectionController {
    /// Create an unselected controller.
    pub fn new(framer: ViewportFramer) -> Self {
        Self {
            state: SelectionState::Unselected,
            framer,
        }
    }

    /// Current state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Selected feature, if any.
    pub fn selected(&self) -> Option<&Feature> {
        match &self.state {
            SelectionState::Selected(f) => Some(f),
            SelectionState::Unselected => None,
        }
    }

    /// Selected feature id, if any.
    pub fn selected_id(&self) -> Option<&FeatureId> {
        self.selected().map(|f| &f.id)
    }

    /// Whether `id` is the selected feature.
    pub fn is_selected(&self, id: &FeatureId) -> bool {
        self.selected_id() == Some(id)
    }

    /// The framer used for selection framing.
    pub fn framer(&self) -> &ViewportFramer {
        &self.framer
    }

    /// Select `feature`, replacing any prior selection.
    ///
    /// Re-selecting the already selected feature is accepted and re-frames it.
    pub fn request_select(
        &mut self,
        feature: Feature,
        viewport: &Viewport,
    ) -> Result<SelectionChanged, FramingError> {
        let framing = self.framer.frame(&feature.extent, viewport)?;
        let id = feature.id.clone();
        let extent = feature.extent;

        let previous = match std::mem::replace(&mut self.state, SelectionState::Selected(feature)) {
            SelectionState::Selected(prev) => Some(prev.id),
            SelectionState::Unselected => None,
        };

        tracing::info!(
            feature = %id,
            previous = ?previous.as_ref().map(|p| p.as_str()),
            resolution = framing.resolution,
            "Feature selected"
        );

        Ok(SelectionChanged {
            feature: id,
            extent,
            previous,
            framing,
        })
    }

    /// Clear the selection. Returns `None` if nothing was selected.
    pub fn clear(&mut self) -> Option<SelectionCleared> {
        match std::mem::take(&mut self.state) {
            SelectionState::Selected(prev) => {
                tracing::info!(feature = %prev.id, "Selection cleared");
                Some(SelectionCleared { feature: prev.id })
            }
            SelectionState::Unselected => None,
        }
    }
}

/// A [`SelectionController`] shared behind a single mutation point.
///
/// Clones share the same selection. Every transition runs under one lock, so
/// no observer can see two selections or a gap between replacing ones.
#[derive(Debug, Clone, Default)]
pub struct SharedSelection {
    inner: Arc<Mutex<SelectionController>>,
}

impl SharedSelection {
    /// Wrap a controller.
    pub fn new(controller: SelectionController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// See [`SelectionController::request_select`].
    pub fn request_select(
        &self,
        feature: Feature,
        viewport: &Viewport,
    ) -> Result<SelectionChanged, FramingError> {
        self.inner.lock().request_select(feature, viewport)
    }

    /// See [`SelectionController::clear`].
    pub fn clear(&self) -> Option<SelectionCleared> {
        self.inner.lock().clear()
    }

    /// Snapshot of the selected feature id.
    pub fn selected_id(&self) -> Option<FeatureId> {
        self.inner.lock().selected_id().cloned()
    }
}
