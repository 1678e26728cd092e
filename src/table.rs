//! Class breaks lookup table.
//!
//! Pairs a [`BreakSet`] with a [`Palette`] of the same length and answers the
//! two questions the renderer asks: which class a value falls into, and what
//! colour that class is drawn with.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::types::{BreakSet, ClassIndex, Palette, Rgba};

/// One legend row: the value range of a class and its colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Class index.
    pub class: ClassIndex,
    /// Exclusive lower bound; `None` for class 0, which is open below.
    pub lower: Option<f64>,
    /// Inclusive upper bound.
    pub upper: f64,
    /// Display colour.
    pub color: Rgba,
}

/// Immutable breaks table built once per data load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBreaksTable {
    breaks: BreakSet,
    palette: Palette,
}

impl ClassBreaksTable {
    /// Create a table. The palette must hold exactly one colour per class.
    pub fn new(breaks: BreakSet, palette: Palette) -> Result<Self, ConfigError> {
        if palette.len() != breaks.len() {
            return Err(ConfigError::PaletteLength {
                palette: palette.len(),
                classes: breaks.len(),
            });
        }
        Ok(Self { breaks, palette })
    }

    /// Class of `value` by binary search over the breaks.
    ///
    /// Values at or below `b[0]` are class 0; values above `b[k-1]` clamp to
    /// class `k-1`.
    pub fn class_of(&self, value: f64) -> ClassIndex {
        self.breaks.class_of(value)
    }

    /// Colour of a class. Indices past the top class clamp to the top colour.
    pub fn style_of(&self, class: ClassIndex) -> Rgba {
        let idx = class.get().min(self.palette.len() - 1);
        self.palette.colors()[idx]
    }

    /// Class and colour of `value` in one lookup.
    pub fn classify_value(&self, value: f64) -> (ClassIndex, Rgba) {
        let class = self.class_of(value);
        (class, self.style_of(class))
    }

    /// Number of classes.
    pub fn num_classes(&self) -> usize {
        self.breaks.len()
    }

    /// The underlying breaks.
    pub fn breaks(&self) -> &BreakSet {
        &self.breaks
    }

    /// The palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Legend rows from least to most severe.
    pub fn legend(&self) -> Vec<LegendEntry> {
        let thresholds = self.breaks.thresholds();
        thresholds
            .iter()
            .enumerate()
            .map(|(i, upper)| LegendEntry {
                class: ClassIndex::new(i),
                lower: if i == 0 { None } else { Some(thresholds[i - 1]) },
                upper: *upper,
                color: self.palette.colors()[i],
            })
            .collect()
    }
}
