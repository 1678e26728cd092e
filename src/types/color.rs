//! Display colours and class palettes.
//!
//! Colours are accepted in the forms map stylesheets use: `#rrggbb`,
//! `#rrggbbaa`, `rgb(r,g,b)` and `rgba(r,g,b,a)`. They always serialize back
//! to the CSS `rgba(...)` form.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Error parsing a colour string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorParseError {
    /// Hex colour with a bad digit or wrong length.
    #[error("Invalid hex colour: {0}")]
    InvalidHex(String),
    /// Functional `rgb()`/`rgba()` notation that could not be parsed.
    #[error("Invalid rgb()/rgba() colour: {0}")]
    InvalidFunctional(String),
    /// Alpha outside `[0, 1]`.
    #[error("Alpha out of range in colour: {0}")]
    AlphaOutOfRange(String),
}

/// RGBA colour with an 8-bit channel per component and a `[0, 1]` alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Rgba {
    /// Create a colour from its components. Alpha is clamped to `[0, 1]`.
    pub fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a: a.clamp(0.0, 1.0) }
    }

    /// Fully opaque colour.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    fn parse_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim_start_matches('#');
        let bytes = hex::decode(digits).map_err(|_| ColorParseError::InvalidHex(s.to_string()))?;
        match bytes.as_slice() {
            [r, g, b] => Ok(Self::opaque(*r, *g, *b)),
            [r, g, b, a] => Ok(Self::new(*r, *g, *b, *a as f32 / 255.0)),
            _ => Err(ColorParseError::InvalidHex(s.to_string())),
        }
    }

    /// Parse `rgb(r,g,b)` or `rgba(r,g,b,a)`.
    fn parse_functional(s: &str) -> Result<Self, ColorParseError> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        let pattern = PATTERN.get_or_init(|| {
            Regex::new(
                r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)$",
            )
            .ok()
        });

        let invalid = || ColorParseError::InvalidFunctional(s.to_string());
        let caps = pattern
            .as_ref()
            .and_then(|re| re.captures(s))
            .ok_or_else(invalid)?;
        let channel = |i: usize| -> Result<u8, ColorParseError> {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u8>().ok())
                .ok_or_else(invalid)
        };
        let (r, g, b) = (channel(1)?, channel(2)?, channel(3)?);

        let a = match caps.get(4) {
            Some(m) => m.as_str().parse::<f32>().map_err(|_| invalid())?,
            None => 1.0,
        };
        if !(0.0..=1.0).contains(&a) {
            return Err(ColorParseError::AlphaOutOfRange(s.to_string()));
        }
        Ok(Self::new(r, g, b, a))
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            Self::parse_hex(s)
        } else {
            Self::parse_functional(&s.to_ascii_lowercase())
        }
    }
}

impl fmt::Display for Rgba {
    /// Format as CSS: `rgba(r,g,b,a)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_string()
    }
}

/// Ordered colour ramp, lightest (class 0) to most severe (class k-1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<Rgba>);

impl Palette {
    /// Create a palette from an ordered list of colours.
    pub fn new(colors: Vec<Rgba>) -> Self {
        Self(colors)
    }

    /// Parse a palette from colour strings.
    pub fn parse<S: AsRef<str>>(colors: &[S]) -> Result<Self, ColorParseError> {
        colors
            .iter()
            .map(|c| c.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Six-step red severity ramp at 60% opacity.
    pub fn reds() -> Self {
        Self(vec![
            Rgba::new(254, 229, 217, 0.6),
            Rgba::new(252, 187, 161, 0.6),
            Rgba::new(252, 146, 114, 0.6),
            Rgba::new(251, 106, 74, 0.6),
            Rgba::new(222, 45, 38, 0.6),
            Rgba::new(165, 15, 21, 0.6),
        ])
    }

    /// Number of colours.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the palette has no colours.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Colour at `index`.
    pub fn get(&self, index: usize) -> Option<Rgba> {
        self.0.get(index).copied()
    }

    /// All colours in order.
    pub fn colors(&self) -> &[Rgba] {
        &self.0
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::reds()
    }
}
