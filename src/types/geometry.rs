//! Planar geometry primitives used for framing.

use serde::{Deserialize, Serialize};

/// A 2D coordinate in projection units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Easting / longitude.
    pub x: f64,
    /// Northing / latitude.
    pub y: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box of a geometry.
///
/// Stored as `[min_x, min_y, max_x, max_y]`, the same ordering map surfaces
/// use for extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Minimum x.
    pub min_x: f64,
    /// Minimum y.
    pub min_y: f64,
    /// Maximum x.
    pub max_x: f64,
    /// Maximum y.
    pub max_y: f64,
}

impl Extent {
    /// Create an extent from two corners, normalising their order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Degenerate extent covering a single point.
    pub fn from_point(point: Coordinate) -> Self {
        Self::new(point.x, point.y, point.x, point.y)
    }

    /// Smallest extent covering all `points`. `None` for an empty slice.
    pub fn from_points(points: &[Coordinate]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut extent = Self::from_point(*first);
        for p in rest {
            extent.extend_point(*p);
        }
        Some(extent)
    }

    /// Grow the extent to include `point`.
    pub fn extend_point(&mut self, point: Coordinate) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    /// Width in projection units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height in projection units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Geometric centre.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Whether all four bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_normalises_corners() {
        let e = Extent::new(10.0, 5.0, -10.0, -5.0);
        assert_eq!(e.min_x, -10.0);
        assert_eq!(e.max_y, 5.0);
        assert_eq!(e.width(), 20.0);
        assert_eq!(e.height(), 10.0);
    }

    #[test]
    fn test_extent_center() {
        let e = Extent::new(2.0, 4.0, 6.0, 10.0);
        assert_eq!(e.center(), Coordinate::new(4.0, 7.0));
    }

    #[test]
    fn test_from_points() {
        let pts = [
            Coordinate::new(1.0, 1.0),
            Coordinate::new(-3.0, 2.0),
            Coordinate::new(0.5, -4.0),
        ];
        let e = Extent::from_points(&pts).unwrap();
        assert_eq!(e, Extent::new(-3.0, -4.0, 1.0, 2.0));
        assert!(Extent::from_points(&[]).is_none());
    }
}
