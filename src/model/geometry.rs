//! Page geometry.

use serde::Deserialize;
use std::cmp::Ordering;

/// Axis-aligned bounding box in page coordinates.
///
/// The origin is the top-left corner of the page and `y` grows downward,
/// so `y0` is the top edge and `y1` the bottom edge. Layout dumps encode a
/// box as `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "[f32; 4]")]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// A zero-width box marking a vertical position at the left page edge.
    ///
    /// Used for blocks that have no geometry of their own.
    pub fn marker(y: f32) -> Self {
        Self::new(0.0, y, 0.0, y + 1.0)
    }

    /// Top edge.
    pub fn top(&self) -> f32 {
        self.y0
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y1
    }

    /// Left edge.
    pub fn left(&self) -> f32 {
        self.x0
    }

    /// Height of the box (negative for inverted boxes).
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Reading order comparison: top edge first, then left edge.
    pub fn reading_cmp(&self, other: &BBox) -> Ordering {
        self.y0
            .partial_cmp(&other.y0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.x0.partial_cmp(&other.x0).unwrap_or(Ordering::Equal))
    }
}

impl From<[f32; 4]> for BBox {
    fn from(b: [f32; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }
}
