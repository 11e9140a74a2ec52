//! Axis-aligned rectangle primitives.
//!
//! Everything in tilehop is an axis-aligned box in world units with the
//! origin at the top-left corner and `y` growing downward. The overlap test
//! here is the single source of truth for "touching vs. overlapping": all
//! four half-plane inequalities are strict, so two rectangles that merely
//! share an edge do **not** intersect.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Construct a rectangle from its top-left corner and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The bounding square of a circle (used for coin hitboxes).
    pub fn around_circle(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self::new(
            center_x - radius,
            center_y - radius,
            radius * 2.0,
            radius * 2.0,
        )
    }

    /// Grow the rectangle by `pad` on the left and right sides.
    pub fn pad_horizontal(&self, pad: f64) -> Self {
        Self::new(self.x - pad, self.y, self.width + pad * 2.0, self.height)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Strict overlap test. Edge contact is not an overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Whether `other` lies entirely inside `self` (edges inclusive).
    pub fn contains(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Whether every coordinate is finite and both extents are positive.
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Free-function form of [`Rect::intersects`].
#[inline]
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
