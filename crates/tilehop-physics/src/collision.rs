//! Collision resolver against static level geometry.
//!
//! Resolution is sequential, one pass over the solids in the order given:
//!
//! 1. Skip solids that do not strictly overlap the body.
//! 2. Measure penetration per axis. The side is chosen by comparing centers,
//!    so the depth is `body.right - solid.left` when the body center is left
//!    of the solid center and `solid.right - body.left` otherwise (same for
//!    the vertical axis).
//! 3. Push out along the axis with the smaller depth only, snapping the body
//!    onto the touched edge, and zero that velocity component. Ties resolve
//!    vertically.
//! 4. Landing on a top edge sets `grounded`.
//!
//! Corrections accumulate, so the result depends on solid order at seams
//! between adjacent solids. Callers must pass solids in level-authoring
//! order. Fast diagonal motion through exactly-diagonal gaps between solids
//! is not handled specially.
//!
//! After the pass, the body is clamped above the world floor line, which also
//! grounds it.

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::geometry::Rect;

/// Rendering-only material tag. Collision treats all materials the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Ground,
    Brick,
}

/// A static, immutable solid rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    pub rect: Rect,
    pub material: Material,
}

impl Solid {
    pub const fn new(rect: Rect, material: Material) -> Self {
        Self { rect, material }
    }
}

/// The axis a contact was resolved along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One resolved overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Position of the solid in the iteration order.
    pub solid_index: usize,
    pub axis: Axis,
    /// Penetration depth that was removed.
    pub depth: f64,
    /// The body was pushed up onto the solid's top edge.
    pub landed: bool,
}

/// Outcome of one [`resolve`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Every overlap that was corrected, in iteration order.
    pub contacts: Vec<Contact>,
    /// The world floor clamp fired.
    pub hit_floor: bool,
    /// Final grounded flag (also written to the body).
    pub grounded: bool,
}

/// Separate `body` from every overlapping solid, then from the floor line.
///
/// Resets `body.grounded` before the pass and sets it again if the body
/// lands on any solid or on the floor. Always terminates after one pass.
pub fn resolve<'a, I>(body: &mut Body, solids: I, floor_y: f64) -> Resolution
where
    I: IntoIterator<Item = &'a Solid>,
{
    let mut resolution = Resolution::default();
    body.grounded = false;

    for (solid_index, solid) in solids.into_iter().enumerate() {
        let b = body.rect();
        let s = &solid.rect;
        if !b.intersects(s) {
            continue;
        }

        let body_left_of_center = b.center_x() < s.center_x();
        let body_above_center = b.center_y() < s.center_y();

        let overlap_x = if body_left_of_center {
            b.right() - s.left()
        } else {
            s.right() - b.left()
        };
        let overlap_y = if body_above_center {
            b.bottom() - s.top()
        } else {
            s.bottom() - b.top()
        };

        let contact = if overlap_x < overlap_y {
            body.x = if body_left_of_center {
                s.left() - body.width()
            } else {
                s.right()
            };
            body.vel_x = 0.0;
            Contact {
                solid_index,
                axis: Axis::Horizontal,
                depth: overlap_x,
                landed: false,
            }
        } else {
            body.vel_y = 0.0;
            if body_above_center {
                body.y = s.top() - body.height();
                body.grounded = true;
            } else {
                body.y = s.bottom();
            }
            Contact {
                solid_index,
                axis: Axis::Vertical,
                depth: overlap_y,
                landed: body_above_center,
            }
        };
        resolution.contacts.push(contact);
    }

    if body.y + body.height() > floor_y {
        body.y = floor_y - body.height();
        body.vel_y = 0.0;
        body.grounded = true;
        resolution.hit_floor = true;
        tracing::trace!(floor_y, "body clamped to floor line");
    }

    resolution.grounded = body.grounded;
    resolution
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
