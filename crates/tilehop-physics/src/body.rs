//! The movable body and its derived motion state.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::PhysicsError;

/// Horizontal facing of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// `-1.0` for left, `1.0` for right.
    pub fn sign(self) -> f64 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing for a non-zero input axis. `None` when the axis is zero.
    pub fn from_axis(axis: i8) -> Option<Self> {
        match axis.signum() {
            -1 => Some(Facing::Left),
            1 => Some(Facing::Right),
            _ => None,
        }
    }
}

/// Animation-relevant motion classification.
///
/// Always derived from `(grounded, vel_x, vel_y)` by [`MotionState::derive`];
/// nothing sets it from input directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MotionState {
    #[default]
    Idle,
    Run,
    Jump,
    Fall,
}

impl MotionState {
    /// Classify motion. Airborne bodies jump while rising and fall otherwise;
    /// grounded bodies run once their horizontal speed exceeds
    /// `run_threshold`.
    pub fn derive(grounded: bool, vel_x: f64, vel_y: f64, run_threshold: f64) -> Self {
        if !grounded {
            if vel_y < 0.0 {
                MotionState::Jump
            } else {
                MotionState::Fall
            }
        } else if vel_x.abs() > run_threshold {
            MotionState::Run
        } else {
            MotionState::Idle
        }
    }
}

/// A movable axis-aligned body (the player).
///
/// Position is the top-left corner of the bounding box. The size is fixed at
/// construction and only readable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Left edge in world units.
    pub x: f64,
    /// Top edge in world units.
    pub y: f64,
    width: f64,
    height: f64,
    /// Horizontal velocity in world units per reference frame.
    pub vel_x: f64,
    /// Vertical velocity in world units per reference frame. Positive is down.
    pub vel_y: f64,
    pub facing: Facing,
    /// Resting on a solid top edge or the world floor. Valid for the current
    /// frame only; the collision resolver recomputes it every step.
    pub grounded: bool,
    pub state: MotionState,
}

impl Body {
    /// Create a body at rest.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidBodySize`] if either extent is not a
    /// positive finite number.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, PhysicsError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(PhysicsError::InvalidBodySize { width, height });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
            vel_x: 0.0,
            vel_y: 0.0,
            facing: Facing::Right,
            grounded: false,
            state: MotionState::Idle,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Current bounding rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Zero both velocity components.
    pub fn halt(&mut self) {
        self.vel_x = 0.0;
        self.vel_y = 0.0;
    }

    /// Whether position and velocity are all finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.vel_x.is_finite() && self.vel_y.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
