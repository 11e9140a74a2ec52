//! Level entities with per-frame mutable state: coins, enemies and the goal
//! flag.
//!
//! Entities are never removed from their collections. Coins and enemies are
//! hidden through one-way flags (`collected`, `alive`), and the flag through
//! `reached`. Each flag only ever moves in one direction; the setters return
//! whether this call performed the transition.

use serde::{Deserialize, Serialize};
use tilehop_physics::body::Facing;
use tilehop_physics::geometry::Rect;

// ---------------------------------------------------------------------------
// Coin
// ---------------------------------------------------------------------------

/// A collectible coin with a circular hitbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    pub radius: f64,
    pub value: u32,
    collected: bool,
}

impl Coin {
    pub fn new(x: f64, y: f64, radius: f64, value: u32) -> Self {
        Self {
            x,
            y,
            radius,
            value,
            collected: false,
        }
    }

    /// Bounding square of the circular hitbox.
    pub fn hitbox(&self) -> Rect {
        Rect::around_circle(self.x, self.y, self.radius)
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Mark collected. Returns `false` if it already was.
    pub fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }
}

// ---------------------------------------------------------------------------
// Enemy
// ---------------------------------------------------------------------------

/// A patrolling enemy.
///
/// Patrols horizontally between `min_x` (left edge bound) and `max_x` (right
/// edge bound), reversing at either end. `phase` is a decorative bob
/// accumulator with no physical effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub x: f64,
    pub y: f64,
    width: f64,
    height: f64,
    /// Patrol speed per reference frame.
    pub speed: f64,
    pub direction: Facing,
    pub min_x: f64,
    pub max_x: f64,
    pub value: u32,
    pub phase: f64,
    alive: bool,
}

impl Enemy {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        speed: f64,
        direction: Facing,
        patrol: (f64, f64),
        value: u32,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            speed,
            direction,
            min_x: patrol.0,
            max_x: patrol.1,
            value,
            phase: 0.0,
            alive: true,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark dead. Returns `false` if it already was.
    pub fn kill(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }

    /// Move along the patrol route by `ts` reference frames and advance the
    /// decorative phase by `phase_delta` radians.
    ///
    /// Reaching either bound clamps to it and flips direction.
    pub fn patrol(&mut self, ts: f64, phase_delta: f64) {
        self.x += self.speed * self.direction.sign() * ts;

        if self.x <= self.min_x {
            self.x = self.min_x;
            self.direction = Facing::Right;
        } else if self.x + self.width >= self.max_x {
            self.x = self.max_x - self.width;
            self.direction = Facing::Left;
        }

        self.phase += phase_delta;
    }
}

// ---------------------------------------------------------------------------
// Flag
// ---------------------------------------------------------------------------

/// The goal flag: a pole with a banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    /// Pole left edge.
    pub x: f64,
    /// Pole top.
    pub y: f64,
    pub pole_width: f64,
    pub pole_height: f64,
    pub banner_width: f64,
    pub banner_height: f64,
    reached: bool,
}

impl Flag {
    pub fn new(
        x: f64,
        y: f64,
        pole_width: f64,
        pole_height: f64,
        banner_width: f64,
        banner_height: f64,
    ) -> Self {
        Self {
            x,
            y,
            pole_width,
            pole_height,
            banner_width,
            banner_height,
            reached: false,
        }
    }

    /// Trigger region: banner width by pole height, padded on both sides.
    pub fn trigger_rect(&self, padding: f64) -> Rect {
        Rect::new(self.x, self.y, self.banner_width, self.pole_height).pad_horizontal(padding)
    }

    pub fn is_reached(&self) -> bool {
        self.reached
    }

    /// Mark reached. Returns `false` if it already was.
    pub fn mark_reached(&mut self) -> bool {
        !std::mem::replace(&mut self.reached, true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
