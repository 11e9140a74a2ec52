//! Kinematics integrator.
//!
//! Advances one [`Body`] by one step, ignoring collisions. Elapsed time is
//! normalised against the configured reference frame into a `timeScale`, and
//! every tuning constant is scaled by it:
//!
//! - friction decays exponentially (`friction.powf(ts)`), so large steps stay
//!   stable,
//! - acceleration and gravity add linearly (`value * ts`),
//! - velocity moves position linearly (`vel * ts`).
//!
//! The order inside a step is fixed: friction, input acceleration, stop
//! snap, jump, gravity, fall-speed clamp, position update, world-bound clamp.

use serde::{Deserialize, Serialize};

use crate::body::{Body, Facing};
use crate::config::PhysicsConfig;

/// Player intent for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Intent {
    /// Horizontal axis, always one of -1, 0 or 1.
    pub axis: i8,
    /// Jump requested this step.
    pub jump: bool,
}

impl Intent {
    /// Build an intent, collapsing `axis` to its sign.
    pub fn new(axis: i8, jump: bool) -> Self {
        Self {
            axis: axis.signum(),
            jump,
        }
    }

    /// No input at all.
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Normalise `elapsed` seconds against `reference_frame` seconds.
///
/// Zero, negative or non-finite elapsed times yield `0.0`, which makes the
/// following [`integrate`] call a no-op.
pub fn time_scale(elapsed: f64, reference_frame: f64) -> f64 {
    if !(elapsed.is_finite() && elapsed > 0.0) || !(reference_frame > 0.0) {
        return 0.0;
    }
    elapsed / reference_frame
}

/// Advance `body` by `ts` reference frames.
///
/// Mutates velocity, facing, the grounded flag (cleared on jump) and the
/// tentative position. Horizontal position is clamped to
/// `[0, level_width - body.width()]`.
pub fn integrate(
    body: &mut Body,
    intent: Intent,
    ts: f64,
    config: &PhysicsConfig,
    level_width: f64,
) {
    if ts <= 0.0 {
        return;
    }

    // -- horizontal --------------------------------------------------------

    let friction = if body.grounded {
        config.ground_friction
    } else {
        config.air_friction
    };
    body.vel_x *= friction.powf(ts);

    if let Some(facing) = Facing::from_axis(intent.axis) {
        body.vel_x += f64::from(intent.axis.signum()) * config.acceleration * ts;
        body.facing = facing;
    }

    if body.vel_x.abs() < config.stop_threshold {
        body.vel_x = 0.0;
    }

    // -- jump --------------------------------------------------------------

    if intent.jump && body.grounded {
        body.vel_y = config.jump_impulse;
        body.grounded = false;
    }

    // -- vertical ----------------------------------------------------------

    body.vel_y += config.gravity * ts;
    body.vel_y = body.vel_y.min(config.max_fall_speed);

    // -- position ----------------------------------------------------------

    let applied_vel_x = body.vel_x.clamp(-config.max_speed, config.max_speed);
    body.x += applied_vel_x * ts;
    body.y += body.vel_y * ts;

    let max_x = (level_width - body.width()).max(0.0);
    if body.x < 0.0 {
        body.x = 0.0;
    }
    if body.x > max_x {
        body.x = max_x;
    }

    debug_assert!(body.is_finite(), "integration produced a non-finite body: {body:?}");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
