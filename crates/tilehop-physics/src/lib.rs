//! tilehop physics -- deterministic axis-aligned platformer physics.
//!
//! This crate owns the per-frame motion core of tilehop: a movable [`Body`],
//! the [`kinematics`] integrator that advances it against gravity, friction
//! and player intent, and the [`collision`] resolver that separates it from
//! static level geometry. It knows nothing about coins, enemies or game
//! state; those live in `tilehop-engine`.
//!
//! # Quick Start
//!
//! ```
//! use tilehop_physics::prelude::*;
//!
//! let config = PhysicsConfig::default();
//! let floor = Solid::new(Rect::new(0.0, 500.0, 1000.0, 60.0), Material::Ground);
//! let mut body = Body::new(100.0, 400.0, 32.0, 48.0).unwrap();
//!
//! for _ in 0..120 {
//!     let ts = time_scale(1.0 / 60.0, config.reference_frame);
//!     integrate(&mut body, Intent::idle(), ts, &config, 1000.0);
//!     resolve(&mut body, [&floor], 1000.0);
//! }
//!
//! assert!(body.grounded);
//! assert_eq!(body.rect().bottom(), 500.0);
//! ```

#![deny(unsafe_code)]

pub mod body;
pub mod collision;
pub mod config;
pub mod geometry;
pub mod kinematics;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while building physics objects or validating tuning.
///
/// The per-frame step itself never fails; these only surface at setup time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    /// A tuning value is outside its allowed range.
    #[error("invalid physics config: `{field}` = {value} ({reason})")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A body was created with a non-positive or non-finite size.
    #[error("invalid body size {width}x{height}: both extents must be positive and finite")]
    InvalidBodySize { width: f64, height: f64 },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::body::{Body, Facing, MotionState};
    pub use crate::collision::{resolve, Axis, Contact, Material, Resolution, Solid};
    pub use crate::config::PhysicsConfig;
    pub use crate::geometry::{rects_intersect, Rect};
    pub use crate::kinematics::{integrate, time_scale, Intent};
    pub use crate::PhysicsError;
}
