//! tilehop engine -- frame orchestration and game rules for the tilehop
//! platformer.
//!
//! This crate builds on [`tilehop_physics`] to provide the simulation driver:
//! a [`Simulation`](frame::Simulation) context that owns the player, the
//! level and the score, advances them once per display frame in a fixed
//! phase order, and drives the `menu -> playing -> completed` state machine.
//!
//! # Quick Start
//!
//! ```
//! use tilehop_engine::prelude::*;
//!
//! let mut data = LevelData::new(1200.0, 600.0);
//! data.tiles.push(Solid::new(Rect::new(0.0, 540.0, 1200.0, 60.0), Material::Ground));
//! data.flag.x = 1100.0;
//!
//! let mut sim = Simulation::new(FrameConfig::default(), &data).unwrap();
//! sim.start();
//!
//! for _ in 0..600 {
//!     sim.advance(1.0 / 60.0, InputFrame::new(1, false));
//!     if sim.game_state() == GameState::Completed {
//!         break;
//!     }
//! }
//!
//! assert_eq!(sim.game_state(), GameState::Completed);
//! ```

#![deny(unsafe_code)]

pub mod animation;
pub mod config;
pub mod entities;
pub mod frame;
pub mod input;
pub mod interaction;
pub mod level;
pub mod replay;
pub mod snapshot;
pub mod view;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the physics crate for convenience.
pub use tilehop_physics;

use tilehop_physics::PhysicsError;

use crate::level::LevelError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while setting up a simulation.
///
/// Once a [`Simulation`](frame::Simulation) exists, stepping it cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Physics tuning or body construction was rejected.
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    /// Level data failed validation.
    #[error("invalid level: {0}")]
    Level(#[from] LevelError),

    /// A game-rule or frame setting is outside its allowed range.
    #[error("invalid config: `{field}` = {value} ({reason})")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A JSON config or level document could not be parsed.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    // Re-export everything from the physics prelude.
    pub use tilehop_physics::prelude::*;

    pub use crate::animation::AnimationCursor;
    pub use crate::config::{FrameConfig, PlayerConfig, RulesConfig};
    pub use crate::entities::{Coin, Enemy, Flag};
    pub use crate::frame::{
        camera_offset, FrameClock, FrameDiagnostics, FrameReport, GameState, SimState,
        Simulation,
    };
    pub use crate::input::{InputFrame, InputLatch, Key};
    pub use crate::interaction::{GameEvent, Scoreboard};
    pub use crate::level::{CoinRecord, EnemyRecord, FlagRecord, Level, LevelData, LevelError};
    pub use crate::replay::{
        replay, ReplayDivergence, ReplayEntry, ReplayLog, ReplayRecorder, ReplayResult,
    };
    pub use crate::snapshot::SimSnapshot;
    pub use crate::view::FrameView;
    pub use crate::EngineError;
}
