//! Sprite animation cursor driven by the derived motion state.

use serde::{Deserialize, Serialize};
use tilehop_physics::body::MotionState;

/// Frame count and per-frame duration (seconds) for a motion state.
pub fn clip(state: MotionState) -> (usize, f64) {
    match state {
        MotionState::Idle => (2, 0.45),
        MotionState::Run => (4, 0.09),
        MotionState::Jump | MotionState::Fall => (1, 0.999),
    }
}

/// Which animation frame to draw for the player.
///
/// Only a *change* of motion state resets the cursor; the state itself is
/// re-derived every frame and never written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationCursor {
    pub state: MotionState,
    pub frame_index: usize,
    /// Seconds spent on the current frame.
    pub frame_timer: f64,
}

impl AnimationCursor {
    /// Advance by `elapsed` seconds in `state`. Returns `true` if the state
    /// changed and the cursor was reset.
    pub fn update(&mut self, state: MotionState, elapsed: f64) -> bool {
        let changed = state != self.state;
        if changed {
            self.state = state;
            self.frame_index = 0;
            self.frame_timer = 0.0;
        }

        let (frames, duration) = clip(state);
        if frames <= 1 {
            self.frame_index = 0;
            return changed;
        }

        self.frame_timer += elapsed.max(0.0);
        if self.frame_timer >= duration {
            self.frame_timer = 0.0;
            self.frame_index = (self.frame_index + 1) % frames;
        }
        changed
    }
}
