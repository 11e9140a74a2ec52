//! Input snapshot consumed by the simulation, and a latch for hosts whose key
//! events arrive on another thread.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tilehop_physics::kinematics::Intent;

/// Input sampled once at step entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// -1, 0 or +1.
    pub move_axis: i8,
    pub jump: bool,
}

impl InputFrame {
    /// `move_axis` is reduced to its sign.
    pub fn new(move_axis: i8, jump: bool) -> Self {
        Self {
            move_axis: move_axis.signum(),
            jump,
        }
    }

    pub fn intent(self) -> Intent {
        Intent::new(self.move_axis, self.jump)
    }
}

/// Keys the latch tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
}

#[derive(Debug, Default)]
struct KeyState {
    left: bool,
    right: bool,
    jump: bool,
}

impl KeyState {
    fn slot(&mut self, key: Key) -> &mut bool {
        match key {
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            Key::Jump => &mut self.jump,
        }
    }
}

/// Shared key state written by event handlers and read by the frame loop.
///
/// Clones share the same state. [`snapshot`](Self::snapshot) takes the lock
/// once, so a step never sees a half-applied set of key changes.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    keys: Arc<Mutex<KeyState>>,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, key: Key) {
        self.set(key, true);
    }

    pub fn release(&self, key: Key) {
        self.set(key, false);
    }

    /// Copy the current key state into an [`InputFrame`].
    ///
    /// Left and right held together cancel out.
    pub fn snapshot(&self) -> InputFrame {
        let keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        let axis = i8::from(keys.right) - i8::from(keys.left);
        InputFrame::new(axis, keys.jump)
    }

    fn set(&self, key: Key, down: bool) {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        *keys.slot(key) = down;
    }
}
