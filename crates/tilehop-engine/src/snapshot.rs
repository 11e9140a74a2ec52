//! Simulation snapshot and restore with BLAKE3 hashing.
//!
//! [`SimSnapshot`] captures every mutable part of a [`Simulation`] (player,
//! entity flags and positions, score, game state, animation cursor, frame
//! counter) together with a BLAKE3 digest of its canonical JSON form.
//!
//! # Usage
//!
//! ```
//! use tilehop_engine::prelude::*;
//!
//! let mut data = LevelData::new(1200.0, 600.0);
//! data.tiles.push(Solid::new(Rect::new(0.0, 540.0, 1200.0, 60.0), Material::Ground));
//!
//! let mut sim = Simulation::new(FrameConfig::default(), &data).unwrap();
//! sim.start();
//! let snapshot = sim.capture_snapshot();
//! assert_eq!(snapshot.hash.len(), 64);
//!
//! for _ in 0..30 {
//!     sim.advance(1.0 / 60.0, InputFrame::new(1, false));
//! }
//! assert_ne!(sim.state_hash(), snapshot.hash);
//!
//! sim.restore_from_snapshot(&snapshot).unwrap();
//! assert_eq!(sim.state_hash(), snapshot.hash);
//! ```
//!
//! # What Is NOT Serialized
//!
//! - **Configuration** -- the restoring simulation keeps its own.
//! - **Frame clock** -- reset on restore, so the next host frame is treated
//!   as a first frame.
//! - **Diagnostics** -- per-frame timing is transient.

use serde::{Deserialize, Serialize};

use crate::frame::{SimState, Simulation};

// ---------------------------------------------------------------------------
// SimSnapshot
// ---------------------------------------------------------------------------

/// A serializable snapshot of the full simulation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub state: SimState,
    /// BLAKE3 hex digest (64 lowercase hex chars) of the serialized state.
    pub hash: String,
}

impl SimSnapshot {
    /// Frame counter at the time of capture.
    pub fn frame(&self) -> u64 {
        self.state.frame_counter
    }
}

fn compute_hash(state: &SimState) -> String {
    let json_bytes =
        serde_json::to_vec(state).expect("SimState should always be JSON-serializable");
    blake3::hash(&json_bytes).to_hex().to_string()
}

// ---------------------------------------------------------------------------
// Simulation snapshot/restore methods
// ---------------------------------------------------------------------------

impl Simulation {
    /// Capture a complete snapshot of the simulation state.
    pub fn capture_snapshot(&self) -> SimSnapshot {
        let state = self.state().clone();
        let hash = compute_hash(&state);
        SimSnapshot { state, hash }
    }

    /// Restore the simulation from a previously captured snapshot.
    ///
    /// The snapshot is verified first; on any error the simulation is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash does not match the snapshot contents, if
    /// the snapshot was taken on a level with a different structure, or if
    /// the player does not match this simulation's player configuration.
    pub fn restore_from_snapshot(&mut self, snapshot: &SimSnapshot) -> Result<(), anyhow::Error> {
        let expected_hash = compute_hash(&snapshot.state);
        if expected_hash != snapshot.hash {
            tracing::warn!(
                recorded = %snapshot.hash,
                recomputed = %expected_hash,
                "snapshot rejected"
            );
            return Err(anyhow::anyhow!(
                "snapshot hash mismatch: recorded {} but recomputed {}. \
                 The snapshot may be corrupted or tampered with.",
                snapshot.hash,
                expected_hash
            ));
        }

        if !self.level().same_structure(&snapshot.state.level) {
            tracing::warn!(frame = snapshot.frame(), "snapshot rejected: level mismatch");
            return Err(anyhow::anyhow!(
                "snapshot was captured on a different level \
                 (solids, entity counts or dimensions differ)"
            ));
        }

        let player = &snapshot.state.player;
        let expected = &self.config().player;
        if player.width() != expected.width || player.height() != expected.height {
            tracing::warn!(frame = snapshot.frame(), "snapshot rejected: player size mismatch");
            return Err(anyhow::anyhow!(
                "snapshot player is {}x{} but this simulation uses {}x{}",
                player.width(),
                player.height(),
                expected.width,
                expected.height
            ));
        }
        if !player.is_finite() {
            return Err(anyhow::anyhow!("snapshot player state is not finite"));
        }

        self.replace_state(snapshot.state.clone());
        tracing::debug!(frame = snapshot.frame(), "snapshot restored");
        Ok(())
    }

    /// BLAKE3 digest of the current state; equal to
    /// `capture_snapshot().hash`.
    pub fn state_hash(&self) -> String {
        compute_hash(self.state())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
