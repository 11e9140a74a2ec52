//! Deterministic replay with input recording and checkpoint verification.
//!
//! A [`ReplayRecorder`] captures the start signal, every frame's
//! `(InputFrame, elapsed)` pair and periodic state hash checkpoints into a
//! [`ReplayLog`]. [`replay`] restores the log's initial snapshot, feeds the
//! recorded frames back and compares hashes at each checkpoint.
//!
//! Recording order per frame is: start signal (if any), checkpoint, advance.
//! Replay follows the same order.
//!
//! # Example
//!
//! ```
//! use tilehop_engine::prelude::*;
//!
//! let mut data = LevelData::new(1200.0, 600.0);
//! data.tiles.push(Solid::new(Rect::new(0.0, 540.0, 1200.0, 60.0), Material::Ground));
//! let mut sim = Simulation::new(FrameConfig::default(), &data).unwrap();
//!
//! let mut recorder = ReplayRecorder::new(sim.capture_snapshot(), 10);
//! for frame in 0..60 {
//!     if frame == 5 {
//!         sim.start();
//!         recorder.record_start(sim.frame_count());
//!     }
//!     let input = InputFrame::new(1, frame % 20 == 0);
//!     recorder.record_frame(sim.frame_count(), input, 1.0 / 60.0, Some(sim.state_hash()));
//!     sim.advance(1.0 / 60.0, input);
//! }
//! let log = recorder.finish();
//!
//! let mut fresh = Simulation::new(FrameConfig::default(), &data).unwrap();
//! let result = replay(&mut fresh, &log).unwrap();
//! assert!(result.completed);
//! assert!(result.first_divergence.is_none());
//! assert_eq!(fresh.state_hash(), sim.state_hash());
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::frame::Simulation;
use crate::input::InputFrame;
use crate::snapshot::SimSnapshot;

// ---------------------------------------------------------------------------
// ReplayLog
// ---------------------------------------------------------------------------

/// Initial snapshot plus the ordered record of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayLog {
    /// Replay begins by restoring this snapshot.
    pub initial_snapshot: SimSnapshot,
    /// Number of frames recorded. Replay advances exactly this many frames.
    pub total_frames: u64,
    pub entries: Vec<ReplayEntry>,
}

/// One entry of a [`ReplayLog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplayEntry {
    /// The start signal was applied before this frame.
    Start { frame: u64 },
    /// Input and elapsed time fed to this frame.
    Frame {
        frame: u64,
        input: InputFrame,
        elapsed: f64,
    },
    /// State hash before this frame was advanced.
    Checkpoint { frame: u64, state_hash: String },
}

// ---------------------------------------------------------------------------
// ReplayResult
// ---------------------------------------------------------------------------

/// Outcome of [`replay`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayResult {
    /// All frames were replayed without divergence.
    pub completed: bool,
    pub frames_replayed: u64,
    /// First checkpoint whose hash did not match. `None` if deterministic.
    pub first_divergence: Option<ReplayDivergence>,
}

/// A checkpoint whose replayed hash differed from the recorded one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayDivergence {
    pub frame: u64,
    pub expected_hash: String,
    pub actual_hash: String,
}

// ---------------------------------------------------------------------------
// ReplayRecorder
// ---------------------------------------------------------------------------

/// Records a run into a [`ReplayLog`].
///
/// Frames must be recorded in strictly increasing order.
pub struct ReplayRecorder {
    log: ReplayLog,
    /// Checkpoint every this many frames; 0 checkpoints whenever a hash is
    /// supplied.
    checkpoint_interval: u64,
    frames_recorded: u64,
    last_frame: Option<u64>,
}

impl ReplayRecorder {
    pub fn new(snapshot: SimSnapshot, checkpoint_interval: u64) -> Self {
        Self {
            log: ReplayLog {
                initial_snapshot: snapshot,
                total_frames: 0,
                entries: Vec::new(),
            },
            checkpoint_interval,
            frames_recorded: 0,
            last_frame: None,
        }
    }

    /// Record that the start signal was applied before `frame`.
    pub fn record_start(&mut self, frame: u64) {
        self.log.entries.push(ReplayEntry::Start { frame });
    }

    /// Record one frame. Call **before** advancing the simulation.
    ///
    /// # Panics
    ///
    /// Panics if `frame` is not strictly greater than the previous one.
    pub fn record_frame(
        &mut self,
        frame: u64,
        input: InputFrame,
        elapsed: f64,
        state_hash: Option<String>,
    ) {
        if let Some(prev) = self.last_frame {
            assert!(
                frame > prev,
                "ReplayRecorder::record_frame: frame {frame} is not strictly greater than previous frame {prev}"
            );
        }
        self.last_frame = Some(frame);
        self.frames_recorded += 1;

        if let Some(hash) = state_hash {
            let due = self.checkpoint_interval == 0 || frame % self.checkpoint_interval == 0;
            if due {
                self.log.entries.push(ReplayEntry::Checkpoint {
                    frame,
                    state_hash: hash,
                });
            }
        }

        self.log.entries.push(ReplayEntry::Frame {
            frame,
            input,
            elapsed,
        });
    }

    pub fn finish(mut self) -> ReplayLog {
        self.log.total_frames = self.frames_recorded;
        self.log
    }
}

// ---------------------------------------------------------------------------
// replay()
// ---------------------------------------------------------------------------

/// Replay `log` on `sim`, verifying every checkpoint.
///
/// Stops at the first divergence.
///
/// # Errors
///
/// Returns an error if the log is malformed (duplicate entries, a missing
/// frame, frame range overflow) or if the initial snapshot cannot be
/// restored. Validation happens before `sim` is touched.
pub fn replay(sim: &mut Simulation, log: &ReplayLog) -> Result<ReplayResult, anyhow::Error> {
    let mut frames: BTreeMap<u64, (InputFrame, f64)> = BTreeMap::new();
    let mut checkpoints: BTreeMap<u64, &str> = BTreeMap::new();
    let mut starts: BTreeSet<u64> = BTreeSet::new();

    for entry in &log.entries {
        match entry {
            ReplayEntry::Start { frame } => {
                if !starts.insert(*frame) {
                    return Err(anyhow::anyhow!(
                        "replay log contains duplicate Start entry at frame {frame}"
                    ));
                }
            }
            ReplayEntry::Frame {
                frame,
                input,
                elapsed,
            } => {
                if frames.insert(*frame, (*input, *elapsed)).is_some() {
                    return Err(anyhow::anyhow!(
                        "replay log contains duplicate Frame entry at frame {frame}"
                    ));
                }
            }
            ReplayEntry::Checkpoint { frame, state_hash } => {
                if checkpoints.insert(*frame, state_hash.as_str()).is_some() {
                    return Err(anyhow::anyhow!(
                        "replay log contains duplicate Checkpoint entry at frame {frame}"
                    ));
                }
            }
        }
    }

    let start_frame = log.initial_snapshot.frame();
    let total = log.total_frames;
    let end_frame = start_frame.checked_add(total).ok_or_else(|| {
        anyhow::anyhow!(
            "frame range overflow: start_frame ({start_frame}) + total_frames ({total}) exceeds u64::MAX"
        )
    })?;

    if let Some(missing) = (start_frame..end_frame).find(|f| !frames.contains_key(f)) {
        return Err(anyhow::anyhow!(
            "replay log has no Frame entry for frame {missing}"
        ));
    }

    sim.restore_from_snapshot(&log.initial_snapshot)
        .map_err(|e| anyhow::anyhow!("failed to restore initial snapshot for replay: {e}"))?;

    let mut frames_replayed = 0;
    for (&frame, &(input, elapsed)) in frames.range(start_frame..end_frame) {
        if starts.contains(&frame) {
            sim.start();
        }

        if let Some(&expected_hash) = checkpoints.get(&frame) {
            let actual_hash = sim.state_hash();
            if actual_hash != expected_hash {
                tracing::warn!(
                    frame,
                    expected = expected_hash,
                    actual = %actual_hash,
                    "replay diverged"
                );
                return Ok(ReplayResult {
                    completed: false,
                    frames_replayed,
                    first_divergence: Some(ReplayDivergence {
                        frame,
                        expected_hash: expected_hash.to_owned(),
                        actual_hash,
                    }),
                });
            }
        }

        sim.advance(elapsed, input);
        frames_replayed += 1;
    }

    Ok(ReplayResult {
        completed: true,
        frames_replayed,
        first_divergence: None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tilehop_physics::collision::{Material, Solid};
    use tilehop_physics::geometry::Rect;

    use crate::config::FrameConfig;
    use crate::level::{CoinRecord, EnemyRecord, LevelData};

    use super::*;

    fn level() -> LevelData {
        let mut data = LevelData::new(2400.0, 600.0);
        data.seed = 3;
        data.tiles
            .push(Solid::new(Rect::new(0.0, 540.0, 2400.0, 60.0), Material::Ground));
        data.obstacles
            .push(Solid::new(Rect::new(420.0, 480.0, 60.0, 60.0), Material::Brick));
        data.coins.push(CoinRecord::at(300.0, 516.0));
        data.enemies.push(EnemyRecord::at(700.0, 540.0));
        data
    }

    fn record(frames: u64, interval: u64) -> (ReplayLog, String) {
        let mut sim = Simulation::new(FrameConfig::default(), &level()).unwrap();
        let mut recorder = ReplayRecorder::new(sim.capture_snapshot(), interval);
        for i in 0..frames {
            if i == 2 {
                sim.start();
                recorder.record_start(sim.frame_count());
            }
            let input = InputFrame::new(if i % 90 < 70 { 1 } else { -1 }, i % 25 == 0);
            let elapsed = if i % 7 == 0 { 1.0 / 30.0 } else { 1.0 / 60.0 };
            recorder.record_frame(sim.frame_count(), input, elapsed, Some(sim.state_hash()));
            sim.advance(elapsed, input);
        }
        (recorder.finish(), sim.state_hash())
    }

    #[test]
    fn replay_reproduces_final_state() {
        let (log, final_hash) = record(200, 10);
        assert_eq!(log.total_frames, 200);

        let mut sim = Simulation::new(FrameConfig::default(), &level()).unwrap();
        let result = replay(&mut sim, &log).unwrap();
        assert!(result.completed);
        assert_eq!(result.frames_replayed, 200);
        assert!(result.first_divergence.is_none());
        assert_eq!(sim.state_hash(), final_hash);
    }

    #[test]
    fn checkpoint_interval_is_respected() {
        let (log, _) = record(35, 10);
        let checkpoints: Vec<u64> = log
            .entries
            .iter()
            .filter_map(|e| match e {
                ReplayEntry::Checkpoint { frame, .. } => Some(*frame),
                _ => None,
            })
            .collect();
        assert_eq!(checkpoints, vec![0, 10, 20, 30]);
    }

    #[test]
    fn log_survives_json() {
        let (log, final_hash) = record(60, 5);
        let json = serde_json::to_string(&log).unwrap();
        let decoded: ReplayLog = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.entries, log.entries);

        let mut sim = Simulation::new(FrameConfig::default(), &level()).unwrap();
        let result = replay(&mut sim, &decoded).unwrap();
        assert!(result.completed);
        assert_eq!(sim.state_hash(), final_hash);
    }

    #[test]
    fn altered_input_is_reported_as_divergence() {
        let (mut log, _) = record(60, 10);
        for entry in &mut log.entries {
            if let ReplayEntry::Frame { frame: 15, input, .. } = entry {
                *input = InputFrame::new(-1, true);
            }
        }

        let mut sim = Simulation::new(FrameConfig::default(), &level()).unwrap();
        let result = replay(&mut sim, &log).unwrap();
        assert!(!result.completed);
        let divergence = result.first_divergence.unwrap();
        assert_eq!(divergence.frame, 20);
        assert_ne!(divergence.expected_hash, divergence.actual_hash);
        assert_eq!(result.frames_replayed, 20);
    }

    #[test]
    fn duplicate_entries_fail_before_mutation() {
        let (mut log, _) = record(20, 10);
        log.entries.push(ReplayEntry::Start { frame: 2 });

        let mut sim = Simulation::new(FrameConfig::default(), &level()).unwrap();
        let before = sim.state_hash();
        let err = replay(&mut sim, &log).unwrap_err();
        assert!(err.to_string().contains("duplicate Start"));
        assert_eq!(sim.state_hash(), before);
    }

    #[test]
    fn missing_frame_fails_before_mutation() {
        let (mut log, _) = record(20, 0);
        log.entries
            .retain(|e| !matches!(e, ReplayEntry::Frame { frame: 12, .. }));

        let mut sim = Simulation::new(FrameConfig::default(), &level()).unwrap();
        sim.start();
        let before = sim.state_hash();
        let err = replay(&mut sim, &log).unwrap_err();
        assert!(err.to_string().contains("frame 12"));
        assert_eq!(sim.state_hash(), before);
    }

    #[test]
    #[should_panic(expected = "not strictly greater")]
    fn recorder_rejects_non_monotonic_frames() {
        let sim = Simulation::new(FrameConfig::default(), &level()).unwrap();
        let mut recorder = ReplayRecorder::new(sim.capture_snapshot(), 1);
        recorder.record_frame(3, InputFrame::default(), 1.0 / 60.0, None);
        recorder.record_frame(3, InputFrame::default(), 1.0 / 60.0, None);
    }

    #[test]
    fn empty_log_restores_snapshot() {
        let (log, _) = record(0, 10);
        let mut sim = Simulation::new(FrameConfig::default(), &level()).unwrap();
        sim.start();
        let result = replay(&mut sim, &log).unwrap();
        assert!(result.completed);
        assert_eq!(result.frames_replayed, 0);
        assert_eq!(sim.state_hash(), log.initial_snapshot.hash);
    }
}
