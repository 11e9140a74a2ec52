//! Frame orchestrator and game state machine.
//!
//! [`Simulation`] owns all mutable game state and advances it once per
//! display frame. While [`GameState::Playing`], each frame:
//!
//! 1. Clamps the elapsed time to [`FrameConfig::max_frame`] and normalises
//!    it to a time scale.
//! 2. Integrates the player from the frame's [`InputFrame`].
//! 3. Resolves the player against every solid, then the floor line.
//! 4. Re-derives the motion state and advances the animation cursor.
//! 5. Collects coins, patrols enemies, resolves enemy contacts and checks the
//!    flag, all against the resolved player.
//!
//! A frame with zero simulated time skips all of the above. In every state
//! the camera offset is recomputed afterwards. While
//! [`GameState::Completed`] only the win fade advances.
//!
//! # Example
//!
//! ```
//! use tilehop_engine::prelude::*;
//!
//! let data = LevelData::new(1200.0, 600.0);
//! let mut sim = Simulation::new(FrameConfig::default(), &data).unwrap();
//! assert_eq!(sim.game_state(), GameState::Menu);
//!
//! // Nothing moves before the start signal.
//! let x = sim.player().x;
//! sim.advance(1.0 / 60.0, InputFrame::new(1, false));
//! assert_eq!(sim.player().x, x);
//!
//! assert!(sim.start());
//! sim.advance(1.0 / 60.0, InputFrame::new(1, false));
//! assert!(sim.player().x > x);
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tilehop_physics::body::{Body, MotionState};
use tilehop_physics::collision::resolve;
use tilehop_physics::kinematics::{integrate, time_scale};

use crate::animation::AnimationCursor;
use crate::config::FrameConfig;
use crate::input::InputFrame;
use crate::interaction::{
    check_flag, collect_coins, patrol_enemies, resolve_enemy_contacts, GameEvent, Scoreboard,
};
use crate::level::{Level, LevelData, LevelError};
use crate::view::FrameView;
use crate::EngineError;

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Top-level game state. `Menu -> Playing -> Completed`, never backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    Completed,
}

// ---------------------------------------------------------------------------
// FrameClock
// ---------------------------------------------------------------------------

/// Turns host frame timestamps (seconds) into elapsed times.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed seconds since the previous call. The first call, and any
    /// timestamp that goes backwards, yields `0.0`.
    pub fn tick(&mut self, timestamp: f64) -> f64 {
        let elapsed = match self.last {
            Some(prev) if timestamp.is_finite() => (timestamp - prev).max(0.0),
            _ => 0.0,
        };
        if timestamp.is_finite() {
            self.last = Some(timestamp);
        }
        elapsed
    }

    /// Forget the previous timestamp.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

// ---------------------------------------------------------------------------
// FrameDiagnostics / FrameReport
// ---------------------------------------------------------------------------

/// Wall-clock time spent in each phase of the last frame.
#[derive(Debug, Clone, Default)]
pub struct FrameDiagnostics {
    pub integrate_time: Duration,
    pub resolve_time: Duration,
    /// Coins, enemies and flag.
    pub interaction_time: Duration,
    pub total_time: Duration,
}

/// What one [`Simulation::advance`] call did.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Elapsed seconds actually simulated, after clamping.
    pub elapsed: f64,
    pub time_scale: f64,
    pub events: Vec<GameEvent>,
    pub diagnostics: FrameDiagnostics,
}

// ---------------------------------------------------------------------------
// SimState
// ---------------------------------------------------------------------------

/// All mutable simulation state. This is what snapshots capture and what the
/// state hash covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub player: Body,
    pub level: Level,
    pub board: Scoreboard,
    pub game_state: GameState,
    pub win_fade: f64,
    pub animation: AnimationCursor,
    pub frame_counter: u64,
    pub camera_x: f64,
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

/// Horizontal camera offset keeping the player centered, clamped so the view
/// never leaves the level.
pub fn camera_offset(player: &Body, viewport_width: f64, level_width: f64) -> f64 {
    let max = (level_width - viewport_width).max(0.0);
    (player.x - viewport_width / 2.0).clamp(0.0, max)
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// The simulation context: player, level, score and game state.
pub struct Simulation {
    config: FrameConfig,
    state: SimState,
    clock: FrameClock,
    last_report: FrameReport,
}

impl Simulation {
    /// Validate `config`, build the level and place the player on the surface
    /// under the spawn point. Starts in [`GameState::Menu`].
    pub fn new(config: FrameConfig, data: &LevelData) -> Result<Self, EngineError> {
        config.validate()?;
        let level = Level::build(data)?;

        let (pw, ph) = (config.player.width, config.player.height);
        if pw > level.width() {
            return Err(LevelError::PlayerDoesNotFit {
                player_width: pw,
                level_width: level.width(),
            }
            .into());
        }

        let spawn_x = data.player_spawn_x.clamp(0.0, level.width() - pw);
        let spawn_y = level.surface_y(spawn_x, pw) - ph;
        let mut player = Body::new(spawn_x, spawn_y, pw, ph)?;
        player.grounded = true;
        player.state = MotionState::derive(true, 0.0, 0.0, config.rules.run_threshold);

        let camera_x = camera_offset(&player, config.viewport_width, level.width());

        Ok(Self {
            state: SimState {
                player,
                level,
                board: Scoreboard::default(),
                game_state: GameState::Menu,
                win_fade: 0.0,
                animation: AnimationCursor::default(),
                frame_counter: 0,
                camera_x,
            },
            config,
            clock: FrameClock::new(),
            last_report: FrameReport::default(),
        })
    }

    /// Apply the start signal. Only valid from [`GameState::Menu`]; returns
    /// whether the transition happened.
    pub fn start(&mut self) -> bool {
        if self.state.game_state != GameState::Menu {
            tracing::warn!(state = ?self.state.game_state, "start signal ignored");
            return false;
        }
        self.state.game_state = GameState::Playing;
        tracing::info!(frame = self.state.frame_counter, "game started");
        true
    }

    /// Advance one display frame by `elapsed` seconds with the given input.
    pub fn advance(&mut self, elapsed: f64, input: InputFrame) -> FrameReport {
        let frame_start = Instant::now();

        let mut elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
        if elapsed > self.config.max_frame {
            tracing::debug!(elapsed, max = self.config.max_frame, "elapsed time clamped");
            elapsed = self.config.max_frame;
        }
        let ts = time_scale(elapsed, self.config.physics.reference_frame);

        let mut report = FrameReport {
            elapsed,
            time_scale: ts,
            ..Default::default()
        };

        match self.state.game_state {
            GameState::Menu => {}
            GameState::Playing => {
                self.step_playing(elapsed, ts, input, &mut report);
                self.state.win_fade = 0.0;
            }
            GameState::Completed => {
                let fade = self.state.win_fade + self.config.rules.win_fade_rate * elapsed;
                self.state.win_fade = fade.min(1.0);
            }
        }

        self.state.camera_x = camera_offset(
            &self.state.player,
            self.config.viewport_width,
            self.state.level.width(),
        );
        self.state.frame_counter += 1;

        tracing::trace!(
            frame = self.state.frame_counter,
            elapsed,
            time_scale = ts,
            events = report.events.len(),
            "frame advanced"
        );

        report.diagnostics.total_time = frame_start.elapsed();
        self.last_report = report.clone();
        report
    }

    /// Host entry point: derive elapsed time from `timestamp` (seconds) and
    /// advance.
    pub fn on_animation_frame(&mut self, timestamp: f64, input: InputFrame) -> FrameReport {
        let elapsed = self.clock.tick(timestamp);
        self.advance(elapsed, input)
    }

    fn step_playing(&mut self, elapsed: f64, ts: f64, input: InputFrame, report: &mut FrameReport) {
        // A zero-length frame changes nothing, including the grounded flag.
        if ts <= 0.0 {
            return;
        }

        let config = &self.config;
        let SimState {
            player,
            level,
            board,
            game_state,
            animation,
            ..
        } = &mut self.state;

        let t = Instant::now();
        integrate(player, input.intent(), ts, &config.physics, level.width());
        report.diagnostics.integrate_time = t.elapsed();

        let t = Instant::now();
        resolve(player, level.solids(), level.world_height());
        report.diagnostics.resolve_time = t.elapsed();

        player.state = MotionState::derive(
            player.grounded,
            player.vel_x,
            player.vel_y,
            config.rules.run_threshold,
        );
        animation.update(player.state, elapsed);

        let t = Instant::now();
        let events = &mut report.events;
        collect_coins(player, &mut level.coins, board, events);
        patrol_enemies(&mut level.enemies, ts, elapsed, &config.rules);
        let level_width = level.width();
        resolve_enemy_contacts(
            player,
            &mut level.enemies,
            board,
            &config.physics,
            &config.rules,
            level_width,
            events,
        );
        if check_flag(player, &mut level.flag, &config.rules, events) {
            *game_state = GameState::Completed;
            events.push(GameEvent::StateChanged {
                from: GameState::Playing,
                to: GameState::Completed,
            });
            tracing::info!(score = board.score, coins = board.coins_collected, "level completed");
        }
        report.diagnostics.interaction_time = t.elapsed();
    }

    // -- accessors ----------------------------------------------------------

    pub fn game_state(&self) -> GameState {
        self.state.game_state
    }

    pub fn player(&self) -> &Body {
        &self.state.player
    }

    pub fn level(&self) -> &Level {
        &self.state.level
    }

    pub fn score(&self) -> Scoreboard {
        self.state.board
    }

    /// Number of [`advance`](Self::advance) calls so far.
    pub fn frame_count(&self) -> u64 {
        self.state.frame_counter
    }

    pub fn camera_x(&self) -> f64 {
        self.state.camera_x
    }

    pub fn win_fade(&self) -> f64 {
        self.state.win_fade
    }

    pub fn animation(&self) -> &AnimationCursor {
        &self.state.animation
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Full mutable state, read-only.
    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Report of the most recent frame.
    pub fn last_report(&self) -> &FrameReport {
        &self.last_report
    }

    /// Read-only view for rendering.
    pub fn view(&self) -> FrameView<'_> {
        FrameView::new(&self.state)
    }

    /// Mutable player access for setup and tests.
    pub fn player_mut(&mut self) -> &mut Body {
        &mut self.state.player
    }

    pub(crate) fn replace_state(&mut self, state: SimState) {
        self.state = state;
        self.clock.reset();
        self.last_report = FrameReport::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
