//! Read-only view of the simulation for a renderer.
//!
//! Collected coins and dead enemies are filtered out here; the underlying
//! collections keep them.

use tilehop_physics::body::Body;
use tilehop_physics::collision::Solid;

use crate::animation::AnimationCursor;
use crate::entities::{Coin, Enemy, Flag};
use crate::frame::{GameState, SimState};
use crate::interaction::Scoreboard;

/// Borrowed snapshot of everything a frame needs to draw.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    state: &'a SimState,
}

impl<'a> FrameView<'a> {
    pub(crate) fn new(state: &'a SimState) -> Self {
        Self { state }
    }

    pub fn player(&self) -> &'a Body {
        &self.state.player
    }

    pub fn animation(&self) -> &'a AnimationCursor {
        &self.state.animation
    }

    /// Tiles then obstacles.
    pub fn solids(&self) -> impl Iterator<Item = &'a Solid> + 'a {
        self.state.level.solids()
    }

    /// Uncollected coins.
    pub fn coins(&self) -> impl Iterator<Item = &'a Coin> + 'a {
        self.state.level.coins.iter().filter(|c| !c.is_collected())
    }

    /// Living enemies.
    pub fn enemies(&self) -> impl Iterator<Item = &'a Enemy> + 'a {
        self.state.level.enemies.iter().filter(|e| e.is_alive())
    }

    pub fn flag(&self) -> &'a Flag {
        &self.state.level.flag
    }

    pub fn score(&self) -> Scoreboard {
        self.state.board
    }

    pub fn total_coins(&self) -> usize {
        self.state.level.total_coins()
    }

    pub fn game_state(&self) -> GameState {
        self.state.game_state
    }

    pub fn camera_x(&self) -> f64 {
        self.state.camera_x
    }

    /// Win overlay opacity in `[0, 1]`.
    pub fn win_fade(&self) -> f64 {
        self.state.win_fade
    }
}

#[cfg(test)]
mod tests {
    use tilehop_physics::collision::Material;
    use tilehop_physics::geometry::Rect;

    use crate::config::FrameConfig;
    use crate::frame::Simulation;
    use crate::input::InputFrame;
    use crate::level::{CoinRecord, EnemyRecord, LevelData};

    use super::*;

    #[test]
    fn hides_collected_coins_and_dead_enemies() {
        let mut data = LevelData::new(2400.0, 600.0);
        data.tiles
            .push(Solid::new(Rect::new(0.0, 540.0, 2400.0, 60.0), Material::Ground));
        data.obstacles
            .push(Solid::new(Rect::new(900.0, 480.0, 60.0, 60.0), Material::Brick));
        data.coins.push(CoinRecord::at(136.0, 516.0));
        data.coins.push(CoinRecord::at(1500.0, 516.0));
        data.enemies.push(EnemyRecord::at(1200.0, 540.0));
        data.enemies.push(EnemyRecord::at(1800.0, 540.0));

        let mut sim = Simulation::new(FrameConfig::default(), &data).unwrap();
        sim.start();
        sim.advance(1.0 / 60.0, InputFrame::default());

        let view = sim.view();
        assert_eq!(view.coins().count(), 1);
        assert_eq!(view.total_coins(), 2);
        assert_eq!(view.score().coins_collected, 1);
        assert_eq!(view.enemies().count(), 2);
        assert_eq!(view.solids().count(), 2);
        assert_eq!(view.game_state(), GameState::Playing);
        assert_eq!(view.win_fade(), 0.0);
        assert!(!view.flag().is_reached());

        let mut state = sim.state().clone();
        assert!(state.level.enemies[0].kill());
        let killed_x = state.level.enemies[0].x;

        let view = FrameView::new(&state);
        assert_eq!(view.enemies().count(), 1);
        assert!(view.enemies().all(|e| e.is_alive() && e.x != killed_x));
    }
}
