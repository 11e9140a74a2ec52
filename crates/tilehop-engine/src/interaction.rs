//! Entity interaction rules: coin pickup, enemy patrol and combat, and the
//! flag check.
//!
//! Every rule reads the player's *post-resolution* rectangle. Each rule
//! appends what happened to an event buffer so the caller can report the
//! frame without diffing state.

use serde::{Deserialize, Serialize};
use tilehop_physics::body::Body;
use tilehop_physics::config::PhysicsConfig;

use crate::config::RulesConfig;
use crate::entities::{Coin, Enemy, Flag};
use crate::frame::GameState;

// ---------------------------------------------------------------------------
// Events and score
// ---------------------------------------------------------------------------

/// Something observable that happened during a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinCollected { index: usize, value: u32 },
    EnemyStomped { index: usize, value: u32 },
    /// The player touched a living enemy outside its stomp band.
    PlayerHurt { index: usize, vel_x: f64, vel_y: f64 },
    FlagReached,
    StateChanged { from: GameState, to: GameState },
}

/// Score counters. Both only ever increase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u32,
    pub coins_collected: u32,
}

impl Scoreboard {
    fn award(&mut self, value: u32) {
        self.score = self.score.saturating_add(value);
    }
}

// ---------------------------------------------------------------------------
// Coins
// ---------------------------------------------------------------------------

/// Collect every uncollected coin whose hitbox overlaps the player.
pub fn collect_coins(
    player: &Body,
    coins: &mut [Coin],
    board: &mut Scoreboard,
    events: &mut Vec<GameEvent>,
) {
    let rect = player.rect();
    for (index, coin) in coins.iter_mut().enumerate() {
        if coin.is_collected() || !rect.intersects(&coin.hitbox()) {
            continue;
        }
        if coin.collect() {
            board.award(coin.value);
            board.coins_collected += 1;
            tracing::debug!(index, value = coin.value, score = board.score, "coin collected");
            events.push(GameEvent::CoinCollected {
                index,
                value: coin.value,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Enemies
// ---------------------------------------------------------------------------

/// Advance every living enemy along its patrol route.
///
/// `ts` drives movement; `elapsed` (seconds) drives the decorative phase.
pub fn patrol_enemies(enemies: &mut [Enemy], ts: f64, elapsed: f64, rules: &RulesConfig) {
    let phase_delta = elapsed * rules.enemy_phase_rate;
    for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
        enemy.patrol(ts, phase_delta);
    }
}

/// Resolve contacts between the player and every living enemy, in order.
///
/// A downward-moving player whose bottom edge lies within the enemy's stomp
/// band kills it and bounces. Any other contact pushes the player out
/// horizontally and knocks it back against its facing. Each enemy is tested
/// against the player rectangle as left by the previous one.
pub fn resolve_enemy_contacts(
    player: &mut Body,
    enemies: &mut [Enemy],
    board: &mut Scoreboard,
    physics: &PhysicsConfig,
    rules: &RulesConfig,
    level_width: f64,
    events: &mut Vec<GameEvent>,
) {
    for (index, enemy) in enemies.iter_mut().enumerate() {
        if !enemy.is_alive() {
            continue;
        }
        let p = player.rect();
        let e = enemy.rect();
        if !p.intersects(&e) {
            continue;
        }

        let in_stomp_band = p.bottom() <= e.top() + e.height * rules.stomp_band;
        if player.vel_y > 0.0 && in_stomp_band {
            enemy.kill();
            board.award(enemy.value);
            player.vel_y = physics.jump_impulse * rules.stomp_bounce;
            tracing::debug!(index, value = enemy.value, score = board.score, "enemy stomped");
            events.push(GameEvent::EnemyStomped {
                index,
                value: enemy.value,
            });
        } else {
            let max_x = (level_width - player.width()).max(0.0);
            player.x = if p.center_x() < e.center_x() {
                e.left() - player.width()
            } else {
                e.right()
            }
            .clamp(0.0, max_x);
            player.vel_x = -player.facing.sign() * rules.knockback_speed;
            player.vel_y = physics.jump_impulse * rules.knockback_bounce;
            tracing::debug!(
                index,
                vel_x = player.vel_x,
                vel_y = player.vel_y,
                "player hurt"
            );
            events.push(GameEvent::PlayerHurt {
                index,
                vel_x: player.vel_x,
                vel_y: player.vel_y,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Flag
// ---------------------------------------------------------------------------

/// Check the padded flag region. On first contact marks the flag reached,
/// freezes the player and returns `true`.
pub fn check_flag(
    player: &mut Body,
    flag: &mut Flag,
    rules: &RulesConfig,
    events: &mut Vec<GameEvent>,
) -> bool {
    if flag.is_reached() || !player.rect().intersects(&flag.trigger_rect(rules.flag_padding)) {
        return false;
    }
    flag.mark_reached();
    player.halt();
    events.push(GameEvent::FlagReached);
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
