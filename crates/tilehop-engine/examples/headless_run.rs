//! Headless run -- a scripted player crosses a demo level (or a level loaded
//! from JSON) and the run is summarised.
//!
//! Run with:
//!   cargo run --example headless_run -p tilehop-engine
//!   cargo run --example headless_run -p tilehop-engine -- path/to/level.json
//!
//! Set `RUST_LOG=tilehop_engine=debug` to see pickups and combat.

use anyhow::Context;
use tilehop_engine::level::TILE_SIZE;
use tilehop_engine::prelude::*;

const DT: f64 = 1.0 / 60.0;
const MAX_FRAMES: u64 = 60 * 120;

// ---------------------------------------------------------------------------
// Scene setup
// ---------------------------------------------------------------------------

fn demo_level() -> LevelData {
    let width = TILE_SIZE * 72.0;
    let world_height = TILE_SIZE * 10.0;
    let ground_y = world_height - TILE_SIZE;

    let mut data = LevelData::new(width, world_height);
    data.seed = 2024;

    // Ground in long segments with a raised step in the middle.
    for (start, end, y) in [
        (0.0, 24.0, ground_y),
        (24.0, 30.0, ground_y - TILE_SIZE),
        (30.0, 72.0, ground_y),
    ] {
        data.tiles.push(Solid::new(
            Rect::new(
                start * TILE_SIZE,
                y,
                (end - start) * TILE_SIZE,
                world_height - y,
            ),
            Material::Ground,
        ));
    }

    for column in [12.0, 40.0, 55.0] {
        data.obstacles.push(Solid::new(
            Rect::new(column * TILE_SIZE, ground_y - TILE_SIZE, TILE_SIZE, TILE_SIZE),
            Material::Brick,
        ));
    }

    for column in (4..68).step_by(5) {
        let x = f64::from(column) * TILE_SIZE + TILE_SIZE / 2.0;
        data.coins.push(CoinRecord::at(x, ground_y - 90.0));
    }

    for column in [18.0, 35.0, 47.0, 62.0] {
        data.enemies
            .push(EnemyRecord::at(column * TILE_SIZE, ground_y));
    }

    data
}

// ---------------------------------------------------------------------------
// Scripted player
// ---------------------------------------------------------------------------

/// Run right and jump when something solid or hostile is just ahead.
fn autopilot(view: &FrameView<'_>) -> InputFrame {
    let player = view.player();
    let probe = Rect::new(player.x + player.width(), player.y, 90.0, player.height());

    let wall_ahead = view
        .solids()
        .any(|s| s.rect.intersects(&probe) && s.rect.top() < player.y + player.height() - 1.0);
    let enemy_ahead = view.enemies().any(|e| e.rect().intersects(&probe));

    InputFrame::new(1, player.grounded && (wall_ahead || enemy_ahead))
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let data = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read level file {path}"))?;
            LevelData::from_json_str(&json)
                .with_context(|| format!("failed to parse level file {path}"))?
        }
        None => demo_level(),
    };

    let mut sim = Simulation::new(FrameConfig::default(), &data)?;
    sim.start();

    let mut events = 0usize;
    while sim.game_state() != GameState::Completed && sim.frame_count() < MAX_FRAMES {
        let input = autopilot(&sim.view());
        events += sim.advance(DT, input).events.len();
    }

    let board = sim.score();
    println!(
        "{:?} after {} frames: score {}, coins {}/{}, events {}, final hash {}",
        sim.game_state(),
        sim.frame_count(),
        board.score,
        board.coins_collected,
        sim.level().total_coins(),
        events,
        sim.state_hash(),
    );

    Ok(())
}
