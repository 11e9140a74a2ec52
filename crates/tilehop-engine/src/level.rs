//! Level data records and the immutable-structure [`Level`] built from them.
//!
//! [`LevelData`] is the serializable description handed over by whatever
//! loads levels (a tile-map parser, a JSON file, test code). [`Level::build`]
//! validates it and constructs the runtime entities:
//!
//! - solids are kept as two ordered sets, tiles then obstacles, and always
//!   iterated in that order,
//! - enemies get patrol bounds of `spawn_x +/- patrol_distance / 2` and stand
//!   on their spawn line,
//! - the flag stands on the highest tile under its pole,
//! - initial enemy direction and bob phase come from a PCG stream seeded by
//!   [`LevelData::seed`], so the same data always yields the same level.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tilehop_physics::body::Facing;
use tilehop_physics::collision::Solid;

use crate::entities::{Coin, Enemy, Flag};

/// Side length of one level tile.
pub const TILE_SIZE: f64 = 60.0;

// ---------------------------------------------------------------------------
// LevelError
// ---------------------------------------------------------------------------

/// Reasons level data is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LevelError {
    #[error("level must have positive finite width and world height, got {width}x{world_height}")]
    InvalidDimensions { width: f64, world_height: f64 },

    #[error("{kind} #{index} is degenerate (non-positive or non-finite rectangle)")]
    DegenerateSolid { kind: &'static str, index: usize },

    #[error("coin #{index} must have a positive finite radius and finite center")]
    InvalidCoin { index: usize },

    #[error("enemy #{index}: {reason}")]
    InvalidEnemy { index: usize, reason: &'static str },

    #[error("flag must have positive finite dimensions and position")]
    InvalidFlag,

    #[error("player spawn x must be finite, got {x}")]
    InvalidPlayerSpawn { x: f64 },

    #[error("player of width {player_width} does not fit in level of width {level_width}")]
    PlayerDoesNotFit { player_width: f64, level_width: f64 },
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A coin placement. `x`/`y` are the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub x: f64,
    pub y: f64,
    #[serde(default = "CoinRecord::default_radius")]
    pub radius: f64,
    #[serde(default = "CoinRecord::default_value")]
    pub value: u32,
}

impl CoinRecord {
    fn default_radius() -> f64 {
        14.0
    }

    fn default_value() -> u32 {
        10
    }

    /// A standard coin centered at `(x, y)`.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            radius: Self::default_radius(),
            value: Self::default_value(),
        }
    }
}

/// An enemy spawn. The enemy is centered on `spawn_x` and stands on the line
/// `spawn_y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyRecord {
    pub spawn_x: f64,
    pub spawn_y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub patrol_distance: f64,
    pub value: u32,
}

impl Default for EnemyRecord {
    fn default() -> Self {
        Self {
            spawn_x: 0.0,
            spawn_y: 0.0,
            width: 36.0,
            height: 36.0,
            speed: 1.2,
            patrol_distance: TILE_SIZE * 2.5,
            value: 50,
        }
    }
}

impl EnemyRecord {
    /// A standard enemy spawned at `(spawn_x, spawn_y)`.
    pub fn at(spawn_x: f64, spawn_y: f64) -> Self {
        Self {
            spawn_x,
            spawn_y,
            ..Default::default()
        }
    }
}

/// The goal flag. Its vertical position is derived from the level surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagRecord {
    /// Pole left edge.
    pub x: f64,
    pub pole_width: f64,
    pub pole_height: f64,
    pub banner_width: f64,
    pub banner_height: f64,
}

impl Default for FlagRecord {
    fn default() -> Self {
        Self {
            x: 0.0,
            pole_width: 12.0,
            pole_height: TILE_SIZE * 4.0,
            banner_width: 36.0,
            banner_height: 22.0,
        }
    }
}

/// Everything needed to build a [`Level`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub width: f64,
    /// The world floor line; nothing falls below it.
    pub world_height: f64,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "LevelData::default_player_spawn_x")]
    pub player_spawn_x: f64,
    #[serde(default)]
    pub tiles: Vec<Solid>,
    #[serde(default)]
    pub obstacles: Vec<Solid>,
    #[serde(default)]
    pub coins: Vec<CoinRecord>,
    #[serde(default)]
    pub enemies: Vec<EnemyRecord>,
    pub flag: FlagRecord,
}

impl LevelData {
    fn default_player_spawn_x() -> f64 {
        120.0
    }

    /// An empty level with the flag two tiles from the right edge.
    pub fn new(width: f64, world_height: f64) -> Self {
        Self {
            width,
            world_height,
            seed: 0,
            player_spawn_x: Self::default_player_spawn_x(),
            tiles: Vec::new(),
            obstacles: Vec::new(),
            coins: Vec::new(),
            enemies: Vec::new(),
            flag: FlagRecord {
                x: width - TILE_SIZE * 2.0 + TILE_SIZE / 2.0 - 6.0,
                ..Default::default()
            },
        }
    }

    /// Parse level data from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Runtime level: static solids plus coins, enemies and the flag.
///
/// The structure (which entities exist, solid geometry, dimensions) never
/// changes after [`build`](Self::build); only entity fields do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    width: f64,
    world_height: f64,
    tiles: Vec<Solid>,
    obstacles: Vec<Solid>,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub flag: Flag,
    total_coins: usize,
}

impl Level {
    /// Validate `data` and construct the level.
    pub fn build(data: &LevelData) -> Result<Self, LevelError> {
        if !(data.width.is_finite()
            && data.world_height.is_finite()
            && data.width > 0.0
            && data.world_height > 0.0)
        {
            return Err(LevelError::InvalidDimensions {
                width: data.width,
                world_height: data.world_height,
            });
        }

        if !data.player_spawn_x.is_finite() {
            return Err(LevelError::InvalidPlayerSpawn {
                x: data.player_spawn_x,
            });
        }

        for (kind, set) in [("tile", &data.tiles), ("obstacle", &data.obstacles)] {
            if let Some(index) = set.iter().position(|s| !s.rect.is_well_formed()) {
                return Err(LevelError::DegenerateSolid { kind, index });
            }
        }

        let coins = data
            .coins
            .iter()
            .enumerate()
            .map(|(index, c)| {
                if c.x.is_finite() && c.y.is_finite() && c.radius.is_finite() && c.radius > 0.0 {
                    Ok(Coin::new(c.x, c.y, c.radius, c.value))
                } else {
                    Err(LevelError::InvalidCoin { index })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut rng = Pcg64::seed_from_u64(data.seed);
        let mut enemies = Vec::with_capacity(data.enemies.len());
        for (index, e) in data.enemies.iter().enumerate() {
            let invalid = |reason| LevelError::InvalidEnemy { index, reason };
            let finite = [e.spawn_x, e.spawn_y, e.width, e.height, e.speed, e.patrol_distance]
                .iter()
                .all(|v| v.is_finite());
            if !finite {
                return Err(invalid("all fields must be finite"));
            }
            if e.width <= 0.0 || e.height <= 0.0 {
                return Err(invalid("size must be positive"));
            }
            if e.speed < 0.0 {
                return Err(invalid("speed must be non-negative"));
            }
            if e.patrol_distance < e.width {
                return Err(invalid("patrol distance must be at least the enemy width"));
            }

            let direction = if rng.gen_bool(0.5) {
                Facing::Right
            } else {
                Facing::Left
            };
            let half_patrol = e.patrol_distance / 2.0;
            let mut enemy = Enemy::new(
                e.spawn_x - e.width / 2.0,
                e.spawn_y - e.height,
                e.width,
                e.height,
                e.speed,
                direction,
                (e.spawn_x - half_patrol, e.spawn_x + half_patrol),
                e.value,
            );
            enemy.phase = rng.gen_range(0.0..TAU);
            enemies.push(enemy);
        }

        let f = &data.flag;
        let flag_ok = [f.x, f.pole_width, f.pole_height, f.banner_width, f.banner_height]
            .iter()
            .all(|v| v.is_finite())
            && f.pole_width > 0.0
            && f.pole_height > 0.0
            && f.banner_width > 0.0
            && f.banner_height > 0.0;
        if !flag_ok {
            return Err(LevelError::InvalidFlag);
        }

        let mut level = Self {
            width: data.width,
            world_height: data.world_height,
            tiles: data.tiles.clone(),
            obstacles: data.obstacles.clone(),
            total_coins: coins.len(),
            coins,
            enemies,
            flag: Flag::new(
                f.x,
                0.0,
                f.pole_width,
                f.pole_height,
                f.banner_width,
                f.banner_height,
            ),
        };
        level.flag.y = level.surface_y(f.x, f.pole_width) - f.pole_height;

        tracing::info!(
            width = level.width,
            tiles = level.tiles.len(),
            obstacles = level.obstacles.len(),
            coins = level.total_coins,
            enemies = level.enemies.len(),
            "level built"
        );

        Ok(level)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// The world floor line.
    pub fn world_height(&self) -> f64 {
        self.world_height
    }

    pub fn tiles(&self) -> &[Solid] {
        &self.tiles
    }

    pub fn obstacles(&self) -> &[Solid] {
        &self.obstacles
    }

    /// All solids in resolution order: tiles, then obstacles.
    pub fn solids(&self) -> impl Iterator<Item = &Solid> + '_ {
        self.tiles.iter().chain(self.obstacles.iter())
    }

    pub fn total_coins(&self) -> usize {
        self.total_coins
    }

    /// Top of the highest tile horizontally overlapping `[x, x + width)`.
    ///
    /// Falls back to one tile above the floor line when no tile is under the
    /// span. Obstacles are ignored.
    pub fn surface_y(&self, x: f64, width: f64) -> f64 {
        self.tiles
            .iter()
            .filter(|t| x + width > t.rect.left() && x < t.rect.right())
            .map(|t| t.rect.top())
            .reduce(f64::min)
            .unwrap_or(self.world_height - TILE_SIZE)
    }

    /// Whether `other` has the same immutable structure as `self`.
    pub fn same_structure(&self, other: &Level) -> bool {
        self.width == other.width
            && self.world_height == other.world_height
            && self.tiles == other.tiles
            && self.obstacles == other.obstacles
            && self.coins.len() == other.coins.len()
            && self.enemies.len() == other.enemies.len()
            && self.total_coins == other.total_coins
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tilehop_physics::collision::Material;
    use tilehop_physics::geometry::Rect;

    fn ground_row(width: f64, y: f64) -> Vec<Solid> {
        (0..(width / TILE_SIZE) as usize)
            .map(|i| {
                Solid::new(
                    Rect::new(i as f64 * TILE_SIZE, y, TILE_SIZE, TILE_SIZE),
                    Material::Ground,
                )
            })
            .collect()
    }

    fn sample_data() -> LevelData {
        let mut data = LevelData::new(1200.0, 600.0);
        data.tiles = ground_row(1200.0, 480.0);
        data.obstacles
            .push(Solid::new(Rect::new(300.0, 300.0, 60.0, 60.0), Material::Brick));
        data.coins.push(CoinRecord::at(330.0, 270.0));
        data.enemies.push(EnemyRecord::at(600.0, 480.0));
        data
    }

    #[test]
    fn builds_entities_from_records() {
        let level = Level::build(&sample_data()).unwrap();
        assert_eq!(level.tiles().len(), 20);
        assert_eq!(level.obstacles().len(), 1);
        assert_eq!(level.coins.len(), 1);
        assert_eq!(level.total_coins(), 1);
        assert_eq!(level.coins[0].radius, 14.0);
        assert_eq!(level.coins[0].value, 10);

        let enemy = &level.enemies[0];
        assert_eq!(enemy.x, 582.0);
        assert_eq!(enemy.y, 444.0);
        assert_eq!(enemy.min_x, 525.0);
        assert_eq!(enemy.max_x, 675.0);
        assert!(enemy.is_alive());
        assert!((0.0..TAU).contains(&enemy.phase));
    }

    #[test]
    fn solids_iterate_tiles_then_obstacles() {
        let level = Level::build(&sample_data()).unwrap();
        let solids: Vec<&Solid> = level.solids().collect();
        assert_eq!(solids.len(), 21);
        assert_eq!(solids[20].material, Material::Brick);
        assert!(solids[..20].iter().all(|s| s.material == Material::Ground));
    }

    #[test]
    fn flag_stands_on_surface() {
        let level = Level::build(&sample_data()).unwrap();
        assert_eq!(level.flag.y, 480.0 - 240.0);
        assert_eq!(level.flag.x, 1200.0 - 96.0);
        assert!(!level.flag.is_reached());
    }

    #[test]
    fn surface_uses_highest_tile_and_falls_back() {
        let mut data = sample_data();
        data.tiles
            .push(Solid::new(Rect::new(60.0, 360.0, 60.0, 60.0), Material::Brick));
        let level = Level::build(&data).unwrap();
        assert_eq!(level.surface_y(100.0, 32.0), 360.0);
        assert_eq!(level.surface_y(200.0, 32.0), 480.0);
        assert_eq!(level.surface_y(5_000.0, 32.0), 600.0 - TILE_SIZE);
    }

    #[test]
    fn same_seed_same_level() {
        let mut data = sample_data();
        for i in 0..8 {
            data.enemies.push(EnemyRecord::at(100.0 + 120.0 * i as f64, 480.0));
        }
        let a = Level::build(&data).unwrap();
        let b = Level::build(&data).unwrap();
        assert_eq!(a, b);

        data.seed = 99;
        let c = Level::build(&data).unwrap();
        let phases_a: Vec<f64> = a.enemies.iter().map(|e| e.phase).collect();
        let phases_c: Vec<f64> = c.enemies.iter().map(|e| e.phase).collect();
        assert_ne!(phases_a, phases_c);
    }

    #[test]
    fn empty_level_is_valid() {
        let level = Level::build(&LevelData::new(600.0, 400.0)).unwrap();
        assert_eq!(level.solids().count(), 0);
        assert_eq!(level.total_coins(), 0);
        assert!(level.enemies.is_empty());
    }

    #[test]
    fn rejects_bad_dimensions() {
        let err = Level::build(&LevelData::new(0.0, 600.0)).unwrap_err();
        assert!(matches!(err, LevelError::InvalidDimensions { .. }));
    }

    #[test]
    fn rejects_degenerate_solid() {
        let mut data = sample_data();
        data.obstacles
            .push(Solid::new(Rect::new(0.0, 0.0, 0.0, 10.0), Material::Brick));
        assert_eq!(
            Level::build(&data).unwrap_err(),
            LevelError::DegenerateSolid {
                kind: "obstacle",
                index: 1
            }
        );
    }

    #[test]
    fn rejects_bad_coin_and_enemy() {
        let mut data = sample_data();
        data.coins.push(CoinRecord {
            radius: 0.0,
            ..CoinRecord::at(0.0, 0.0)
        });
        assert_eq!(
            Level::build(&data).unwrap_err(),
            LevelError::InvalidCoin { index: 1 }
        );

        let mut data = sample_data();
        data.enemies.push(EnemyRecord {
            patrol_distance: 10.0,
            ..EnemyRecord::at(100.0, 480.0)
        });
        assert!(matches!(
            Level::build(&data).unwrap_err(),
            LevelError::InvalidEnemy { index: 1, .. }
        ));
    }

    #[test]
    fn rejects_non_finite_player_spawn() {
        for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut data = sample_data();
            data.player_spawn_x = x;
            assert!(matches!(
                Level::build(&data).unwrap_err(),
                LevelError::InvalidPlayerSpawn { .. }
            ));
        }
    }

    #[test]
    fn rejects_bad_flag() {
        let mut data = sample_data();
        data.flag.pole_height = -1.0;
        assert_eq!(Level::build(&data).unwrap_err(), LevelError::InvalidFlag);
    }

    #[test]
    fn parses_json_with_defaults() {
        let json = r#"{
            "width": 1200,
            "world_height": 600,
            "tiles": [{"rect": {"x": 0, "y": 540, "width": 60, "height": 60}, "material": "ground"}],
            "coins": [{"x": 90, "y": 500}],
            "enemies": [{"spawn_x": 400, "spawn_y": 540}],
            "flag": {"x": 1100}
        }"#;
        let data = LevelData::from_json_str(json).unwrap();
        assert_eq!(data.player_spawn_x, 120.0);
        assert_eq!(data.coins[0].value, 10);
        assert_eq!(data.enemies[0].speed, 1.2);
        assert_eq!(data.flag.pole_height, 240.0);
        assert_eq!(data.tiles[0].material, Material::Ground);
        assert!(Level::build(&data).is_ok());
    }

    #[test]
    fn same_structure_ignores_entity_state() {
        let a = Level::build(&sample_data()).unwrap();
        let mut b = a.clone();
        b.coins[0].collect();
        b.enemies[0].kill();
        b.enemies[0].x += 10.0;
        assert!(a.same_structure(&b));

        let mut data = sample_data();
        data.obstacles.clear();
        let c = Level::build(&data).unwrap();
        assert!(!a.same_structure(&c));
    }
}
