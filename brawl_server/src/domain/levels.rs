// Static level tables: platform layouts and spawn points per level.

use crate::domain::entities::{Oscillation, PlatformMotion};
use crate::domain::physics::Vec2;

pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 600.0;
pub const WALL_THICKNESS: f32 = 40.0;
/// Vertical spacing between platform tiers.
pub const JUMP_HEIGHT: f32 = 140.0;

const GROUND_HEIGHT: f32 = 40.0;
const TIER_HEIGHT: f32 = 70.0;

/// Rotation order used between rounds.
pub const LEVEL_ORDER: [&str; 5] = ["pastelaria", "estacao", "floresta", "montanha", "palacio"];

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformSpec {
    /// Center of the platform at offset zero.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub motion: PlatformMotion,
    /// One-way platforms only support players landing from above.
    pub one_way: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelSpec {
    pub key: &'static str,
    pub title: &'static str,
    pub platforms: Vec<PlatformSpec>,
    pub spawn_points: Vec<Vec2>,
}

impl LevelSpec {
    /// Players below this line have fallen out of the level.
    pub fn lower_bound(&self) -> f32 {
        SCREEN_HEIGHT + 50.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=SCREEN_WIDTH).contains(&point.x) && (0.0..=SCREEN_HEIGHT).contains(&point.y)
    }
}

/// Index of a level key in the rotation.
pub fn level_index(key: &str) -> Option<usize> {
    LEVEL_ORDER.iter().position(|candidate| *candidate == key)
}

/// Level at a rotation index, wrapping around.
pub fn level_at(index: usize) -> LevelSpec {
    level_or_default(LEVEL_ORDER[index % LEVEL_ORDER.len()])
}

/// Looks a level up by key, falling back to the first level.
pub fn level_or_default(key: &str) -> LevelSpec {
    match key {
        "estacao" => estacao(),
        "floresta" => floresta(),
        "montanha" => montanha(),
        "palacio" => palacio(),
        _ => pastelaria(),
    }
}

fn fixed(x: f32, y: f32, width: f32, height: f32) -> PlatformSpec {
    PlatformSpec {
        x,
        y,
        width,
        height,
        motion: PlatformMotion::Static,
        one_way: true,
    }
}

fn moving(x: f32, y: f32, width: f32, motion: PlatformMotion) -> PlatformSpec {
    PlatformSpec {
        motion,
        ..fixed(x, y, width, TIER_HEIGHT)
    }
}

fn oscillation(amplitude: f32, frequency: f32, phase: f32) -> Oscillation {
    Oscillation {
        amplitude,
        frequency,
        phase,
    }
}

fn ground(x: f32, width: f32) -> PlatformSpec {
    fixed(x, SCREEN_HEIGHT - GROUND_HEIGHT / 2.0, width, GROUND_HEIGHT * 2.0)
}

fn tier(x: f32, y: f32, width: f32) -> PlatformSpec {
    fixed(x, y, width, TIER_HEIGHT)
}

// Solid side walls. No floor: players can fall out of the level.
fn walls() -> Vec<PlatformSpec> {
    let height = SCREEN_HEIGHT + WALL_THICKNESS;
    [-WALL_THICKNESS / 2.0, SCREEN_WIDTH + WALL_THICKNESS / 2.0]
        .into_iter()
        .map(|x| PlatformSpec {
            one_way: false,
            ..fixed(x, SCREEN_HEIGHT / 2.0, WALL_THICKNESS, height)
        })
        .collect()
}

fn spawn_points() -> Vec<Vec2> {
    let y = SCREEN_HEIGHT - GROUND_HEIGHT - 50.0;
    vec![Vec2::new(200.0, y), Vec2::new(SCREEN_WIDTH - 200.0, y)]
}

fn build(key: &'static str, title: &'static str, platforms: Vec<PlatformSpec>) -> LevelSpec {
    let mut all = walls();
    all.extend(platforms);
    LevelSpec {
        key,
        title,
        platforms: all,
        spawn_points: spawn_points(),
    }
}

fn pastelaria() -> LevelSpec {
    let low = SCREEN_HEIGHT - JUMP_HEIGHT;
    let high = SCREEN_HEIGHT - 2.0 * JUMP_HEIGHT;
    build(
        "pastelaria",
        "Pastelaria",
        vec![
            ground(SCREEN_WIDTH / 2.0, SCREEN_WIDTH - 100.0),
            tier(150.0, low, 250.0),
            tier(SCREEN_WIDTH - 150.0, low, 250.0),
            moving(
                SCREEN_WIDTH / 2.0,
                high,
                250.0,
                PlatformMotion::Horizontal(oscillation(150.0, 0.5, 0.0)),
            ),
        ],
    )
}

fn estacao() -> LevelSpec {
    let low = SCREEN_HEIGHT - JUMP_HEIGHT;
    let high = SCREEN_HEIGHT - 2.0 * JUMP_HEIGHT;
    build(
        "estacao",
        "Estação",
        vec![
            // Split floor with a gap in the middle.
            ground(200.0, 300.0),
            ground(SCREEN_WIDTH - 200.0, 300.0),
            tier(SCREEN_WIDTH / 2.0, low, 250.0),
            moving(
                SCREEN_WIDTH / 2.0,
                high,
                250.0,
                PlatformMotion::Horizontal(oscillation(250.0, 0.3, 0.0)),
            ),
        ],
    )
}

fn floresta() -> LevelSpec {
    let low = SCREEN_HEIGHT - JUMP_HEIGHT;
    let mid = SCREEN_HEIGHT - 1.5 * JUMP_HEIGHT;
    let high = SCREEN_HEIGHT - 2.0 * JUMP_HEIGHT - 20.0;
    build(
        "floresta",
        "Floresta",
        vec![
            ground(SCREEN_WIDTH / 2.0, SCREEN_WIDTH - 150.0),
            tier(150.0, low, 200.0),
            tier(SCREEN_WIDTH - 150.0, low, 200.0),
            moving(
                SCREEN_WIDTH / 2.0,
                mid,
                250.0,
                PlatformMotion::Vertical(oscillation(30.0, 0.7, 0.0)),
            ),
            tier(180.0, high, 150.0),
            tier(SCREEN_WIDTH - 180.0, high, 150.0),
        ],
    )
}

fn montanha() -> LevelSpec {
    let low = SCREEN_HEIGHT - JUMP_HEIGHT;
    let mid = SCREEN_HEIGHT - 1.5 * JUMP_HEIGHT;
    let high = SCREEN_HEIGHT - 2.0 * JUMP_HEIGHT - 30.0;
    build(
        "montanha",
        "Montanha",
        vec![
            ground(SCREEN_WIDTH / 2.0, SCREEN_WIDTH - 100.0),
            tier(180.0, low, 200.0),
            tier(SCREEN_WIDTH - 180.0, low, 200.0),
            tier(300.0, mid, 180.0),
            tier(SCREEN_WIDTH - 300.0, mid, 180.0),
            moving(
                SCREEN_WIDTH / 2.0,
                high,
                220.0,
                PlatformMotion::Vertical(oscillation(25.0, 1.0, 0.0)),
            ),
        ],
    )
}

fn palacio() -> LevelSpec {
    let low = SCREEN_HEIGHT - JUMP_HEIGHT;
    let mid = SCREEN_HEIGHT - 1.5 * JUMP_HEIGHT;
    let high = SCREEN_HEIGHT - 2.0 * JUMP_HEIGHT - 40.0;
    build(
        "palacio",
        "Palácio Real",
        vec![
            ground(SCREEN_WIDTH / 2.0, SCREEN_WIDTH - 80.0),
            tier(180.0, low, 250.0),
            tier(SCREEN_WIDTH - 180.0, low, 250.0),
            moving(
                250.0,
                mid,
                180.0,
                PlatformMotion::Horizontal(oscillation(80.0, 0.6, 0.0)),
            ),
            moving(
                SCREEN_WIDTH - 250.0,
                mid,
                180.0,
                PlatformMotion::Horizontal(oscillation(80.0, 0.6, std::f32::consts::PI)),
            ),
            fixed(SCREEN_WIDTH / 2.0, high, 300.0, 90.0),
        ],
    )
}
