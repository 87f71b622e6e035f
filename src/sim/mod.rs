//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (list order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod level;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{
    Rect, circle_intersects_rect, intersect_aabb, reflect_velocity, resolve_ball_rect_normal,
};
pub use input::{InputEvent, InputState, Key};
pub use level::{LEVEL_PATTERNS, build_bricks};
pub use scoring::{ComboState, Medal, MedalThresholds, combo_bonus, compute_medal};
pub use state::{
    Ball, BallState, Brick, BrickKind, BrickMotion, GameState, LevelResult, Paddle, Particle,
    PowerUp, PowerUpKind, MAX_PARTICLES,
};
pub use tick::{GameEvent, PaddleIntent, TickInput, tick};
