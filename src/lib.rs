//! Brickfall - a brick breaker simulation engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scoring, levels)
//! - `clock`: Fixed-step accumulator decoupling simulation from display rate
//! - `engine`: Public facade owning state, clock, input and telemetry
//! - `settings`: Feature flags, sensitivity and skin configuration

pub mod clock;
pub mod engine;
pub mod error;
pub mod settings;
pub mod sim;

pub use clock::SimClock;
pub use engine::{Engine, EngineConfig, Surface, Telemetry};
pub use error::EngineError;
pub use settings::{FeatureUpdate, Features, Settings, Skin};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per second; time is counted in whole ticks
    pub const TICK_RATE: u64 = 60;
    /// Largest frame delta the clock will absorb (bounds catch-up after a stall)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World dimensions (logical units)
    pub const WORLD_WIDTH: f32 = 720.0;
    pub const WORLD_HEIGHT: f32 = 1280.0;

    /// Paddle defaults
    pub const PADDLE_X: f32 = 300.0;
    pub const PADDLE_Y: f32 = 1100.0;
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 16.0;
    pub const PADDLE_SPEED: f32 = 760.0;
    /// Width multiplier while Expand is active
    pub const EXPAND_FACTOR: f32 = 1.5;
    /// Expand duration in ticks (6 s)
    pub const EXPAND_TICKS: u64 = 6 * TICK_RATE;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const MAX_BALLS: usize = 6;
    /// Target speed at level 0; grows by `BALL_SPEED_RAMP` per level up to level 9
    pub const BALL_BASE_SPEED: f32 = 300.0;
    pub const BALL_SPEED_RAMP: f32 = 20.0;
    /// Maximum deflection from vertical on a paddle edge hit (60 degrees)
    pub const PADDLE_MAX_DEFLECT: f32 = std::f32::consts::FRAC_PI_3;
    /// Launch direction for an attached ball (60 degrees up and to the right)
    pub const LAUNCH_ANGLE: f32 = -std::f32::consts::FRAC_PI_3;

    /// Scoring
    pub const BRICK_SCORE: u32 = 100;
    pub const COMBO_WINDOW: f32 = 1.8;

    /// Power-ups
    pub const POWERUP_DROP_CHANCE: f64 = 0.12;
    pub const POWERUP_FALL_SPEED: f32 = 180.0;
    pub const POWERUP_WIDTH: f32 = 20.0;
    pub const POWERUP_HEIGHT: f32 = 10.0;
    pub const MULTI_BALL_COUNT: usize = 2;

    /// Level totals
    pub const CAMPAIGN_LEVELS: u32 = 10;
    pub const QUICK_LEVELS: u32 = 3;

    /// Configuration ranges
    pub const MIN_SENSITIVITY: f32 = 0.2;
    pub const MAX_SENSITIVITY: f32 = 3.0;
}

/// Convert a tick count to seconds without accumulating rounding error
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    (ticks as f64 / consts::TICK_RATE as f64) as f32
}

/// Target ball speed for a (0-based) level index
#[inline]
pub fn target_speed_for_level(level_index: u32) -> f32 {
    consts::BALL_BASE_SPEED + consts::BALL_SPEED_RAMP * level_index.min(9) as f32
}
