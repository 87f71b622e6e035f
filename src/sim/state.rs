//! Game state and core simulation types
//!
//! Entities are plain values owned by the collections in [`GameState`]; they
//! have no identity beyond list membership.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::level::{self, BuildOptions};
use super::scoring::{ComboState, Medal};
use crate::consts::*;
use crate::settings::Features;
use crate::{target_speed_for_level, ticks_to_secs};

/// Ball state - attached to paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Riding on the paddle, waiting for launch input
    Attached,
    Free,
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
}

impl Ball {
    /// A ball resting on the paddle
    pub fn attached(paddle: &Paddle) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            state: BallState::Attached,
        };
        ball.update_attached(paddle);
        ball
    }

    /// A free ball
    pub fn free(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            state: BallState::Free,
        }
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.state == BallState::Attached
    }

    /// Pin an attached ball just above the paddle center
    pub fn update_attached(&mut self, paddle: &Paddle) {
        if self.is_attached() {
            self.pos = Vec2::new(paddle.center_x(), paddle.y - self.radius - 1.0);
        }
    }

    /// Release an attached ball along the launch angle
    pub fn launch(&mut self, speed: f32) {
        if self.is_attached() {
            self.vel = Vec2::new(LAUNCH_ANGLE.cos(), LAUNCH_ANGLE.sin()) * speed;
            self.state = BallState::Free;
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Base horizontal speed under directional control (units/s)
    pub speed: f32,
    /// Width without the Expand effect
    pub base_w: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: PADDLE_X,
            y: PADDLE_Y,
            w: PADDLE_WIDTH,
            h: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
            base_w: PADDLE_WIDTH,
        }
    }
}

impl Paddle {
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Keep the paddle fully inside the world
    pub fn clamp_to(&mut self, world_width: f32) {
        self.x = self.x.clamp(0.0, (world_width - self.w).max(0.0));
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrickKind {
    #[default]
    Normal,
    Strong,
    /// Cannot be destroyed, doesn't count for level clear
    Indestructible,
}

/// Sentinel hit-points carried by indestructible bricks
pub const INDESTRUCTIBLE_HP: u8 = u8::MAX;

/// Horizontal motion of a brick, evaluated from elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BrickMotion {
    #[default]
    Static,
    /// Sinusoidal slide around `base_x`
    Sliding {
        amplitude: f32,
        speed: f32,
        phase: f32,
        base_x: f32,
    },
}

impl BrickMotion {
    pub fn is_moving(&self) -> bool {
        matches!(self, BrickMotion::Sliding { .. })
    }
}

/// A brick entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub hp: u8,
    pub kind: BrickKind,
    pub motion: BrickMotion,
}

impl Brick {
    /// Horizontal position at simulation time `t`. Never mutates `x`
    pub fn x_at(&self, t: f32) -> f32 {
        match self.motion {
            BrickMotion::Static => self.x,
            BrickMotion::Sliding {
                amplitude,
                speed,
                phase,
                base_x,
            } => base_x + amplitude * (t * speed + phase).sin(),
        }
    }

    /// Collision rectangle at simulation time `t`
    pub fn rect_at(&self, t: f32) -> Rect {
        Rect::new(self.x_at(t), self.y, self.w, self.h)
    }

    /// Returns true if this brick must be destroyed to clear the level
    pub fn counts_for_clear(&self) -> bool {
        self.kind != BrickKind::Indestructible
    }

    /// Multi-hit brick that is still destructible
    pub fn is_strong(&self) -> bool {
        self.counts_for_clear() && self.hp > 1
    }

    /// Apply one hit. Returns true if the brick is destroyed
    pub fn take_hit(&mut self) -> bool {
        if !self.counts_for_clear() {
            return false;
        }
        if self.hp > 1 {
            self.hp -= 1;
            false
        } else {
            self.hp = 0;
            true
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    /// Temporarily widen the paddle
    Expand,
    /// Spawn extra balls
    Multi,
}

/// A falling power-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub fall_speed: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    /// Power-up centered horizontally on `center_x`, top edge at `y`
    pub fn new(kind: PowerUpKind, center_x: f32, y: f32, fall_speed: f32) -> Self {
        Self {
            x: center_x - POWERUP_WIDTH / 2.0,
            y,
            w: POWERUP_WIDTH,
            h: POWERUP_HEIGHT,
            fall_speed,
            kind,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: f32,
    pub ttl: f32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 512;

/// Active power-up effects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    /// Tick at which Expand wears off
    pub expand_until_tick: u64,
}

/// Outcome of the most recently cleared timed level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub level: u32,
    pub elapsed: f32,
    pub medal: Medal,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Drives power-up drops and particle spray
    pub rng: Pcg32,
    pub features: Features,
    /// Current level index (0-based, within the active rotation)
    pub level_index: u32,
    /// Tick at which the current level was built
    pub level_start_tick: u64,
    /// Fixed ticks simulated so far
    pub time_ticks: u64,
    /// Target ball speed for the current level
    pub ball_speed: f32,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub powerups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub combo: ComboState,
    pub effects: ActiveEffects,
    pub last_clear: Option<LevelResult>,
}

impl GameState {
    /// Create a new game state with the given seed and build its first level
    pub fn new(seed: u64, features: Features, level_index: u32) -> Self {
        let paddle = Paddle::default();
        let ball = Ball::attached(&paddle);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            features,
            level_index,
            level_start_tick: 0,
            time_ticks: 0,
            ball_speed: target_speed_for_level(level_index),
            paddle,
            balls: vec![ball],
            bricks: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            combo: ComboState::default(),
            effects: ActiveEffects::default(),
            last_clear: None,
        };
        state.init_level();
        state
    }

    /// Number of levels in the active rotation
    pub fn level_total(&self) -> u32 {
        level::level_total(&self.features)
    }

    /// Rebuild bricks for the current level and restart its clock and combo
    pub fn init_level(&mut self) {
        let pattern = level::pattern_for(self.level_index, &self.features);
        self.bricks = level::build_bricks(pattern, WORLD_WIDTH, BuildOptions::from(&self.features));
        self.ball_speed = target_speed_for_level(self.level_index);
        self.level_start_tick = self.time_ticks;
        self.combo.reset();
        log::info!(
            "Level {} built: {} bricks (rotation of {})",
            self.level_index + 1,
            self.bricks.len(),
            self.level_total()
        );
    }

    /// Simulation seconds elapsed
    pub fn elapsed(&self) -> f32 {
        ticks_to_secs(self.time_ticks)
    }

    /// Ticks since the current level started
    pub fn level_ticks(&self) -> u64 {
        self.time_ticks.saturating_sub(self.level_start_tick)
    }

    /// Seconds since the current level started
    pub fn level_elapsed(&self) -> f32 {
        ticks_to_secs(self.level_ticks())
    }

    /// Bricks that still block the level clear
    pub fn destructible_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.counts_for_clear()).count()
    }

    pub fn is_level_clear(&self) -> bool {
        self.destructible_count() == 0
    }

    /// Spawn a ball attached to the paddle
    pub fn spawn_ball_attached(&mut self) {
        self.balls.push(Ball::attached(&self.paddle));
    }

    /// Launch every attached ball. Returns true if any ball was released
    pub fn launch_attached(&mut self) -> bool {
        let speed = self.ball_speed;
        let mut launched = false;
        for ball in self.balls.iter_mut().filter(|b| b.is_attached()) {
            ball.launch(speed);
            launched = true;
        }
        launched
    }

    /// Spawn up to `n` free balls fanning out from the first ball
    ///
    /// Truncated to the remaining headroom under [`MAX_BALLS`]. Returns the
    /// number actually spawned.
    pub fn spawn_extra_balls(&mut self, n: usize) -> usize {
        let to_spawn = n.min(MAX_BALLS.saturating_sub(self.balls.len()));
        let Some(origin) = self.balls.first().map(|b| b.pos) else {
            return 0;
        };
        let spread = (to_spawn as f32 - 1.0) / 2.0;
        for i in 0..to_spawn {
            let angle = LAUNCH_ANGLE + (i as f32 - spread) * 0.3;
            let vel = Vec2::new(angle.cos(), angle.sin()) * self.ball_speed;
            self.balls.push(Ball::free(origin, vel));
        }
        to_spawn
    }

    /// Apply a collected power-up
    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Expand => {
                self.paddle.w = self.paddle.base_w * EXPAND_FACTOR;
                self.effects.expand_until_tick = self
                    .effects
                    .expand_until_tick
                    .max(self.time_ticks + EXPAND_TICKS);
                self.paddle.clamp_to(WORLD_WIDTH);
            }
            PowerUpKind::Multi => {
                if self.features.multiball {
                    self.spawn_extra_balls(MULTI_BALL_COUNT);
                }
            }
        }
    }

    /// Drop the Expand effect immediately
    pub fn reset_effects(&mut self) {
        self.paddle.w = self.paddle.base_w;
        self.effects = ActiveEffects::default();
        self.paddle.clamp_to(WORLD_WIDTH);
    }

    /// Spray cosmetic particles from a point
    pub fn spawn_particles(&mut self, origin: Vec2, count: usize) {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let speed = 60.0 + self.rng.random::<f32>() * 120.0;
            let ttl = 0.4 + self.rng.random::<f32>() * 0.4;
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                age: 0.0,
                ttl,
            });
        }
    }
}
