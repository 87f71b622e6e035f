//! Fixed timestep simulation tick
//!
//! Core update that advances the simulation deterministically. Stage order is
//! fixed: paddle, balls, life loss, paddle bounce, bricks, power-ups, effect
//! expiry, speed normalization, particles, level clear.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{intersect_aabb, reflect_velocity, resolve_ball_rect_normal};
use super::scoring::{Medal, compute_medal};
use super::state::{GameState, LevelResult, PowerUp, PowerUpKind};
use crate::consts::*;

/// How the paddle should move this tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PaddleIntent {
    #[default]
    Idle,
    /// Keyboard control: `direction` in {-1, 0, 1}, speed scaled by `sensitivity`
    Directional { direction: f32, sensitivity: f32 },
    /// Pointer control: center the paddle on world x
    Track { x: f32 },
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub paddle: PaddleIntent,
    /// Release any attached ball (click/tap/space)
    pub launch: bool,
}

/// Something the surrounding application may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A ball fell out of the bottom of the world
    BallLost,
    /// The last ball was lost
    LifeLost,
    BrickHit { destroyed: bool },
    PowerUpCollected(PowerUpKind),
    /// Points to add to the score (never negative)
    ScoreDelta(u32),
    /// `elapsed` and `medal` are only present under timed mode
    LevelCleared {
        level: u32,
        elapsed: Option<f32>,
        medal: Option<Medal>,
    },
}

/// Particles sprayed per brick hit
const HIT_PARTICLES: usize = 10;
/// How far a ball is pushed out of a brick along the contact normal
const BRICK_NUDGE: f32 = 0.8;
/// Downward acceleration on particles
const PARTICLE_GRAVITY: f32 = 50.0;
/// Power-ups are discarded once this far below the world
const POWERUP_DESPAWN_MARGIN: f32 = 40.0;

/// Advance the game state by one fixed timestep
///
/// Each call counts as exactly one tick of simulation time; `dt` is the
/// integration step and is expected to be [`SIM_DT`].
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    state.time_ticks += 1;
    state.combo.decay(dt);

    if input.launch {
        state.launch_attached();
    }

    update_paddle(state, input.paddle, dt);
    update_balls(state, dt, &mut events);

    if state.balls.is_empty() {
        log::info!("Life lost on level {}", state.level_index + 1);
        events.push(GameEvent::LifeLost);
        state.reset_effects();
        state.spawn_ball_attached();
    }

    paddle_collisions(state);
    brick_collisions(state, &mut events);
    update_powerups(state, dt, &mut events);

    // Expand wears off exactly at its deadline
    if state.time_ticks >= state.effects.expand_until_tick {
        state.paddle.w = state.paddle.base_w;
    }

    // Direction comes from physics, magnitude from the level
    let speed = state.ball_speed;
    for ball in state.balls.iter_mut().filter(|b| !b.is_attached()) {
        if ball.vel.length_squared() > 0.0 {
            ball.vel = ball.vel.normalize() * speed;
        }
    }

    update_particles(state, dt);

    if state.is_level_clear() {
        clear_level(state, &mut events);
    }

    events
}

fn update_paddle(state: &mut GameState, intent: PaddleIntent, dt: f32) {
    let paddle = &mut state.paddle;
    match intent {
        PaddleIntent::Idle => {}
        PaddleIntent::Directional {
            direction,
            sensitivity,
        } => {
            paddle.x += direction * paddle.speed * sensitivity * dt;
        }
        PaddleIntent::Track { x } => {
            paddle.x = x - paddle.w / 2.0;
        }
    }
    paddle.clamp_to(WORLD_WIDTH);
}

fn update_balls(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    let paddle = &state.paddle;
    for ball in state.balls.iter_mut() {
        if ball.is_attached() {
            ball.update_attached(paddle);
            continue;
        }

        ball.pos += ball.vel * dt;

        if ball.pos.x - ball.radius < 0.0 {
            ball.pos.x = ball.radius;
            ball.vel.x = ball.vel.x.abs();
        } else if ball.pos.x + ball.radius > WORLD_WIDTH {
            ball.pos.x = WORLD_WIDTH - ball.radius;
            ball.vel.x = -ball.vel.x.abs();
        }
        if ball.pos.y - ball.radius < 0.0 {
            ball.pos.y = ball.radius;
            ball.vel.y = ball.vel.y.abs();
        }
    }

    let before = state.balls.len();
    state
        .balls
        .retain(|ball| ball.pos.y - ball.radius <= WORLD_HEIGHT);
    for _ in state.balls.len()..before {
        events.push(GameEvent::BallLost);
    }
}

/// Bounce balls off the paddle, steering by where they land on it
fn paddle_collisions(state: &mut GameState) {
    let paddle_rect = state.paddle.rect();
    let center_x = state.paddle.center_x();
    let half_w = state.paddle.w / 2.0;

    for ball in state.balls.iter_mut().filter(|b| !b.is_attached()) {
        let Some(normal) = resolve_ball_rect_normal(ball.pos, ball.radius, &paddle_rect) else {
            continue;
        };

        let speed = reflect_velocity(ball.vel, normal).length();
        let offset = ((ball.pos.x - center_x) / half_w).clamp(-1.0, 1.0);
        let angle = -std::f32::consts::FRAC_PI_2 + offset * PADDLE_MAX_DEFLECT;
        ball.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
        ball.pos.y = paddle_rect.y - ball.radius - 0.1;
    }
}

/// At most one brick per ball per tick, first overlapping brick in list order
fn brick_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let t = state.elapsed();

    for bi in 0..state.balls.len() {
        let ball = &state.balls[bi];
        if ball.is_attached() {
            continue;
        }
        let (pos, radius) = (ball.pos, ball.radius);

        let hit = state.bricks.iter().enumerate().find_map(|(i, brick)| {
            let rect = brick.rect_at(t);
            resolve_ball_rect_normal(pos, radius, &rect).map(|n| (i, rect, n))
        });
        let Some((index, rect, normal)) = hit else {
            continue;
        };

        let ball = &mut state.balls[bi];
        ball.vel = reflect_velocity(ball.vel, normal);
        ball.pos += normal * BRICK_NUDGE;

        let center = rect.center();
        state.spawn_particles(center, HIT_PARTICLES);

        let points = state.combo.register_hit(BRICK_SCORE);
        events.push(GameEvent::ScoreDelta(points));

        let destroyed = state.bricks[index].take_hit();
        if destroyed {
            state.bricks.remove(index);
            if state.rng.random_bool(POWERUP_DROP_CHANCE) {
                let kind = if state.features.multiball && state.rng.random_bool(0.5) {
                    PowerUpKind::Multi
                } else {
                    PowerUpKind::Expand
                };
                log::debug!("Power-up {:?} dropped at ({:.0}, {:.0})", kind, center.x, center.y);
                state
                    .powerups
                    .push(PowerUp::new(kind, center.x, center.y, POWERUP_FALL_SPEED));
            }
        }
        events.push(GameEvent::BrickHit { destroyed });
    }
}

fn update_powerups(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    let paddle_rect = state.paddle.rect();
    let mut collected: Vec<PowerUpKind> = Vec::new();

    state.powerups.retain_mut(|powerup| {
        powerup.y += powerup.fall_speed * dt;
        if intersect_aabb(&paddle_rect, &powerup.rect()) {
            collected.push(powerup.kind);
            false
        } else {
            powerup.y <= WORLD_HEIGHT + POWERUP_DESPAWN_MARGIN
        }
    });

    for kind in collected {
        log::debug!("Power-up {:?} collected", kind);
        state.apply_power_up(kind);
        events.push(GameEvent::PowerUpCollected(kind));
    }
}

fn update_particles(state: &mut GameState, dt: f32) {
    state.particles.retain_mut(|particle| {
        particle.pos += particle.vel * dt;
        particle.vel.y += PARTICLE_GRAVITY * dt;
        particle.age += dt;
        particle.age < particle.ttl
    });
}

/// Grade the clear (timed mode), then move to the next level in the rotation
fn clear_level(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let level = state.level_index;
    let (elapsed, medal) = if state.features.timed {
        let elapsed = state.level_elapsed();
        let medal = compute_medal(elapsed, level);
        state.last_clear = Some(LevelResult {
            level,
            elapsed,
            medal,
        });
        let bonus = medal.bonus();
        if bonus > 0 {
            events.push(GameEvent::ScoreDelta(bonus));
        }
        log::info!(
            "Level {} cleared in {:.2}s ({})",
            level + 1,
            elapsed,
            medal.as_str()
        );
        (Some(elapsed), Some(medal))
    } else {
        log::info!("Level {} cleared", level + 1);
        (None, None)
    };

    events.push(GameEvent::LevelCleared {
        level,
        elapsed,
        medal,
    });

    state.level_index = (level + 1) % state.level_total();
    state.init_level();
}
