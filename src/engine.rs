//! Engine facade
//!
//! Owns the simulation state, clock and input port. The host drives it with
//! [`Engine::frame`] from its animation callback, forwards input events, and
//! reads [`Telemetry`] and emitted [`GameEvent`]s back out.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clock::SimClock;
use crate::consts::WORLD_WIDTH;
use crate::error::EngineError;
use crate::settings::{FeatureUpdate, Features, Settings, Skin, clamp_sensitivity};
use crate::sim::input::{InputEvent, InputState, Key};
use crate::sim::scoring::{Medal, MedalThresholds};
use crate::sim::state::{GameState, PowerUp, PowerUpKind};
use crate::sim::tick::{GameEvent, tick};

/// Drawing surface provided by the host
pub trait Surface {
    /// Width of the surface in client pixels, used to map pointer positions
    fn client_width(&self) -> f32;

    /// Draw the post-step state
    fn render(&mut self, state: &GameState, skin: Skin);
}

/// Engine construction options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for power-up drops and particles
    pub seed: u64,
    /// Enables the `debug_*` operations
    pub debug: bool,
    /// 1-based level to start on
    pub start_level: Option<u32>,
}

/// Read-only snapshot of the engine after a rendered frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Telemetry {
    pub ball_count: usize,
    pub first_ball: Option<Vec2>,
    pub brick_count: usize,
    pub paddle_x: f32,
    pub paddle_w: f32,
    pub paused: bool,
    pub level_index: u32,
    pub level_total: u32,
    /// Seconds into the current level (timed mode only)
    pub elapsed: Option<f32>,
    /// Medal the level would earn if cleared now (timed mode only)
    pub medal_now: Option<Medal>,
    pub thresholds: Option<MedalThresholds>,
    pub last_time: Option<f32>,
    pub last_medal: Option<Medal>,
    pub features: Features,
    pub skin: Skin,
    pub paddle_sensitivity: f32,
    pub moving_bricks: bool,
    pub strong_bricks: bool,
}

impl Telemetry {
    fn capture(engine: &Engine) -> Self {
        let state = &engine.state;
        let timed = state.features.timed;
        let elapsed = state.level_elapsed();
        let thresholds = MedalThresholds::for_level(state.level_index);

        Self {
            ball_count: state.balls.len(),
            first_ball: state.balls.first().map(|b| b.pos),
            brick_count: state.bricks.len(),
            paddle_x: state.paddle.x,
            paddle_w: state.paddle.w,
            paused: engine.paused,
            level_index: state.level_index,
            level_total: state.level_total(),
            elapsed: timed.then_some(elapsed),
            medal_now: timed.then(|| thresholds.classify(elapsed)),
            thresholds: timed.then_some(thresholds),
            last_time: state.last_clear.map(|r| r.elapsed),
            last_medal: state.last_clear.map(|r| r.medal),
            features: state.features,
            skin: engine.skin,
            paddle_sensitivity: engine.sensitivity,
            moving_bricks: state.bricks.iter().any(|b| b.motion.is_moving()),
            strong_bricks: state.bricks.iter().any(|b| b.is_strong()),
        }
    }
}

/// The public game engine
pub struct Engine {
    config: EngineConfig,
    state: GameState,
    clock: SimClock,
    input: InputState,
    surface: Option<Box<dyn Surface>>,
    running: bool,
    paused: bool,
    sensitivity: f32,
    skin: Skin,
    telemetry: Option<Telemetry>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let state = GameState::new(config.seed, Features::default(), 0);
        Self {
            config,
            state,
            clock: SimClock::new(),
            input: InputState::new(),
            surface: None,
            running: false,
            paused: false,
            sensitivity: 1.0,
            skin: Skin::Default,
            telemetry: None,
        }
    }

    /// Attach the drawing surface and start the clock
    ///
    /// Fails if the host could not provide a surface; the engine stays stopped.
    pub fn start<S: Surface + 'static>(&mut self, surface: Option<S>) -> Result<(), EngineError> {
        let Some(surface) = surface else {
            log::error!("Engine start failed: no drawing surface");
            return Err(EngineError::SurfaceUnavailable);
        };

        self.surface = Some(Box::new(surface));
        self.clock.reset();
        self.input.clear();
        if let Some(level) = self.config.start_level.filter(|l| *l > 0) {
            self.state.level_index = (level - 1) % self.state.level_total();
        }
        self.state.init_level();
        self.running = true;
        log::info!(
            "Engine started (seed {}, level {})",
            self.config.seed,
            self.state.level_index + 1
        );
        Ok(())
    }

    /// Halt the clock and stop listening for input
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Engine stopped");
        }
        self.running = false;
        self.input.clear();
        self.surface = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::debug!("Paused: {}", paused);
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Merge feature flags and rebuild the current level
    pub fn set_features(&mut self, update: FeatureUpdate) {
        let had_multiball = self.state.features.multiball;
        self.state.features.merge(&update);
        self.state.level_index %= self.state.level_total();
        self.state.init_level();
        log::info!("Features updated: {:?}", self.state.features);

        // Debug sessions get a second ball right away to exercise multiball
        if self.config.debug
            && !had_multiball
            && self.state.features.multiball
            && self.state.balls.len() == 1
        {
            self.state.spawn_extra_balls(1);
        }
    }

    pub fn set_paddle_sensitivity(&mut self, value: f32) {
        let clamped = clamp_sensitivity(value);
        if clamped != value {
            log::warn!("Paddle sensitivity {} clamped to {}", value, clamped);
        }
        self.sensitivity = clamped;
    }

    pub fn paddle_sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Cosmetic only; unknown identifiers fall back to the default skin
    pub fn set_skin(&mut self, id: &str) {
        self.skin = Skin::from_id(id).unwrap_or_else(|| {
            log::warn!("Unknown skin '{}', using default", id);
            Skin::Default
        });
        log::debug!("Skin: {}", self.skin.as_str());
    }

    pub fn skin(&self) -> Skin {
        self.skin
    }

    /// Apply a full settings document
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_paddle_sensitivity(settings.paddle_sensitivity);
        self.skin = settings.skin;
        self.set_features(FeatureUpdate::from(settings.features));
    }

    /// Forward a host input event. Ignored unless the engine is running
    pub fn handle_input(&mut self, event: InputEvent) {
        if self.running {
            self.input.handle(event);
        }
    }

    pub fn key_down(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.handle_input(InputEvent::KeyDown(key));
        }
    }

    pub fn key_up(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.handle_input(InputEvent::KeyUp(key));
        }
    }

    /// Pointer moved to `client_x` pixels from the surface's left edge
    pub fn pointer_move(&mut self, client_x: f32) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let width = surface.client_width();
        if width > 0.0 {
            let world_x = client_x * (WORLD_WIDTH / width);
            self.handle_input(InputEvent::PointerMove { world_x });
        }
    }

    pub fn click(&mut self) {
        self.handle_input(InputEvent::Click);
    }

    /// Host animation callback: step the simulation, render, refresh telemetry
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.running {
            return events;
        }

        let dt = self.clock.frame_delta(now_ms);
        let sensitivity = self.sensitivity;
        self.clock.advance(dt, self.paused, |step| {
            let input = self.input.next_tick(sensitivity);
            events.extend(tick(&mut self.state, &input, step));
        });

        if let Some(surface) = self.surface.as_mut() {
            surface.render(&self.state, self.skin);
        }
        self.telemetry = Some(Telemetry::capture(self));
        events
    }

    /// Snapshot from the most recent frame
    pub fn telemetry(&self) -> Option<&Telemetry> {
        self.telemetry.as_ref()
    }

    /// Read-only view of the simulation
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Debug: remove every brick so the next tick clears the level
    pub fn debug_clear_level(&mut self) {
        if self.config.debug {
            self.state.bricks.clear();
        }
    }

    /// Debug: drop a stationary power-up onto the paddle for instant pickup
    pub fn debug_spawn_power_up(&mut self, kind: PowerUpKind) {
        if self.config.debug {
            let paddle = &self.state.paddle;
            let y = paddle.y + paddle.h / 2.0 - 5.0;
            let powerup = PowerUp::new(kind, paddle.center_x(), y, 0.0);
            self.state.powerups.push(powerup);
        }
    }

    /// Debug: add up to `n` free balls (at least one), capped at the ball limit
    pub fn debug_spawn_extra_balls(&mut self, n: usize) -> usize {
        if self.config.debug {
            self.state.spawn_extra_balls(n.max(1))
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct TestSurface {
        width: f32,
        renders: Rc<Cell<u32>>,
    }

    impl Surface for TestSurface {
        fn client_width(&self) -> f32 {
            self.width
        }

        fn render(&mut self, _state: &GameState, _skin: Skin) {
            self.renders.set(self.renders.get() + 1);
        }
    }

    fn surface(width: f32) -> TestSurface {
        TestSurface {
            width,
            renders: Rc::new(Cell::new(0)),
        }
    }

    fn started(debug: bool) -> Engine {
        let mut engine = Engine::new(EngineConfig {
            seed: 42,
            debug,
            start_level: None,
        });
        engine.start(Some(surface(WORLD_WIDTH))).unwrap();
        engine
    }

    /// Drive frames at 60 Hz starting from `*now`
    fn run_frames(engine: &mut Engine, now: &mut f64, frames: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..frames {
            *now += 1000.0 / 60.0;
            events.extend(engine.frame(*now));
        }
        events
    }

    #[test]
    fn test_start_without_surface_is_fatal() {
        let mut engine = Engine::new(EngineConfig::default());
        let result = engine.start::<TestSurface>(None);
        assert!(matches!(result, Err(EngineError::SurfaceUnavailable)));
        assert!(!engine.is_running());
        assert!(engine.frame(16.0).is_empty());
        assert!(engine.telemetry().is_none());
    }

    #[test]
    fn test_frame_renders_and_publishes_telemetry() {
        let renders = Rc::new(Cell::new(0));
        let mut engine = Engine::new(EngineConfig::default());
        engine
            .start(Some(TestSurface {
                width: WORLD_WIDTH,
                renders: renders.clone(),
            }))
            .unwrap();
        let mut now = 0.0;
        run_frames(&mut engine, &mut now, 3);
        assert_eq!(renders.get(), 3);

        let t = engine.telemetry().unwrap();
        assert_eq!(t.ball_count, 1);
        assert_eq!(t.brick_count, engine.state().bricks.len());
        assert_eq!(t.paddle_x, engine.state().paddle.x);
        assert_eq!(t.first_ball, Some(engine.state().balls[0].pos));
        assert!(t.elapsed.is_none());
        assert!(t.thresholds.is_none());
        assert_eq!(t.level_total, 3);
    }

    #[test]
    fn test_campaign_sets_level_total() {
        let mut engine = started(false);
        engine.set_features(FeatureUpdate {
            campaign: Some(true),
            ..Default::default()
        });
        let mut now = 0.0;
        run_frames(&mut engine, &mut now, 1);
        assert_eq!(engine.telemetry().unwrap().level_total, 10);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut engine = started(false);
        engine.set_features(FeatureUpdate {
            timed: Some(true),
            ..Default::default()
        });
        let mut now = 0.0;
        engine.click();
        run_frames(&mut engine, &mut now, 30);

        engine.set_paused(true);
        run_frames(&mut engine, &mut now, 1);
        let ticks = engine.state().time_ticks;
        let balls = engine.state().balls.clone();
        let paddle = engine.state().paddle.clone();

        engine.key_down("ArrowLeft");
        for _ in 0..200 {
            now += 37.0;
            assert!(engine.frame(now).is_empty());
        }
        assert_eq!(engine.state().time_ticks, ticks);
        assert_eq!(engine.state().balls, balls);
        assert_eq!(engine.state().paddle, paddle);
        assert!(engine.telemetry().unwrap().paused);

        // No catch-up burst on resume
        engine.set_paused(false);
        now += 16.0;
        engine.frame(now);
        assert!(engine.state().time_ticks - ticks <= 2);
    }

    #[test]
    fn test_pointer_maps_to_world_units() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.start(Some(surface(360.0))).unwrap();
        let mut now = 0.0;
        run_frames(&mut engine, &mut now, 1);

        engine.pointer_move(100.0);
        run_frames(&mut engine, &mut now, 2);
        assert_eq!(engine.state().paddle.center_x(), 200.0);

        // A key press takes over from the pointer
        engine.key_down("ArrowRight");
        run_frames(&mut engine, &mut now, 2);
        engine.key_up("ArrowRight");
        let x = engine.state().paddle.x;
        run_frames(&mut engine, &mut now, 2);
        assert_eq!(engine.state().paddle.x, x);
        assert!(engine.state().paddle.center_x() > 200.0);
    }

    #[test]
    fn test_sensitivity_and_skin_are_clamped() {
        let mut engine = started(false);
        engine.set_paddle_sensitivity(0.01);
        assert_eq!(engine.paddle_sensitivity(), MIN_SENSITIVITY);
        engine.set_paddle_sensitivity(7.0);
        assert_eq!(engine.paddle_sensitivity(), MAX_SENSITIVITY);

        engine.set_skin("eco");
        assert_eq!(engine.skin(), Skin::Eco);
        engine.set_skin("plasma");
        assert_eq!(engine.skin(), Skin::Default);
    }

    #[test]
    fn test_stop_releases_input() {
        let mut engine = started(false);
        engine.stop();
        assert!(!engine.is_running());
        engine.click();
        engine.key_down("ArrowLeft");
        assert!(engine.frame(100.0).is_empty());
        assert_eq!(engine.state().balls[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_debug_ops_are_noops_outside_debug() {
        let mut engine = started(false);
        let bricks = engine.state().bricks.len();
        engine.debug_clear_level();
        engine.debug_spawn_power_up(PowerUpKind::Expand);
        assert_eq!(engine.debug_spawn_extra_balls(3), 0);
        assert_eq!(engine.state().bricks.len(), bricks);
        assert!(engine.state().powerups.is_empty());
        assert_eq!(engine.state().balls.len(), 1);
    }

    #[test]
    fn test_debug_power_up_and_balls() {
        let mut engine = started(true);
        engine.debug_spawn_power_up(PowerUpKind::Expand);
        let mut now = 0.0;
        let events = run_frames(&mut engine, &mut now, 3);
        assert!(events.contains(&GameEvent::PowerUpCollected(PowerUpKind::Expand)));
        assert_eq!(engine.telemetry().unwrap().paddle_w, PADDLE_WIDTH * EXPAND_FACTOR);

        assert_eq!(engine.debug_spawn_extra_balls(0), 1);
        assert_eq!(engine.debug_spawn_extra_balls(10), MAX_BALLS - 2);
        assert_eq!(engine.state().balls.len(), MAX_BALLS);
    }

    #[test]
    fn test_debug_multiball_toggle_adds_ball() {
        let mut engine = started(true);
        engine.set_features(FeatureUpdate {
            multiball: Some(true),
            ..Default::default()
        });
        assert_eq!(engine.state().balls.len(), 2);
    }

    #[test]
    fn test_start_level_override() {
        let mut engine = Engine::new(EngineConfig {
            seed: 1,
            debug: false,
            start_level: Some(3),
        });
        engine.start(Some(surface(WORLD_WIDTH))).unwrap();
        assert_eq!(engine.state().level_index, 2);
        assert_eq!(engine.state().ball_speed, 340.0);
    }

    #[test]
    fn test_timed_level_clear_end_to_end() {
        let mut engine = started(true);
        engine.set_features(FeatureUpdate {
            campaign: Some(true),
            timed: Some(true),
            ..Default::default()
        });
        let mut now = 0.0;
        for _ in 0..4000 {
            run_frames(&mut engine, &mut now, 1);
            if engine.telemetry().and_then(|t| t.elapsed).unwrap_or(0.0) >= 50.0 {
                break;
            }
        }
        let t = engine.telemetry().unwrap();
        assert_eq!(t.medal_now, Some(Medal::Silver));
        assert_eq!(t.thresholds.map(|th| th.gold), Some(45.0));

        engine.debug_clear_level();
        let events = run_frames(&mut engine, &mut now, 2);
        assert!(events.contains(&GameEvent::ScoreDelta(200)));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::LevelCleared {
                level: 0,
                medal: Some(Medal::Silver),
                ..
            }
        )));

        let t = engine.telemetry().unwrap();
        assert_eq!(t.last_medal, Some(Medal::Silver));
        assert!(t.last_time.unwrap() >= 50.0);
        assert_eq!(t.level_index, 1);
        assert!(t.brick_count > 0);
        assert_eq!(t.medal_now, Some(Medal::Gold));
    }

    #[test]
    fn test_apply_settings() {
        let mut engine = started(false);
        let settings = Settings::from_json(
            r#"{"features":{"campaign":true,"strong_bricks":false},"paddle_sensitivity":2.0,"skin":"eco"}"#,
        )
        .unwrap();
        engine.apply_settings(&settings);
        assert_eq!(engine.paddle_sensitivity(), 2.0);
        assert_eq!(engine.skin(), Skin::Eco);
        assert!(engine.state().features.campaign);
        assert!(!engine.state().features.strong_bricks);
        assert!(engine.state().bricks.iter().all(|b| !b.is_strong()));
    }

    #[test]
    fn test_telemetry_serializes() {
        let mut engine = started(false);
        let mut now = 0.0;
        run_frames(&mut engine, &mut now, 1);
        let json = serde_json::to_string(engine.telemetry().unwrap()).unwrap();
        assert!(json.contains("\"ball_count\":1"));
        assert!(json.contains("\"skin\":\"default\""));
    }
}
