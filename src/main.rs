//! Brickfall headless driver
//!
//! Runs the engine against a null surface with a scripted pointer sweep and
//! prints the final telemetry as JSON.
//!
//! Usage: `brickfall [seed] [frames]`

use brickfall::engine::{Engine, EngineConfig, Surface};
use brickfall::settings::{FeatureUpdate, Skin};
use brickfall::sim::{GameEvent, GameState};

/// Surface that draws nothing
struct NullSurface {
    width: f32,
}

impl Surface for NullSurface {
    fn client_width(&self) -> f32 {
        self.width
    }

    fn render(&mut self, state: &GameState, _skin: Skin) {
        log::trace!("{} balls, {} bricks", state.balls.len(), state.bricks.len());
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345u64);
    let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(3600u32);
    log::info!("Brickfall (headless) starting: seed {}, {} frames", seed, frames);

    let mut engine = Engine::new(EngineConfig {
        seed,
        ..Default::default()
    });
    let surface = NullSurface { width: 360.0 };
    if let Err(e) = engine.start(Some(surface)) {
        eprintln!("Failed to start engine: {e}");
        std::process::exit(1);
    }
    engine.set_features(FeatureUpdate {
        timed: Some(true),
        multiball: Some(true),
        ..Default::default()
    });

    let mut score: u64 = 0;
    let mut now = 0.0f64;
    for frame in 0..frames {
        now += 1000.0 / 60.0;

        // Sweep the pointer across the surface and relaunch every few seconds
        let sweep = (frame as f32 * 0.02).sin() * 0.5 + 0.5;
        engine.pointer_move(sweep * 360.0);
        if frame % 180 == 0 {
            engine.click();
        }

        for event in engine.frame(now) {
            match event {
                GameEvent::ScoreDelta(points) => score += u64::from(points),
                GameEvent::LevelCleared { level, elapsed, medal } => {
                    log::info!("Cleared level {} ({:?}, {:?})", level + 1, elapsed, medal);
                }
                GameEvent::LifeLost => log::info!("Life lost at frame {}", frame),
                _ => {}
            }
        }
    }

    println!("Score: {score}");
    match engine.telemetry().map(serde_json::to_string_pretty) {
        Some(Ok(json)) => println!("{json}"),
        Some(Err(e)) => eprintln!("Failed to serialize telemetry: {e}"),
        None => eprintln!("No telemetry captured"),
    }
    engine.stop();
}
