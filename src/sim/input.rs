//! Input port
//!
//! Folds host keyboard and pointer events into a per-tick paddle intent.
//! Directional keys and pointer tracking are mutually exclusive: a key press
//! drops the pointer target, and pointer tracking only resumes on the next
//! pointer move.

use serde::{Deserialize, Serialize};

use super::tick::{PaddleIntent, TickInput};
use crate::settings::clamp_sensitivity;

/// Logical keys the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Launch,
}

impl Key {
    /// Map a host key name (DOM `KeyboardEvent.key` style) to a logical key
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Space" => Some(Key::Launch),
            _ => None,
        }
    }
}

/// A host input signal, already mapped into world units where relevant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer moved to this world x coordinate
    PointerMove { world_x: f32 },
    /// Pointer click / tap
    Click,
}

/// Accumulated input between ticks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub pointer_x: Option<f32>,
    launch_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(Key::Left) => {
                self.left = true;
                self.pointer_x = None;
            }
            InputEvent::KeyDown(Key::Right) => {
                self.right = true;
                self.pointer_x = None;
            }
            InputEvent::KeyDown(Key::Launch) | InputEvent::Click => {
                self.launch_requested = true;
            }
            InputEvent::KeyUp(Key::Left) => self.left = false,
            InputEvent::KeyUp(Key::Right) => self.right = false,
            InputEvent::KeyUp(Key::Launch) => {}
            InputEvent::PointerMove { world_x } => {
                if world_x.is_finite() {
                    self.pointer_x = Some(world_x);
                }
            }
        }
    }

    /// Produce the input for the next tick, consuming any queued launch
    pub fn next_tick(&mut self, sensitivity: f32) -> TickInput {
        let paddle = if self.left || self.right {
            // Held keys keep the paddle from snapping back to a stale pointer
            self.pointer_x = None;
            let direction = (self.right as i8 - self.left as i8) as f32;
            PaddleIntent::Directional {
                direction,
                sensitivity: clamp_sensitivity(sensitivity),
            }
        } else if let Some(x) = self.pointer_x {
            PaddleIntent::Track { x }
        } else {
            PaddleIntent::Idle
        };

        TickInput {
            paddle,
            launch: std::mem::take(&mut self.launch_requested),
        }
    }

    /// Forget all held keys and pending requests
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
