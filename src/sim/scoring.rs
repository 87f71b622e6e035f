//! Combo and medal scoring rules
//!
//! Medals grade how quickly a level was cleared under timed mode. Thresholds
//! loosen as the level index grows.

use serde::{Deserialize, Serialize};

use crate::consts::COMBO_WINDOW;

/// Timed-completion grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
    #[default]
    None,
}

impl Medal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Medal::Gold => "gold",
            Medal::Silver => "silver",
            Medal::Bronze => "bronze",
            Medal::None => "none",
        }
    }

    /// Score awarded on top of brick points for clearing with this medal
    pub fn bonus(&self) -> u32 {
        match self {
            Medal::Gold => 300,
            Medal::Silver => 200,
            Medal::Bronze => 100,
            Medal::None => 0,
        }
    }
}

/// Medal time limits in seconds for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MedalThresholds {
    pub gold: f32,
    pub silver: f32,
    pub bronze: f32,
}

impl MedalThresholds {
    /// Thresholds for a 0-based level index
    pub fn for_level(level_index: u32) -> Self {
        let li = level_index as f32;
        Self {
            gold: 45.0 + 3.0 * li,
            silver: 75.0 + 5.0 * li,
            bronze: 120.0 + 8.0 * li,
        }
    }

    /// Grade an elapsed clear time against these thresholds
    pub fn classify(&self, time_sec: f32) -> Medal {
        if time_sec <= self.gold {
            Medal::Gold
        } else if time_sec <= self.silver {
            Medal::Silver
        } else if time_sec <= self.bronze {
            Medal::Bronze
        } else {
            Medal::None
        }
    }
}

/// Medal earned for clearing `level_index` in `time_sec` seconds
pub fn compute_medal(time_sec: f32, level_index: u32) -> Medal {
    MedalThresholds::for_level(level_index).classify(time_sec)
}

/// Bonus points for the `count`-th consecutive hit (0 for the first, +20 per extra)
pub fn combo_bonus(count: u32) -> u32 {
    if count <= 1 { 0 } else { (count - 1) * 20 }
}

/// Hit streak tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub streak: u32,
    /// Seconds left before the streak resets on the next hit
    pub decay_timer: f32,
}

impl ComboState {
    /// Count down the decay window
    pub fn decay(&mut self, dt: f32) {
        if self.decay_timer > 0.0 {
            self.decay_timer -= dt;
        }
    }

    /// Register a brick hit and return the points it is worth
    pub fn register_hit(&mut self, base: u32) -> u32 {
        if self.decay_timer > 0.0 {
            self.streak += 1;
        } else {
            self.streak = 1;
        }
        self.decay_timer = COMBO_WINDOW;
        base + combo_bonus(self.streak)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
