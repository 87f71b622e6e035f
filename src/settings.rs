//! Gameplay settings fed in by the host application
//!
//! The engine only consumes these; persisting them is the host's job. JSON is
//! the interchange format.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SENSITIVITY, MIN_SENSITIVITY};
use crate::error::EngineError;

/// Visual skin. Cosmetic only, never read by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    #[default]
    Default,
    Eco,
}

impl Skin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Skin::Default => "default",
            Skin::Eco => "eco",
        }
    }

    /// Parse a skin identifier, ignoring case
    pub fn from_id(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(Skin::Default),
            "eco" => Some(Skin::Eco),
            _ => None,
        }
    }
}

/// Gameplay toggles. Changing any of them rebuilds the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Ten-level campaign instead of the three-level quick rotation
    pub campaign: bool,
    /// Time each level and award medals on clear
    pub timed: bool,
    /// Allow multi-ball power-ups
    pub multiball: bool,
    /// Codes 2/3 produce multi-hit bricks
    pub strong_bricks: bool,
    /// Codes 5/6/7 produce sliding bricks
    pub moving_bricks: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            campaign: false,
            timed: false,
            multiball: false,
            strong_bricks: true,
            moving_bricks: true,
        }
    }
}

impl Features {
    /// Merge a partial update into these flags
    pub fn merge(&mut self, update: &FeatureUpdate) {
        if let Some(v) = update.campaign {
            self.campaign = v;
        }
        if let Some(v) = update.timed {
            self.timed = v;
        }
        if let Some(v) = update.multiball {
            self.multiball = v;
        }
        if let Some(v) = update.strong_bricks {
            self.strong_bricks = v;
        }
        if let Some(v) = update.moving_bricks {
            self.moving_bricks = v;
        }
    }
}

/// Partial feature update; `None` fields keep their current value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureUpdate {
    pub campaign: Option<bool>,
    pub timed: Option<bool>,
    pub multiball: Option<bool>,
    pub strong_bricks: Option<bool>,
    pub moving_bricks: Option<bool>,
}

impl From<Features> for FeatureUpdate {
    fn from(f: Features) -> Self {
        Self {
            campaign: Some(f.campaign),
            timed: Some(f.timed),
            multiball: Some(f.multiball),
            strong_bricks: Some(f.strong_bricks),
            moving_bricks: Some(f.moving_bricks),
        }
    }
}

/// Clamp a paddle sensitivity multiplier into its supported range
pub fn clamp_sensitivity(value: f32) -> f32 {
    if value.is_nan() {
        return 1.0;
    }
    value.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
}

/// Everything the host configures on the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub features: Features,
    /// Multiplier on keyboard paddle speed (0.2 - 3.0)
    pub paddle_sensitivity: f32,
    pub skin: Skin,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            features: Features::default(),
            paddle_sensitivity: 1.0,
            skin: Skin::Default,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Copy with out-of-range values clamped
    pub fn sanitized(mut self) -> Self {
        self.paddle_sensitivity = clamp_sensitivity(self.paddle_sensitivity);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skin_from_id() {
        assert_eq!(Skin::from_id("ECO"), Some(Skin::Eco));
        assert_eq!(Skin::from_id("default"), Some(Skin::Default));
        assert_eq!(Skin::from_id("neon"), None);
        assert_eq!(Skin::from_id(Skin::Eco.as_str()), Some(Skin::Eco));
    }

    #[test]
    fn test_merge_partial_update() {
        let mut features = Features::default();
        features.merge(&FeatureUpdate {
            campaign: Some(true),
            strong_bricks: Some(false),
            ..Default::default()
        });
        assert!(features.campaign);
        assert!(!features.strong_bricks);
        assert!(features.moving_bricks);
        assert!(!features.timed);
    }

    #[test]
    fn test_clamp_sensitivity() {
        assert_eq!(clamp_sensitivity(0.0), 0.2);
        assert_eq!(clamp_sensitivity(10.0), 3.0);
        assert_eq!(clamp_sensitivity(1.5), 1.5);
        assert_eq!(clamp_sensitivity(f32::NAN), 1.0);
    }

    #[test]
    fn test_settings_json() {
        let settings = Settings::from_json(
            r#"{"features":{"campaign":true,"timed":true},"paddle_sensitivity":9.0,"skin":"eco"}"#,
        )
        .unwrap();
        assert!(settings.features.campaign);
        assert!(settings.features.timed);
        assert!(settings.features.strong_bricks);
        assert_eq!(settings.paddle_sensitivity, 3.0);
        assert_eq!(settings.skin, Skin::Eco);

        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_settings_json_rejects_garbage() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(EngineError::Settings(_))
        ));
    }
}
