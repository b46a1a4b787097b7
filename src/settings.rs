//! Game balance configuration
//!
//! Every tunable of the simulation lives in [`GameConfig`]. Defaults match the
//! shipped browser game; a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be finite")]
    NotFinite { field: &'static str },
    #[error("`{field}` must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("`collectible_probability` must be within [0, 1] (got {0})")]
    Probability(f64),
    #[error("gap floor {min} exceeds initial gap {initial}")]
    GapFloor { min: f64, initial: f64 },
    #[error("speed ceiling {max} is below initial speed {initial}")]
    SpeedCeiling { max: f64, initial: f64 },
    #[error("`difficulty_step_score` must be at least 1")]
    DifficultyStep,
    #[error("`countdown_seconds` must be at least 1")]
    Countdown,
}

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Fixed horizontal anchor of the player (one third of the width)
    pub fn player_anchor_x(&self) -> f64 {
        self.width / 3.0
    }
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Physics ===
    pub gravity: f64,
    pub jump_velocity: f64,
    pub player_size: f64,
    pub collision_padding: f64,
    pub frame_baseline_ms: f64,
    pub max_frame_step: f64,

    // === Obstacles ===
    pub obstacle_width: f64,
    pub gap_size: f64,
    pub gap_size_min: f64,
    pub gap_margin: f64,
    pub spawn_interval_ms: f64,
    pub ground_height: f64,

    // === Scroll ===
    pub scroll_speed: f64,
    pub scroll_speed_max: f64,

    // === Collectibles ===
    pub collectible_size: f64,
    pub collectible_probability: f64,
    pub collectible_jitter: f64,

    // === Difficulty ramp ===
    pub difficulty_step_score: u32,
    pub gap_decrement: f64,
    pub speed_increment: f64,

    // === Session ===
    pub countdown_seconds: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            player_size: PLAYER_SIZE,
            collision_padding: COLLISION_PADDING,
            frame_baseline_ms: FRAME_BASELINE_MS,
            max_frame_step: MAX_FRAME_STEP,

            obstacle_width: OBSTACLE_WIDTH,
            gap_size: GAP_SIZE,
            gap_size_min: GAP_SIZE_MIN,
            gap_margin: GAP_MARGIN,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            ground_height: GROUND_HEIGHT,

            scroll_speed: SCROLL_SPEED,
            scroll_speed_max: SCROLL_SPEED_MAX,

            collectible_size: COLLECTIBLE_SIZE,
            collectible_probability: COLLECTIBLE_PROBABILITY,
            collectible_jitter: COLLECTIBLE_JITTER,

            difficulty_step_score: DIFFICULTY_STEP_SCORE,
            gap_decrement: GAP_DECREMENT,
            speed_increment: SPEED_INCREMENT,

            countdown_seconds: COUNTDOWN_SECONDS,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON override document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("collision_padding", self.collision_padding),
            ("gap_margin", self.gap_margin),
            ("ground_height", self.ground_height),
            ("collectible_jitter", self.collectible_jitter),
            ("gap_decrement", self.gap_decrement),
            ("speed_increment", self.speed_increment),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }

        let positive = [
            ("player_size", self.player_size),
            ("frame_baseline_ms", self.frame_baseline_ms),
            ("max_frame_step", self.max_frame_step),
            ("obstacle_width", self.obstacle_width),
            ("gap_size", self.gap_size),
            ("gap_size_min", self.gap_size_min),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("scroll_speed", self.scroll_speed),
            ("scroll_speed_max", self.scroll_speed_max),
            ("collectible_size", self.collectible_size),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if !(0.0..=1.0).contains(&self.collectible_probability) {
            return Err(ConfigError::Probability(self.collectible_probability));
        }
        if self.gap_size_min > self.gap_size {
            return Err(ConfigError::GapFloor {
                min: self.gap_size_min,
                initial: self.gap_size,
            });
        }
        if self.scroll_speed_max < self.scroll_speed {
            return Err(ConfigError::SpeedCeiling {
                max: self.scroll_speed_max,
                initial: self.scroll_speed,
            });
        }
        if self.difficulty_step_score == 0 {
            return Err(ConfigError::DifficultyStep);
        }
        if self.countdown_seconds == 0 {
            return Err(ConfigError::Countdown);
        }
        Ok(())
    }

    /// Vertical range `gapY` is drawn from, or `None` when the viewport is
    /// too short to fit the margins plus a gap of `gap_size`.
    pub fn playable_gap_range(&self, viewport: Viewport, gap_size: f64) -> Option<(f64, f64)> {
        let min = self.gap_margin;
        let max = viewport.height - self.ground_height - gap_size - self.gap_margin;
        (max >= min).then_some((min, max))
    }

    /// Y coordinate of the top of the ground
    pub fn ground_line(&self, viewport: Viewport) -> f64 {
        viewport.height - self.ground_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "gravity": 0.4, "spawn_interval_ms": 1200 }"#).unwrap();
        assert_eq!(config.gravity, 0.4);
        assert_eq!(config.spawn_interval_ms, 1200.0);
        assert_eq!(config.gap_size, GAP_SIZE);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "collectible_probability": 1.5 }"#),
            Err(ConfigError::Probability(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "gap_size_min": 200 }"#),
            Err(ConfigError::GapFloor { .. })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "scroll_speed_max": 2 }"#),
            Err(ConfigError::SpeedCeiling { .. })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "spawn_interval_ms": 0 }"#),
            Err(ConfigError::NotPositive { field: "spawn_interval_ms", .. })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "difficulty_step_score": 0 }"#),
            Err(ConfigError::DifficultyStep)
        ));
        assert!(matches!(GameConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_playable_gap_range() {
        let config = GameConfig::default();
        assert_eq!(
            config.playable_gap_range(Viewport::new(400.0, 600.0), 180.0),
            Some((100.0, 220.0))
        );
        // 100 + 100 + 180 + 100 = 480 is the shortest usable height
        assert_eq!(
            config.playable_gap_range(Viewport::new(400.0, 480.0), 180.0),
            Some((100.0, 100.0))
        );
        assert_eq!(config.playable_gap_range(Viewport::new(400.0, 479.0), 180.0), None);
    }

    #[test]
    fn test_player_anchor() {
        let viewport = Viewport::new(400.0, 600.0);
        assert!((viewport.player_anchor_x() - 133.333).abs() < 0.001);
    }
}
