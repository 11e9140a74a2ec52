//! Frame, rule and player configuration.
//!
//! All structs deserialize from partial JSON: missing fields take their
//! default values.

use serde::{Deserialize, Serialize};
use tilehop_physics::config::PhysicsConfig;

use crate::EngineError;

/// Player body dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 48.0,
        }
    }
}

/// Tuning for the entity interaction rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Fraction of an enemy's height, measured from its top, that counts as
    /// the stomp band.
    pub stomp_band: f64,
    /// Fraction of the jump impulse given as a bounce after a stomp.
    pub stomp_bounce: f64,
    /// Horizontal knockback speed when hurt.
    pub knockback_speed: f64,
    /// Fraction of the jump impulse given as a bounce when hurt.
    pub knockback_bounce: f64,
    /// Horizontal padding around the flag trigger region.
    pub flag_padding: f64,
    /// Decorative enemy phase advance, radians per second.
    pub enemy_phase_rate: f64,
    /// Win overlay fade-in rate, per second.
    pub win_fade_rate: f64,
    /// Grounded horizontal speed above which the player counts as running.
    pub run_threshold: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            stomp_band: 0.3,
            stomp_bounce: 0.6,
            knockback_speed: 4.0,
            knockback_bounce: 0.5,
            flag_padding: 8.0,
            enemy_phase_rate: 5.0,
            win_fade_rate: 2.0,
            run_threshold: 0.8,
        }
    }
}

/// Top-level configuration for a [`Simulation`](crate::frame::Simulation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Longest elapsed time, in seconds, a single frame may simulate.
    pub max_frame: f64,
    /// Visible width used for the camera clamp.
    pub viewport_width: f64,
    pub physics: PhysicsConfig,
    pub rules: RulesConfig,
    pub player: PlayerConfig,
}

impl Default for FrameConfig {
    /// 100 ms frame clamp and a 960-unit viewport.
    fn default() -> Self {
        Self {
            max_frame: 0.1,
            viewport_width: 960.0,
            physics: PhysicsConfig::default(),
            rules: RulesConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

impl FrameConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: FrameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate this config and the nested physics config.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.physics.validate()?;

        let rules = &self.rules;
        let checks: [(&'static str, f64, bool, &'static str); 12] = [
            ("max_frame", self.max_frame, self.max_frame > 0.0, "must be positive"),
            (
                "viewport_width",
                self.viewport_width,
                self.viewport_width > 0.0,
                "must be positive",
            ),
            (
                "rules.stomp_band",
                rules.stomp_band,
                (0.0..=1.0).contains(&rules.stomp_band),
                "must be in [0, 1]",
            ),
            (
                "rules.stomp_bounce",
                rules.stomp_bounce,
                rules.stomp_bounce >= 0.0,
                "must be non-negative",
            ),
            (
                "rules.knockback_speed",
                rules.knockback_speed,
                rules.knockback_speed >= 0.0,
                "must be non-negative",
            ),
            (
                "rules.knockback_bounce",
                rules.knockback_bounce,
                rules.knockback_bounce >= 0.0,
                "must be non-negative",
            ),
            (
                "rules.flag_padding",
                rules.flag_padding,
                rules.flag_padding >= 0.0,
                "must be non-negative",
            ),
            (
                "rules.enemy_phase_rate",
                rules.enemy_phase_rate,
                true,
                "must be finite",
            ),
            (
                "rules.win_fade_rate",
                rules.win_fade_rate,
                rules.win_fade_rate > 0.0,
                "must be positive",
            ),
            (
                "rules.run_threshold",
                rules.run_threshold,
                rules.run_threshold >= 0.0,
                "must be non-negative",
            ),
            (
                "player.width",
                self.player.width,
                self.player.width > 0.0,
                "must be positive",
            ),
            (
                "player.height",
                self.player.height,
                self.player.height > 0.0,
                "must be positive",
            ),
        ];

        for (field, value, ok, reason) in checks {
            if !(value.is_finite() && ok) {
                return Err(EngineError::InvalidConfig {
                    field,
                    value,
                    reason,
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = FrameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_frame, 0.1);
        assert_eq!(config.rules.stomp_band, 0.3);
    }

    #[test]
    fn empty_json_is_default() {
        let config = FrameConfig::from_json_str("{}").unwrap();
        assert_eq!(config, FrameConfig::default());
    }

    #[test]
    fn partial_nested_json_overrides_one_field() {
        let json = r#"{"physics": {"gravity": 1.2}, "rules": {"flag_padding": 0}}"#;
        let config = FrameConfig::from_json_str(json).unwrap();
        assert_eq!(config.physics.gravity, 1.2);
        assert_eq!(config.physics.max_speed, 6.0);
        assert_eq!(config.rules.flag_padding, 0.0);
        assert_eq!(config.rules.stomp_bounce, 0.6);
    }

    #[test]
    fn invalid_physics_is_reported() {
        let err =
            FrameConfig::from_json_str(r#"{"physics": {"reference_frame": -1}}"#).unwrap_err();
        assert!(matches!(err, EngineError::Physics(_)));
    }

    #[test]
    fn invalid_rule_is_reported() {
        let err = FrameConfig::from_json_str(r#"{"rules": {"stomp_band": 2.0}}"#).unwrap_err();
        match err {
            EngineError::InvalidConfig { field, .. } => assert_eq!(field, "rules.stomp_band"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = FrameConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }

    #[test]
    fn zero_max_frame_rejected() {
        let config = FrameConfig {
            max_frame: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
