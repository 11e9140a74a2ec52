//! Physics tuning.
//!
//! Every constant is expressed "per reference frame": gravity is the velocity
//! gained during one reference frame, friction is the multiplier applied over
//! one reference frame, and so on. The integrator scales them by the
//! `timeScale` of each step.

use serde::{Deserialize, Serialize};

use crate::PhysicsError;

/// Tuning constants for the kinematics integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Reference frame duration in seconds. Must be positive and finite.
    pub reference_frame: f64,
    /// Downward velocity gained per reference frame.
    pub gravity: f64,
    /// Horizontal velocity multiplier per reference frame while grounded.
    pub ground_friction: f64,
    /// Horizontal velocity multiplier per reference frame while airborne.
    pub air_friction: f64,
    /// Horizontal speeds below this magnitude snap to exactly zero.
    pub stop_threshold: f64,
    /// Horizontal velocity gained per reference frame while input is held.
    pub acceleration: f64,
    /// Cap on the horizontal speed applied to position.
    pub max_speed: f64,
    /// Vertical velocity set on jump. Negative is upward.
    pub jump_impulse: f64,
    /// Cap on downward vertical velocity.
    pub max_fall_speed: f64,
}

impl Default for PhysicsConfig {
    /// 60 Hz reference frame with the stock platformer feel.
    fn default() -> Self {
        Self {
            reference_frame: 1.0 / 60.0,
            gravity: 0.6,
            ground_friction: 0.8,
            air_friction: 0.94,
            stop_threshold: 0.05,
            acceleration: 0.8,
            max_speed: 6.0,
            jump_impulse: -12.0,
            max_fall_speed: 20.0,
        }
    }
}

impl PhysicsConfig {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        fn check(
            field: &'static str,
            value: f64,
            ok: bool,
            reason: &'static str,
        ) -> Result<(), PhysicsError> {
            if value.is_finite() && ok {
                Ok(())
            } else {
                Err(PhysicsError::InvalidConfig {
                    field,
                    value,
                    reason,
                })
            }
        }

        check(
            "reference_frame",
            self.reference_frame,
            self.reference_frame > 0.0,
            "must be positive",
        )?;
        check("gravity", self.gravity, self.gravity >= 0.0, "must be non-negative")?;
        check(
            "ground_friction",
            self.ground_friction,
            self.ground_friction > 0.0 && self.ground_friction <= 1.0,
            "must be in (0, 1]",
        )?;
        check(
            "air_friction",
            self.air_friction,
            self.air_friction > 0.0 && self.air_friction <= 1.0,
            "must be in (0, 1]",
        )?;
        check(
            "stop_threshold",
            self.stop_threshold,
            self.stop_threshold >= 0.0,
            "must be non-negative",
        )?;
        check(
            "acceleration",
            self.acceleration,
            self.acceleration >= 0.0,
            "must be non-negative",
        )?;
        check("max_speed", self.max_speed, self.max_speed > 0.0, "must be positive")?;
        check(
            "jump_impulse",
            self.jump_impulse,
            self.jump_impulse < 0.0,
            "must be negative (upward)",
        )?;
        check(
            "max_fall_speed",
            self.max_fall_speed,
            self.max_fall_speed > 0.0,
            "must be positive",
        )?;
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
    fn default_config_is_valid_and_60hz() {
        let config = PhysicsConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.reference_frame - 1.0 / 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_reference_frame_rejected() {
        let config = PhysicsConfig {
            reference_frame: 0.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            PhysicsError::InvalidConfig {
                field: "reference_frame",
                ..
            }
        ));
    }

    #[test]
    fn friction_above_one_rejected() {
        let config = PhysicsConfig {
            air_friction: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn upward_jump_required() {
        let config = PhysicsConfig {
            jump_impulse: 12.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("jump_impulse"));
    }

    #[test]
    fn nan_rejected() {
        let config = PhysicsConfig {
            gravity: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: PhysicsConfig = serde_json::from_str(r#"{"gravity": 0.9}"#).unwrap();
        assert_eq!(config.gravity, 0.9);
        assert_eq!(config.max_speed, 6.0);
    }
}
