//! Game balance and tuning
//!
//! Loaded from JSON (or defaulted) and validated once, before a session is
//! built. Defaults mirror the shipped game.

use serde::{Deserialize, Serialize};

use crate::consts::MIN_SIDES;
use crate::error::ConfigError;
use crate::sim::polygon::ColorPalette;

/// All gameplay tuning for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Vertical Movement ===
    /// Upward velocity applied by a normal bounce
    pub jump_force: f32,
    /// Terminal fall speed (vertical velocity never drops below -this)
    pub max_fall_speed: f32,
    /// World gravity magnitude
    pub gravity: f32,
    /// Gravity multiplier while rising
    pub gravity_scale: f32,
    /// Extra gravity fraction while falling ("floaty jump, snappy fall")
    pub downward_acceleration_modifier: f32,

    // === Horizontal Movement ===
    pub max_move_speed: f32,
    pub acceleration: f32,
    /// Extra acceleration fraction when slowing down or turning around
    pub deceleration_modifier: f32,
    /// Horizontal boost fraction near the jump apex
    pub apex_modifier: f32,

    // === Animation ===
    /// Squeeze-then-release duration before the bounce impulse lands
    pub bounce_anim_duration: f32,
    /// How far the player squashes on landing (0 = none)
    pub squeeze_amount: f32,

    // === Levels ===
    /// Heights to reach square, pentagon, hexagon, ... (strictly increasing)
    pub level_thresholds: Vec<f32>,

    // === Polygon ===
    pub max_sides: u32,
    pub edge_length: f32,
    /// Moves edges toward (negative) or away from (positive) the center
    pub edge_depth_offset: f32,
    pub palette: ColorPalette,
    /// Horizontal half extent of the player's feet
    pub player_half_width: f32,

    // === Platforms ===
    /// Pre-allocated platforms per tier
    pub pool_size: u32,
    /// First chunk starts this far above the player
    pub initial_height: f32,
    pub spawn_ahead_distance: f32,
    pub retrieve_distance: f32,
    /// Seconds between retrieve sweeps
    pub retrieve_interval: f32,
    /// Vertical gap between consecutive platforms
    pub spacing: f32,
    pub chunk_size: u32,
    /// Platforms spawn with x in [-lateral_extent, lateral_extent)
    pub lateral_extent: f32,
    pub platform_half_width: f32,
    pub one_time_chance: f32,
    pub trampoline_chance: f32,
    pub swapper_chance: f32,

    // === Session ===
    pub max_lives: u32,
    /// How far the player is lifted after losing a life
    pub resume_offset: f32,
    /// Horizontal drift speed while waiting to resume
    pub resume_speed: f32,
    /// Countdown before a swapper platform flips the controls
    pub swap_delay: f32,

    // === Camera & Boundaries ===
    /// Camera stays at least this far above the player
    pub follow_threshold: f32,
    /// Death plane distance below the camera
    pub death_zone_offset: f32,
    /// Crossing |x| > wrap_extent mirrors the player to the other side
    pub wrap_extent: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            // Vertical movement
            jump_force: 10.0,
            max_fall_speed: 10.0,
            gravity: 9.81,
            gravity_scale: 1.0,
            downward_acceleration_modifier: 1.0,

            // Horizontal movement
            max_move_speed: 10.0,
            acceleration: 10.0,
            deceleration_modifier: 0.5,
            apex_modifier: 0.5,

            // Animation
            bounce_anim_duration: 0.05,
            squeeze_amount: 0.5,

            // Levels
            level_thresholds: vec![5.0, 15.0, 30.0],

            // Polygon
            max_sides: 6,
            edge_length: 1.0,
            edge_depth_offset: 0.0,
            palette: ColorPalette::default(),
            player_half_width: 0.5,

            // Platforms
            pool_size: 10,
            initial_height: 2.0,
            spawn_ahead_distance: 10.0,
            retrieve_distance: 10.0,
            retrieve_interval: 1.0,
            spacing: 1.5,
            chunk_size: 10,
            lateral_extent: 2.0,
            platform_half_width: 0.5,
            one_time_chance: 0.1,
            trampoline_chance: 0.0,
            swapper_chance: 0.0,

            // Session
            max_lives: 3,
            resume_offset: 4.0,
            resume_speed: 3.0,
            swap_delay: 5.0,

            // Camera & boundaries
            follow_threshold: 1.0,
            death_zone_offset: 6.0,
            wrap_extent: 2.75,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starter tuning file)
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of platform color tiers that have pools
    pub fn pool_tiers(&self) -> u32 {
        self.max_sides
    }

    /// Reject configurations that would break a session mid-run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_sides < MIN_SIDES {
            return Err(ConfigError::TooFewSides(self.max_sides));
        }
        if self.palette.len() < self.max_sides as usize {
            return Err(ConfigError::PaletteTooShort {
                len: self.palette.len(),
                max_sides: self.max_sides,
            });
        }

        let expected = (self.max_sides - MIN_SIDES) as usize;
        if self.level_thresholds.len() != expected {
            return Err(ConfigError::ThresholdCount {
                expected,
                got: self.level_thresholds.len(),
                max_sides: self.max_sides,
            });
        }
        for pair in self.level_thresholds.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ConfigError::ThresholdsNotIncreasing {
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }

        if self.pool_size == 0 && self.chunk_size > 0 {
            return Err(ConfigError::EmptyPool {
                chunk_size: self.chunk_size,
            });
        }

        let chances = [
            ("one_time_chance", self.one_time_chance),
            ("trampoline_chance", self.trampoline_chance),
            ("swapper_chance", self.swapper_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        let sum: f32 = chances.iter().map(|(_, v)| v).sum();
        if sum > 1.0 {
            return Err(ConfigError::ProbabilitySum(sum));
        }

        let positive = [
            ("max_fall_speed", self.max_fall_speed),
            ("max_move_speed", self.max_move_speed),
            ("edge_length", self.edge_length),
            ("spacing", self.spacing),
            ("retrieve_interval", self.retrieve_interval),
            ("lateral_extent", self.lateral_extent),
            ("wrap_extent", self.wrap_extent),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        let non_negative = [
            ("jump_force", self.jump_force),
            ("bounce_anim_duration", self.bounce_anim_duration),
            ("resume_offset", self.resume_offset),
            ("swap_delay", self.swap_delay),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }

        if self.max_lives == 0 {
            return Err(ConfigError::NoLives);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_thresholds_must_increase() {
        let tuning = Tuning {
            level_thresholds: vec![5.0, 5.0, 30.0],
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::ThresholdsNotIncreasing { .. })
        ));
    }

    #[test]
    fn test_threshold_count_matches_sides() {
        let tuning = Tuning {
            max_sides: 4,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::ThresholdCount { expected: 1, got: 3, .. })
        ));
    }

    #[test]
    fn test_empty_pool_rejected() {
        let tuning = Tuning {
            pool_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::EmptyPool { chunk_size: 10 })
        ));

        let idle = Tuning {
            pool_size: 0,
            chunk_size: 0,
            ..Default::default()
        };
        assert!(idle.validate().is_ok());
    }

    #[test]
    fn test_short_palette_rejected() {
        let mut tuning = Tuning::default();
        tuning.palette.entries.truncate(4);
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::PaletteTooShort { len: 4, max_sides: 6 })
        ));
    }

    #[test]
    fn test_chances_cannot_exceed_one() {
        let tuning = Tuning {
            one_time_chance: 0.5,
            trampoline_chance: 0.4,
            swapper_chance: 0.2,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::ProbabilitySum(_))));
    }

    #[test]
    fn test_negative_timings_rejected() {
        let tuning = Tuning {
            swap_delay: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::Negative { name: "swap_delay", .. })
        ));

        let tuning = Tuning {
            bounce_anim_duration: -0.05,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::Negative { name: "bounce_anim_duration", .. })
        ));

        // Zero is allowed: instant swap, instant bounce
        let instant = Tuning {
            swap_delay: 0.0,
            bounce_anim_duration: 0.0,
            ..Default::default()
        };
        assert!(instant.validate().is_ok());
    }

    #[test]
    fn test_json_partial_override() {
        let tuning = Tuning::from_json(r#"{ "max_lives": 5, "swap_delay": 2.5 }"#).unwrap();
        assert_eq!(tuning.max_lives, 5);
        assert_eq!(tuning.swap_delay, 2.5);
        assert_eq!(tuning.level_thresholds, vec![5.0, 15.0, 30.0]);
    }

    #[test]
    fn test_json_round_trip_and_bad_json() {
        let json = Tuning::default().to_json().unwrap();
        assert!(Tuning::from_json(&json).is_ok());
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
