//! Configuration errors
//!
//! Everything here is detected while a session is being constructed, so a bad
//! tuning file never surfaces as a crash in the middle of a run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max sides must be at least 3, got {0}")]
    TooFewSides(u32),
    #[error("palette has {len} colors but polygons go up to {max_sides} sides")]
    PaletteTooShort { len: usize, max_sides: u32 },
    #[error("expected {expected} level thresholds for max sides {max_sides}, got {got}")]
    ThresholdCount {
        expected: usize,
        got: usize,
        max_sides: u32,
    },
    #[error("level thresholds must be strictly increasing ({prev} then {next})")]
    ThresholdsNotIncreasing { prev: f32, next: f32 },
    #[error("platform pool size is zero but each chunk spawns {chunk_size} platforms")]
    EmptyPool { chunk_size: u32 },
    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f32 },
    #[error("platform kind chances add up to {0}, more than 1")]
    ProbabilitySum(f32),
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("max lives must be at least 1")]
    NoLives,
    #[error("invalid tuning json: {0}")]
    Json(#[from] serde_json::Error),
}
