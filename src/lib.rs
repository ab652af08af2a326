//! Polyclimb - An endless vertical climber
//!
//! Core modules:
//! - `sim`: Deterministic simulation (event hub, polygon, platforms, player)
//! - `game`: Fixed-step game loop driving the simulation and collaborators
//! - `tuning`: Data-driven game balance
//! - `camera`, `ui`, `audio`: Presentation collaborators fed by hub signals

pub mod audio;
pub mod camera;
pub mod error;
pub mod game;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::ConfigError;
pub use game::Game;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the loop will try to catch up on
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Smallest polygon the player can be (triangle)
    pub const MIN_SIDES: u32 = 3;
    /// Difficulty tier the platform streamer starts at
    pub const STARTING_TIER: u32 = 3;

    /// Vertical speed below which the player counts as being at the jump apex
    pub const APEX_SPEED: f32 = 0.1;
    /// Horizontal speed treated as standing still
    pub const REST_SPEED: f32 = 0.01;

    /// Bounce strength on trampolines relative to a normal platform
    pub const TRAMPOLINE_MULTIPLIER: f32 = 1.75;
}

/// Rotation step for one edge of a regular polygon, in degrees
#[inline]
pub fn edge_step_degrees(sides: u32) -> f32 {
    360.0 / sides as f32
}

/// Distance from a regular polygon's center to the midpoint of an edge
#[inline]
pub fn apothem(sides: u32, edge_length: f32) -> f32 {
    let half_step = std::f32::consts::PI / sides as f32;
    edge_length / (2.0 * half_step.tan())
}
