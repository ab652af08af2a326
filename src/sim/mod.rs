//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod events;
pub mod input;
pub mod platforms;
pub mod player;
pub mod polygon;
pub mod state;
pub mod tick;
pub mod timer;

pub use autopilot::autopilot;
pub use collision::{feet_cross_platform, wrap_horizontal};
pub use events::{EventHub, Mailbox, Signal, SignalKind, SubscriptionId};
pub use input::{Intent, PadState, TickInput, intent};
pub use platforms::{Platform, PlatformContact, PlatformId, PlatformKind, PlatformManager};
pub use player::{ContactOutcome, Player, PlayerPhase};
pub use polygon::{ColorLayer, ColorPalette, EdgeColor, Polygon, PolygonSet, RotationDirection};
pub use state::{GameSession, GameState, PLAYER_SPAWN, START_LEDGE};
pub use tick::tick;
pub use timer::{BounceAnim, Cadence, Countdown};
