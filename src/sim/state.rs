//! Game state and session bookkeeping
//!
//! Everything one run needs lives here: the hub, the player, the platform
//! streamer and the session's lives. Cross-component effects of a landing or
//! a death are applied here so each component only touches its own state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{EventHub, Signal};
use super::platforms::{PlatformContact, PlatformKind, PlatformManager};
use super::player::Player;
use super::timer::Countdown;
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Where the player's feet start
pub const PLAYER_SPAWN: Vec2 = Vec2::new(0.0, 1.0);
/// Hand-placed ledge under the spawn point
pub const START_LEDGE: Vec2 = Vec2::new(0.0, 0.0);

/// Lives and the terminal flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub max_lives: u32,
    pub current_lives: u32,
    pub game_ended: bool,
}

impl GameSession {
    pub fn new(max_lives: u32) -> Self {
        Self {
            max_lives,
            current_lives: max_lives,
            game_ended: false,
        }
    }
}

/// Complete state of one run
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub hub: EventHub,
    pub session: GameSession,
    pub player: Player,
    pub platforms: PlatformManager,
    /// Control swaps waiting to fire
    pub swap_countdowns: Vec<Countdown>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Validate the tuning and build a fresh run
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, ConfigError> {
        tuning.validate()?;

        let hub = EventHub::new();
        let player = Player::new(&tuning, &hub, PLAYER_SPAWN)?;
        let mut platforms = PlatformManager::new(&tuning, &hub, Pcg32::seed_from_u64(seed));
        platforms.place(PlatformKind::Default, 0, START_LEDGE);
        platforms.spawn_chunk(player.height() + tuning.initial_height);

        log::info!(
            "new run (seed {}, {} lives, up to {} sides)",
            seed,
            tuning.max_lives,
            tuning.max_sides
        );

        Ok(Self {
            seed,
            session: GameSession::new(tuning.max_lives),
            tuning,
            hub,
            player,
            platforms,
            swap_countdowns: Vec::new(),
            time_ticks: 0,
        })
    }

    pub fn is_game_over(&self) -> bool {
        self.session.game_ended
    }

    /// Presentation-phase update: landing animation, swap timers, streaming
    pub fn update(&mut self, dt: f32) {
        self.player.update_animation(dt);

        if !self.session.game_ended {
            let mut fired = 0;
            for countdown in &mut self.swap_countdowns {
                if countdown.advance(dt) {
                    fired += 1;
                }
            }
            self.swap_countdowns.retain(|c| !c.is_expired());
            for _ in 0..fired {
                self.hub.publish(Signal::Swapped);
            }
        }

        self.platforms.update(dt, self.player.height());
    }

    /// The player fell out of view
    ///
    /// Costs a life, or ends the run when it was the last one. Ignored once
    /// the run is over.
    pub fn notify_player_crossed_death_plane(&mut self) {
        if self.session.game_ended {
            return;
        }
        if self.session.current_lives <= 1 {
            self.session.current_lives = 0;
            self.end_game();
        } else {
            self.session.current_lives -= 1;
            self.hub.publish(Signal::PlayerDied {
                lives_left: self.session.current_lives,
            });
        }
    }

    /// Mark the run over and tell everyone. Pending swaps are dropped.
    pub fn end_game(&mut self) {
        if self.session.game_ended {
            return;
        }
        self.session.game_ended = true;
        self.swap_countdowns.clear();
        log::info!(
            "game over at height {:.2} after {} ticks",
            self.player.height(),
            self.time_ticks
        );
        self.hub.publish(Signal::GameEnded);
    }

    /// Apply a landing: consume the platform, schedule a swap, announce the jump
    pub(crate) fn land_on(&mut self, contact: &PlatformContact) {
        let Some(outcome) = self.player.resolve_contact(contact) else {
            return;
        };

        if let Some(id) = outcome.remove {
            self.platforms.remove(id);
        }
        if outcome.trigger_swap {
            let delay = self.tuning.swap_delay;
            self.hub.publish(Signal::SwapTriggered { delay });
            self.swap_countdowns.push(Countdown::new(delay));
            log::debug!("swap scheduled in {:.2}s", delay);
        }
        self.hub.publish(Signal::PlayerJumped);
    }
}
