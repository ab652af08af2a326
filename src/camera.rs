//! Camera rig: follows the climb and owns the death plane
//!
//! The camera only ever moves up. Anything that falls more than
//! `death_zone_offset` below it has crossed the death plane.

use serde::{Deserialize, Serialize};

use crate::sim::events::{EventHub, Mailbox, Signal, SignalKind};
use crate::tuning::Tuning;

#[derive(Debug)]
pub struct CameraRig {
    /// Current camera height
    pub y: f32,
    /// Height at the start of the run (score baseline)
    pub initial_y: f32,
    follow_threshold: f32,
    death_zone_offset: f32,
    frozen: bool,
    /// Player was below the death plane last frame
    below_plane: bool,
    mailbox: Mailbox,
}

/// What the rig saw this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraFrame {
    /// Player just dropped below the death plane
    pub crossed_death_plane: bool,
}

impl CameraRig {
    pub fn new(tuning: &Tuning, hub: &EventHub, player_y: f32) -> Self {
        let y = player_y + tuning.follow_threshold;
        Self {
            y,
            initial_y: y,
            follow_threshold: tuning.follow_threshold,
            death_zone_offset: tuning.death_zone_offset,
            frozen: false,
            below_plane: false,
            mailbox: Mailbox::subscribe(hub, &[SignalKind::GameEnded]),
        }
    }

    pub fn death_plane(&self) -> f32 {
        self.y - self.death_zone_offset
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Height climbed since the start of the run
    pub fn height_gained(&self) -> f32 {
        self.y - self.initial_y
    }

    /// Follow the player upward and test the death plane
    ///
    /// A crossing is reported once, on the frame the player enters the zone.
    pub fn update(&mut self, player_y: f32) -> CameraFrame {
        for signal in self.mailbox.drain() {
            if signal == Signal::GameEnded {
                self.frozen = true;
                log::debug!("camera frozen at {:.2}", self.y);
            }
        }

        if !self.frozen {
            self.y = self.y.max(player_y + self.follow_threshold);
        }

        let below = player_y < self.death_plane();
        let crossed = below && !self.below_plane;
        self.below_plane = below;
        CameraFrame {
            crossed_death_plane: crossed && !self.frozen,
        }
    }
}
