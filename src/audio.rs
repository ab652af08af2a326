//! Sound cues driven by hub signals
//!
//! Headless: cues are queued with their effective volume and a frontend
//! drains them each frame to play whatever samples it has.

use serde::{Deserialize, Serialize};

use crate::sim::events::{EventHub, Mailbox, Signal, SignalKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Bounced off a platform
    Jump,
    /// Gained a side
    LevelUp,
    /// Run over
    Death,
}

/// A cue ready to play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueuedCue {
    pub cue: SoundCue,
    pub volume: f32,
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    queue: Vec<QueuedCue>,
    mailbox: Mailbox,
}

impl AudioManager {
    pub fn new(hub: &EventHub) -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            queue: Vec::new(),
            mailbox: Mailbox::subscribe(
                hub,
                &[SignalKind::PlayerJumped, SignalKind::PlayerLeveledUp, SignalKind::GameEnded],
            ),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Turn this frame's signals into cues
    pub fn update(&mut self) {
        for signal in self.mailbox.drain() {
            let cue = match signal {
                Signal::PlayerJumped => SoundCue::Jump,
                Signal::PlayerLeveledUp { .. } => SoundCue::LevelUp,
                Signal::GameEnded => SoundCue::Death,
                _ => continue,
            };
            self.play(cue);
        }
    }

    /// Queue a cue at the current volume (dropped when silent)
    pub fn play(&mut self, cue: SoundCue) {
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }
        self.queue.push(QueuedCue { cue, volume });
    }

    /// Take every queued cue in the order they happened
    pub fn drain(&mut self) -> Vec<QueuedCue> {
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_become_cues() {
        let hub = EventHub::new();
        let mut audio = AudioManager::new(&hub);
        hub.publish(Signal::PlayerJumped);
        hub.publish(Signal::PlayerLeveledUp { level: 4 });
        hub.publish(Signal::Swapped);
        hub.publish(Signal::GameEnded);
        audio.update();

        let cues: Vec<_> = audio.drain().into_iter().map(|q| q.cue).collect();
        assert_eq!(cues, vec![SoundCue::Jump, SoundCue::LevelUp, SoundCue::Death]);
        assert!(audio.drain().is_empty());
    }

    #[test]
    fn test_volume_and_mute() {
        let hub = EventHub::new();
        let mut audio = AudioManager::new(&hub);
        audio.set_sfx_volume(0.5);
        audio.play(SoundCue::Jump);
        assert!((audio.drain()[0].volume - 0.4).abs() < 1e-6);

        audio.set_master_volume(2.0);
        audio.play(SoundCue::LevelUp);
        assert!((audio.drain()[0].volume - 0.5).abs() < 1e-6);

        audio.set_master_volume(0.0);
        audio.play(SoundCue::Jump);
        assert!(audio.drain().is_empty());
        audio.set_master_volume(1.0);

        audio.set_muted(true);
        audio.play(SoundCue::Jump);
        assert!(audio.drain().is_empty());
    }
}
