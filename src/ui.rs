//! HUD state: score, lives and the swap countdown
//!
//! Text is kept ready to draw; a frontend only has to blit it.

use serde::{Deserialize, Serialize};

use crate::sim::events::{EventHub, Mailbox, Signal, SignalKind};

/// Everything the HUD shows this frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudView {
    pub score: String,
    pub lives: u32,
    /// "Switch roles in 3.25" while a swap is pending
    pub swap_text: Option<String>,
    /// Set once the run is over
    pub final_score: Option<String>,
}

#[derive(Debug)]
pub struct Hud {
    score: f32,
    lives: u32,
    swap_remaining: Option<f32>,
    final_score: Option<f32>,
    mailbox: Mailbox,
}

impl Hud {
    pub fn new(hub: &EventHub, lives: u32) -> Self {
        Self {
            score: 0.0,
            lives,
            swap_remaining: None,
            final_score: None,
            mailbox: Mailbox::subscribe(
                hub,
                &[SignalKind::PlayerDied, SignalKind::SwapTriggered, SignalKind::GameEnded],
            ),
        }
    }

    /// Apply signals, tick the swap countdown and take the new score
    pub fn update(&mut self, dt: f32, height_gained: f32) {
        for signal in self.mailbox.drain() {
            match signal {
                Signal::PlayerDied { lives_left } => self.lives = lives_left,
                Signal::SwapTriggered { delay } => self.swap_remaining = Some(delay),
                Signal::GameEnded => {
                    self.lives = 0;
                    self.swap_remaining = None;
                    self.final_score = Some(self.score);
                }
                _ => {}
            }
        }

        if self.final_score.is_none() {
            self.score = height_gained.max(0.0);
        }

        if let Some(remaining) = self.swap_remaining.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.swap_remaining = None;
            }
        }
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn view(&self) -> HudView {
        HudView {
            score: format_score(self.score),
            lives: self.lives,
            swap_text: self
                .swap_remaining
                .map(|remaining| format!("Switch roles in {:.2}", remaining)),
            final_score: self.final_score.map(format_score),
        }
    }
}

/// Two decimal places, like "12.50"
pub fn format_score(score: f32) -> String {
    format!("{:.2}", score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_and_lives() {
        let hub = EventHub::new();
        let mut hud = Hud::new(&hub, 3);
        assert_eq!(hud.view().score, "0.00");

        hud.update(0.016, 12.5);
        hub.publish(Signal::PlayerDied { lives_left: 2 });
        hud.update(0.016, 12.5);
        let view = hud.view();
        assert_eq!(view.score, "12.50");
        assert_eq!(view.lives, 2);
        assert_eq!(view.final_score, None);
    }

    #[test]
    fn test_swap_countdown_text() {
        let hub = EventHub::new();
        let mut hud = Hud::new(&hub, 3);
        hub.publish(Signal::SwapTriggered { delay: 5.0 });
        hud.update(0.5, 0.0);
        assert_eq!(hud.view().swap_text.as_deref(), Some("Switch roles in 4.50"));

        hud.update(4.5, 0.0);
        assert_eq!(hud.view().swap_text, None);
    }

    #[test]
    fn test_final_score_frozen() {
        let hub = EventHub::new();
        let mut hud = Hud::new(&hub, 3);
        hud.update(0.016, 7.25);
        hub.publish(Signal::GameEnded);
        hud.update(0.016, 9.0);
        let view = hud.view();
        assert_eq!(view.final_score.as_deref(), Some("7.25"));
        assert_eq!(view.score, "7.25");
        assert_eq!(view.lives, 0);
    }
}
