//! Deferred tasks on the simulation clock
//!
//! Nothing here blocks. Owners advance timers from their update and react when
//! one fires.

use serde::{Deserialize, Serialize};

/// One-shot countdown in seconds
///
/// A zero-length countdown still fires, on its first advance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    pub remaining: f32,
    fired: bool,
}

impl Countdown {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
            fired: false,
        }
    }

    /// Advance by `dt`. Returns true on the call where the countdown expires.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.fired {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.fired = true;
            return true;
        }
        false
    }

    pub fn is_expired(&self) -> bool {
        self.fired
    }
}

/// Fixed-interval repeating schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cadence {
    pub interval: f32,
    elapsed: f32,
    stopped: bool,
}

impl Cadence {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
            stopped: false,
        }
    }

    /// Advance by `dt`, returning how many times the cadence fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.stopped {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

/// Squeeze-then-release landing animation
///
/// The bounce impulse is applied when this completes, so physics waits on the
/// animation without depending on any renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceAnim {
    pub duration: f32,
    pub elapsed: f32,
    /// Squash applied at the start (0 = none)
    pub squeeze: f32,
    /// Impulse scale for the platform that was hit
    pub multiplier: f32,
    /// Surface the player stays pinned to until release
    pub platform_top: f32,
}

impl BounceAnim {
    pub fn new(duration: f32, squeeze: f32, multiplier: f32, platform_top: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            squeeze,
            multiplier,
            platform_top,
        }
    }

    /// Advance by `dt`. Returns true once the animation has completed.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed >= self.duration
    }

    /// Vertical scale for presentation (squashed, easing back to 1)
    pub fn scale_y(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        1.0 - self.squeeze * (1.0 - t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_fires_once() {
        let mut countdown = Countdown::new(1.0);
        assert!(!countdown.advance(0.4));
        assert!(!countdown.advance(0.4));
        assert!(countdown.advance(0.4));
        assert!(countdown.is_expired());
        assert!(!countdown.advance(0.4));
    }

    #[test]
    fn test_zero_countdown_fires_on_first_advance() {
        let mut countdown = Countdown::new(0.0);
        assert!(!countdown.is_expired());
        assert!(countdown.advance(0.0));
        assert!(countdown.is_expired());
        assert!(!countdown.advance(1.0));

        // Negative delays behave like zero
        assert!(Countdown::new(-2.0).advance(0.016));
    }

    #[test]
    fn test_cadence_catches_up_and_stops() {
        let mut cadence = Cadence::new(1.0);
        assert_eq!(cadence.advance(0.5), 0);
        assert_eq!(cadence.advance(0.5), 1);
        assert_eq!(cadence.advance(2.25), 2);
        cadence.stop();
        assert!(cadence.is_stopped());
        assert_eq!(cadence.advance(10.0), 0);
    }

    #[test]
    fn test_bounce_scale_recovers() {
        let mut anim = BounceAnim::new(0.05, 0.5, 1.0, 0.0);
        assert_eq!(anim.scale_y(), 0.5);
        assert!(!anim.advance(0.025));
        assert!((anim.scale_y() - 0.75).abs() < 1e-5);
        assert!(anim.advance(0.025));
        assert_eq!(anim.scale_y(), 1.0);
    }
}
