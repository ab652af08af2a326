//! Raw input and the swappable control scheme
//!
//! Two pads drive the player: one is held to move, the other is tapped to
//! rotate. A swapper platform flips which pad does what.

use serde::{Deserialize, Serialize};

use super::polygon::RotationDirection;

/// State of one left/right pad for this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadState {
    pub left_held: bool,
    pub right_held: bool,
    /// Went down since the last processed tick
    pub left_pressed: bool,
    pub right_pressed: bool,
}

impl PadState {
    /// -1, 0 or +1. Both held cancel out.
    pub fn axis(&self) -> f32 {
        match (self.left_held, self.right_held) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// A fresh press, left winning if both went down together
    pub fn pressed(&self) -> Option<RotationDirection> {
        if self.left_pressed {
            Some(RotationDirection::Left)
        } else if self.right_pressed {
            Some(RotationDirection::Right)
        } else {
            None
        }
    }

    fn clear_presses(&mut self) {
        self.left_pressed = false;
        self.right_pressed = false;
    }

    fn latch_presses(&mut self, other: &PadState) {
        self.left_pressed |= other.left_pressed;
        self.right_pressed |= other.right_pressed;
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// A/D keys
    pub primary: PadState,
    /// Left/right arrows
    pub secondary: PadState,
    /// Acknowledge a lost life and continue
    pub resume: bool,
}

impl TickInput {
    /// Drop one-shot inputs after a tick consumed them
    pub fn clear_one_shots(&mut self) {
        self.primary.clear_presses();
        self.secondary.clear_presses();
        self.resume = false;
    }

    /// Take held state from `next` and keep any presses not yet consumed
    pub fn merge(&mut self, next: &TickInput) {
        let mut primary = next.primary;
        primary.latch_presses(&self.primary);
        let mut secondary = next.secondary;
        secondary.latch_presses(&self.secondary);
        self.primary = primary;
        self.secondary = secondary;
        self.resume |= next.resume;
    }
}

/// What the player wants to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    pub horizontal: f32,
    pub rotate: Option<RotationDirection>,
    pub resume: bool,
}

/// Map raw pads to intent. Swapped controls trade the pads' roles.
pub fn intent(input: &TickInput, swapped: bool) -> Intent {
    let (movement, rotation) = if swapped {
        (&input.secondary, &input.primary)
    } else {
        (&input.primary, &input.secondary)
    };
    Intent {
        horizontal: movement.axis(),
        rotate: rotation.pressed(),
        resume: input.resume,
    }
}
