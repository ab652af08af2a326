//! Idle/demo mode - AI plays the game
//!
//! Produces the raw pad input a player would, so it goes through the same
//! control scheme (including swaps) as a human.

use super::input::{PadState, TickInput};
use super::player::PlayerPhase;
use super::polygon::RotationDirection;
use super::state::GameState;

/// Close enough horizontally to stop steering
const STEER_DEADZONE: f32 = 0.15;
/// How far below the feet a platform is still worth aiming for
const LOOK_BELOW: f32 = 3.0;

/// Input that steers toward the best reachable platform and matches its color
pub fn autopilot(state: &GameState) -> TickInput {
    let player = &state.player;
    let mut input = TickInput::default();

    match player.phase {
        PlayerPhase::Disabled => return input,
        PlayerPhase::WaitingForResume => {
            input.resume = true;
            return input;
        }
        PlayerPhase::Active => {}
    }

    // Highest platform at or under the predicted apex
    let rise_gravity = state.tuning.gravity * state.tuning.gravity_scale;
    let apex = if player.vel.y > 0.0 && rise_gravity > 0.0 {
        player.pos.y + player.vel.y * player.vel.y / (2.0 * rise_gravity)
    } else {
        player.pos.y
    };
    let target = state
        .platforms
        .active()
        .filter(|p| p.top() < apex && p.top() > player.pos.y - LOOK_BELOW)
        .max_by(|a, b| a.top().total_cmp(&b.top()));
    let Some(target) = target else {
        return input;
    };

    let mut movement = PadState::default();
    let dx = target.pos.x - player.pos.x;
    if dx > STEER_DEADZONE {
        movement.right_held = true;
    } else if dx < -STEER_DEADZONE {
        movement.left_held = true;
    }

    let mut rotation = PadState::default();
    if let Some(direction) = rotation_toward(state, target.tier) {
        match direction {
            RotationDirection::Left => rotation.left_pressed = true,
            RotationDirection::Right => rotation.right_pressed = true,
        }
    }

    if player.input_swapped {
        input.primary = rotation;
        input.secondary = movement;
    } else {
        input.primary = movement;
        input.secondary = rotation;
    }
    input
}

/// Shortest rotation that brings the palette slot `tier` face down
fn rotation_toward(state: &GameState, tier: u32) -> Option<RotationDirection> {
    let polygon = state.player.polygons().current();
    if tier >= polygon.sides {
        return None;
    }
    let current = polygon.rotation_index();
    let steps_left = (tier + polygon.sides - current) % polygon.sides;
    match steps_left {
        0 => None,
        n if n <= polygon.sides / 2 => Some(RotationDirection::Left),
        _ => Some(RotationDirection::Right),
    }
}
