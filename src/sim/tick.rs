//! Fixed timestep simulation tick
//!
//! Physics phase of the loop: signals, intent, integration, landing, leveling.
//! Runs at `SIM_DT`; the presentation phase is `GameState::update`.

use super::input::{TickInput, intent};
use super::player::PlayerPhase;
use super::state::GameState;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Deaths, swaps and game over published since the last tick
    state.player.process_signals();
    if state.player.phase == PlayerPhase::Disabled {
        return;
    }
    state.time_ticks += 1;

    let intent = intent(input, state.player.input_swapped);
    state.player.apply_intent(&intent);

    let prev_feet = state.player.integrate(dt);
    if state.player.can_land() {
        let contact = state.platforms.landing_contact(
            prev_feet,
            state.player.pos,
            state.player.half_width(),
            state.player.color_layer,
        );
        if let Some(contact) = contact {
            state.land_on(&contact);
        }
    }

    state.player.check_level_up(&state.hub);
}
