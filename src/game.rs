//! Game loop: fixed-step simulation plus per-frame presentation
//!
//! A frontend calls `set_input` whenever input changes and `update` once per
//! frame with the real frame time.

use crate::audio::AudioManager;
use crate::camera::CameraRig;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::error::ConfigError;
use crate::sim::{GameState, TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::{Hud, HudView};

/// Game instance holding all state
#[derive(Debug)]
pub struct Game {
    pub state: GameState,
    pub camera: CameraRig,
    pub hud: Hud,
    pub audio: AudioManager,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, ConfigError> {
        let state = GameState::new(tuning, seed)?;
        let camera = CameraRig::new(&state.tuning, &state.hub, state.player.height());
        let hud = Hud::new(&state.hub, state.session.current_lives);
        let audio = AudioManager::new(&state.hub);
        Ok(Self {
            state,
            camera,
            hud,
            audio,
            accumulator: 0.0,
            input: TickInput::default(),
        })
    }

    /// Start a new run with the same tuning
    pub fn restart(&mut self, seed: u64) -> Result<(), ConfigError> {
        log::info!("restarting with seed {}", seed);
        *self = Self::new(self.state.tuning.clone(), seed)?;
        Ok(())
    }

    /// Latest raw input; presses are held until a tick consumes them
    pub fn set_input(&mut self, input: &TickInput) {
        self.input.merge(input);
    }

    /// Run simulation ticks, then presentation. Returns the substep count.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.min(MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.clear_one_shots();
        }

        self.state.update(dt);
        self.state.player.wrap_horizontal(self.state.tuning.wrap_extent);

        let frame = self.camera.update(self.state.player.height());
        if frame.crossed_death_plane {
            self.state.notify_player_crossed_death_plane();
        }

        self.hud.update(dt, self.camera.height_gained());
        self.audio.update();
        substeps
    }

    pub fn hud_view(&self) -> HudView {
        self.hud.view()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundCue;
    use crate::sim::{PadState, PlatformKind, PlayerPhase};
    use glam::Vec2;

    const FRAME: f32 = 1.0 / 60.0;

    fn new_game(seed: u64) -> Game {
        Game::new(Tuning::default(), seed).unwrap()
    }

    fn rotate_input() -> TickInput {
        TickInput {
            secondary: PadState {
                left_pressed: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Step frames until `done` holds; panics after `max_frames`
    fn run_until(game: &mut Game, max_frames: u32, done: impl Fn(&Game) -> bool) {
        for _ in 0..max_frames {
            if done(game) {
                return;
            }
            game.update(FRAME);
        }
        assert!(done(game), "condition not reached in {} frames", max_frames);
    }

    #[test]
    fn test_substeps() {
        let mut game = new_game(1);
        assert_eq!(game.update(FRAME), 2);
        assert_eq!(game.state.time_ticks, 2);
        // Long frames are clamped and capped
        assert_eq!(game.update(1.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_press_survives_frame_without_tick() {
        let mut game = new_game(1);
        game.set_input(&rotate_input());
        assert_eq!(game.update(SIM_DT * 0.5), 0);
        game.set_input(&TickInput::default());
        game.update(FRAME);
        assert_eq!(game.state.player.polygons().current().rotation_index(), 1);
    }

    #[test]
    fn test_bounces_on_start_ledge() {
        let mut game = new_game(2);
        run_until(&mut game, 120, |g| g.state.player.vel.y > 5.0);
        let cues: Vec<_> = game.audio.drain().into_iter().map(|q| q.cue).collect();
        assert_eq!(cues, vec![SoundCue::Jump]);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_lives_to_game_over() {
        let mut game = new_game(3);
        // Wrong color for the starting ledge: fall straight through
        game.set_input(&rotate_input());
        game.set_input(&TickInput::default());

        run_until(&mut game, 600, |g| g.state.player.is_waiting_for_resume());
        assert_eq!(game.hud_view().lives, 2);
        let waiting_y = game.state.player.height();
        for _ in 0..30 {
            game.update(FRAME);
        }
        assert_eq!(game.state.player.height(), waiting_y);

        let resume = TickInput {
            resume: true,
            ..Default::default()
        };
        game.set_input(&resume);
        game.set_input(&TickInput::default());
        run_until(&mut game, 600, |g| g.hud_view().lives == 1);

        game.set_input(&resume);
        game.set_input(&TickInput::default());
        run_until(&mut game, 600, |g| g.is_game_over());

        game.update(FRAME);
        assert_eq!(game.state.player.phase, PlayerPhase::Disabled);
        let view = game.hud_view();
        assert_eq!(view.lives, 0);
        assert!(view.final_score.is_some());
        let cues: Vec<_> = game.audio.drain().into_iter().map(|q| q.cue).collect();
        assert_eq!(cues, vec![SoundCue::Death]);
    }

    #[test]
    fn test_swapper_end_to_end() {
        let mut game = new_game(4);
        game.state
            .platforms
            .place(PlatformKind::Swapper, 0, Vec2::new(0.0, 0.5));

        run_until(&mut game, 120, |g| g.hud_view().swap_text.is_some());
        assert!(!game.state.player.input_swapped);

        // 5 s delay plus a frame for the player to pick it up
        for _ in 0..305 {
            game.update(FRAME);
        }
        assert!(game.state.player.input_swapped);
        assert_eq!(game.hud_view().swap_text, None);
    }

    #[test]
    fn test_trampoline_launches_higher() {
        let mut game = new_game(5);
        game.state
            .platforms
            .place(PlatformKind::Trampoline, 0, Vec2::new(0.0, 0.5));

        run_until(&mut game, 120, |g| g.state.player.vel.y > 15.0);
        assert!((game.state.player.vel.y - 17.5).abs() < 0.2);
    }

    #[test]
    fn test_boundary_wrap() {
        let mut game = new_game(6);
        game.state.player.pos.x = 3.0;
        game.update(0.0);
        assert_eq!(game.state.player.pos.x, -2.75);
    }

    #[test]
    fn test_restart() {
        let mut game = new_game(7);
        game.state.notify_player_crossed_death_plane();
        game.update(FRAME);
        assert_eq!(game.hud_view().lives, 2);

        game.restart(8).unwrap();
        assert_eq!(game.state.seed, 8);
        assert_eq!(game.state.session.current_lives, 3);
        assert_eq!(game.hud_view().lives, 3);
        assert_eq!(game.camera.height_gained(), 0.0);
    }
}
