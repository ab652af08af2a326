//! Player physics, leveling and the death/resume state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::wrap_horizontal;
use super::events::{EventHub, Mailbox, Signal, SignalKind};
use super::input::Intent;
use super::platforms::{PlatformContact, PlatformId, PlatformKind};
use super::polygon::{ColorLayer, PolygonSet, RotationDirection};
use super::timer::BounceAnim;
use crate::consts::{APEX_SPEED, MIN_SIDES, REST_SPEED};
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Player lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPhase {
    /// Normal play
    Active,
    /// Lost a life; frozen vertically until the player resumes
    WaitingForResume,
    /// Game over, terminal
    Disabled,
}

/// What the game state has to do after a landing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactOutcome {
    /// Platform to destroy
    pub remove: Option<PlatformId>,
    /// Start a control swap countdown
    pub trigger_swap: bool,
}

/// Physics and feel parameters copied out of the tuning
#[derive(Debug, Clone)]
struct PlayerParams {
    jump_force: f32,
    max_fall_speed: f32,
    gravity: f32,
    gravity_scale: f32,
    downward_acceleration_modifier: f32,
    max_move_speed: f32,
    acceleration: f32,
    deceleration_modifier: f32,
    apex_modifier: f32,
    bounce_anim_duration: f32,
    squeeze_amount: f32,
    level_thresholds: Vec<f32>,
    half_width: f32,
    resume_offset: f32,
    resume_speed: f32,
}

impl PlayerParams {
    fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            jump_force: tuning.jump_force,
            max_fall_speed: tuning.max_fall_speed,
            gravity: tuning.gravity,
            gravity_scale: tuning.gravity_scale,
            downward_acceleration_modifier: tuning.downward_acceleration_modifier,
            max_move_speed: tuning.max_move_speed,
            acceleration: tuning.acceleration,
            deceleration_modifier: tuning.deceleration_modifier,
            apex_modifier: tuning.apex_modifier,
            bounce_anim_duration: tuning.bounce_anim_duration,
            squeeze_amount: tuning.squeeze_amount,
            level_thresholds: tuning.level_thresholds.clone(),
            half_width: tuning.player_half_width,
            resume_offset: tuning.resume_offset,
            resume_speed: tuning.resume_speed,
        }
    }
}

/// The player: body, shape and control state
#[derive(Debug)]
pub struct Player {
    /// Feet position (polygon root)
    pub pos: Vec2,
    pub vel: Vec2,
    /// -1, 0 or +1
    pub horizontal_input: f32,
    pub phase: PlayerPhase,
    pub input_swapped: bool,
    /// Lives left as last reported by the session
    pub lives: u32,
    /// Layer the player currently collides on
    pub color_layer: ColorLayer,
    /// Pending landing animation; the bounce fires when it completes
    pub bounce: Option<BounceAnim>,
    polygons: PolygonSet,
    params: PlayerParams,
    mailbox: Mailbox,
}

impl Player {
    pub fn new(tuning: &Tuning, hub: &EventHub, spawn: Vec2) -> Result<Self, ConfigError> {
        let polygons = PolygonSet::build(
            tuning.max_sides,
            tuning.edge_length,
            tuning.edge_depth_offset,
            tuning.palette.clone(),
        )?;
        Ok(Self {
            pos: spawn,
            vel: Vec2::ZERO,
            horizontal_input: 0.0,
            phase: PlayerPhase::Active,
            input_swapped: false,
            lives: tuning.max_lives,
            color_layer: polygons.color_layer(),
            bounce: None,
            polygons,
            params: PlayerParams::from_tuning(tuning),
            mailbox: Mailbox::subscribe(
                hub,
                &[SignalKind::PlayerDied, SignalKind::GameEnded, SignalKind::Swapped],
            ),
        })
    }

    pub fn polygons(&self) -> &PolygonSet {
        &self.polygons
    }

    /// Current side count (3 = triangle)
    pub fn level(&self) -> u32 {
        self.polygons.level()
    }

    pub fn height(&self) -> f32 {
        self.pos.y
    }

    pub fn half_width(&self) -> f32 {
        self.params.half_width
    }

    pub fn is_waiting_for_resume(&self) -> bool {
        self.phase == PlayerPhase::WaitingForResume
    }

    /// Vertical squash for rendering
    pub fn scale_y(&self) -> f32 {
        self.bounce.map_or(1.0, |b| b.scale_y())
    }

    /// React to hub signals received since the last tick
    pub fn process_signals(&mut self) {
        for signal in self.mailbox.drain() {
            match signal {
                Signal::PlayerDied { lives_left } => self.die(lives_left),
                Signal::GameEnded => {
                    self.phase = PlayerPhase::Disabled;
                    self.bounce = None;
                    self.vel = Vec2::ZERO;
                }
                Signal::Swapped => {
                    self.input_swapped = !self.input_swapped;
                    log::info!("controls swapped (swapped = {})", self.input_swapped);
                }
                _ => {}
            }
        }
    }

    /// Freeze, lift by the resume offset and wait for acknowledgment
    fn die(&mut self, lives_left: u32) {
        self.lives = lives_left;
        if self.phase == PlayerPhase::Disabled {
            return;
        }
        self.vel = Vec2::ZERO;
        self.bounce = None;
        self.pos.y += self.params.resume_offset;
        self.phase = PlayerPhase::WaitingForResume;
        log::info!("player died, {} lives left, waiting to resume", lives_left);
    }

    /// Apply movement, rotation and resume requests
    pub fn apply_intent(&mut self, intent: &Intent) {
        if self.phase == PlayerPhase::Disabled {
            return;
        }
        self.horizontal_input = intent.horizontal;
        if let Some(direction) = intent.rotate {
            self.rotate(direction);
        }
        if intent.resume && self.phase == PlayerPhase::WaitingForResume {
            self.phase = PlayerPhase::Active;
            log::info!("player resumed at {:.2}", self.pos.y);
        }
    }

    /// Rotate one edge and pick up the new landing color
    ///
    /// Returns the visual rotation step in degrees for the renderer.
    pub fn rotate(&mut self, direction: RotationDirection) -> f32 {
        let step = self.polygons.rotate(direction);
        self.color_layer = self.polygons.color_layer();
        step
    }

    /// Advance one fixed step. Returns the feet position before the step.
    pub fn integrate(&mut self, dt: f32) -> Vec2 {
        let prev = self.pos;
        match self.phase {
            PlayerPhase::Active => self.integrate_active(dt),
            PlayerPhase::WaitingForResume => {
                // Kinematic: horizontal drift only
                self.vel = Vec2::ZERO;
                self.pos.x += self.params.resume_speed * self.horizontal_input * dt;
            }
            PlayerPhase::Disabled => {}
        }
        prev
    }

    fn integrate_active(&mut self, dt: f32) {
        let p = &self.params;
        let input = self.horizontal_input;
        let vx = self.vel.x;
        let braking = p.acceleration * (1.0 + p.deceleration_modifier);

        // Horizontal: accelerate with input, brake harder against motion
        let mut coasting = false;
        let ax = if input != 0.0 {
            if vx * input < 0.0 {
                input * braking
            } else {
                input * p.acceleration
            }
        } else if vx.abs() >= REST_SPEED {
            coasting = true;
            -vx.signum() * braking
        } else {
            0.0
        };

        // Vertical: floaty rise, snappy fall
        let gravity_scale = if self.vel.y > 0.0 {
            p.gravity_scale
        } else {
            p.gravity_scale * (1.0 + p.downward_acceleration_modifier)
        };

        let mut vel = self.vel + Vec2::new(ax, -p.gravity * gravity_scale) * dt;
        if input == 0.0 && (vx.abs() < REST_SPEED || (coasting && vel.x * vx < 0.0)) {
            vel.x = 0.0;
        }

        if self.bounce.is_some() {
            // Pinned to the platform until the bounce fires
            vel = Vec2::ZERO;
        } else if vel.y.abs() < APEX_SPEED {
            vel.x *= 1.0 + p.apex_modifier;
        }

        vel.x = vel.x.clamp(-p.max_move_speed, p.max_move_speed);
        vel.y = vel.y.max(-p.max_fall_speed);

        self.vel = vel;
        self.pos += vel * dt;
        if let Some(bounce) = &self.bounce {
            self.pos.y = bounce.platform_top;
        }
    }

    /// Can a platform catch the player right now?
    pub fn can_land(&self) -> bool {
        self.phase == PlayerPhase::Active && self.vel.y <= 0.0 && self.bounce.is_none()
    }

    /// Land on a platform: stop, squash and queue the bounce
    pub fn resolve_contact(&mut self, contact: &PlatformContact) -> Option<ContactOutcome> {
        if !self.can_land() {
            return None;
        }

        self.vel = Vec2::ZERO;
        self.pos.y = contact.top;
        self.bounce = Some(BounceAnim::new(
            self.params.bounce_anim_duration,
            self.params.squeeze_amount,
            contact.kind.bounce_multiplier(),
            contact.top,
        ));

        Some(ContactOutcome {
            remove: contact.kind.is_consumable().then_some(contact.id),
            trigger_swap: contact.kind == PlatformKind::Swapper,
        })
    }

    /// Advance the landing animation (presentation tick)
    ///
    /// Returns true on the frame the bounce impulse is applied.
    pub fn update_animation(&mut self, dt: f32) -> bool {
        let Some(bounce) = self.bounce.as_mut() else {
            return false;
        };
        if !bounce.advance(dt) {
            return false;
        }
        let multiplier = bounce.multiplier;
        self.bounce = None;
        if self.phase != PlayerPhase::Active {
            return false;
        }
        self.vel = Vec2::ZERO;
        self.vel.y += self.params.jump_force * multiplier;
        true
    }

    /// Level up once the next threshold is passed. Publishes `PlayerLeveledUp`.
    pub fn check_level_up(&mut self, hub: &EventHub) -> bool {
        let level = self.level();
        let Some(&threshold) = self.params.level_thresholds.get((level - MIN_SIDES) as usize) else {
            return false;
        };
        if self.pos.y <= threshold {
            return false;
        }

        if !self.polygons.level_up(self.color_layer) {
            return false;
        }
        self.color_layer = self.polygons.color_layer();
        let level = self.level();
        log::info!("player leveled up to {} sides at {:.2}", level, self.pos.y);
        hub.publish(Signal::PlayerLeveledUp { level });
        true
    }

    /// Move to the opposite side once past `extent`. Returns true if wrapped.
    pub fn wrap_horizontal(&mut self, extent: f32) -> bool {
        match wrap_horizontal(self.pos.x, extent) {
            Some(x) => {
                self.pos.x = x;
                true
            }
            None => false,
        }
    }
}
