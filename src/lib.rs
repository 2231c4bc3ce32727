//! Cosmic Defender - A top-down wave arena shooter
//!
//! Core modules:
//! - `sim`: Per-frame combat simulation (movement, spawning, collisions, buffs, phases)
//! - `session`: Owns the live world and wires it to its collaborators
//! - `platform`: Frame scheduling and clocks
//! - `persistence`: Best score storage
//! - `audio`: Sound cue contract
//! - `ui`: Status observer and presentation contracts
//! - `web`: Browser bindings (wasm32 only)

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use session::Session;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
///
/// Distances are in arena pixels, durations in milliseconds, speeds in
/// pixels per tick.
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 400.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 36.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 4.5;
    /// Distance of the spawn position from the arena bottom
    pub const PLAYER_SPAWN_OFFSET: f32 = 80.0;
    pub const MAX_HEALTH: u32 = 100;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 14.0;
    pub const BULLET_SPEED: f32 = 7.0;
    pub const SHOOT_COOLDOWN: f64 = 200.0;
    /// Rapid fire divides the cooldown by this
    pub const RAPID_FIRE_COOLDOWN_DIVISOR: f64 = 3.0;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 32.0;
    pub const ENEMY_HEIGHT: f32 = 32.0;
    pub const ENEMY_BASE_SPEED: f32 = 1.2;
    pub const ENEMY_SPEED_PER_WAVE: f32 = 0.25;
    /// Enemies further than this below the arena are discarded
    pub const ENEMY_DESPAWN_MARGIN: f32 = 50.0;
    /// Random extra height above the arena for new enemies
    pub const ENEMY_SPAWN_STAGGER: f32 = 60.0;
    pub const FAST_SWAY_FREQUENCY: f32 = 0.04;
    pub const FAST_SWAY_AMPLITUDE: f32 = 2.5;

    /// Waves
    pub const BASE_ENEMIES_PER_WAVE: u32 = 4;
    pub const ENEMIES_PER_WAVE_INC: u32 = 2;
    pub const WAVE_SPAWN_DELAY: f64 = 400.0;
    pub const WAVE_REST_DELAY: f64 = 2000.0;
    /// Wave banner lifetime in ticks
    pub const WAVE_TEXT_LIFE: u32 = 90;
    /// One extra enemy hit point every this many waves
    pub const WAVES_PER_EXTRA_HP: u32 = 4;

    /// Powerups
    pub const POWERUP_DROP_CHANCE: f32 = 0.12;
    pub const POWERUP_SPEED: f32 = 2.0;
    pub const POWERUP_SIZE: f32 = 18.0;
    pub const HEALTH_RESTORE: u32 = 20;
    pub const RAPID_FIRE_DURATION: f64 = 8000.0;
    pub const SHIELD_DURATION: f64 = 6000.0;

    /// Combat
    pub const COLLISION_DAMAGE: u32 = 15;
    pub const SCORE_PER_KILL: u64 = 100;

    /// Cosmetics
    pub const SHAKE_DECAY_PLAYING: f32 = 0.03;
    pub const SHAKE_DECAY_GAME_OVER: f32 = 0.02;
    pub const PARTICLE_GRAVITY: f32 = 0.08;
    pub const PARTICLE_DECAY: f32 = 0.025;
    pub const POPUP_RISE: f32 = 1.2;
    pub const POPUP_DECAY: f32 = 0.02;
    pub const MAX_PARTICLES: usize = 512;
}

/// Axis-aligned rectangle in arena coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle with its top-left corner at `pos`
    #[inline]
    pub fn at(pos: Vec2, w: f32, h: f32) -> Self {
        Self::new(pos.x, pos.y, w, h)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap test; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}
