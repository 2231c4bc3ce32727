//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestamps come from the caller
//! - Gameplay randomness only through [`RandomSource`]
//! - Stable iteration order (by storage order)
//! - No rendering, audio or platform dependencies

pub mod buffs;
pub mod collision;
pub mod effects;
pub mod input;
pub mod movement;
pub mod phase;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use input::{Direction, HeldDirections, InputState};
pub use phase::begin_run;
pub use rng::{RandomSource, SeededRandom, SequenceRandom};
pub use state::{
    Bullet, Enemy, EnemyKind, GameEvent, GamePhase, InvariantViolation, Particle, ParticleColor,
    Player, Powerup, PowerupKind, ScorePopup, World,
};
pub use tick::{TickError, TickOutput, tick};
