//! Cosmetic effects: particle bursts, score popups, decay
//!
//! Particle spread comes from a hash of the tick counter rather than the
//! gameplay random source, so effects never change what spawns or drops.

use glam::Vec2;

use super::state::{Particle, ParticleColor, ScorePopup};
use crate::consts::*;

/// Particle counts per burst type
pub const KILL_BURST: u32 = 20;
pub const IMPACT_BURST: u32 = 6;
pub const CONTACT_BURST: u32 = 12;
pub const PICKUP_BURST: u32 = 8;
pub const TERMINAL_BURST: u32 = 40;

/// Spawn `count` particles exploding out of `pos`
pub fn burst(
    particles: &mut Vec<Particle>,
    pos: Vec2,
    color: ParticleColor,
    count: u32,
    seed: u32,
) {
    // Mix position into the seed so simultaneous bursts differ
    let seed = seed
        .wrapping_mul(2654435761)
        .wrapping_add((pos.x as i32 as u32).wrapping_mul(31337))
        .wrapping_add(pos.y as i32 as u32);

    for i in 0..count {
        let hash = seed
            .wrapping_add(i.wrapping_mul(7919))
            .wrapping_mul(2654435761);
        let rand1 = (hash % 1000) as f32 / 1000.0;
        let rand2 = ((hash >> 10) % 1000) as f32 / 1000.0;
        let rand3 = ((hash >> 20) % 1000) as f32 / 1000.0;

        particles.push(Particle {
            pos,
            vel: Vec2::new((rand1 - 0.5) * 8.0, (rand2 - 0.5) * 8.0),
            life: 1.0,
            max_life: 1.0,
            color,
            size: 1.5 + rand3 * 4.0,
        });
    }
}

/// Drop the oldest particles beyond `max`
pub fn cap_particles(mut particles: Vec<Particle>, max: usize) -> Vec<Particle> {
    if particles.len() > max {
        let excess = particles.len() - max;
        particles.drain(..excess);
    }
    particles
}

/// Advance particles one tick, removing any that burn out
pub fn decay_particles(particles: Vec<Particle>) -> Vec<Particle> {
    particles
        .into_iter()
        .map(|p| Particle {
            pos: p.pos + p.vel,
            vel: Vec2::new(p.vel.x, p.vel.y + PARTICLE_GRAVITY),
            life: p.life - PARTICLE_DECAY,
            ..p
        })
        .filter(|p| p.life > 0.0)
        .collect()
}

/// Float popups upward, removing expired ones
pub fn decay_popups(popups: Vec<ScorePopup>) -> Vec<ScorePopup> {
    popups
        .into_iter()
        .map(|sp| ScorePopup {
            pos: Vec2::new(sp.pos.x, sp.pos.y - POPUP_RISE),
            life: sp.life - POPUP_DECAY,
            ..sp
        })
        .filter(|sp| sp.life > 0.0)
        .collect()
}

/// Linear shake decay toward zero
#[inline]
pub fn decay_shake(shake: f32, rate: f32) -> f32 {
    (shake - rate).max(0.0)
}
