//! Timed buffs: rapid fire and shield
//!
//! Each buff is an absolute expiry timestamp, so "active" is just
//! `until > now`. Pickups overwrite the timestamp; they never extend it.

use super::state::{PowerupKind, World};
use crate::consts::*;

/// Buff expiry timestamps (ms)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuffTimers {
    pub rapid_fire_until: f64,
    pub shield_until: f64,
}

impl BuffTimers {
    pub fn of(world: &World) -> Self {
        Self {
            rapid_fire_until: world.rapid_fire_until,
            shield_until: world.shield_until,
        }
    }
}

/// Minimum time between shots
pub fn shot_cooldown(rapid_fire: bool) -> f64 {
    if rapid_fire {
        SHOOT_COOLDOWN / RAPID_FIRE_COOLDOWN_DIVISOR
    } else {
        SHOOT_COOLDOWN
    }
}

/// Apply a collected powerup, returning the new health and timers
///
/// `health` is the unclamped running total for the tick; only the upper
/// bound is applied here.
pub fn apply_pickup(
    kind: PowerupKind,
    health: i64,
    max_health: u32,
    timers: BuffTimers,
    now: f64,
) -> (i64, BuffTimers) {
    match kind {
        PowerupKind::Health => (
            (health + i64::from(HEALTH_RESTORE)).min(i64::from(max_health)),
            timers,
        ),
        PowerupKind::Rapid => (
            health,
            BuffTimers {
                rapid_fire_until: now + RAPID_FIRE_DURATION,
                ..timers
            },
        ),
        PowerupKind::Shield => (
            health,
            BuffTimers {
                shield_until: now + SHIELD_DURATION,
                ..timers
            },
        ),
    }
}

/// Clear timers that have run out
///
/// Expired timers reset to 0 so a stale timestamp never lingers in the
/// snapshot. Activity checks are unaffected.
pub fn expire(timers: BuffTimers, now: f64) -> BuffTimers {
    let mut out = timers;
    if timers.rapid_fire_until != 0.0 && timers.rapid_fire_until <= now {
        log::debug!("Rapid fire expired at {:.0}ms", now);
        out.rapid_fire_until = 0.0;
    }
    if timers.shield_until != 0.0 && timers.shield_until <= now {
        log::debug!("Shield expired at {:.0}ms", now);
        out.shield_until = 0.0;
    }
    out
}
