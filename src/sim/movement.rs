//! Movement: player steering, shooting, and constant-velocity entities
//!
//! Displacements are per tick, not scaled by elapsed time.

use glam::Vec2;

use super::buffs::shot_cooldown;
use super::state::{Bullet, Enemy, EnemyKind, Player, Powerup};
use crate::consts::*;

/// Move the player by the given intent, keeping the ship inside the arena
///
/// Intent longer than 1 is normalized so diagonals are not faster than
/// straight moves.
pub fn steer_player(player: Player, intent: Vec2) -> Player {
    let intent = if intent.is_finite() {
        intent.clamp_length_max(1.0)
    } else {
        Vec2::ZERO
    };
    let pos = player.pos + intent * PLAYER_SPEED;
    Player {
        pos: pos.clamp(
            Vec2::ZERO,
            Vec2::new(ARENA_WIDTH - PLAYER_WIDTH, ARENA_HEIGHT - PLAYER_HEIGHT),
        ),
    }
}

/// Whether a shot is allowed right now
pub fn can_fire(wants_fire: bool, last_shot: f64, rapid_fire: bool, now: f64) -> bool {
    wants_fire && now - last_shot > shot_cooldown(rapid_fire)
}

/// Append one volley from the player's nose (three bullets under rapid fire)
pub fn fire(mut bullets: Vec<Bullet>, player: &Player, rapid_fire: bool) -> Vec<Bullet> {
    let p = player.pos;
    bullets.push(Bullet {
        pos: Vec2::new(p.x + PLAYER_WIDTH / 2.0, p.y - 4.0),
    });
    if rapid_fire {
        bullets.push(Bullet {
            pos: Vec2::new(p.x + 6.0, p.y + 4.0),
        });
        bullets.push(Bullet {
            pos: Vec2::new(p.x + PLAYER_WIDTH - 6.0, p.y + 4.0),
        });
    }
    bullets
}

/// Move bullets up, dropping those fully above the arena
pub fn advance_bullets(bullets: Vec<Bullet>) -> Vec<Bullet> {
    bullets
        .into_iter()
        .map(|b| Bullet {
            pos: Vec2::new(b.pos.x, b.pos.y - BULLET_SPEED),
        })
        .filter(|b| b.pos.y > -BULLET_HEIGHT)
        .collect()
}

/// Base descent speed for a wave
pub fn enemy_speed(wave: u32) -> f32 {
    ENEMY_BASE_SPEED + wave as f32 * ENEMY_SPEED_PER_WAVE
}

/// Move enemies down; fast enemies also sway sideways
pub fn advance_enemies(enemies: Vec<Enemy>, wave: u32) -> Vec<Enemy> {
    let base = enemy_speed(wave);
    enemies
        .into_iter()
        .map(|e| {
            let mut x = e.pos.x;
            if e.kind == EnemyKind::Fast {
                x += (e.pos.y * FAST_SWAY_FREQUENCY + e.phase).sin() * FAST_SWAY_AMPLITUDE;
            }
            Enemy {
                pos: Vec2::new(x, e.pos.y + base * e.kind.speed_multiplier()),
                ..e
            }
        })
        .collect()
}

/// Let powerups fall; leaving the arena is handled on pickup resolution
pub fn advance_powerups(powerups: Vec<Powerup>) -> Vec<Powerup> {
    powerups
        .into_iter()
        .map(|p| Powerup {
            pos: Vec2::new(p.pos.x, p.pos.y + POWERUP_SPEED),
            ..p
        })
        .collect()
}
