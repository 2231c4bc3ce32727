//! Per-frame simulation step
//!
//! Sequences the subsystems in a fixed order every tick:
//! movement -> spawning -> collisions -> buffs -> phase. Each stage takes
//! the previous stage's collections by value and hands back new ones.

use std::mem;

use thiserror::Error;

use super::buffs::{self, BuffTimers};
use super::collision::{Fallout, resolve_bullet_hits, resolve_contacts, resolve_pickups};
use super::effects::{cap_particles, decay_particles, decay_popups, decay_shake};
use super::input::InputState;
use super::movement::{
    advance_bullets, advance_enemies, advance_powerups, can_fire, fire, steer_player,
};
use super::phase::{clamp_health, settle};
use super::rng::RandomSource;
use super::spawn::{WaveState, schedule};
use super::state::{GameEvent, GamePhase, InvariantViolation, World};
use crate::consts::*;

/// Result of a successful tick
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub world: World,
    /// Events in the order they were resolved
    pub events: Vec<GameEvent>,
}

/// Reasons a tick is rejected; the caller keeps the previous world
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TickError {
    #[error("non-finite timestamp {0}")]
    InvalidTimestamp(f64),
    #[error("tick produced an invalid world: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Advance the world by one frame
///
/// `now` is the frame timestamp in milliseconds. Only the `Playing` phase
/// runs gameplay; `GameOver` keeps fading its particles, popups and shake;
/// `Title` is left untouched.
pub fn tick(
    world: &World,
    input: &InputState,
    now: f64,
    rng: &mut dyn RandomSource,
) -> Result<TickOutput, TickError> {
    if !now.is_finite() {
        return Err(TickError::InvalidTimestamp(now));
    }

    let mut events = Vec::new();
    let next = match world.phase {
        GamePhase::Title => world.clone(),
        GamePhase::GameOver => fade(world.clone()),
        GamePhase::Playing => play(world.clone(), &input.sanitized(), now, rng, &mut events),
    };

    next.validate_invariants()?;
    Ok(TickOutput {
        world: next,
        events,
    })
}

/// Cosmetic decay only (after game over)
fn fade(mut world: World) -> World {
    world.particles = decay_particles(mem::take(&mut world.particles));
    world.score_popups = decay_popups(mem::take(&mut world.score_popups));
    world.shake = decay_shake(world.shake, SHAKE_DECAY_GAME_OVER);
    world
}

fn play(
    mut world: World,
    input: &InputState,
    now: f64,
    rng: &mut dyn RandomSource,
    events: &mut Vec<GameEvent>,
) -> World {
    world.ticks += 1;
    world.shake = decay_shake(world.shake, SHAKE_DECAY_PLAYING);

    // --- Movement ---
    let rapid_fire = world.rapid_fire_active(now);
    world.player = steer_player(world.player, input.movement_intent());

    let mut bullets = mem::take(&mut world.bullets);
    if can_fire(input.fire || world.auto_fire, world.last_shot, rapid_fire, now) {
        bullets = fire(bullets, &world.player, rapid_fire);
        world.last_shot = now;
        events.push(GameEvent::ShotFired);
    }
    let bullets = advance_bullets(bullets);
    let enemies = advance_enemies(mem::take(&mut world.enemies), world.wave);
    let powerups = advance_powerups(mem::take(&mut world.powerups));

    // --- Spawning ---
    // Sees this tick's enemies before collisions: a wave whose last enemy
    // dies now starts resting on the next tick.
    let waves = WaveState {
        wave: world.wave,
        spawn_queue: world.spawn_queue,
        spawn_timer: world.spawn_timer,
        wave_rest_timer: world.wave_rest_timer,
        wave_text: mem::take(&mut world.wave_text),
        wave_text_life: world.wave_text_life,
    };
    let (waves, enemies) = schedule(waves, enemies, now, rng, events);
    world.wave = waves.wave;
    world.spawn_queue = waves.spawn_queue;
    world.spawn_timer = waves.spawn_timer;
    world.wave_rest_timer = waves.wave_rest_timer;
    world.wave_text = waves.wave_text;
    world.wave_text_life = waves.wave_text_life;

    // --- Collisions ---
    let mut fallout = Fallout {
        seed: world.ticks as u32,
        ..Default::default()
    };
    let hits = resolve_bullet_hits(bullets, enemies, powerups, rng, &mut fallout);
    world.score += hits.points;

    let contacts = resolve_contacts(
        hits.enemies,
        &world.player,
        world.shield_active(now),
        i64::from(world.health),
        world.shake,
        &mut fallout,
    );
    let pickups = resolve_pickups(
        hits.powerups,
        &world.player,
        contacts.health,
        world.max_health,
        BuffTimers::of(&world),
        now,
        &mut fallout,
    );
    world.bullets = hits.bullets;
    world.enemies = contacts.enemies;
    world.powerups = pickups.powerups;
    // Damage and healing net out before the floor is applied
    world.health = clamp_health(pickups.health, world.max_health);
    world.shake = contacts.shake;

    // --- Buffs ---
    let timers = buffs::expire(pickups.timers, now);
    world.rapid_fire_until = timers.rapid_fire_until;
    world.shield_until = timers.shield_until;

    // --- Cosmetics (fresh particles decay this tick too) ---
    let Fallout {
        particles,
        score_popups,
        events: collision_events,
        ..
    } = fallout;
    let mut all_particles = mem::take(&mut world.particles);
    all_particles.extend(particles);
    world.particles = cap_particles(decay_particles(all_particles), MAX_PARTICLES);

    let mut all_popups = mem::take(&mut world.score_popups);
    all_popups.extend(score_popups);
    world.score_popups = decay_popups(all_popups);
    events.extend(collision_events);

    // --- Phase ---
    settle(world, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::phase::begin_run;
    use crate::sim::rng::SequenceRandom;
    use crate::sim::state::{Enemy, EnemyKind};
    use glam::Vec2;

    fn playing_world(now: f64) -> World {
        begin_run(&World::default(), now).0
    }

    #[test]
    fn test_title_is_inert() {
        let world = World::new(10, false);
        let mut rng = SequenceRandom::new([0.5]);
        let out = tick(&world, &InputState::default(), 100.0, &mut rng).unwrap();
        assert_eq!(out.world, world);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_rejects_nan_timestamp() {
        let world = playing_world(0.0);
        let mut rng = SequenceRandom::new([0.5]);
        let err = tick(&world, &InputState::default(), f64::NAN, &mut rng).unwrap_err();
        assert!(matches!(err, TickError::InvalidTimestamp(_)));
    }

    #[test]
    fn test_rejects_broken_world() {
        let mut world = playing_world(0.0);
        world.enemies.push(Enemy {
            pos: Vec2::new(0.0, 0.0),
            kind: EnemyKind::Normal,
            hp: 0,
            phase: 0.0,
        });
        let mut rng = SequenceRandom::new([0.5]);
        let err = tick(&world, &InputState::default(), 10.0, &mut rng).unwrap_err();
        assert!(matches!(err, TickError::Invariant(_)));
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let world = playing_world(0.0);
        let input = InputState {
            fire: true,
            ..Default::default()
        };
        let mut rng = SequenceRandom::new([0.5]);

        let out = tick(&world, &input, 250.0, &mut rng).unwrap();
        assert_eq!(out.world.bullets.len(), 1);
        assert_eq!(out.world.last_shot, 250.0);
        assert_eq!(out.events, vec![GameEvent::ShotFired]);

        let out = tick(&out.world, &input, 300.0, &mut rng).unwrap();
        assert_eq!(out.world.bullets.len(), 1);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_autofire_shoots_without_intent() {
        let mut world = playing_world(0.0);
        world.auto_fire = true;
        let mut rng = SequenceRandom::new([0.5]);
        let out = tick(&world, &InputState::default(), 250.0, &mut rng).unwrap();
        assert_eq!(out.world.bullets.len(), 1);
    }

    #[test]
    fn test_game_over_only_fades() {
        let mut world = playing_world(0.0);
        world.phase = GamePhase::GameOver;
        world.shake = 0.5;
        world.enemies.push(Enemy {
            pos: Vec2::new(10.0, 10.0),
            kind: EnemyKind::Normal,
            hp: 1,
            phase: 0.0,
        });
        let input = InputState {
            fire: true,
            ..Default::default()
        };
        let mut rng = SequenceRandom::new([0.5]);
        let out = tick(&world, &input, 5000.0, &mut rng).unwrap();
        assert!(out.world.bullets.is_empty());
        assert_eq!(out.world.enemies[0].pos, Vec2::new(10.0, 10.0));
        assert_eq!(out.world.spawn_queue, world.spawn_queue);
        assert!((out.world.shake - 0.48).abs() < 1e-6);
        assert_eq!(rng.draws(), 0);
    }

    /// Enemy sitting on the player, spawner idle
    fn rammed_world(health: u32) -> World {
        let mut world = playing_world(1000.0);
        world.health = health;
        let pos = world.player.pos;
        world.enemies.push(Enemy {
            pos,
            kind: EnemyKind::Normal,
            hp: 1,
            phase: 0.0,
        });
        world
    }

    #[test]
    fn test_contact_damages_player() {
        let world = rammed_world(20);
        let mut rng = SequenceRandom::new([0.5]);
        let out = tick(&world, &InputState::default(), 1016.0, &mut rng).unwrap();
        assert_eq!(out.world.health, 5);
        assert!(out.world.enemies.is_empty());
        assert_eq!(out.world.shake, 1.0);
        assert_eq!(out.world.phase, GamePhase::Playing);
        assert!(out.events.contains(&GameEvent::PlayerDamaged { health: 5 }));
        assert!(!out.world.particles.is_empty());
    }

    #[test]
    fn test_fatal_contact_ends_run() {
        let mut world = rammed_world(10);
        world.score = 300;
        world.best_score = 1000;
        let mut rng = SequenceRandom::new([0.5]);
        let out = tick(&world, &InputState::default(), 1016.0, &mut rng).unwrap();
        assert_eq!(out.world.health, 0);
        assert_eq!(out.world.phase, GamePhase::GameOver);
        assert_eq!(
            out.events.last(),
            Some(&GameEvent::GameOver {
                score: 300,
                best_score: 1000
            })
        );

        // Game over is reported once
        let again = tick(&out.world, &InputState::default(), 1032.0, &mut rng).unwrap();
        assert!(again.events.is_empty());
        assert_eq!(again.world.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_shield_absorbs_contact() {
        let mut world = rammed_world(20);
        world.shield_until = 5000.0;
        let mut rng = SequenceRandom::new([0.5]);
        let out = tick(&world, &InputState::default(), 1016.0, &mut rng).unwrap();
        assert_eq!(out.world.health, 20);
        assert!(out.world.enemies.is_empty());
        assert!(
            !out.events
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerDamaged { .. }))
        );
    }

    #[test]
    fn test_rapid_fire_pickup_replaces_timer() {
        use crate::sim::state::{Powerup, PowerupKind};

        let rapid_on_player = |world: &World| Powerup {
            pos: world.player.pos,
            kind: PowerupKind::Rapid,
        };
        let mut world = playing_world(1000.0);
        world.powerups.push(rapid_on_player(&world));
        let mut rng = SequenceRandom::new([0.5]);

        let out = tick(&world, &InputState::default(), 1000.0, &mut rng).unwrap();
        assert_eq!(out.world.rapid_fire_until, 9000.0);
        assert!(out.world.powerups.is_empty());
        assert!(out.events.contains(&GameEvent::PowerupCollected {
            kind: PowerupKind::Rapid
        }));

        let mut world = out.world;
        world.powerups.push(rapid_on_player(&world));
        let out = tick(&world, &InputState::default(), 2000.0, &mut rng).unwrap();
        assert_eq!(out.world.rapid_fire_until, 10_000.0);
    }

    fn health_on_player(world: &World) -> crate::sim::state::Powerup {
        crate::sim::state::Powerup {
            pos: world.player.pos,
            kind: crate::sim::state::PowerupKind::Health,
        }
    }

    #[test]
    fn test_same_tick_heal_offsets_full_damage() {
        let mut world = rammed_world(10);
        world.powerups.push(health_on_player(&world));
        let mut rng = SequenceRandom::new([0.5]);
        let out = tick(&world, &InputState::default(), 1016.0, &mut rng).unwrap();
        // 10 - 15 + 20
        assert_eq!(out.world.health, 15);
        assert_eq!(out.world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_double_contact_with_heal() {
        let mut world = rammed_world(20);
        let second = Enemy {
            pos: world.player.pos + Vec2::new(4.0, 0.0),
            kind: EnemyKind::Normal,
            hp: 1,
            phase: 0.0,
        };
        world.enemies.push(second);
        world.powerups.push(health_on_player(&world));
        let mut rng = SequenceRandom::new([0.5]);
        let out = tick(&world, &InputState::default(), 1016.0, &mut rng).unwrap();
        // 20 - 15 - 15 + 20
        assert_eq!(out.world.health, 10);
        assert!(out.world.enemies.is_empty());
    }

    #[test]
    fn test_overkill_without_heal_ends_at_zero() {
        let mut world = rammed_world(10);
        let pos = world.player.pos;
        world.enemies.push(Enemy {
            pos,
            kind: EnemyKind::Normal,
            hp: 1,
            phase: 0.0,
        });
        let mut rng = SequenceRandom::new([0.5]);
        let out = tick(&world, &InputState::default(), 1016.0, &mut rng).unwrap();
        assert_eq!(out.world.health, 0);
        assert_eq!(out.world.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_rest_starts_tick_after_last_kill() {
        use crate::sim::state::Bullet;

        let mut world = playing_world(0.0);
        world.spawn_queue = 0;
        world.enemies.push(Enemy {
            pos: Vec2::new(100.0, 100.0),
            kind: EnemyKind::Normal,
            hp: 1,
            phase: 0.0,
        });
        world.bullets.push(Bullet {
            pos: Vec2::new(116.0, 120.0),
        });
        let mut rng = SequenceRandom::new([0.5]);

        // Scheduler runs before collisions, so it still sees the enemy
        let out = tick(&world, &InputState::default(), 1000.0, &mut rng).unwrap();
        assert!(out.world.enemies.is_empty());
        assert_eq!(out.world.score, 100);
        assert_eq!(out.world.wave_rest_timer, None);

        let out = tick(&out.world, &InputState::default(), 1016.0, &mut rng).unwrap();
        assert_eq!(out.world.wave_rest_timer, Some(1016.0));
    }

    #[test]
    fn test_expired_buff_is_cleared() {
        let mut world = playing_world(0.0);
        world.rapid_fire_until = 100.0;
        let mut rng = SequenceRandom::new([0.5]);
        let out = tick(&world, &InputState::default(), 100.0, &mut rng).unwrap();
        assert_eq!(out.world.rapid_fire_until, 0.0);
        assert!(!out.world.rapid_fire_active(100.0));
    }

    #[test]
    fn test_queue_drains_one_per_delay() {
        let mut world = playing_world(0.0);
        let mut rng = SequenceRandom::new([0.5]);
        let mut now = 0.0;
        for _ in 0..30 {
            now += 16.0;
            world = tick(&world, &InputState::default(), now, &mut rng)
                .unwrap()
                .world;
        }
        // 480ms elapsed: exactly one spawn after the 400ms delay
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.spawn_queue, 5);
    }
}
