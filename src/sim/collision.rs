//! Collision detection and resolution
//!
//! Everything is axis-aligned rectangle overlap. Three passes run in a fixed
//! order each tick: bullets against enemies, enemies against the player,
//! then powerups against the player.

use super::buffs::{BuffTimers, apply_pickup};
use super::effects::{self, CONTACT_BURST, IMPACT_BURST, KILL_BURST, PICKUP_BURST};
use super::rng::RandomSource;
use super::state::{
    Bullet, Enemy, GameEvent, Particle, ParticleColor, Player, Powerup, PowerupKind, ScorePopup,
};
use crate::consts::*;
use glam::Vec2;

/// Side effects collected while resolving a tick's collisions
#[derive(Debug, Clone, Default)]
pub struct Fallout {
    pub particles: Vec<Particle>,
    pub score_popups: Vec<ScorePopup>,
    pub events: Vec<GameEvent>,
    /// Seed for cosmetic particle spread
    pub seed: u32,
}

impl Fallout {
    fn burst(&mut self, pos: Vec2, color: ParticleColor, count: u32) {
        effects::burst(&mut self.particles, pos, color, count, self.seed);
    }
}

/// Outcome of the bullet pass
#[derive(Debug, Clone)]
pub struct BulletHits {
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    /// Powerups including any new drops
    pub powerups: Vec<Powerup>,
    pub points: u64,
}

/// Roll a drop kind: health 50%, rapid 30%, shield 20%
pub fn roll_powerup_kind(rng: &mut dyn RandomSource) -> PowerupKind {
    let r = rng.next_f32();
    if r < 0.5 {
        PowerupKind::Health
    } else if r < 0.8 {
        PowerupKind::Rapid
    } else {
        PowerupKind::Shield
    }
}

/// Resolve bullets against enemies
///
/// Bullets are processed in order; each one hits the first overlapping
/// enemy (in stored order) that has not already been hit this tick. A bullet
/// is consumed by its hit and never pierces. Bullets that hit nothing
/// survive.
pub fn resolve_bullet_hits(
    bullets: Vec<Bullet>,
    mut enemies: Vec<Enemy>,
    mut powerups: Vec<Powerup>,
    rng: &mut dyn RandomSource,
    fallout: &mut Fallout,
) -> BulletHits {
    let mut hit = vec![false; enemies.len()];
    let mut survivors = Vec::with_capacity(bullets.len());
    let mut points = 0;

    for bullet in bullets {
        let bullet_rect = bullet.rect();
        let target = enemies
            .iter()
            .zip(&hit)
            .position(|(enemy, &already_hit)| !already_hit && enemy.rect().overlaps(&bullet_rect));

        let Some(idx) = target else {
            survivors.push(bullet);
            continue;
        };

        hit[idx] = true;
        let enemy = &mut enemies[idx];
        enemy.hp = enemy.hp.saturating_sub(1);

        if enemy.hp == 0 {
            let enemy = *enemy;
            let value = enemy.kind.kill_score();
            points += value;

            fallout.burst(enemy.rect().center(), ParticleColor::Kill, KILL_BURST);
            fallout.score_popups.push(ScorePopup {
                pos: Vec2::new(enemy.pos.x + ENEMY_WIDTH / 2.0, enemy.pos.y),
                value,
                life: 1.0,
            });
            fallout.events.push(GameEvent::EnemyDestroyed {
                kind: enemy.kind,
                points: value,
            });

            if rng.chance(POWERUP_DROP_CHANCE) {
                let kind = roll_powerup_kind(rng);
                powerups.push(Powerup {
                    pos: enemy.pos,
                    kind,
                });
            }
        } else {
            let (kind, hp) = (enemy.kind, enemy.hp);
            fallout.burst(bullet.pos, ParticleColor::Impact, IMPACT_BURST);
            fallout.events.push(GameEvent::EnemyDamaged { kind, hp });
        }
    }

    enemies.retain(|e| e.hp > 0);

    BulletHits {
        bullets: survivors,
        enemies,
        powerups,
        points,
    }
}

/// Outcome of the contact pass
#[derive(Debug, Clone)]
pub struct Contacts {
    pub enemies: Vec<Enemy>,
    /// Unclamped; may go negative until the end of the tick
    pub health: i64,
    pub shake: f32,
}

/// Resolve enemies against the player
///
/// Any enemy touching the player is destroyed. Without a shield the player
/// takes `COLLISION_DAMAGE` and the screen shakes at full strength. Enemies
/// that drift below the arena are discarded quietly.
///
/// Health is not floored here so a same-tick health pickup restores from
/// the true total.
pub fn resolve_contacts(
    enemies: Vec<Enemy>,
    player: &Player,
    shielded: bool,
    health: i64,
    shake: f32,
    fallout: &mut Fallout,
) -> Contacts {
    let player_rect = player.rect();
    let mut out = Contacts {
        enemies: Vec::with_capacity(enemies.len()),
        health,
        shake,
    };

    for enemy in enemies {
        if enemy.pos.y > ARENA_HEIGHT + ENEMY_DESPAWN_MARGIN {
            continue;
        }
        let rect = enemy.rect();
        if rect.overlaps(&player_rect) {
            if !shielded {
                out.health -= i64::from(COLLISION_DAMAGE);
                out.shake = 1.0;
                fallout.events.push(GameEvent::PlayerDamaged {
                    health: out.health.max(0) as u32,
                });
            }
            fallout.burst(rect.center(), ParticleColor::Contact, CONTACT_BURST);
            continue;
        }
        out.enemies.push(enemy);
    }

    out
}

/// Outcome of the pickup pass
#[derive(Debug, Clone)]
pub struct Pickups {
    pub powerups: Vec<Powerup>,
    /// Unclamped, like [`Contacts::health`]
    pub health: i64,
    pub timers: BuffTimers,
}

/// Resolve (already fallen) powerups against the player
pub fn resolve_pickups(
    powerups: Vec<Powerup>,
    player: &Player,
    health: i64,
    max_health: u32,
    timers: BuffTimers,
    now: f64,
    fallout: &mut Fallout,
) -> Pickups {
    let player_rect = player.rect();
    let mut out = Pickups {
        powerups: Vec::with_capacity(powerups.len()),
        health,
        timers,
    };

    for powerup in powerups {
        if powerup.pos.y > ARENA_HEIGHT {
            continue;
        }
        let rect = powerup.rect();
        if rect.overlaps(&player_rect) {
            let (health, timers) = apply_pickup(powerup.kind, out.health, max_health, out.timers, now);
            out.health = health;
            out.timers = timers;
            fallout.events.push(GameEvent::PowerupCollected { kind: powerup.kind });
            fallout.burst(rect.center(), ParticleColor::Pickup, PICKUP_BURST);
            continue;
        }
        out.powerups.push(powerup);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SequenceRandom;
    use crate::sim::state::EnemyKind;

    fn enemy_at(x: f32, y: f32, kind: EnemyKind, hp: u32) -> Enemy {
        Enemy {
            pos: Vec2::new(x, y),
            kind,
            hp,
            phase: 0.0,
        }
    }

    /// Bullet whose rect sits inside an enemy at (x, y)
    fn bullet_into(x: f32, y: f32) -> Bullet {
        Bullet {
            pos: Vec2::new(x + ENEMY_WIDTH / 2.0, y + 4.0),
        }
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player {
            pos: Vec2::new(x, y),
        }
    }

    fn no_buffs() -> BuffTimers {
        BuffTimers {
            rapid_fire_until: 0.0,
            shield_until: 0.0,
        }
    }

    #[test]
    fn test_bullet_kills_first_enemy_only() {
        // Two stacked enemies; the bullet must hit the first one stored
        let enemies = vec![
            enemy_at(100.0, 100.0, EnemyKind::Normal, 1),
            enemy_at(100.0, 100.0, EnemyKind::Fast, 1),
        ];
        let mut rng = SequenceRandom::new([0.9]);
        let mut fallout = Fallout::default();
        let out = resolve_bullet_hits(
            vec![bullet_into(100.0, 100.0)],
            enemies,
            Vec::new(),
            &mut rng,
            &mut fallout,
        );
        assert!(out.bullets.is_empty());
        assert_eq!(out.enemies.len(), 1);
        assert_eq!(out.enemies[0].kind, EnemyKind::Fast);
        assert_eq!(out.points, 100);
        assert_eq!(fallout.particles.len(), KILL_BURST as usize);
        assert_eq!(fallout.score_popups.len(), 1);
        assert_eq!(fallout.score_popups[0].value, 100);
        assert_eq!(fallout.score_popups[0].pos, Vec2::new(116.0, 100.0));
        assert!(out.powerups.is_empty());
    }

    #[test]
    fn test_enemy_takes_one_hit_per_tick() {
        let enemies = vec![enemy_at(100.0, 100.0, EnemyKind::Tank, 3)];
        let bullets = vec![bullet_into(100.0, 100.0), bullet_into(100.0, 100.0)];
        let mut rng = SequenceRandom::new([0.9]);
        let mut fallout = Fallout::default();
        let out = resolve_bullet_hits(bullets, enemies, Vec::new(), &mut rng, &mut fallout);

        assert_eq!(out.enemies[0].hp, 2);
        assert_eq!(out.bullets.len(), 1);
        assert_eq!(out.points, 0);
        assert_eq!(fallout.particles.len(), IMPACT_BURST as usize);
        assert_eq!(
            fallout.events,
            vec![GameEvent::EnemyDamaged {
                kind: EnemyKind::Tank,
                hp: 2
            }]
        );
        // Cosmetic spread never draws from the gameplay source
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_second_bullet_moves_on_to_next_enemy() {
        let enemies = vec![
            enemy_at(100.0, 100.0, EnemyKind::Tank, 3),
            enemy_at(100.0, 100.0, EnemyKind::Normal, 1),
        ];
        let bullets = vec![bullet_into(100.0, 100.0), bullet_into(100.0, 100.0)];
        let mut rng = SequenceRandom::new([0.9]);
        let mut fallout = Fallout::default();
        let out = resolve_bullet_hits(bullets, enemies, Vec::new(), &mut rng, &mut fallout);

        assert!(out.bullets.is_empty());
        assert_eq!(out.enemies.len(), 1);
        assert_eq!(out.enemies[0].hp, 2);
        assert_eq!(out.points, 100);
    }

    #[test]
    fn test_kill_scores_by_kind() {
        let enemies = vec![
            enemy_at(0.0, 100.0, EnemyKind::Tank, 1),
            enemy_at(100.0, 100.0, EnemyKind::Fast, 1),
        ];
        let bullets = vec![bullet_into(0.0, 100.0), bullet_into(100.0, 100.0)];
        let mut rng = SequenceRandom::new([0.9]);
        let mut fallout = Fallout::default();
        let out = resolve_bullet_hits(bullets, enemies, Vec::new(), &mut rng, &mut fallout);
        assert_eq!(out.points, 500);
        assert!(out.enemies.is_empty());
    }

    #[test]
    fn test_missing_bullet_survives() {
        let enemies = vec![enemy_at(100.0, 100.0, EnemyKind::Normal, 1)];
        let mut rng = SequenceRandom::new([0.9]);
        let mut fallout = Fallout::default();
        let out = resolve_bullet_hits(
            vec![bullet_into(300.0, 400.0)],
            enemies,
            Vec::new(),
            &mut rng,
            &mut fallout,
        );
        assert_eq!(out.bullets.len(), 1);
        assert_eq!(out.enemies.len(), 1);
        assert!(fallout.events.is_empty());
    }

    #[test]
    fn test_kill_can_drop_powerup() {
        let enemies = vec![enemy_at(100.0, 100.0, EnemyKind::Normal, 1)];
        // Drop roll 0.05 < 0.12, kind roll 0.6 -> rapid
        let mut rng = SequenceRandom::new([0.05, 0.6]);
        let mut fallout = Fallout::default();
        let out = resolve_bullet_hits(
            vec![bullet_into(100.0, 100.0)],
            enemies,
            Vec::new(),
            &mut rng,
            &mut fallout,
        );
        assert_eq!(out.powerups.len(), 1);
        assert_eq!(out.powerups[0].kind, PowerupKind::Rapid);
        assert_eq!(out.powerups[0].pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_powerup_kind_weights() {
        let mut rng = SequenceRandom::new([0.49, 0.5, 0.79, 0.8]);
        assert_eq!(roll_powerup_kind(&mut rng), PowerupKind::Health);
        assert_eq!(roll_powerup_kind(&mut rng), PowerupKind::Rapid);
        assert_eq!(roll_powerup_kind(&mut rng), PowerupKind::Rapid);
        assert_eq!(roll_powerup_kind(&mut rng), PowerupKind::Shield);
    }

    #[test]
    fn test_contact_damages_unshielded_player() {
        let player = player_at(100.0, 500.0);
        let enemies = vec![enemy_at(100.0, 500.0, EnemyKind::Normal, 1)];
        let mut fallout = Fallout::default();
        let out = resolve_contacts(enemies, &player, false, 20, 0.0, &mut fallout);
        assert!(out.enemies.is_empty());
        assert_eq!(out.health, 5);
        assert_eq!(out.shake, 1.0);
        assert_eq!(fallout.particles.len(), CONTACT_BURST as usize);
        assert_eq!(fallout.events, vec![GameEvent::PlayerDamaged { health: 5 }]);
    }

    #[test]
    fn test_contact_with_shield() {
        let player = player_at(100.0, 500.0);
        let enemies = vec![enemy_at(100.0, 500.0, EnemyKind::Tank, 5)];
        let mut fallout = Fallout::default();
        let out = resolve_contacts(enemies, &player, true, 20, 0.3, &mut fallout);
        assert!(out.enemies.is_empty());
        assert_eq!(out.health, 20);
        assert_eq!(out.shake, 0.3);
        assert_eq!(fallout.particles.len(), CONTACT_BURST as usize);
        assert!(fallout.events.is_empty());
    }

    #[test]
    fn test_damage_is_not_floored_mid_tick() {
        let player = player_at(100.0, 500.0);
        let enemies = vec![
            enemy_at(100.0, 500.0, EnemyKind::Normal, 1),
            enemy_at(110.0, 510.0, EnemyKind::Normal, 1),
        ];
        let mut fallout = Fallout::default();
        let out = resolve_contacts(enemies, &player, false, 10, 0.0, &mut fallout);
        assert_eq!(out.health, -20);
        assert_eq!(
            fallout.events,
            vec![
                GameEvent::PlayerDamaged { health: 0 },
                GameEvent::PlayerDamaged { health: 0 }
            ]
        );
    }

    #[test]
    fn test_health_pickup_restores_from_negative() {
        let player = player_at(100.0, 500.0);
        let powerups = vec![Powerup {
            pos: Vec2::new(100.0, 500.0),
            kind: PowerupKind::Health,
        }];
        let mut fallout = Fallout::default();
        let out = resolve_pickups(powerups, &player, -10, 100, no_buffs(), 0.0, &mut fallout);
        assert_eq!(out.health, 10);
    }

    #[test]
    fn test_enemies_below_arena_removed_quietly() {
        let player = player_at(0.0, 0.0);
        let enemies = vec![
            enemy_at(100.0, ARENA_HEIGHT + ENEMY_DESPAWN_MARGIN + 1.0, EnemyKind::Normal, 1),
            enemy_at(100.0, ARENA_HEIGHT + 10.0, EnemyKind::Normal, 1),
        ];
        let mut fallout = Fallout::default();
        let out = resolve_contacts(enemies, &player, false, 100, 0.0, &mut fallout);
        assert_eq!(out.enemies.len(), 1);
        assert_eq!(out.health, 100);
        assert!(fallout.particles.is_empty());
    }

    #[test]
    fn test_pickup_applies_and_removes() {
        let player = player_at(100.0, 500.0);
        let powerups = vec![
            Powerup {
                pos: Vec2::new(110.0, 510.0),
                kind: PowerupKind::Shield,
            },
            Powerup {
                pos: Vec2::new(300.0, 100.0),
                kind: PowerupKind::Health,
            },
        ];
        let mut fallout = Fallout::default();
        let out = resolve_pickups(powerups, &player, 50, 100, no_buffs(), 1000.0, &mut fallout);
        assert_eq!(out.powerups.len(), 1);
        assert_eq!(out.timers.shield_until, 1000.0 + SHIELD_DURATION);
        assert_eq!(out.health, 50);
        assert_eq!(fallout.particles.len(), PICKUP_BURST as usize);
        assert_eq!(
            fallout.events,
            vec![GameEvent::PowerupCollected {
                kind: PowerupKind::Shield
            }]
        );
    }

    #[test]
    fn test_powerup_leaves_arena() {
        let player = player_at(0.0, 0.0);
        let powerups = vec![Powerup {
            pos: Vec2::new(100.0, ARENA_HEIGHT + 1.0),
            kind: PowerupKind::Rapid,
        }];
        let mut fallout = Fallout::default();
        let out = resolve_pickups(powerups, &player, 50, 100, no_buffs(), 0.0, &mut fallout);
        assert!(out.powerups.is_empty());
        assert_eq!(out.timers, no_buffs());
        assert!(fallout.particles.is_empty());
    }
}
