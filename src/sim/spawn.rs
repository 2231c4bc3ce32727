//! Wave-based enemy spawning
//!
//! A wave cycles through three states:
//! - spawning: `spawn_queue > 0`, one enemy every `WAVE_SPAWN_DELAY` ms
//! - active: queue empty, enemies still alive
//! - resting: queue empty and arena clear; after `WAVE_REST_DELAY` ms the
//!   next wave is queued

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Enemy, EnemyKind, GameEvent};
use crate::consts::*;

/// Scheduler-owned slice of the world
#[derive(Debug, Clone, PartialEq)]
pub struct WaveState {
    pub wave: u32,
    pub spawn_queue: u32,
    pub spawn_timer: f64,
    pub wave_rest_timer: Option<f64>,
    pub wave_text: String,
    pub wave_text_life: u32,
}

/// Enemies queued for a wave
pub fn wave_size(wave: u32) -> u32 {
    BASE_ENEMIES_PER_WAVE + wave * ENEMIES_PER_WAVE_INC
}

/// Banner text for a wave
pub fn wave_banner(wave: u32) -> String {
    format!("WAVE {}", wave)
}

/// Roll an enemy kind; fast unlocks at wave 2, tank at wave 5
pub fn roll_enemy_kind(wave: u32, rng: &mut dyn RandomSource) -> EnemyKind {
    let r = rng.next_f32();
    if wave >= 5 && r < 0.15 {
        EnemyKind::Tank
    } else if wave >= 2 && r < 0.35 {
        EnemyKind::Fast
    } else {
        EnemyKind::Normal
    }
}

/// Hit points: per-kind base plus one every four waves
pub fn enemy_hp(kind: EnemyKind, wave: u32) -> u32 {
    kind.base_hp() + wave / WAVES_PER_EXTRA_HP
}

/// Create one enemy just above the arena
pub fn spawn_enemy(wave: u32, rng: &mut dyn RandomSource) -> Enemy {
    let kind = roll_enemy_kind(wave, rng);
    let x = rng.range(0.0, ARENA_WIDTH - ENEMY_WIDTH);
    let y = -ENEMY_HEIGHT - rng.range(0.0, ENEMY_SPAWN_STAGGER);
    let phase = rng.range(0.0, std::f32::consts::TAU);
    Enemy {
        pos: Vec2::new(x, y),
        kind,
        hp: enemy_hp(kind, wave),
        phase,
    }
}

/// Run the scheduler for one tick
///
/// Returns the updated wave state and enemy list. Calling it repeatedly
/// while resting never advances more than one wave per elapsed rest delay.
pub fn schedule(
    mut waves: WaveState,
    mut enemies: Vec<Enemy>,
    now: f64,
    rng: &mut dyn RandomSource,
    events: &mut Vec<GameEvent>,
) -> (WaveState, Vec<Enemy>) {
    if waves.spawn_queue > 0 && now - waves.spawn_timer > WAVE_SPAWN_DELAY {
        enemies.push(spawn_enemy(waves.wave, rng));
        waves.spawn_queue -= 1;
        waves.spawn_timer = now;
    }

    let arena_clear = waves.spawn_queue == 0 && enemies.is_empty();

    if arena_clear && waves.wave_rest_timer.is_none() {
        waves.wave_rest_timer = Some(now);
    }

    if let Some(rest_started) = waves.wave_rest_timer {
        if arena_clear && now - rest_started > WAVE_REST_DELAY {
            waves.wave += 1;
            waves.spawn_queue = wave_size(waves.wave);
            waves.spawn_timer = now;
            waves.wave_rest_timer = None;
            waves.wave_text = wave_banner(waves.wave);
            waves.wave_text_life = WAVE_TEXT_LIFE;
            log::info!("Wave {} started ({} enemies)", waves.wave, waves.spawn_queue);
            events.push(GameEvent::WaveStarted { wave: waves.wave });
        }
    }

    (waves, enemies)
}
