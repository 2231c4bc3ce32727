//! Game phase transitions: title -> playing -> gameover -> playing
//!
//! Starting (or restarting) replaces the world wholesale, keeping only the
//! best score and the session's autofire mode.

use super::effects::{self, TERMINAL_BURST};
use super::spawn::{wave_banner, wave_size};
use super::state::{GameEvent, GamePhase, ParticleColor, World};
use crate::consts::*;

/// Fresh world for a new run, with wave 1 already queued
pub fn begin_run(previous: &World, now: f64) -> (World, GameEvent) {
    let mut world = World::new(previous.best_score, previous.auto_fire);
    world.phase = GamePhase::Playing;
    world.wave = 1;
    world.spawn_queue = wave_size(1);
    world.spawn_timer = now;
    world.wave_text = wave_banner(1);
    world.wave_text_life = WAVE_TEXT_LIFE;

    log::info!(
        "Run started (best score {}, {} enemies queued)",
        world.best_score,
        world.spawn_queue
    );
    (world, GameEvent::WaveStarted { wave: 1 })
}

/// Clamp the tick's running health total into `0..=max_health`
pub fn clamp_health(health: i64, max_health: u32) -> u32 {
    health.clamp(0, i64::from(max_health)) as u32
}

/// End-of-tick bookkeeping: banner countdown, best score, game over
pub fn settle(mut world: World, events: &mut Vec<GameEvent>) -> World {
    world.wave_text_life = world.wave_text_life.saturating_sub(1);
    world.best_score = world.best_score.max(world.score);

    if world.phase == GamePhase::Playing && world.health == 0 {
        world.phase = GamePhase::GameOver;
        let center = world.player.rect().center();
        effects::burst(
            &mut world.particles,
            center,
            ParticleColor::Contact,
            TERMINAL_BURST,
            world.ticks as u32,
        );
        log::info!(
            "Game over on wave {} with score {} (best {})",
            world.wave,
            world.score,
            world.best_score
        );
        events.push(GameEvent::GameOver {
            score: world.score,
            best_score: world.best_score,
        });
    }

    world
}
