//! UI-facing contracts
//!
//! The simulation never draws. Presenters get a read-only view of the
//! world and the frame counter; status observers get a small summary for
//! menus and HUD overlays after each tick.

use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, World};

/// Snapshot handed to status observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiStatus {
    pub phase: GamePhase,
    pub score: u64,
    pub best_score: u64,
    pub wave: u32,
    pub health: u32,
}

impl From<&World> for UiStatus {
    fn from(world: &World) -> Self {
        Self {
            phase: world.phase,
            score: world.score,
            best_score: world.best_score,
            wave: world.wave,
            health: world.health,
        }
    }
}

/// Receives a [`UiStatus`] after every tick
pub trait StatusObserver {
    fn on_status(&mut self, status: &UiStatus);
}

impl<F: FnMut(&UiStatus)> StatusObserver for F {
    fn on_status(&mut self, status: &UiStatus) {
        self(status)
    }
}

/// Draws a world snapshot; must not mutate it
pub trait Presenter {
    fn present(&mut self, world: &World, frame: u64);
}

/// Text HUD line, e.g. for logging headless runs
#[derive(Debug, Default, Clone)]
pub struct HudText {
    pub line: String,
}

impl Presenter for HudText {
    fn present(&mut self, world: &World, frame: u64) {
        let mut line = format!(
            "[{}] frame {} | wave {} | score {} (best {}) | hp {}/{} | enemies {} bullets {}",
            world.phase.as_str(),
            frame,
            world.wave,
            world.score,
            world.best_score,
            world.health,
            world.max_health,
            world.enemies.len(),
            world.bullets.len(),
        );
        if world.wave_text_life > 0 {
            line.push_str(&format!(" | {}", world.wave_text));
        }
        self.line = line;
    }
}
