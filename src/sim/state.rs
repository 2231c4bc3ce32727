//! World state and entity types
//!
//! Everything the simulation step reads or writes lives in [`World`]. The
//! presentation layer only ever sees it through a shared reference.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rect;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start
    #[default]
    Title,
    /// Active gameplay
    Playing,
    /// Run ended; only cosmetic decay continues
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Title => "title",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "gameover",
        }
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Normal,
    /// Quicker, sways sideways
    Fast,
    /// Slow and tough
    Tank,
}

impl EnemyKind {
    /// Descent speed relative to the wave's base speed
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            EnemyKind::Normal => 1.0,
            EnemyKind::Fast => 1.6,
            EnemyKind::Tank => 0.6,
        }
    }

    /// Hit points before wave scaling
    pub fn base_hp(&self) -> u32 {
        match self {
            EnemyKind::Normal | EnemyKind::Fast => 1,
            EnemyKind::Tank => 3,
        }
    }

    /// Kill score multiplier
    pub fn score_multiplier(&self) -> u64 {
        match self {
            EnemyKind::Normal => 1,
            EnemyKind::Fast => 2,
            EnemyKind::Tank => 3,
        }
    }

    /// Points awarded for destroying this kind
    pub fn kill_score(&self) -> u64 {
        SCORE_PER_KILL * self.score_multiplier()
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Health,
    Rapid,
    Shield,
}

/// The player's ship (health lives on the world)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                ARENA_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                ARENA_HEIGHT - PLAYER_SPAWN_OFFSET,
            ),
        }
    }
}

/// A player bullet; `pos.x` is the horizontal center, `pos.y` the top edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.pos.x - BULLET_WIDTH / 2.0,
            self.pos.y,
            BULLET_WIDTH,
            BULLET_HEIGHT,
        )
    }
}

/// An enemy ship
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Top-left corner
    pub pos: Vec2,
    pub kind: EnemyKind,
    /// Remaining hit points (always >= 1 while alive)
    pub hp: u32,
    /// Sway phase offset in radians
    pub phase: f32,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, ENEMY_WIDTH, ENEMY_HEIGHT)
    }
}

/// Particle palette; the renderer maps these to actual colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    /// Enemy destroyed (yellow)
    Kill,
    /// Bullet impact on a surviving enemy (cyan)
    Impact,
    /// Enemy rammed the player, and the final player explosion (pink)
    Contact,
    /// Powerup collected (green)
    Pickup,
}

/// A particle for visual effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decreases every tick
    pub life: f32,
    pub max_life: f32,
    pub color: ParticleColor,
    pub size: f32,
}

/// A falling power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    /// Top-left corner
    pub pos: Vec2,
    pub kind: PowerupKind,
}

impl Powerup {
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, POWERUP_SIZE, POWERUP_SIZE)
    }
}

/// Floating "+points" label shown on a kill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePopup {
    pub pos: Vec2,
    pub value: u64,
    /// 0-1, decreases every tick
    pub life: f32,
}

/// Notable things that happened during a tick, in resolution order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired,
    EnemyDamaged { kind: EnemyKind, hp: u32 },
    EnemyDestroyed { kind: EnemyKind, points: u64 },
    PlayerDamaged { health: u32 },
    PowerupCollected { kind: PowerupKind },
    WaveStarted { wave: u32 },
    GameOver { score: u64, best_score: u64 },
}

/// Broken world invariant, reported by [`World::validate_invariants`]
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("health {health} outside 0..={max_health}")]
    HealthOutOfRange { health: u32, max_health: u32 },
    #[error("enemy {index} has no hit points left")]
    DeadEnemy { index: usize },
    #[error("particle {index} life {life} outside (0, 1]")]
    ParticleLife { index: usize, life: f32 },
    #[error("score popup {index} life {life} outside (0, 1]")]
    PopupLife { index: usize, life: f32 },
    #[error("best score {best_score} below current score {score}")]
    BestScoreBehind { score: u64, best_score: u64 },
    #[error("non-finite {what} position")]
    NonFinite { what: &'static str },
}

/// Complete simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub phase: GamePhase,
    pub player: Player,
    /// Entity collections; order matters for collision tie-breaking
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub powerups: Vec<Powerup>,
    pub score_popups: Vec<ScorePopup>,
    /// Never decreases during a run
    pub score: u64,
    /// Best score across all runs seen by this session
    pub best_score: u64,
    /// 0 before the first run, 1 on start
    pub wave: u32,
    pub health: u32,
    pub max_health: u32,
    /// Screen shake intensity (0-1)
    pub shake: f32,
    /// Wave announcement banner
    pub wave_text: String,
    /// Remaining banner ticks
    pub wave_text_life: u32,
    /// Buff expiry timestamps (ms); active iff greater than now
    pub rapid_fire_until: f64,
    pub shield_until: f64,
    /// Timestamp of the last shot (ms)
    pub last_shot: f64,
    /// Enemies still to be spawned this wave
    pub spawn_queue: u32,
    /// Timestamp of the last spawn (ms)
    pub spawn_timer: f64,
    /// When the arena was found empty; `None` while not resting
    pub wave_rest_timer: Option<f64>,
    /// Shooting intent is always on (touch-primary sessions)
    pub auto_fire: bool,
    /// Gameplay tick counter
    pub ticks: u64,
}

impl World {
    /// Fresh title-screen world
    pub fn new(best_score: u64, auto_fire: bool) -> Self {
        Self {
            phase: GamePhase::Title,
            player: Player::default(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            powerups: Vec::new(),
            score_popups: Vec::new(),
            score: 0,
            best_score,
            wave: 0,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            shake: 0.0,
            wave_text: String::new(),
            wave_text_life: 0,
            rapid_fire_until: 0.0,
            shield_until: 0.0,
            last_shot: 0.0,
            spawn_queue: 0,
            spawn_timer: 0.0,
            wave_rest_timer: None,
            auto_fire,
            ticks: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn rapid_fire_active(&self, now: f64) -> bool {
        self.rapid_fire_until > now
    }

    pub fn shield_active(&self, now: f64) -> bool {
        self.shield_until > now
    }

    /// Check the invariants every tick must preserve
    pub fn validate_invariants(&self) -> Result<(), InvariantViolation> {
        if self.health > self.max_health {
            return Err(InvariantViolation::HealthOutOfRange {
                health: self.health,
                max_health: self.max_health,
            });
        }
        if !self.player.pos.is_finite() {
            return Err(InvariantViolation::NonFinite { what: "player" });
        }
        if self.bullets.iter().any(|b| !b.pos.is_finite()) {
            return Err(InvariantViolation::NonFinite { what: "bullet" });
        }
        if self.powerups.iter().any(|p| !p.pos.is_finite()) {
            return Err(InvariantViolation::NonFinite { what: "powerup" });
        }
        for (index, enemy) in self.enemies.iter().enumerate() {
            if enemy.hp == 0 {
                return Err(InvariantViolation::DeadEnemy { index });
            }
            if !enemy.pos.is_finite() {
                return Err(InvariantViolation::NonFinite { what: "enemy" });
            }
        }
        for (index, p) in self.particles.iter().enumerate() {
            if !(p.life > 0.0 && p.life <= 1.0) {
                return Err(InvariantViolation::ParticleLife { index, life: p.life });
            }
        }
        for (index, sp) in self.score_popups.iter().enumerate() {
            if !(sp.life > 0.0 && sp.life <= 1.0) {
                return Err(InvariantViolation::PopupLife { index, life: sp.life });
            }
        }
        if self.phase != GamePhase::Title && self.best_score < self.score {
            return Err(InvariantViolation::BestScoreBehind {
                score: self.score,
                best_score: self.best_score,
            });
        }
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(0, false)
    }
}
