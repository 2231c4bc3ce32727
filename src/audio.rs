//! Audio cues
//!
//! Procedurally described sound effects - no external files needed!
//! Each [`SoundEffect`] is a short list of oscillator [`Voice`]s; an
//! [`AudioBackend`] turns them into sound. Playback is fire-and-forget.

use crate::sim::GameEvent;

/// Sound effect types, one per gameplay event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired
    Shot,
    /// Bullet hit an enemy that survived
    EnemyHit,
    /// Enemy destroyed
    EnemyDestroyed,
    /// Enemy rammed the player
    PlayerHit,
    /// Powerup collected
    PowerupCollect,
    /// Wave announced
    WaveStart,
    /// Game over
    GameOver,
}

impl From<&GameEvent> for SoundEffect {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::ShotFired => SoundEffect::Shot,
            GameEvent::EnemyDamaged { .. } => SoundEffect::EnemyHit,
            GameEvent::EnemyDestroyed { .. } => SoundEffect::EnemyDestroyed,
            GameEvent::PlayerDamaged { .. } => SoundEffect::PlayerHit,
            GameEvent::PowerupCollected { .. } => SoundEffect::PowerupCollect,
            GameEvent::WaveStarted { .. } => SoundEffect::WaveStart,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
        }
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator with an exponential pitch sweep and gain decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    /// Hz
    pub freq_start: f32,
    pub freq_end: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Seconds after the cue starts
    pub delay: f32,
    /// Seconds
    pub duration: f32,
}

const fn voice(
    waveform: Waveform,
    freq_start: f32,
    freq_end: f32,
    gain: f32,
    delay: f32,
    duration: f32,
) -> Voice {
    Voice {
        waveform,
        freq_start,
        freq_end,
        gain,
        delay,
        duration,
    }
}

const SHOT: &[Voice] = &[voice(Waveform::Square, 880.0, 440.0, 0.12, 0.0, 0.06)];

const ENEMY_HIT: &[Voice] = &[voice(Waveform::Triangle, 300.0, 300.0, 0.25, 0.0, 0.05)];

const ENEMY_DESTROYED: &[Voice] = &[
    voice(Waveform::Sawtooth, 100.0, 30.0, 0.4, 0.0, 0.25),
    voice(Waveform::Square, 1500.0, 200.0, 0.15, 0.0, 0.1),
];

const PLAYER_HIT: &[Voice] = &[
    voice(Waveform::Sine, 150.0, 60.0, 0.6, 0.0, 0.1),
    voice(Waveform::Sawtooth, 80.0, 40.0, 0.3, 0.0, 0.2),
];

// Rising arpeggio
const POWERUP_COLLECT: &[Voice] = &[
    voice(Waveform::Sine, 523.0, 523.0, 0.25, 0.0, 0.08),
    voice(Waveform::Sine, 659.0, 659.0, 0.25, 0.06, 0.08),
    voice(Waveform::Sine, 784.0, 784.0, 0.25, 0.12, 0.12),
];

const WAVE_START: &[Voice] = &[
    voice(Waveform::Triangle, 392.0, 392.0, 0.3, 0.0, 0.12),
    voice(Waveform::Triangle, 523.0, 523.0, 0.3, 0.1, 0.12),
    voice(Waveform::Triangle, 659.0, 659.0, 0.3, 0.2, 0.2),
];

// Falling arpeggio
const GAME_OVER: &[Voice] = &[
    voice(Waveform::Sine, 392.0, 392.0, 0.35, 0.0, 0.25),
    voice(Waveform::Sine, 330.0, 330.0, 0.35, 0.2, 0.25),
    voice(Waveform::Sine, 262.0, 262.0, 0.35, 0.4, 0.25),
    voice(Waveform::Sine, 196.0, 98.0, 0.35, 0.6, 0.6),
];

impl SoundEffect {
    pub fn voices(&self) -> &'static [Voice] {
        match self {
            SoundEffect::Shot => SHOT,
            SoundEffect::EnemyHit => ENEMY_HIT,
            SoundEffect::EnemyDestroyed => ENEMY_DESTROYED,
            SoundEffect::PlayerHit => PLAYER_HIT,
            SoundEffect::PowerupCollect => POWERUP_COLLECT,
            SoundEffect::WaveStart => WAVE_START,
            SoundEffect::GameOver => GAME_OVER,
        }
    }
}

/// Something that can make noise
pub trait AudioBackend {
    /// Start one voice; must return immediately
    fn play_voice(&mut self, effect: SoundEffect, voice: &Voice, volume: f32);
}

/// Backend that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LoggingAudio;

impl AudioBackend for LoggingAudio {
    fn play_voice(&mut self, effect: SoundEffect, voice: &Voice, volume: f32) {
        log::trace!(
            "{:?}: {:?} {:.0}->{:.0}Hz vol {:.2}",
            effect,
            voice.waveform,
            voice.freq_start,
            voice.freq_end,
            volume * voice.gain
        );
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn AudioBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager that drops every cue
    pub fn silent() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        for voice in effect.voices() {
            backend.play_voice(effect, voice, vol);
        }
    }

    /// Cue every event of a tick, in order
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            self.play(SoundEffect::from(event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<(SoundEffect, f32)>>>);

    impl AudioBackend for Recorder {
        fn play_voice(&mut self, effect: SoundEffect, _voice: &Voice, volume: f32) {
            self.0.borrow_mut().push((effect, volume));
        }
    }

    #[test]
    fn test_events_map_to_cues() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Some(Box::new(recorder.clone())));
        audio.handle_events(&[GameEvent::ShotFired, GameEvent::WaveStarted { wave: 2 }]);

        let played = recorder.0.borrow();
        assert_eq!(played.len(), SHOT.len() + WAVE_START.len());
        assert_eq!(played[0].0, SoundEffect::Shot);
        assert_eq!(played.last().map(|p| p.0), Some(SoundEffect::WaveStart));
        assert!((played[0].1 - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Some(Box::new(recorder.clone())));
        audio.set_muted(true);
        audio.play(SoundEffect::GameOver);
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_volume_clamped() {
        let mut audio = AudioManager::silent();
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
        // No backend: still fine to call
        audio.play(SoundEffect::Shot);
        assert!(!audio.is_enabled());
    }
}
