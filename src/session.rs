//! Game session
//!
//! Owns the live [`World`] and everything a tick needs: the random source,
//! the shared input snapshot, the best-score store, audio and the UI status
//! observer. The world is only ever replaced by a successful tick.

use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::{AudioBackend, AudioManager};
use crate::persistence::BestScoreStore;
use crate::settings::Settings;
use crate::sim::effects::cap_particles;
use crate::sim::{
    GameEvent, InputState, InvariantViolation, RandomSource, SeededRandom, TickError, TickOutput,
    World, begin_run, tick,
};
use crate::ui::{Presenter, StatusObserver, UiStatus};

/// Input snapshot shared with input-capture callbacks
pub type SharedInput = Rc<RefCell<InputState>>;

/// One player's game session
pub struct Session {
    world: World,
    rng: Box<dyn RandomSource>,
    input: SharedInput,
    store: Box<dyn BestScoreStore>,
    audio: AudioManager,
    observer: Option<Box<dyn StatusObserver>>,
    /// Frames stepped, including skipped ones
    frame: u64,
    skipped_ticks: u64,
    max_particles: usize,
}

impl Session {
    /// Create a session on the title screen, best score read from `store`
    pub fn new(
        store: Box<dyn BestScoreStore>,
        rng: Box<dyn RandomSource>,
        audio: AudioManager,
        auto_fire: bool,
    ) -> Self {
        let best_score = store.get();
        log::info!(
            "Session created (best score {}, autofire {})",
            best_score,
            auto_fire
        );
        Self {
            world: World::new(best_score, auto_fire),
            rng,
            input: SharedInput::default(),
            store,
            audio,
            observer: None,
            frame: 0,
            skipped_ticks: 0,
            max_particles: crate::consts::MAX_PARTICLES,
        }
    }

    /// Create a session configured from settings
    pub fn from_settings(
        settings: &Settings,
        store: Box<dyn BestScoreStore>,
        audio_backend: Option<Box<dyn AudioBackend>>,
    ) -> Self {
        let rng = match settings.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        log::info!("Game initialized with seed: {}", rng.seed());

        let mut audio = AudioManager::new(audio_backend);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        let mut session = Self::new(store, Box::new(rng), audio, settings.auto_fire);
        session.max_particles = settings.max_particles;
        session
    }

    /// Attach the UI status observer
    pub fn with_observer(mut self, observer: impl StatusObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Begin a run: fresh world, wave 1 queued
    pub fn start(&mut self, now: f64) {
        let (world, event) = begin_run(&self.world, now);
        self.world = world;
        self.dispatch(&[event]);
        self.notify();
    }

    /// Start over after game over; the best score carries across
    pub fn restart(&mut self, now: f64) {
        log::info!(
            "Restarting (previous run: wave {}, score {})",
            self.world.wave,
            self.world.score
        );
        self.start(now);
    }

    /// Run one frame at timestamp `now` (ms)
    ///
    /// Returns false if the tick was rejected; the world is then left
    /// exactly as it was.
    pub fn step(&mut self, now: f64) -> bool {
        self.frame += 1;
        let input = *self.input.borrow();

        match tick(&self.world, &input, now, self.rng.as_mut()) {
            Ok(TickOutput { mut world, events }) => {
                if world.particles.len() > self.max_particles {
                    world.particles = cap_particles(world.particles, self.max_particles);
                }
                self.world = world;
                self.dispatch(&events);
                self.notify();
                true
            }
            Err(e) => {
                self.skipped_ticks += 1;
                match &e {
                    TickError::Invariant(_) => log::error!("Skipping tick {}: {}", self.frame, e),
                    TickError::InvalidTimestamp(_) => {
                        log::warn!("Skipping tick {}: {}", self.frame, e)
                    }
                }
                false
            }
        }
    }

    /// Replace the world with a snapshot, if it is consistent
    pub fn resume(&mut self, world: World) -> Result<(), InvariantViolation> {
        world.validate_invariants()?;
        log::info!("Resumed at wave {} ({})", world.wave, world.phase.as_str());
        self.world = world;
        self.notify();
        Ok(())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn skipped_ticks(&self) -> u64 {
        self.skipped_ticks
    }

    /// Handle for input-capture callbacks to write into
    pub fn input(&self) -> SharedInput {
        Rc::clone(&self.input)
    }

    pub fn status(&self) -> UiStatus {
        UiStatus::from(&self.world)
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    /// Hand the current world to a presenter
    pub fn present(&self, presenter: &mut dyn Presenter) {
        presenter.present(&self.world, self.frame);
    }

    fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            log::debug!("{:?}", event);
            if let GameEvent::GameOver { best_score, .. } = event {
                self.store.set(*best_score);
            }
        }
        self.audio.handle_events(events);
    }

    fn notify(&mut self) {
        let status = UiStatus::from(&self.world);
        if let Some(observer) = self.observer.as_mut() {
            observer.on_status(&status);
        }
    }
}
