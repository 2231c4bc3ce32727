//! Browser bindings
//!
//! The host page owns the canvas, DOM input and audio. It constructs a
//! [`WebGame`], forwards controls into it and reads back JSON snapshots to
//! draw; frames come from `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::persistence::LocalStorageStore;
use crate::platform::{self, AnimationFrameLoop, LoopControl, PerformanceClock};
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::Direction;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    platform::init_logging();
    log::info!("Cosmic Defender (WASM) loaded");
}

fn parse_direction(name: &str) -> Option<Direction> {
    match name {
        "up" | "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "down" | "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "left" | "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "right" | "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// A session driven by animation frames
#[wasm_bindgen]
pub struct WebGame {
    session: Rc<RefCell<Session>>,
    settings: Settings,
    clock: PerformanceClock,
    frames: Option<AnimationFrameLoop>,
}

#[wasm_bindgen]
impl WebGame {
    /// `touch_primary` turns autofire on for touch-first devices
    #[wasm_bindgen(constructor)]
    pub fn new(touch_primary: bool) -> WebGame {
        let settings = Settings::load();
        let mut run_settings = settings.clone();
        run_settings.auto_fire |= touch_primary;
        let session =
            Session::from_settings(&run_settings, Box::new(LocalStorageStore::new()), None);
        Self {
            session: Rc::new(RefCell::new(session)),
            settings,
            clock: PerformanceClock::new(),
            frames: None,
        }
    }

    /// Begin a run and start stepping it every animation frame
    pub fn start(&mut self) {
        self.session.borrow_mut().start(self.clock.now_ms());
        self.run();
    }

    /// Fresh run after game over
    pub fn restart(&mut self) {
        self.session.borrow_mut().restart(self.clock.now_ms());
        self.run();
    }

    /// Stop requesting frames; the world stays as it is
    pub fn stop(&mut self) {
        if let Some(frames) = self.frames.take() {
            frames.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.frames
            .as_ref()
            .is_some_and(|f| !f.stop_handle().is_stopped())
    }

    pub fn set_direction(&self, name: &str, held: bool) {
        match parse_direction(name) {
            Some(dir) => self.session.borrow().input().borrow_mut().held.set(dir, held),
            None => log::debug!("Ignoring unknown direction {:?}", name),
        }
    }

    pub fn set_fire(&self, fire: bool) {
        self.session.borrow().input().borrow_mut().fire = fire;
    }

    /// Virtual joystick; `active` false releases it
    pub fn set_analog(&self, x: f32, y: f32, active: bool) {
        let input = self.session.borrow().input();
        let mut input = input.borrow_mut();
        input.analog = glam::Vec2::new(x, y);
        input.analog_active = active;
    }

    /// Mute sound cues and remember the choice
    pub fn set_muted(&mut self, muted: bool) {
        self.session.borrow_mut().audio_mut().set_muted(muted);
        self.settings.muted = muted;
        self.settings.save();
    }

    pub fn is_playing(&self) -> bool {
        self.session.borrow().world().is_playing()
    }

    /// [`crate::ui::UiStatus`] as JSON
    pub fn status_json(&self) -> String {
        serde_json::to_string(&self.session.borrow().status()).unwrap_or_default()
    }

    /// Full world snapshot as JSON, for drawing
    pub fn world_json(&self) -> String {
        serde_json::to_string(self.session.borrow().world()).unwrap_or_default()
    }
}

impl WebGame {
    fn run(&mut self) {
        self.stop();
        let session = Rc::clone(&self.session);
        self.frames = Some(AnimationFrameLoop::start(move |time| {
            session.borrow_mut().step(time);
            LoopControl::Continue
        }));
    }
}
