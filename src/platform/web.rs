//! Browser frame driver (`requestAnimationFrame`)

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{LoopControl, StopHandle};

type FrameFn = Box<dyn FnMut(f64) -> LoopControl>;

struct FrameState {
    stop: StopHandle,
    pending: Cell<Option<i32>>,
    frames: Cell<u64>,
    callback: RefCell<FrameFn>,
}

/// Calls a frame callback from `requestAnimationFrame` until stopped
///
/// The callback gets the rAF timestamp, which shares its origin with
/// `performance.now()`. The browser paces frames, so nothing here blocks.
pub struct AnimationFrameLoop {
    state: Rc<FrameState>,
}

impl AnimationFrameLoop {
    pub fn start<F>(callback: F) -> Self
    where
        F: FnMut(f64) -> LoopControl + 'static,
    {
        let state = Rc::new(FrameState {
            stop: StopHandle::default(),
            pending: Cell::new(None),
            frames: Cell::new(0),
            callback: RefCell::new(Box::new(callback)),
        });
        log::debug!("Animation frame loop started");
        request_frame(Rc::clone(&state));
        Self { state }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.state.stop.clone()
    }

    pub fn frames(&self) -> u64 {
        self.state.frames.get()
    }

    /// Stop and cancel any frame already requested
    pub fn stop(&self) {
        self.state.stop.stop();
        if let Some(id) = self.state.pending.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        log::debug!(
            "Animation frame loop stopped after {} frames",
            self.state.frames.get()
        );
    }
}

fn request_frame(state: Rc<FrameState>) {
    let Some(window) = web_sys::window() else {
        log::warn!("No window - frame loop not scheduled");
        return;
    };
    let next = Rc::clone(&state);
    let closure = Closure::once(move |time: f64| run_frame(next, time));
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => state.pending.set(Some(id)),
        Err(_) => log::warn!("requestAnimationFrame failed - frame loop stopped"),
    }
    closure.forget();
}

fn run_frame(state: Rc<FrameState>, time: f64) {
    state.pending.set(None);
    if state.stop.is_stopped() {
        return;
    }
    state.frames.set(state.frames.get() + 1);
    let control = (state.callback.borrow_mut())(time);
    if control == LoopControl::Break {
        state.stop.stop();
        return;
    }
    request_frame(state);
}
