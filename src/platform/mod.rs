//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (frame timestamps)
//! - Frame scheduling with start/stop
//! - Logger setup

mod clock;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use clock::MonotonicClock;
#[cfg(target_arch = "wasm32")]
pub use clock::PerformanceClock;
pub use clock::{Clock, SteppedClock};
#[cfg(target_arch = "wasm32")]
pub use web::AnimationFrameLoop;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// What the frame callback wants next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Break,
}

/// Cloneable handle that stops a running [`FrameLoop`]
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Calls a frame callback once per frame interval until stopped
///
/// The callback receives the frame timestamp (ms). Exactly one callback runs
/// at a time; the next frame is not scheduled until it returns. This loop
/// blocks between frames; in the browser use `AnimationFrameLoop`.
pub struct FrameLoop<C: Clock> {
    clock: C,
    interval_ms: f64,
    stop: StopHandle,
    frames: u64,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(clock: C, frame_rate: u32) -> Self {
        Self {
            clock,
            interval_ms: 1000.0 / frame_rate.max(1) as f64,
            stop: StopHandle::default(),
            frames: 0,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Request the loop to end after the current frame
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run frames until stopped or the callback breaks; returns frames run
    pub fn start<F>(&mut self, mut frame: F) -> u64
    where
        F: FnMut(f64) -> LoopControl,
    {
        self.stop.reset();
        let first = self.frames;
        log::debug!("Frame loop started ({:.2}ms interval)", self.interval_ms);

        while !self.stop.is_stopped() {
            let started = self.clock.now_ms();
            self.frames += 1;
            if frame(started) == LoopControl::Break {
                break;
            }
            let spent = self.clock.now_ms() - started;
            self.clock.wait(self.interval_ms - spent);
        }

        let ran = self.frames - first;
        log::debug!("Frame loop stopped after {} frames", ran);
        ran
    }
}

/// Set up logging for the current platform
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Set up logging for the current platform
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_break() {
        let mut frames = FrameLoop::new(SteppedClock::default(), 50);
        let mut stamps = Vec::new();
        let ran = frames.start(|now| {
            stamps.push(now);
            if stamps.len() == 3 {
                LoopControl::Break
            } else {
                LoopControl::Continue
            }
        });
        assert_eq!(ran, 3);
        assert_eq!(stamps, vec![0.0, 20.0, 40.0]);
    }

    #[test]
    fn test_stop_handle() {
        let mut frames = FrameLoop::new(SteppedClock::default(), 60);
        let handle = frames.stop_handle();
        let ran = frames.start(|_| {
            handle.stop();
            LoopControl::Continue
        });
        assert_eq!(ran, 1);
        assert!(frames.stop_handle().is_stopped());

        // Restartable
        let ran = frames.start(|_| LoopControl::Break);
        assert_eq!(ran, 1);
        assert_eq!(frames.frames(), 2);
    }
}
