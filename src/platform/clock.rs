//! Frame timestamps

/// Source of frame timestamps in milliseconds
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> f64;

    /// Wait (or pretend to wait) until the next frame is due
    fn wait(&mut self, ms: f64);
}

/// Wall clock that sleeps between frames
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn wait(&mut self, ms: f64) {
        if ms.is_finite() && ms > 0.0 {
            std::thread::sleep(std::time::Duration::from_secs_f64(ms / 1000.0));
        }
    }
}

/// Virtual clock: waiting advances time instantly
#[derive(Debug, Clone, Default)]
pub struct SteppedClock {
    now: f64,
}

impl SteppedClock {
    pub fn starting_at(now: f64) -> Self {
        Self { now }
    }

    pub fn advance(&mut self, ms: f64) {
        self.now += ms;
    }
}

impl Clock for SteppedClock {
    fn now_ms(&self) -> f64 {
        self.now
    }

    fn wait(&mut self, ms: f64) {
        self.advance(ms);
    }
}

/// `performance.now()` in the browser
///
/// Timestamps only, not a [`Clock`]: the browser paces frames through
/// `AnimationFrameLoop`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

#[cfg(target_arch = "wasm32")]
impl PerformanceClock {
    pub fn new() -> Self {
        let performance = web_sys::window().and_then(|w| w.performance());
        if performance.is_none() {
            log::warn!("performance.now() unavailable - timestamps frozen at 0");
        }
        Self { performance }
    }

    pub fn now_ms(&self) -> f64 {
        self.performance.as_ref().map(|p| p.now()).unwrap_or(0.0)
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for PerformanceClock {
    fn default() -> Self {
        Self::new()
    }
}
