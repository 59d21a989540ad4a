#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Measures the wall-clock time between successive hinge updates.
pub struct Timer {
    last_update: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Creates a timer whose first interval starts now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
        }
    }

    /// Returns the time since the previous tick (or restart) and starts the
    /// next interval.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.last_update;
        self.last_update = now;
        delta
    }

    /// Discards the running interval, e.g. after a reload.
    pub fn restart(&mut self) {
        self.last_update = Instant::now();
    }
}
