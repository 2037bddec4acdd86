//! External stop flag and wall-clock limit for a search.
//!
//! The simulation budget is the normal way a search ends. A `SearchControl`
//! lets a caller cut it short: another thread can raise the shared stop flag,
//! or a time limit can expire. Both are checked between playouts only, so a
//! playout in progress always completes and the tree stays consistent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Controls when a search should stop before its budget is reached.
#[derive(Debug, Clone, Default)]
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Option<Instant>,
    time_limit: Option<Duration>,
}

impl SearchControl {
    /// Control with a fresh stop flag and no time limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Control sharing `stopped` with the caller.
    ///
    /// The flag is never cleared by the search; the caller resets it before
    /// starting the next search.
    pub fn with_stop_flag(stopped: Arc<AtomicBool>) -> Self {
        Self {
            stopped,
            ..Self::default()
        }
    }

    /// Add a wall-clock limit per search.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Start the clock. Called by the engine at the start of every search.
    pub fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    /// Check whether the search should abort before the next playout.
    ///
    /// Returns `true` if the external stop flag was set, or the clock is
    /// running and the time limit has been exceeded.
    pub fn should_stop(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }

        match self.time_limit {
            Some(limit) => self.elapsed() >= limit,
            None => false,
        }
    }

    /// Elapsed time since the clock was started.
    ///
    /// Returns [`Duration::ZERO`] if the clock has not been started.
    pub fn elapsed(&self) -> Duration {
        self.start.map_or(Duration::ZERO, |s| s.elapsed())
    }

    /// Reference to the shared stop flag.
    pub fn stop_flag(&self) -> &Arc<AtomicBool> {
        &self.stopped
    }

    /// Raise the stop flag.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }
}
