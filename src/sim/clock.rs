//! Monotonic time source and the pause-aware game stopwatch

use std::cell::Cell;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A monotonic clock the simulation queries for the current time
pub trait Clock {
    /// Time since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Cell<Duration>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Elapsed game time that excludes paused stretches
///
/// Pausing stores the elapsed time; resuming re-bases the origin so the
/// paused duration never shows up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stopwatch {
    origin: Duration,
    elapsed: Duration,
    paused: bool,
}

impl Stopwatch {
    pub fn new(now: Duration) -> Self {
        Self {
            origin: now,
            elapsed: Duration::ZERO,
            paused: false,
        }
    }

    /// Refresh the elapsed time; frozen while paused
    pub fn update(&mut self, now: Duration) -> Duration {
        if !self.paused {
            self.elapsed = now.saturating_sub(self.origin);
        }
        self.elapsed
    }

    pub fn pause(&mut self, now: Duration) {
        if !self.paused {
            self.update(now);
            self.paused = true;
        }
    }

    pub fn resume(&mut self, now: Duration) {
        if self.paused {
            self.origin = now.saturating_sub(self.elapsed);
            self.paused = false;
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whole seconds elapsed
    #[inline]
    pub fn seconds(&self) -> u64 {
        self.elapsed.as_secs()
    }

    /// (minutes, seconds) for the mm:ss display
    pub fn minutes_seconds(&self) -> (u64, u64) {
        let secs = self.seconds();
        (secs / 60, secs % 60)
    }
}
