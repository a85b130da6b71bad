//! Production clocks
//!
//! The terminal game reads the host's monotonic clock. The LCD game derives
//! time from an emulated 16-bit hardware timer: a background "interrupt"
//! thread advances the count register and the overflow counter, and the tick
//! only ever reads them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::consts::{TIMER_OVERFLOW_SECS, TIMER_TICK_SECS};
use crate::error::GameError;
use crate::sim::Clock;

/// How often the emulated timer hardware is brought up to date
const TIMER_POLL: Duration = Duration::from_millis(2);

/// Host monotonic clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Timer overflow count and count register, shared between the interrupt
/// and the game loop
///
/// Only the interrupt side writes; readers tolerate a stale value.
#[derive(Debug, Clone, Default)]
pub struct OverflowCounter {
    overflows: Arc<AtomicU32>,
    register: Arc<AtomicU32>,
}

impl OverflowCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overflow interrupt handler body
    #[inline]
    pub fn overflow(&self) {
        self.overflows.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.overflows.load(Ordering::Relaxed)
    }

    /// Current value of the 16-bit count register
    #[inline]
    pub fn register(&self) -> u16 {
        self.register.load(Ordering::Relaxed) as u16
    }

    #[inline]
    pub fn set_register(&self, value: u16) {
        self.register.store(u32::from(value), Ordering::Relaxed);
    }
}

/// Clock that converts timer counts into elapsed time
#[derive(Debug, Clone)]
pub struct TimerClock {
    counter: OverflowCounter,
}

impl TimerClock {
    pub fn new(counter: OverflowCounter) -> Self {
        Self { counter }
    }
}

impl Clock for TimerClock {
    fn now(&self) -> Duration {
        let overflows = f64::from(self.counter.count());
        let register = f64::from(self.counter.register());
        Duration::from_secs_f64(overflows * TIMER_OVERFLOW_SECS + register * TIMER_TICK_SECS)
    }
}

/// Emulated timer hardware; stops when dropped
pub struct TimerInterrupt {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TimerInterrupt {
    /// Start counting into `counter`
    pub fn start(counter: OverflowCounter) -> Result<Self, GameError> {
        let stop = Arc::new(AtomicBool::new(false));

        let thread_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("timer-overflow".into())
            .spawn(move || {
                let started = Instant::now();
                while !thread_stop.load(Ordering::Relaxed) {
                    thread::sleep(TIMER_POLL);
                    let ticks = (started.elapsed().as_secs_f64() / TIMER_TICK_SECS) as u64;
                    let overflows = (ticks >> 16) as u32;
                    while counter.count() < overflows {
                        counter.overflow();
                    }
                    counter.set_register((ticks & 0xFFFF) as u16);
                }
            })
            .map_err(GameError::Timer)?;

        log::debug!("Timer interrupt running, overflow every {TIMER_OVERFLOW_SECS:.3}s");
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }
}

impl Drop for TimerInterrupt {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_period() {
        assert!((TIMER_OVERFLOW_SECS - 2.097152).abs() < 1e-9);
    }

    #[test]
    fn test_timer_clock_follows_counter() {
        let counter = OverflowCounter::new();
        let clock = TimerClock::new(counter.clone());
        assert_eq!(clock.now(), Duration::ZERO);

        for _ in 0..10 {
            counter.overflow();
        }
        counter.set_register(31_250);
        assert_eq!(counter.count(), 10);
        // 10 overflows plus one second of register counts
        let secs = clock.now().as_secs_f64();
        assert!((secs - 21.97152).abs() < 1e-6);
    }

    #[test]
    fn test_interrupt_thread_advances_clock() {
        let counter = OverflowCounter::new();
        let clock = TimerClock::new(counter.clone());
        let timer = TimerInterrupt::start(counter);
        assert!(timer.is_ok());

        thread::sleep(Duration::from_millis(50));
        assert!(clock.now() > Duration::ZERO);
        drop(timer);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
