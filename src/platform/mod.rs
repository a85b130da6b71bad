//! Platform abstraction layer
//!
//! Handles the host side of the game:
//! - Time (host clock, emulated hardware timer)
//! - Keyboard input
//! - Serial status link

pub mod input;
pub mod serial;
pub mod time;

pub use input::{Confirmation, KeyAction, Throttle, poll_actions, wait_for_confirmation};
pub use serial::{LogLink, SerialLink, WriterLink, forward_reports};
pub use time::{OverflowCounter, SystemClock, TimerClock, TimerInterrupt};
