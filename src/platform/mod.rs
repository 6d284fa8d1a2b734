//! Platform abstraction layer
//!
//! Handles the boundary to the host environment:
//! - Time (monotonic clock)
//! - Input events (non-blocking queue)
//!
//! `terminal` provides the crossterm-backed implementation used by the binary.

pub mod terminal;

use std::io;
use std::time::Instant;

pub use terminal::TerminalEvents;

/// Keys the game distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Letter keys, always lowercase
    Char(char),
    Space,
    Escape,
    Other,
}

/// An event from the windowing/terminal layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    /// Window closed or interrupt requested
    Quit,
    KeyDown(Key),
    KeyUp(Key),
}

/// Non-blocking event queue
pub trait EventSource {
    /// Next pending event, or `None` once the queue is drained
    fn poll_event(&mut self) -> io::Result<Option<PlatformEvent>>;
}

/// Monotonic time source
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&mut self) -> f64;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
