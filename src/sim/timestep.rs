//! Fixed timestep accumulator
//!
//! Wall-clock frame time is added as debt and paid off in whole ticks, so the
//! simulation rate stays independent of the display rate.

use crate::consts::{MAX_FRAME_DEBT_MS, TICK_MS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    tick_ms: f64,
    max_debt_ms: f64,
    debt_ms: f64,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(TICK_MS, MAX_FRAME_DEBT_MS)
    }
}

impl FixedTimestep {
    pub fn new(tick_ms: f64, max_debt_ms: f64) -> Self {
        Self {
            tick_ms,
            max_debt_ms,
            debt_ms: 0.0,
        }
    }

    pub fn tick_ms(&self) -> f64 {
        self.tick_ms
    }

    /// Time not yet simulated
    pub fn debt_ms(&self) -> f64 {
        self.debt_ms
    }

    /// Add a frame's duration, capping total debt to bound catch-up work
    pub fn accumulate(&mut self, frame_ms: f64) {
        self.debt_ms = (self.debt_ms + frame_ms.max(0.0)).min(self.max_debt_ms);
    }

    /// Consume one tick while the debt exceeds a tick
    pub fn next_tick(&mut self) -> bool {
        if self.debt_ms > self.tick_ms {
            self.debt_ms -= self.tick_ms;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.debt_ms = 0.0;
    }
}
