//! Tick cadence
//!
//! Turns frame deltas from the main loop into whole ticks.

use std::time::Duration;

/// Accumulates elapsed frame time and reports when a tick is due
pub struct TickCadence {
    /// Interval between ticks
    interval: Duration,
    /// Time accumulated since the last tick
    since_last_tick: Duration,
}

impl TickCadence {
    /// Create a cadence firing once per `interval`
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            since_last_tick: Duration::ZERO,
        }
    }

    /// Add elapsed time and return true if a tick should occur.
    ///
    /// Only one tick is reported per call. When the loop stalls for several
    /// intervals the remainder stays banked, so the following calls keep
    /// firing until the countdowns have caught up with the wall clock.
    pub fn update(&mut self, delta: Duration) -> bool {
        self.since_last_tick += delta;

        if self.since_last_tick >= self.interval {
            self.since_last_tick -= self.interval;
            true
        } else {
            false
        }
    }

    /// Whether banked time still holds at least one more tick
    pub fn behind(&self) -> bool {
        self.since_last_tick >= self.interval
    }
}

impl Default for TickCadence {
    fn default() -> Self {
        Self::new(Duration::from_secs(1)) // Default: tick every second
    }
}
