//! Fixed-interval accumulator that converts frame time into ticks.

use std::time::Duration;

/// Interval between simulation ticks used when none is configured.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Accumulates elapsed time and reports how many whole ticks are due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickClock {
    interval: Duration,
    accumulator: Duration,
}

impl TickClock {
    /// Creates a clock that ticks once per `interval`.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Configured tick interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Time accumulated towards the next tick.
    #[must_use]
    pub const fn pending(&self) -> Duration {
        self.accumulator
    }

    /// Adds `dt` to the accumulator and drains every whole interval.
    ///
    /// A zero interval never yields ticks.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let mut ticks = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            ticks += 1;
        }
        ticks
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}
