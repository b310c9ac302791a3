//! Fixed-step tick timing
//!
//! The render loop feeds raw frame deltas into a [`TickClock`], which reports
//! how many fixed-interval ticks are due. Rotation and playback both run off
//! these ticks so that they stay on the same thread and the same cadence.

use std::time::Duration;

/// Upper bound on a single delta, so a stalled frame cannot queue up an
/// unbounded burst of ticks
const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(250);

/// Accumulates elapsed time and hands out fixed-interval ticks
#[derive(Debug, Clone)]
pub struct TickClock {
    interval: Duration,
    max_delta: Duration,
    accumulator: Duration,
    tick_count: u64,
}

impl TickClock {
    /// Create a clock that ticks once per `interval`.
    ///
    /// A zero interval is promoted to one millisecond.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            max_delta: DEFAULT_MAX_DELTA,
            accumulator: Duration::ZERO,
            tick_count: 0,
        }
    }

    /// Create a clock that ticks `rate` times per second
    pub fn from_rate(rate: u32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / f64::from(rate.max(1))))
    }

    /// Override the per-update delta clamp
    pub fn with_max_delta(mut self, max_delta: Duration) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// The fixed tick interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Total ticks handed out since creation or the last reset
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Feed a raw frame delta and return how many ticks are now due
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.accumulator += delta.min(self.max_delta);

        let mut steps = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            steps += 1;
        }
        self.tick_count += u64::from(steps);
        steps
    }

    /// Fraction of the way to the next tick, in `[0, 1)`
    pub fn interpolation(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.interval.as_secs_f32()
    }

    /// Drop any partially accumulated time and reset the counter
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.tick_count = 0;
    }
}
