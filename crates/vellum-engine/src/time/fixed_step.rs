use std::time::{Duration, Instant};

/// Fixed-timestep accumulator.
///
/// Elapsed wall time is converted into *tick debt* measured in ticks:
/// `debt += elapsed_ns / (1e9 / ticks_per_second)`. Each consumed tick
/// decrements the debt by one.
///
/// There is no debt cap: after a stall the loop runs consecutive catch-up
/// ticks until the debt drops below one.
#[derive(Debug, Clone)]
pub struct FixedStep {
    last: Instant,
    tick_nanos: f64,
    debt: f64,
}

impl FixedStep {
    /// Creates an accumulator for `ticks_per_second` (must be non-zero; the
    /// engine config validates this before a loop is built).
    pub fn new(ticks_per_second: u32) -> Self {
        debug_assert!(ticks_per_second > 0);
        Self {
            last: Instant::now(),
            tick_nanos: 1e9 / f64::from(ticks_per_second.max(1)),
            debt: 0.0,
        }
    }

    /// Duration of one tick.
    #[inline]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_nanos(self.tick_nanos as u64)
    }

    /// Outstanding ticks (may be fractional).
    #[inline]
    pub fn debt(&self) -> f64 {
        self.debt
    }

    /// Resets the baseline and forgets outstanding debt.
    pub fn reset(&mut self) {
        self.last = Instant::now();
        self.debt = 0.0;
    }

    /// Accumulates the time elapsed since the previous call.
    pub fn advance(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        self.accumulate(elapsed);
        elapsed
    }

    /// Accumulates an explicit duration.
    #[inline]
    pub fn accumulate(&mut self, elapsed: Duration) {
        self.debt += elapsed.as_nanos() as f64 / self.tick_nanos;
    }

    /// Consumes one tick if at least one is owed.
    #[inline]
    pub fn consume_tick(&mut self) -> bool {
        if self.debt >= 1.0 {
            self.debt -= 1.0;
            true
        } else {
            false
        }
    }
}
