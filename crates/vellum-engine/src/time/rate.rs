use std::time::{Duration, Instant};

/// One FPS/TPS measurement window.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RateSample {
    pub frames_per_second: u32,
    pub ticks_per_second: u32,
}

/// Counts frames and ticks and yields a sample once per wall-clock second.
///
/// Counters reset at each sample.
#[derive(Debug, Clone)]
pub struct RateCounter {
    window_start: Instant,
    window: Duration,
    frames: u32,
    ticks: u32,
}

impl RateCounter {
    pub fn new(now: Instant) -> Self {
        Self::with_window(now, Duration::from_secs(1))
    }

    pub fn with_window(now: Instant, window: Duration) -> Self {
        Self { window_start: now, window, frames: 0, ticks: 0 }
    }

    #[inline]
    pub fn record_frame(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    #[inline]
    pub fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    /// Returns a sample when at least one window has elapsed since the last one.
    pub fn sample(&mut self, now: Instant) -> Option<RateSample> {
        if now.saturating_duration_since(self.window_start) < self.window {
            return None;
        }

        let sample = RateSample { frames_per_second: self.frames, ticks_per_second: self.ticks };
        self.frames = 0;
        self.ticks = 0;
        self.window_start = now;
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_once_per_window_and_resets() {
        let t0 = Instant::now();
        let mut rc = RateCounter::new(t0);
        for _ in 0..3 {
            rc.record_frame();
        }
        rc.record_tick();

        assert_eq!(rc.sample(t0 + Duration::from_millis(500)), None);

        let s = rc.sample(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(s, RateSample { frames_per_second: 3, ticks_per_second: 1 });

        let s = rc.sample(t0 + Duration::from_secs(2)).unwrap();
        assert_eq!(s, RateSample::default());
    }
}
