use std::time::{Duration, Instant};

/// Clock units added per frame in the default frame-step mode.
pub const DEFAULT_TIME_STEP: f32 = 0.05;

/// How the animation clock advances between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockMode {
    /// Adds a fixed step per presented frame; speed follows the display rate.
    FrameStep { step: f32 },
    /// Advances with elapsed wall-clock time, independent of frame rate.
    WallClock { units_per_second: f32 },
}

impl Default for ClockMode {
    fn default() -> Self {
        Self::FrameStep {
            step: DEFAULT_TIME_STEP,
        }
    }
}

/// Monotonic scalar pushed into the `time` uniform.
///
/// In frame-step mode the value is derived from the frame count rather than
/// accumulated, so `time(N) == step * N` holds without rounding drift.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    mode: ClockMode,
    frames: u64,
    origin: Option<Instant>,
    elapsed: Duration,
}

impl AnimationClock {
    pub fn new(mode: ClockMode) -> Self {
        Self {
            mode,
            frames: 0,
            origin: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Number of frames the clock has been advanced.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Current clock value without advancing.
    pub fn time(&self) -> f32 {
        match self.mode {
            ClockMode::FrameStep { step } => (f64::from(step) * self.frames as f64) as f32,
            ClockMode::WallClock { units_per_second } => {
                (self.elapsed.as_secs_f64() * f64::from(units_per_second)) as f32
            }
        }
    }

    /// Advances by one frame and returns the new value.
    ///
    /// `now` is only consulted in wall-clock mode; the first call there
    /// anchors the origin and yields zero.
    pub fn advance(&mut self, now: Instant) -> f32 {
        self.frames = self.frames.saturating_add(1);
        if let ClockMode::WallClock { .. } = self.mode {
            let origin = *self.origin.get_or_insert(now);
            self.elapsed = now.saturating_duration_since(origin);
        }
        self.time()
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(ClockMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let clock = AnimationClock::default();
        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.frames(), 0);
    }

    #[test]
    fn frame_step_time_is_step_times_frames() {
        let mut clock = AnimationClock::default();
        let now = Instant::now();
        for n in 1..=10_000_u64 {
            let time = clock.advance(now);
            let expected = 0.05_f64 * n as f64;
            assert!(
                (f64::from(time) - expected).abs() <= expected * 1e-6,
                "frame {n}: {time} vs {expected}"
            );
        }
    }

    #[test]
    fn frame_step_is_strictly_increasing() {
        let mut clock = AnimationClock::new(ClockMode::FrameStep { step: 0.05 });
        let now = Instant::now();
        let mut previous = clock.time();
        for _ in 0..50_000 {
            let next = clock.advance(now);
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn wall_clock_follows_elapsed_time() {
        let mut clock = AnimationClock::new(ClockMode::WallClock {
            units_per_second: 3.0,
        });
        let start = Instant::now();
        assert_eq!(clock.advance(start), 0.0);
        let later = clock.advance(start + Duration::from_millis(500));
        assert!((later - 1.5).abs() < 1e-4);
        assert_eq!(clock.frames(), 2);
    }
}
