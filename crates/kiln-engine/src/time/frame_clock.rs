use std::time::{Duration, Instant};

/// Timing snapshot for one rendered frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous rendered frame, clamped.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Number of frames rendered before this one.
    pub frame_index: u64,
}

impl FrameTime {
    /// Instantaneous frame rate derived from `dt`.
    pub fn fps(&self) -> f32 {
        if self.dt > 0.0 { 1.0 / self.dt } else { 0.0 }
    }
}

/// Produces `FrameTime` snapshots for the render loop.
///
/// Delta time is clamped so a stall (debugger pause, minimized window, long
/// surface reconfiguration) does not show up as a multi-second frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock clamping dt to `[100µs, 250ms]`.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Moves the baseline to now without counting a frame.
    ///
    /// The renderer calls this after a reconfiguration tick so the skipped
    /// frame does not inflate the next dt.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Number of frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let ft = self.sample_at(Instant::now());
        self.advance(&ft);
        ft
    }

    /// Timing for a frame about to be drawn, without counting it.
    ///
    /// Pair with [`FrameClock::advance`] once the frame is presented; a frame
    /// that never reaches the screen leaves the clock untouched.
    pub fn sample(&self) -> FrameTime {
        self.sample_at(Instant::now())
    }

    /// Counts `ft` as presented and makes it the baseline for the next dt.
    pub fn advance(&mut self, ft: &FrameTime) {
        self.last = ft.now;
        self.frame_index = self.frame_index.wrapping_add(1);
    }

    fn sample_at(&self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn dt_is_clamped_to_max_after_stall() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(50));
        let start = clock.last;
        let ft = clock.sample_at(start + Duration::from_secs(3));
        assert!((ft.dt - 0.05).abs() < 1e-6);
    }

    #[test]
    fn dt_is_clamped_to_min_for_tight_loops() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(50));
        let start = clock.last;
        let ft = clock.sample_at(start);
        assert!((ft.dt - 0.001).abs() < 1e-6);
    }

    #[test]
    fn reset_does_not_count_a_frame() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.reset();
        assert_eq!(clock.frames(), 1);
    }

    #[test]
    fn sample_without_advance_counts_nothing() {
        let mut clock = FrameClock::new();
        let skipped = clock.sample();
        assert_eq!(skipped.frame_index, 0);
        assert_eq!(clock.frames(), 0);

        let presented = clock.sample();
        clock.advance(&presented);
        assert_eq!(presented.frame_index, 0);
        assert_eq!(clock.frames(), 1);
        assert_eq!(clock.sample().frame_index, 1);
    }

    #[test]
    fn fps_is_inverse_of_dt() {
        let ft = FrameTime { dt: 0.02, now: Instant::now(), frame_index: 0 };
        assert!((ft.fps() - 50.0).abs() < 1e-3);
    }
}
