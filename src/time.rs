use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous tick, clamped.
    pub dt: Duration,
    /// Monotonic timestamp taken at the tick.
    pub now: Instant,
    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Per-loop clock producing [`FrameTime`] snapshots and holding a frame
/// budget.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// produce a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
    budget: Option<Duration>,
}

impl FrameClock {
    /// A clock targeting `target_fps` frames per second. `0` disables the
    /// budget.
    pub fn new(target_fps: u32) -> Self {
        Self::starting_at(Instant::now(), target_fps)
    }

    fn starting_at(now: Instant, target_fps: u32) -> Self {
        Self {
            last: now,
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
            budget: (target_fps > 0).then(|| Duration::from_secs(1) / target_fps),
        }
    }

    /// Resets the baseline, e.g. when the window is resumed, so the next
    /// tick does not count the time spent suspended.
    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    fn reset_at(&mut self, now: Instant) {
        self.last = now;
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let time = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        time
    }

    /// Time per frame at the target rate.
    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// How long to sleep after a frame that took `elapsed`, or `None` when
    /// the frame used its whole budget (or there is none).
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.budget?
            .checked_sub(elapsed)
            .filter(|d| !d.is_zero())
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_follows_target_fps() {
        assert_eq!(FrameClock::new(50).budget(), Some(Duration::from_millis(20)));
        assert_eq!(FrameClock::new(0).budget(), None);
    }

    #[test]
    fn remaining_sleeps_only_when_under_budget() {
        let clock = FrameClock::new(50);
        assert_eq!(
            clock.remaining(Duration::from_millis(5)),
            Some(Duration::from_millis(15))
        );
        assert_eq!(clock.remaining(Duration::from_millis(20)), None);
        assert_eq!(clock.remaining(Duration::from_millis(30)), None);
        assert_eq!(FrameClock::new(0).remaining(Duration::ZERO), None);
    }

    #[test]
    fn tick_clamps_and_counts() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 60);

        let t0 = clock.tick_at(start);
        assert_eq!(t0.frame_index, 0);
        assert_eq!(t0.dt, Duration::from_micros(100));

        let t1 = clock.tick_at(start + Duration::from_millis(16));
        assert_eq!(t1.frame_index, 1);
        assert_eq!(t1.dt, Duration::from_millis(16));

        let t2 = clock.tick_at(start + Duration::from_secs(10));
        assert_eq!(t2.dt, Duration::from_millis(250));
        assert_eq!(clock.frame_index(), 3);
    }

    #[test]
    fn reset_drops_suspended_time() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start, 60);
        clock.tick_at(start + Duration::from_millis(16));

        clock.reset_at(start + Duration::from_secs(5));
        let t = clock.tick_at(start + Duration::from_secs(5) + Duration::from_millis(10));
        assert_eq!(t.dt, Duration::from_millis(10));
        assert_eq!(t.frame_index, 1);
    }
}
