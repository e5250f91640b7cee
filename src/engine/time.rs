use std::time::{Duration, Instant};

/// Monotonic point in time, measured from an arbitrary epoch (process start
/// for [`FrameTimer`], zero for scripted runs).
///
/// Millisecond resolution is all the input buffer needs. Wraparound is not
/// handled; `u64` milliseconds outlast any session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs.max(0.0) * 1000.0).round() as u64)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, zero if `earlier` is later.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

/// Wall-clock frame timer for interactive hosts.
pub struct FrameTimer {
    start: Instant,
    last: Instant,
    pub dt: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            dt: 0.0,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
    }

    /// Timestamp of the latest `tick`.
    pub fn now(&self) -> Timestamp {
        let ms = self.last.duration_since(self.start).as_millis();
        Timestamp::from_millis(u64::try_from(ms).unwrap_or(u64::MAX))
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
