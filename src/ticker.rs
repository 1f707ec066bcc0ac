use web_time::{Duration, Instant};

/// Fixed-interval gate for the ambient resolution tick.
///
/// The shell may call in as often as it likes (every animation frame, say);
/// `due` only answers `true` once per elapsed interval.
#[derive(Debug, Clone)]
pub struct AmbientTicker {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl AmbientTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` and re-arms when at least one interval has passed since
    /// the last firing. The first call always fires.
    pub fn due(&mut self, now: Instant) -> bool {
        let ready = match self.last_fired {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if ready {
            self.last_fired = Some(now);
        }
        ready
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}
