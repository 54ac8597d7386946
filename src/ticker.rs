use std::time::Duration;

/// Frame-driven clock: checked once per frame, fires when a full tick
/// interval has passed since the last move.
pub struct Ticker {
    last_tick: f64,
}

impl Ticker {
    pub fn new(now: f64) -> Self {
        Self { last_tick: now }
    }

    pub fn due(&mut self, now: f64, interval: Duration) -> bool {
        if now - self.last_tick < interval.as_secs_f64() {
            return false;
        }
        self.last_tick = now;
        true
    }

    /// Makes the next tick wait a full interval from `now`, e.g. after a
    /// pause so the snake does not jump on resume.
    pub fn restart(&mut self, now: f64) {
        self.last_tick = now;
    }
}
