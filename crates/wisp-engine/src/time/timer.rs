use std::time::Duration;

/// Recurring timer driven by elapsed time.
///
/// This is the only asynchronous primitive the framework relies on: a
/// fire-and-forget recurring callback, cancelled only by an explicit
/// [`stop`](Self::stop). The owner feeds elapsed time in through
/// [`advance`](Self::advance) and turns the returned count into timer
/// messages.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
    elapsed: Duration,
    running: bool,
}

impl IntervalTimer {
    /// A running timer firing every `interval`.
    pub fn started(interval: Duration) -> Self {
        Self { interval, elapsed: Duration::ZERO, running: true }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Changes the period and restarts the current period from zero.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
        self.elapsed = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    /// Accumulates `dt` and returns how many periods completed.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.running || self.interval.is_zero() {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}
