use std::time::{Duration, Instant};

/// One message-pump iteration's timing.
#[derive(Debug, Copy, Clone)]
pub struct Tick {
    /// Time elapsed since the previous tick, clamped.
    pub dt: Duration,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic tick counter.
    pub index: u64,
}

/// Clock producing [`Tick`] snapshots for a message pump.
///
/// Delta time is clamped so a pump that stalled (debugger, suspended
/// process) does not fire a burst of catch-up timer ticks.
#[derive(Debug, Clone)]
pub struct TickClock {
    last: Instant,
    index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl TickClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self { last: Instant::now(), index: 0, dt_min, dt_max }
    }

    /// Advances the clock to the current instant.
    pub fn tick(&mut self) -> Tick {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> Tick {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let tick = Tick { dt, now, index: self.index };
        self.index = self.index.wrapping_add(1);
        tick
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
