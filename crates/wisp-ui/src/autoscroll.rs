//! Drag-and-drop auto-scroll.
//!
//! While a drag hovers inside a band along the top or bottom edge of the
//! client area, the container scrolls towards that edge on a timer: a long
//! dwell before the first step, then a short repeat. The deeper the pointer
//! sits in the band the bigger the step.
//!
//! States: `Off -> Up | Down -> Off`. Leaving the band captured at start,
//! reaching the scroll limit, dropping or cancelling all return to `Off`.

use std::time::Duration;

use log::debug;
use wisp_engine::coords::{Rect, Vec2};
use wisp_engine::input::TimerId;

use crate::config::AutoScrollConfig;

/// Timer the container uses for auto-scroll ticks.
pub const AUTO_SCROLL_TIMER: TimerId = TimerId(1);

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum AutoScrollMode {
    #[default]
    Off,
    Up,
    Down,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Phase {
    Dwell,
    Repeat,
}

/// Result of feeding a pointer position to [`AutoScroll::track`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Transition {
    /// Nothing to do with the timer.
    None,
    /// Scrolling armed; start the timer with the dwell interval.
    Started(AutoScrollMode),
    /// Scrolling ended; stop the timer.
    Stopped,
}

/// Result of one timer tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TickOutcome {
    /// Signed change to apply to the scroll offset.
    pub delta: f32,
    /// New timer interval after the dwell elapsed.
    pub retime: Option<Duration>,
    /// The limit was reached; stop the timer.
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct AutoScroll {
    mode: AutoScrollMode,
    /// Band captured when scrolling started, client space.
    band: Rect,
    phase: Phase,
    step: f32,
}

impl Default for AutoScroll {
    fn default() -> Self {
        Self { mode: AutoScrollMode::Off, band: Rect::default(), phase: Phase::Dwell, step: 0.0 }
    }
}

impl AutoScroll {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(&self) -> AutoScrollMode {
        self.mode
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.mode != AutoScrollMode::Off
    }

    /// The captured band, while active.
    pub fn band(&self) -> Option<Rect> {
        self.is_active().then_some(self.band)
    }

    /// Pixels per tick for the last tracked position.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feeds the drag pointer position (client space).
    ///
    /// `offset` is the current scroll offset and `max` the largest valid one.
    pub fn track(
        &mut self,
        pos: Vec2,
        client: Rect,
        offset: f32,
        max: f32,
        cfg: &AutoScrollConfig,
    ) -> Transition {
        if self.is_active() {
            let at_limit = match self.mode {
                AutoScrollMode::Up => offset <= 0.0,
                AutoScrollMode::Down => offset >= max,
                AutoScrollMode::Off => true,
            };
            if at_limit || !self.band.contains(pos) {
                self.stop();
                return Transition::Stopped;
            }
            self.step = self.step_at(pos, cfg);
            return Transition::None;
        }

        let h = cfg.band_height.min(client.size.y).max(0.0);
        let top = Rect::from_origin_size(client.origin, Vec2::new(client.size.x, h));
        let bottom = Rect::new(client.origin.x, client.bottom() - h, client.size.x, h);

        let (mode, band) = if top.contains(pos) && offset > 0.0 {
            (AutoScrollMode::Up, top)
        } else if bottom.contains(pos) && offset < max {
            (AutoScrollMode::Down, bottom)
        } else {
            return Transition::None;
        };

        self.mode = mode;
        self.band = band;
        self.phase = Phase::Dwell;
        self.step = self.step_at(pos, cfg);
        debug!("auto-scroll {mode:?} armed, band {band:?}");
        Transition::Started(mode)
    }

    /// Advances one timer tick.
    ///
    /// Returns `None` when no scroll is in progress (a tick that was already
    /// queued when scrolling stopped).
    pub fn tick(&mut self, offset: f32, max: f32, cfg: &AutoScrollConfig) -> Option<TickOutcome> {
        let delta = match self.mode {
            AutoScrollMode::Off => {
                debug!("auto-scroll tick while off ignored");
                return None;
            }
            AutoScrollMode::Up => -self.step.min(offset.max(0.0)),
            AutoScrollMode::Down => self.step.min((max - offset).max(0.0)),
        };
        let retime = match self.phase {
            Phase::Dwell => {
                self.phase = Phase::Repeat;
                Some(cfg.repeat)
            }
            Phase::Repeat => None,
        };
        let next = offset + delta;
        let finished = match self.mode {
            AutoScrollMode::Up => next <= 0.0,
            _ => next >= max,
        };
        if finished {
            self.stop();
        }
        Some(TickOutcome { delta, retime, finished })
    }

    pub fn stop(&mut self) {
        if self.is_active() {
            debug!("auto-scroll {:?} stopped", self.mode);
        }
        *self = Self::default();
    }

    fn step_at(&self, pos: Vec2, cfg: &AutoScrollConfig) -> f32 {
        let h = self.band.size.y;
        if h <= 0.0 {
            return 1.0;
        }
        let from_edge = match self.mode {
            AutoScrollMode::Up => pos.y - self.band.origin.y,
            _ => self.band.bottom() - pos.y,
        };
        let depth = (h - from_edge).clamp(0.0, h);
        (depth / h * cfg.max_step).round().max(1.0)
    }
}
