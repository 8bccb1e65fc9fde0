//! The native side of a container: the one real window and its services.
//!
//! [`NativeHost`] is what a platform binding implements. [`HeadlessHost`]
//! records every request instead of acting on it; tests and the demo use it.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use log::{debug, trace};
use wisp_engine::coords::{Rect, Vec2};
use wisp_engine::input::{TimerId, WindowMessage};
use wisp_engine::scene::DrawList;
use wisp_engine::time::IntervalTimer;

use crate::event::ContextMenu;

/// Handle of a native child window registered with the focus controller.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NativeHandle(pub u64);

/// What the host reports about a native child window.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeControlInfo {
    pub name: String,
    pub visible: bool,
    pub enabled: bool,
    pub focusable: bool,
    /// Client-space bounds within the container.
    pub bounds: Rect,
}

/// Services of the window backing a container.
pub trait NativeHost {
    /// Adds `rect` (client space) to the window's invalid region.
    fn invalidate(&mut self, rect: Rect);

    /// Repaint the invalid region now instead of on the next pump.
    fn update(&mut self);

    /// Starts `id`, or retimes it if already running.
    fn start_timer(&mut self, id: TimerId, interval: Duration);

    fn stop_timer(&mut self, id: TimerId);

    /// Hands a finished frame to the platform for rasterization.
    fn present(&mut self, frame: &DrawList);

    /// Shows `menu` at client position `at`.
    fn show_context_menu(&mut self, menu: &ContextMenu, at: Vec2);

    /// Asks the platform to give the window keyboard focus.
    fn take_focus(&mut self);

    /// Moves native focus to the next (or previous) window in the parent's
    /// tab order.
    fn tab_out(&mut self, forward: bool);

    fn native_control(&self, handle: NativeHandle) -> Option<NativeControlInfo> {
        let _ = handle;
        None
    }

    /// Returns `false` if the window refused focus.
    fn focus_native_control(&mut self, handle: NativeHandle) -> bool {
        let _ = handle;
        false
    }

    /// The native child currently holding focus, if any.
    fn native_control_focused(&self) -> Option<NativeHandle> {
        None
    }
}

// ── HeadlessHost ──────────────────────────────────────────────────────────

/// A [`NativeHost`] without a window.
///
/// Records what the container asked for; timers run off elapsed time fed in
/// through [`advance_timers`](Self::advance_timers).
#[derive(Debug, Default)]
pub struct HeadlessHost {
    pub invalidated: Vec<Rect>,
    pub updates: u32,
    pub timers: BTreeMap<TimerId, IntervalTimer>,
    pub frames: u32,
    pub last_frame: DrawList,
    pub menus: Vec<(ContextMenu, Vec2)>,
    pub focus_requests: u32,
    pub tab_outs: Vec<bool>,
    pub natives: HashMap<NativeHandle, NativeControlInfo>,
    pub native_focus: Option<NativeHandle>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a simulated native child window.
    pub fn add_native(&mut self, handle: NativeHandle, info: NativeControlInfo) {
        self.natives.insert(handle, info);
    }

    pub fn timer_running(&self, id: TimerId) -> bool {
        self.timers.get(&id).is_some_and(IntervalTimer::is_running)
    }

    pub fn timer_interval(&self, id: TimerId) -> Option<Duration> {
        self.timers
            .get(&id)
            .filter(|t| t.is_running())
            .map(IntervalTimer::interval)
    }

    /// Advances every running timer by `dt` and returns the timer messages
    /// that came due, in timer-id order.
    pub fn advance_timers(&mut self, dt: Duration) -> Vec<WindowMessage> {
        let mut due = Vec::new();
        for (&id, timer) in &mut self.timers {
            for _ in 0..timer.advance(dt) {
                due.push(WindowMessage::Timer { id });
            }
        }
        due
    }
}

impl NativeHost for HeadlessHost {
    fn invalidate(&mut self, rect: Rect) {
        self.invalidated.push(rect);
    }

    fn update(&mut self) {
        self.updates += 1;
    }

    fn start_timer(&mut self, id: TimerId, interval: Duration) {
        trace!("timer {id:?} every {interval:?}");
        match self.timers.get_mut(&id) {
            Some(t) if t.is_running() => t.set_interval(interval),
            _ => {
                self.timers.insert(id, IntervalTimer::started(interval));
            }
        }
    }

    fn stop_timer(&mut self, id: TimerId) {
        if let Some(t) = self.timers.get_mut(&id) {
            t.stop();
        }
    }

    fn present(&mut self, frame: &DrawList) {
        self.frames += 1;
        self.last_frame = frame.clone();
    }

    fn show_context_menu(&mut self, menu: &ContextMenu, at: Vec2) {
        debug!("context menu with {} items at {at:?}", menu.items.len());
        self.menus.push((menu.clone(), at));
    }

    fn take_focus(&mut self) {
        self.focus_requests += 1;
        self.native_focus = None;
    }

    fn tab_out(&mut self, forward: bool) {
        self.tab_outs.push(forward);
        self.native_focus = None;
    }

    fn native_control(&self, handle: NativeHandle) -> Option<NativeControlInfo> {
        self.natives.get(&handle).cloned()
    }

    fn focus_native_control(&mut self, handle: NativeHandle) -> bool {
        let ok = self
            .natives
            .get(&handle)
            .is_some_and(|n| n.visible && n.enabled && n.focusable);
        if ok {
            self.native_focus = Some(handle);
        }
        ok
    }

    fn native_control_focused(&self) -> Option<NativeHandle> {
        self.native_focus
    }
}
