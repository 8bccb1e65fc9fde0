//! The container control: the one native window hosting a control tree.
//!
//! [`LightweightContainer::window_proc`] is the native message entry point.
//! Every message goes through the same steps:
//!
//! 1. Input state is updated from the message.
//! 2. Pointer messages re-resolve the control under the pointer (and the
//!    drag target, for drag messages) and raise leave/enter pairs on change.
//! 3. The message is re-dispatched as a virtual event to its target, with
//!    positions translated into the target's local coordinates.
//! 4. Repaint requests and focus changes queued by handlers are forwarded to
//!    the host.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, trace, warn};
use wisp_engine::coords::{Rect, Vec2, Viewport};
use wisp_engine::input::{
    DragData, DragEffect, DragEffects, InputState, Key, Modifiers, MouseButton, TimerId,
    WindowMessage,
};
use wisp_engine::scene::DrawList;

use crate::autoscroll::{AUTO_SCROLL_TIMER, AutoScroll, AutoScrollMode, Transition};
use crate::config::ContainerConfig;
use crate::control::ControlId;
use crate::event::{
    ContextMenuEventArgs, DragEventArgs, EventArgs, EventKind, KeyEventArgs, MouseEventArgs,
};
use crate::focus::{FocusController, FocusTarget};
use crate::host::NativeHost;
use crate::painter::Painter;
use crate::tree::ControlTree;

/// What the container did with a native message.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MessageResult {
    Handled,
    /// Let the platform's default processing run.
    Unhandled,
    /// Drag messages: the effect to report back to the drag source.
    Drag(DragEffect),
}

#[derive(Debug, Copy, Clone)]
struct Capture {
    id: ControlId,
    button: MouseButton,
    clicks: u8,
}

/// Root adapter between native messages and a [`ControlTree`].
pub struct LightweightContainer<H: NativeHost> {
    tree: ControlTree,
    host: H,
    config: ContainerConfig,
    input: InputState,
    draw_list: DrawList,

    /// Control that last received mouse-enter.
    mouse_control: Option<ControlId>,
    capture: Option<Capture>,
    drag_target: Option<ControlId>,
    auto_scroll: AutoScroll,
    focus: FocusController,
}

impl<H: NativeHost> LightweightContainer<H> {
    pub fn new(host: H, viewport: Viewport, config: ContainerConfig) -> Self {
        Self {
            tree: ControlTree::new(viewport),
            host,
            config,
            input: InputState::default(),
            draw_list: DrawList::new(),
            mouse_control: None,
            capture: None,
            drag_target: None,
            auto_scroll: AutoScroll::new(),
            focus: FocusController::new(),
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn tree(&self) -> &ControlTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut ControlTree {
        &mut self.tree
    }

    #[inline]
    pub fn root(&self) -> ControlId {
        self.tree.root()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn mouse_control(&self) -> Option<ControlId> {
        self.mouse_control
    }

    pub fn drag_target(&self) -> Option<ControlId> {
        self.drag_target
    }

    pub fn auto_scroll_mode(&self) -> AutoScrollMode {
        self.auto_scroll.mode()
    }

    pub fn focus_controller(&self) -> &FocusController {
        &self.focus
    }

    pub fn focus_controller_mut(&mut self) -> &mut FocusController {
        &mut self.focus
    }

    /// Appends a target to the tab order.
    pub fn register_focus_target(&mut self, target: impl Into<FocusTarget>) -> usize {
        self.focus.register(target)
    }

    // ── message entry ─────────────────────────────────────────────────────

    /// Processes one native message.
    ///
    /// A panic raised by an event handler is caught here, logged, and the
    /// message reported as unhandled; the message loop keeps running.
    pub fn window_proc(&mut self, msg: WindowMessage) -> MessageResult {
        let name = msg.name();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let result = self.dispatch(msg);
            self.release_detached();
            result
        }));
        let result = match result {
            Ok(r) => r,
            Err(payload) => {
                error!("{name} handler panicked: {}", panic_message(payload.as_ref()));
                MessageResult::Unhandled
            }
        };
        self.flush();
        result
    }

    fn dispatch(&mut self, msg: WindowMessage) -> MessageResult {
        trace!("{}", msg.name());
        self.input.apply(&msg);

        match msg {
            WindowMessage::MouseMove { pos } => self.mouse_move(pos),
            WindowMessage::MouseDown { button, pos, clicks } => self.mouse_down(button, pos, clicks),
            WindowMessage::MouseUp { button, pos } => self.mouse_up(button, pos),
            WindowMessage::MouseWheel { pos, delta } => self.mouse_wheel(pos, delta),
            WindowMessage::MouseHover { pos } => self.mouse_hover(pos),
            WindowMessage::MouseLeave => {
                self.set_mouse_control(None, None);
                MessageResult::Handled
            }

            WindowMessage::KeyDown { key, modifiers } => self.key_down(key, modifiers),
            WindowMessage::KeyUp { key, modifiers } => {
                self.route_key(EventKind::KeyUp, Some(key), None, modifiers)
            }
            WindowMessage::Char { ch } => {
                let modifiers = self.input.modifiers;
                self.route_key(EventKind::KeyPress, None, Some(ch), modifiers)
            }

            WindowMessage::Paint { clip } => self.paint(clip),
            WindowMessage::ContextMenu { pos } => self.context_menu(pos),

            WindowMessage::DragEnter { pos, data, allowed } => self.drag_enter(pos, data, allowed),
            WindowMessage::DragOver { pos, data, allowed } => self.drag_over(pos, data, allowed),
            WindowMessage::DragLeave => self.drag_leave(),
            WindowMessage::DragDrop { pos, data, allowed } => self.drag_drop(pos, data, allowed),

            WindowMessage::FocusEnter { backward } => self.focus_enter(backward),
            WindowMessage::FocusLeave => self.focus_leave(),

            WindowMessage::Resize { size } => self.resize(size),
            WindowMessage::Timer { id } => self.timer(id),
        }
    }

    /// Forwards queued repaints and focus changes to the host and drops
    /// transient references to controls that left the surface.
    pub fn flush(&mut self) {
        self.release_detached();

        if self.tree.take_focus_notice().is_some() {
            self.focus.set_entered(true);
            // Lightweight focus lives on the surface window, which must also
            // pull native focus back from any hosted child window.
            if !self.input.focused || self.host.native_control_focused().is_some() {
                self.host.take_focus();
            }
        }

        let (rects, update) = self.tree.take_invalidations();
        for rect in rects {
            self.host.invalidate(rect);
        }
        if update {
            self.host.update();
        }
    }

    /// Ends capture, mouse tracking and drag tracking on controls that left
    /// the surface. A control removed without being disposed still receives
    /// the matching `MouseUp`, `MouseLeave` or `DragLeave`, so it can be
    /// re-added in a clean state.
    fn release_detached(&mut self) {
        if let Some(capture) = self.capture.filter(|c| !self.tree.is_rooted(c.id)) {
            self.capture = None;
            if self.tree.contains(capture.id) {
                trace!("release capture on detached {:?}", capture.id);
                self.raise_mouse(
                    capture.id,
                    EventKind::MouseUp,
                    MouseEventArgs { button: Some(capture.button), pos: Vec2::zero(), clicks: 1, delta: 0.0 },
                );
            }
        }
        if let Some(id) = self.mouse_control.filter(|&id| !self.tree.is_rooted(id)) {
            debug!("mouse control {id:?} left the surface");
            self.mouse_control = None;
            if self.tree.contains(id) {
                self.raise_mouse(id, EventKind::MouseLeave, MouseEventArgs::at(Vec2::zero()));
            }
        }
        if let Some(id) = self.drag_target.filter(|&id| !self.tree.is_rooted(id)) {
            self.drag_target = None;
            if self.tree.contains(id) {
                self.tree.raise(id, EventKind::DragLeave, &mut EventArgs::None);
            }
        }
    }

    // ── scrolling ─────────────────────────────────────────────────────────

    #[inline]
    pub fn scroll_offset(&self) -> f32 {
        self.tree.scroll_offset()
    }

    /// Largest valid scroll offset for the current content.
    pub fn max_scroll(&self) -> f32 {
        (self.tree.content_extent() - self.client_rect().size.y).max(0.0)
    }

    /// Scrolls to `offset`, clamped to the content. Returns `true` if the
    /// offset changed.
    pub fn scroll_to(&mut self, offset: f32) -> bool {
        let offset = offset.clamp(0.0, self.max_scroll());
        if offset == self.tree.scroll_offset() {
            return false;
        }
        debug!("scroll {} -> {offset}", self.tree.scroll_offset());
        self.tree.set_scroll_offset(offset);
        let root = self.tree.root();
        self.tree.invalidate(root);
        // Content moved under a resting pointer.
        if !self.input.dragging {
            let pointer = self.input.pointer_pos;
            self.set_mouse_control(pointer.map(|p| self.hit(p)), pointer);
        }
        true
    }

    pub fn scroll_by(&mut self, delta: f32) -> bool {
        self.scroll_to(self.tree.scroll_offset() + delta)
    }

    fn client_rect(&self) -> Rect {
        let root = self.tree.root();
        self.tree
            .get(root)
            .map_or(Rect::default(), |n| n.virtual_client_rect())
    }

    // ── coordinates ───────────────────────────────────────────────────────

    /// Deepest control under the client point.
    fn hit(&self, client: Vec2) -> ControlId {
        let root = self.tree.root();
        self.tree
            .point_to_local(root, client)
            .and_then(|p| self.tree.control_at_point(root, p))
            .unwrap_or(root)
    }

    /// `client` in `id`'s coordinates. The surface itself works in client
    /// coordinates; everything below it in scrolled content coordinates.
    fn local(&self, id: ControlId, client: Vec2) -> Vec2 {
        if id == self.tree.root() {
            return client;
        }
        self.tree.point_to_local(id, client).unwrap_or(client)
    }

    fn accepts_input(&self, id: ControlId) -> bool {
        self.tree.is_effectively_enabled(id)
    }

    // ── mouse ─────────────────────────────────────────────────────────────

    /// Moves mouse-enter ownership to `new`: leave on the old holder first,
    /// then enter on the new one.
    fn set_mouse_control(&mut self, new: Option<ControlId>, client: Option<Vec2>) {
        if new == self.mouse_control {
            return;
        }
        if let Some(old) = self.mouse_control.take() {
            if self.tree.contains(old) {
                let pos = client.map_or(Vec2::zero(), |p| self.local(old, p));
                trace!("mouse leave {old:?}");
                self.tree
                    .raise(old, EventKind::MouseLeave, &mut EventArgs::Mouse(MouseEventArgs::at(pos)));
            }
        }
        // A leave handler may have disposed the new control.
        let new = new.filter(|&id| self.tree.contains(id));
        self.mouse_control = new;
        if let (Some(new), Some(client)) = (new, client) {
            trace!("mouse enter {new:?}");
            let pos = self.local(new, client);
            self.tree
                .raise(new, EventKind::MouseEnter, &mut EventArgs::Mouse(MouseEventArgs::at(pos)));
        }
    }

    fn track_mouse(&mut self, client: Vec2) -> ControlId {
        let hit = self.hit(client);
        self.set_mouse_control(Some(hit), Some(client));
        hit
    }

    fn raise_mouse(&mut self, id: ControlId, kind: EventKind, args: MouseEventArgs) {
        self.tree.raise(id, kind, &mut EventArgs::Mouse(args));
    }

    /// The captured control, if it is still around.
    fn captured(&self) -> Option<Capture> {
        self.capture.filter(|c| self.tree.contains(c.id))
    }

    fn mouse_move(&mut self, client: Vec2) -> MessageResult {
        let hit = self.track_mouse(client);
        let target = self.captured().map_or(hit, |c| c.id);
        if self.accepts_input(target) {
            let pos = self.local(target, client);
            self.raise_mouse(target, EventKind::MouseMove, MouseEventArgs::at(pos));
        }
        MessageResult::Handled
    }

    fn mouse_down(&mut self, button: MouseButton, client: Vec2, clicks: u8) -> MessageResult {
        let target = self.track_mouse(client);
        if !self.accepts_input(target) {
            return MessageResult::Handled;
        }
        if self.config.focus_on_click && self.tree.get(target).is_some_and(|n| n.tab_stop()) {
            self.tree.focus(target);
        }
        self.capture = Some(Capture { id: target, button, clicks });
        let pos = self.local(target, client);
        self.raise_mouse(
            target,
            EventKind::MouseDown,
            MouseEventArgs { button: Some(button), pos, clicks, delta: 0.0 },
        );
        MessageResult::Handled
    }

    fn mouse_up(&mut self, button: MouseButton, client: Vec2) -> MessageResult {
        let hit = self.track_mouse(client);
        let capture = self.captured().filter(|c| c.button == button);
        let target = match capture {
            Some(c) => {
                self.capture = None;
                c.id
            }
            None => hit,
        };
        if !self.accepts_input(target) {
            return MessageResult::Handled;
        }
        let pos = self.local(target, client);
        let args = MouseEventArgs { button: Some(button), pos, clicks: 1, delta: 0.0 };
        self.raise_mouse(target, EventKind::MouseUp, args.clone());

        let Some(capture) = capture else {
            return MessageResult::Handled;
        };
        // Released over the control that took the press.
        if self.mouse_control == Some(capture.id) && self.accepts_input(capture.id) {
            self.raise_mouse(capture.id, EventKind::Click, args.clone());
            if capture.clicks >= 2 {
                self.raise_mouse(capture.id, EventKind::DoubleClick, MouseEventArgs { clicks: 2, ..args });
            }
        }
        MessageResult::Handled
    }

    fn mouse_wheel(&mut self, client: Vec2, delta: f32) -> MessageResult {
        self.track_mouse(client);
        let root = self.tree.root();
        let target = self
            .tree
            .point_to_local(root, client)
            .and_then(|p| self.tree.wheel_target_at_point(root, p))
            .filter(|&id| self.accepts_input(id));
        match target {
            Some(target) => {
                let pos = self.local(target, client);
                self.raise_mouse(
                    target,
                    EventKind::MouseWheel,
                    MouseEventArgs { button: None, pos, clicks: 0, delta },
                );
            }
            None => {
                self.scroll_by(-delta * self.config.wheel_line_height);
            }
        }
        MessageResult::Handled
    }

    fn mouse_hover(&mut self, client: Vec2) -> MessageResult {
        let target = self.track_mouse(client);
        if self.accepts_input(target) {
            let pos = self.local(target, client);
            self.raise_mouse(target, EventKind::MouseHover, MouseEventArgs::at(pos));
        }
        MessageResult::Handled
    }

    // ── keyboard ──────────────────────────────────────────────────────────

    fn key_down(&mut self, key: Key, modifiers: Modifiers) -> MessageResult {
        if key == Key::Tab && !modifiers.ctrl && !modifiers.alt {
            self.tab(!modifiers.shift);
            return MessageResult::Handled;
        }
        let result = self.route_key(EventKind::KeyDown, Some(key), None, modifiers);
        let menu_key = key == Key::Menu || (key == Key::F10 && modifiers.shift);
        if menu_key && result == MessageResult::Unhandled {
            return self.context_menu(None);
        }
        result
    }

    /// Sends a key event to the focused control. Unhandled when nothing
    /// inside the container holds focus.
    fn route_key(
        &mut self,
        kind: EventKind,
        key: Option<Key>,
        ch: Option<char>,
        modifiers: Modifiers,
    ) -> MessageResult {
        let Some(target) = self.tree.focused_control() else {
            return MessageResult::Unhandled;
        };
        if !self.accepts_input(target) {
            return MessageResult::Unhandled;
        }
        let mut args = EventArgs::Key(KeyEventArgs { key, ch, modifiers, handled: false });
        self.tree.raise(target, kind, &mut args);
        let handled = args.key().is_some_and(|k| k.handled);
        let menu_key = key == Some(Key::Menu) || (key == Some(Key::F10) && modifiers.shift);
        if menu_key && !handled {
            return MessageResult::Unhandled;
        }
        MessageResult::Handled
    }

    /// Moves focus to the next tab target, or out of the container.
    fn tab(&mut self, forward: bool) {
        let from = self.focus.index_of_focused(&self.tree, &self.host);
        let next = self.focus.next_index(from, forward, self.config.tab_wrap, |t| {
            t.is_focusable(&self.tree, &self.host)
        });
        match next {
            Some(index) => {
                let target = self.focus.targets()[index];
                debug!("tab -> {target:?}");
                target.focus(&mut self.tree, &mut self.host);
                self.focus.set_entered(true);
            }
            None => {
                debug!("tab out ({})", if forward { "forward" } else { "backward" });
                self.tree.clear_focus();
                self.focus.set_entered(false);
                self.host.tab_out(forward);
            }
        }
    }

    fn focus_enter(&mut self, backward: bool) -> MessageResult {
        if self.tree.focused_control().is_some() {
            self.focus.set_entered(true);
            return MessageResult::Handled;
        }
        let restore = self
            .focus
            .take_restore()
            .filter(|&i| {
                self.focus
                    .targets()
                    .get(i)
                    .is_some_and(|t| t.is_focusable(&self.tree, &self.host))
            });
        let index = restore.or_else(|| {
            self.focus
                .next_index(None, !backward, false, |t| t.is_focusable(&self.tree, &self.host))
        });
        if let Some(index) = index {
            let target = self.focus.targets()[index];
            debug!("focus enter -> {target:?} (restored: {})", restore.is_some());
            target.focus(&mut self.tree, &mut self.host);
        }
        self.focus.set_entered(true);
        MessageResult::Handled
    }

    fn focus_leave(&mut self) -> MessageResult {
        if self.focus.is_entered() {
            let index = self.focus.index_of_focused(&self.tree, &self.host);
            self.focus.remember(index);
            self.focus.set_entered(false);
        }
        self.tree.clear_focus();
        self.capture = None;
        MessageResult::Handled
    }

    // ── context menu ──────────────────────────────────────────────────────

    fn context_menu(&mut self, client: Option<Vec2>) -> MessageResult {
        let root = self.tree.root();
        let target = match client {
            Some(p) => Some(self.hit(p)).filter(|&id| self.accepts_input(id)).unwrap_or(root),
            None => root,
        };
        let menu = self
            .tree
            .ancestors_inclusive(target)
            .find_map(|id| self.tree.get(id).and_then(|n| n.context_menu().cloned()));
        let pos = client.map(|p| self.local(target, p));

        let mut args = EventArgs::ContextMenu(ContextMenuEventArgs { pos, menu, handled: false });
        self.tree.raise(target, EventKind::ShowContextMenu, &mut args);
        let Some(args) = args.context_menu_mut() else {
            return MessageResult::Unhandled;
        };
        if args.handled {
            return MessageResult::Handled;
        }
        match &args.menu {
            Some(menu) => {
                let at = client.unwrap_or_else(|| self.keyboard_menu_anchor());
                self.host.show_context_menu(menu, at);
                MessageResult::Handled
            }
            None => MessageResult::Unhandled,
        }
    }

    /// Where a keyboard-invoked menu opens: the middle of the focused
    /// control, or of the surface when nothing holds focus.
    fn keyboard_menu_anchor(&self) -> Vec2 {
        self.tree
            .focused_control()
            .and_then(|id| FocusTarget::Lightweight(id).bounds(&self.tree, &self.host))
            .unwrap_or_else(|| self.client_rect())
            .center()
    }

    // ── drag and drop ─────────────────────────────────────────────────────

    fn drag_args(&self, id: ControlId, client: Vec2, data: &DragData, allowed: DragEffects) -> EventArgs {
        EventArgs::Drag(DragEventArgs {
            pos: self.local(id, client),
            data: data.clone(),
            allowed,
            effect: DragEffect::None,
        })
    }

    /// Effect picked by a handler, if the source allows it.
    fn effect_of(args: &mut EventArgs, allowed: DragEffects) -> DragEffect {
        match args.drag_mut() {
            Some(d) if allowed.allows(d.effect) => d.effect,
            _ => DragEffect::None,
        }
    }

    /// Re-resolves the drop target under `client`, raising drag-leave on the
    /// previous target and drag-enter on the new one. Returns the effect the
    /// new target chose on enter.
    fn update_drag_target(&mut self, client: Vec2, data: &DragData, allowed: DragEffects) -> Option<DragEffect> {
        let root = self.tree.root();
        let new = self
            .tree
            .point_to_local(root, client)
            .and_then(|p| self.tree.drag_target_at_point(root, p))
            .filter(|&id| self.accepts_input(id));
        if new == self.drag_target {
            return None;
        }
        if let Some(old) = self.drag_target.take() {
            trace!("drag leave {old:?}");
            self.tree.raise(old, EventKind::DragLeave, &mut EventArgs::None);
        }
        let new = new.filter(|&id| self.tree.contains(id))?;
        self.drag_target = Some(new);
        trace!("drag enter {new:?}");
        let mut args = self.drag_args(new, client, data, allowed);
        self.tree.raise(new, EventKind::DragEnter, &mut args);
        Some(Self::effect_of(&mut args, allowed))
    }

    fn drag_enter(&mut self, client: Vec2, data: DragData, allowed: DragEffects) -> MessageResult {
        let effect = self.update_drag_target(client, &data, allowed).unwrap_or_default();
        self.track_auto_scroll(client);
        MessageResult::Drag(effect)
    }

    fn drag_over(&mut self, client: Vec2, data: DragData, allowed: DragEffects) -> MessageResult {
        self.update_drag_target(client, &data, allowed);
        let effect = match self.drag_target {
            Some(target) => {
                let mut args = self.drag_args(target, client, &data, allowed);
                self.tree.raise(target, EventKind::DragOver, &mut args);
                Self::effect_of(&mut args, allowed)
            }
            None => DragEffect::None,
        };
        self.track_auto_scroll(client);
        MessageResult::Drag(effect)
    }

    fn drag_leave(&mut self) -> MessageResult {
        if let Some(old) = self.drag_target.take() {
            trace!("drag leave {old:?}");
            self.tree.raise(old, EventKind::DragLeave, &mut EventArgs::None);
        }
        self.stop_auto_scroll();
        MessageResult::Drag(DragEffect::None)
    }

    fn drag_drop(&mut self, client: Vec2, data: DragData, allowed: DragEffects) -> MessageResult {
        self.stop_auto_scroll();
        self.update_drag_target(client, &data, allowed);
        let effect = match self.drag_target.take() {
            Some(target) => {
                debug!("drop on {target:?}");
                let mut args = self.drag_args(target, client, &data, allowed);
                self.tree.raise(target, EventKind::DragDrop, &mut args);
                Self::effect_of(&mut args, allowed)
            }
            None => DragEffect::None,
        };
        MessageResult::Drag(effect)
    }

    fn track_auto_scroll(&mut self, client: Vec2) {
        let transition = self.auto_scroll.track(
            client,
            self.client_rect(),
            self.tree.scroll_offset(),
            self.max_scroll(),
            &self.config.auto_scroll,
        );
        match transition {
            Transition::Started(_) => self.host.start_timer(AUTO_SCROLL_TIMER, self.config.auto_scroll.dwell),
            Transition::Stopped => self.host.stop_timer(AUTO_SCROLL_TIMER),
            Transition::None => {}
        }
    }

    fn stop_auto_scroll(&mut self) {
        if self.auto_scroll.is_active() {
            self.auto_scroll.stop();
            self.host.stop_timer(AUTO_SCROLL_TIMER);
        }
    }

    fn timer(&mut self, id: TimerId) -> MessageResult {
        if id != AUTO_SCROLL_TIMER {
            return MessageResult::Unhandled;
        }
        let outcome = self.auto_scroll.tick(
            self.tree.scroll_offset(),
            self.max_scroll(),
            &self.config.auto_scroll,
        );
        let Some(outcome) = outcome else {
            self.host.stop_timer(AUTO_SCROLL_TIMER);
            return MessageResult::Handled;
        };
        self.scroll_by(outcome.delta);
        if outcome.finished {
            self.host.stop_timer(AUTO_SCROLL_TIMER);
        } else if let Some(interval) = outcome.retime {
            self.host.start_timer(AUTO_SCROLL_TIMER, interval);
        }
        MessageResult::Handled
    }

    // ── paint / resize ────────────────────────────────────────────────────

    fn paint(&mut self, clip: Rect) -> MessageResult {
        let root = self.tree.root();
        let scroll = Vec2::new(0.0, self.tree.scroll_offset());
        self.draw_list.clear();
        {
            let mut painter = Painter::new(&mut self.draw_list);
            painter.push_clip(clip);
            self.tree.paint_self(root, &mut painter);
            painter.push_translate(-scroll);
            self.tree.paint_children(root, &mut painter, clip.translate(scroll));
            painter.pop_translate();
            painter.pop_clip();
        }
        self.host.present(&self.draw_list);
        MessageResult::Handled
    }

    fn resize(&mut self, size: Viewport) -> MessageResult {
        let root = self.tree.root();
        if let Err(e) = self.tree.set_virtual_bounds(root, size.rect()) {
            warn!("resize to {size:?} rejected: {e}");
            return MessageResult::Unhandled;
        }
        // Re-clamp against the new client height.
        self.scroll_to(self.tree.scroll_offset());
        MessageResult::Handled
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use wisp_engine::coords::ColorRgba;

    use super::*;
    use crate::control::LightweightControl;
    use crate::event::ContextMenu;
    use crate::host::HeadlessHost;

    type Container = LightweightContainer<HeadlessHost>;
    type Log = Rc<RefCell<Vec<String>>>;

    fn container() -> Container {
        container_with(ContainerConfig::default())
    }

    fn container_with(config: ContainerConfig) -> Container {
        LightweightContainer::new(HeadlessHost::new(), Viewport::new(200.0, 200.0), config)
    }

    fn add(c: &mut Container, parent: ControlId, control: LightweightControl) -> ControlId {
        let id = c.tree_mut().create(control);
        c.tree_mut().add(parent, id).unwrap();
        id
    }

    fn ctl(name: &str, x: f32, y: f32, w: f32, h: f32) -> LightweightControl {
        LightweightControl::new(name).bounds(Rect::new(x, y, w, h))
    }

    fn record(c: &mut Container, id: ControlId, kinds: &[EventKind], log: &Log) {
        let name = c.tree().get(id).unwrap().name().to_string();
        for &kind in kinds {
            let log = Rc::clone(log);
            let name = name.clone();
            c.tree_mut()
                .subscribe(id, kind, move |_, _, _| log.borrow_mut().push(format!("{name}:{kind:?}")))
                .unwrap();
        }
    }

    fn mouse_move(x: f32, y: f32) -> WindowMessage {
        WindowMessage::MouseMove { pos: Vec2::new(x, y) }
    }

    fn press(c: &mut Container, x: f32, y: f32) -> MessageResult {
        let pos = Vec2::new(x, y);
        c.window_proc(WindowMessage::MouseDown { button: MouseButton::Left, pos, clicks: 1 })
    }

    fn release(c: &mut Container, x: f32, y: f32) -> MessageResult {
        let pos = Vec2::new(x, y);
        c.window_proc(WindowMessage::MouseUp { button: MouseButton::Left, pos })
    }

    fn key(c: &mut Container, key: Key, modifiers: Modifiers) -> MessageResult {
        c.window_proc(WindowMessage::KeyDown { key, modifiers })
    }

    fn pump_timers(c: &mut Container, dt: Duration) {
        let due = c.host_mut().advance_timers(dt);
        for msg in due {
            c.window_proc(msg);
        }
    }

    const ENTER_LEAVE: &[EventKind] = &[EventKind::MouseEnter, EventKind::MouseLeave];

    // ── mouse ─────────────────────────────────────────────────────────────

    #[test]
    fn enter_and_leave_stay_paired_under_rapid_moves() {
        let mut c = container();
        let root = c.root();
        let a = add(&mut c, root, ctl("a", 0.0, 0.0, 50.0, 50.0));
        let b = add(&mut c, root, ctl("b", 100.0, 100.0, 50.0, 50.0));
        let inner = add(&mut c, b, ctl("inner", 10.0, 10.0, 20.0, 20.0));
        let log = Log::default();
        for id in [root, a, b, inner] {
            record(&mut c, id, ENTER_LEAVE, &log);
        }

        // Jumps straight from a into b's child, skipping b itself.
        for (x, y) in [(10.0, 10.0), (120.0, 120.0), (115.0, 115.0), (105.0, 105.0), (190.0, 190.0), (10.0, 10.0)] {
            c.window_proc(mouse_move(x, y));
        }
        c.window_proc(WindowMessage::MouseLeave);

        assert_eq!(
            *log.borrow(),
            [
                "a:MouseEnter",
                "a:MouseLeave",
                "inner:MouseEnter",
                "inner:MouseLeave",
                "b:MouseEnter",
                "b:MouseLeave",
                "container:MouseEnter",
                "container:MouseLeave",
                "a:MouseEnter",
                "a:MouseLeave",
            ]
        );
        assert_eq!(c.mouse_control(), None);
    }

    #[test]
    fn click_needs_release_over_the_pressed_control() {
        let mut c = container();
        let root = c.root();
        let a = add(&mut c, root, ctl("a", 0.0, 0.0, 50.0, 50.0));
        let log = Log::default();
        record(&mut c, a, &[EventKind::MouseDown, EventKind::MouseMove, EventKind::MouseUp, EventKind::Click], &log);

        press(&mut c, 10.0, 10.0);
        release(&mut c, 12.0, 12.0);
        assert_eq!(*log.borrow(), ["a:MouseDown", "a:MouseUp", "a:Click"]);

        log.borrow_mut().clear();
        press(&mut c, 10.0, 10.0);
        // Captured: the move outside still reaches a.
        c.window_proc(mouse_move(150.0, 150.0));
        release(&mut c, 150.0, 150.0);
        assert_eq!(*log.borrow(), ["a:MouseDown", "a:MouseMove", "a:MouseUp"]);
    }

    #[test]
    fn mouse_positions_are_local_to_the_target() {
        let mut c = container();
        let root = c.root();
        let panel = add(&mut c, root, ctl("panel", 20.0, 30.0, 100.0, 100.0));
        let seen = Rc::new(RefCell::new(None));
        let s = Rc::clone(&seen);
        c.tree_mut()
            .subscribe(panel, EventKind::MouseMove, move |_, _, args| {
                *s.borrow_mut() = args.mouse().map(|m| m.pos);
            })
            .unwrap();
        c.window_proc(mouse_move(25.0, 35.0));
        assert_eq!(*seen.borrow(), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn disabled_controls_occlude_but_receive_no_input() {
        let mut c = container();
        let root = c.root();
        let below = add(&mut c, root, ctl("below", 0.0, 0.0, 100.0, 100.0));
        let off = add(&mut c, root, ctl("off", 0.0, 0.0, 50.0, 50.0).enabled(false));
        let log = Log::default();
        for id in [below, off] {
            record(&mut c, id, &[EventKind::MouseEnter, EventKind::MouseDown, EventKind::Click], &log);
        }
        press(&mut c, 10.0, 10.0);
        release(&mut c, 10.0, 10.0);
        assert_eq!(*log.borrow(), ["off:MouseEnter"]);
        assert_eq!(c.mouse_control(), Some(off));
    }

    #[test]
    fn disposed_mouse_control_is_forgotten() {
        let mut c = container();
        let root = c.root();
        let a = add(&mut c, root, ctl("a", 0.0, 0.0, 50.0, 50.0));
        let log = Log::default();
        record(&mut c, root, ENTER_LEAVE, &log);
        c.window_proc(mouse_move(10.0, 10.0));
        assert_eq!(c.mouse_control(), Some(a));

        c.tree_mut().dispose(a).unwrap();
        c.flush();
        assert_eq!(c.mouse_control(), None);
        c.window_proc(mouse_move(10.0, 10.0));
        assert_eq!(*log.borrow(), ["container:MouseEnter"]);
    }

    #[test]
    fn removed_controls_get_their_release_and_leave() {
        let mut c = container();
        let root = c.root();
        let a = add(&mut c, root, ctl("a", 0.0, 0.0, 50.0, 50.0));
        let log = Log::default();
        record(&mut c, a, &[EventKind::MouseEnter, EventKind::MouseLeave, EventKind::MouseUp], &log);

        press(&mut c, 10.0, 10.0);
        c.tree_mut().remove(root, a).unwrap();
        c.flush();
        assert_eq!(*log.borrow(), ["a:MouseEnter", "a:MouseUp", "a:MouseLeave"]);
        assert_eq!(c.mouse_control(), None);

        // Re-added elsewhere, it pairs up again from a clean state.
        c.window_proc(mouse_move(150.0, 150.0));
        c.tree_mut().set_virtual_location(a, Vec2::new(100.0, 100.0)).unwrap();
        c.tree_mut().add(root, a).unwrap();
        c.window_proc(mouse_move(110.0, 110.0));
        release(&mut c, 110.0, 110.0);
        assert_eq!(
            *log.borrow(),
            ["a:MouseEnter", "a:MouseUp", "a:MouseLeave", "a:MouseEnter", "a:MouseUp"]
        );
    }

    #[test]
    fn removing_the_drop_target_ends_its_drag() {
        let mut c = container();
        let root = c.root();
        let zone = add(&mut c, root, ctl("zone", 0.0, 0.0, 50.0, 50.0).allow_drop(true));
        let log = Log::default();
        record(&mut c, zone, &[EventKind::DragEnter, EventKind::DragLeave], &log);

        let pos = Vec2::new(10.0, 10.0);
        c.window_proc(WindowMessage::DragEnter { pos, data: text(), allowed: DragEffects::ALL });
        c.tree_mut().remove(root, zone).unwrap();
        c.flush();
        assert_eq!(*log.borrow(), ["zone:DragEnter", "zone:DragLeave"]);
    }

    #[test]
    fn wheel_scrolls_the_container_unless_a_control_claims_it() {
        let mut c = container();
        let root = c.root();
        add(&mut c, root, ctl("content", 0.0, 0.0, 200.0, 1000.0));
        let wheel = add(&mut c, root, ctl("wheel", 150.0, 0.0, 50.0, 50.0).allow_mouse_wheel(true));
        let log = Log::default();
        record(&mut c, wheel, &[EventKind::MouseWheel], &log);

        c.window_proc(WindowMessage::MouseWheel { pos: Vec2::new(10.0, 10.0), delta: -1.0 });
        assert_eq!(c.scroll_offset(), 24.0);

        c.window_proc(WindowMessage::MouseWheel { pos: Vec2::new(160.0, 10.0), delta: -1.0 });
        assert_eq!(*log.borrow(), ["wheel:MouseWheel"]);
        assert_eq!(c.scroll_offset(), 24.0);

        c.window_proc(WindowMessage::MouseWheel { pos: Vec2::new(10.0, 10.0), delta: 5.0 });
        assert_eq!(c.scroll_offset(), 0.0);
    }

    #[test]
    fn handler_panic_is_contained() {
        let mut c = container();
        let root = c.root();
        let a = add(&mut c, root, ctl("a", 0.0, 0.0, 50.0, 50.0));
        c.tree_mut()
            .subscribe(a, EventKind::Click, |_, _, _| panic!("boom"))
            .unwrap();
        press(&mut c, 10.0, 10.0);
        assert_eq!(release(&mut c, 10.0, 10.0), MessageResult::Unhandled);
        assert_eq!(c.window_proc(mouse_move(12.0, 12.0)), MessageResult::Handled);
        assert_eq!(c.mouse_control(), Some(a));
    }

    // ── keyboard and focus ────────────────────────────────────────────────

    #[test]
    fn click_focuses_tab_stops_and_keys_follow_focus() {
        let mut c = container();
        let root = c.root();
        let edit = add(&mut c, root, ctl("edit", 0.0, 0.0, 50.0, 20.0).tab_stop(true));
        let typed = Rc::new(RefCell::new(String::new()));
        let t = Rc::clone(&typed);
        c.tree_mut()
            .subscribe(edit, EventKind::KeyPress, move |_, _, args| {
                if let Some(ch) = args.key().and_then(|k| k.ch) {
                    t.borrow_mut().push(ch);
                }
            })
            .unwrap();

        assert_eq!(key(&mut c, Key::A, Modifiers::default()), MessageResult::Unhandled);

        press(&mut c, 5.0, 5.0);
        assert_eq!(c.tree().focused_control(), Some(edit));
        assert_eq!(c.host().focus_requests, 1);

        assert_eq!(key(&mut c, Key::A, Modifiers::default()), MessageResult::Handled);
        c.window_proc(WindowMessage::Char { ch: 'h' });
        c.window_proc(WindowMessage::Char { ch: 'i' });
        assert_eq!(*typed.borrow(), "hi");
    }

    fn tab_targets(c: &mut Container, n: usize) -> Vec<ControlId> {
        let root = c.root();
        (0..n)
            .map(|i| {
                let y = i as f32 * 30.0;
                let id = add(c, root, ctl(&format!("t{i}"), 0.0, y, 80.0, 20.0).tab_stop(true));
                c.register_focus_target(id);
                id
            })
            .collect()
    }

    #[test]
    fn tab_skips_ineligible_targets_and_tabs_out_at_the_ends() {
        let mut c = container();
        let t = tab_targets(&mut c, 3);
        c.tree_mut().set_enabled(t[1], false).unwrap();

        key(&mut c, Key::Tab, Modifiers::default());
        assert_eq!(c.tree().focused_control(), Some(t[0]));
        key(&mut c, Key::Tab, Modifiers::default());
        assert_eq!(c.tree().focused_control(), Some(t[2]));
        key(&mut c, Key::Tab, Modifiers::default());
        assert_eq!(c.tree().focused_control(), None);
        assert!(!c.focus_controller().is_entered());

        key(&mut c, Key::Tab, Modifiers::SHIFT);
        assert_eq!(c.tree().focused_control(), Some(t[2]));
        key(&mut c, Key::Tab, Modifiers::SHIFT);
        assert_eq!(c.tree().focused_control(), Some(t[0]));
        key(&mut c, Key::Tab, Modifiers::SHIFT);
        assert_eq!(c.host().tab_outs, [true, false]);
    }

    #[test]
    fn tab_wraps_when_configured() {
        let mut c = container_with(ContainerConfig::default().tab_wrap(true));
        let t = tab_targets(&mut c, 2);
        for expected in [t[0], t[1], t[0]] {
            key(&mut c, Key::Tab, Modifiers::default());
            assert_eq!(c.tree().focused_control(), Some(expected));
        }
        assert!(c.host().tab_outs.is_empty());
    }

    #[test]
    fn focus_is_restored_after_deactivation_but_not_after_tab_out() {
        let mut c = container();
        let t = tab_targets(&mut c, 3);
        key(&mut c, Key::Tab, Modifiers::default());
        key(&mut c, Key::Tab, Modifiers::default());
        assert_eq!(c.tree().focused_control(), Some(t[1]));

        c.window_proc(WindowMessage::FocusLeave);
        assert_eq!(c.tree().focused_control(), None);
        c.window_proc(WindowMessage::FocusEnter { backward: false });
        assert_eq!(c.tree().focused_control(), Some(t[1]));

        key(&mut c, Key::Tab, Modifiers::default());
        key(&mut c, Key::Tab, Modifiers::default());
        assert_eq!(c.host().tab_outs, [true]);
        c.window_proc(WindowMessage::FocusLeave);
        c.window_proc(WindowMessage::FocusEnter { backward: false });
        assert_eq!(c.tree().focused_control(), Some(t[0]));
    }

    #[test]
    fn backward_focus_enter_starts_at_the_last_target() {
        let mut c = container();
        let t = tab_targets(&mut c, 3);
        c.window_proc(WindowMessage::FocusEnter { backward: true });
        assert_eq!(c.tree().focused_control(), Some(t[2]));
    }

    // ── context menu ──────────────────────────────────────────────────────

    #[test]
    fn context_menu_prefers_the_nearest_menu() {
        let mut c = container();
        let root = c.root();
        let root_menu = ContextMenu::new().item("Refresh");
        let panel_menu = ContextMenu::new().item("Cut").item("Copy");
        c.tree_mut().set_context_menu(root, Some(root_menu.clone())).unwrap();
        let panel = add(&mut c, root, ctl("panel", 0.0, 0.0, 100.0, 100.0).context_menu(panel_menu.clone()));
        add(&mut c, panel, ctl("leaf", 10.0, 10.0, 20.0, 20.0));

        c.window_proc(WindowMessage::ContextMenu { pos: Some(Vec2::new(15.0, 15.0)) });
        assert_eq!(c.host().menus.last(), Some(&(panel_menu, Vec2::new(15.0, 15.0))));

        // Keyboard invocation with nothing focused opens mid-surface.
        c.window_proc(WindowMessage::ContextMenu { pos: None });
        assert_eq!(c.host().menus.last(), Some(&(root_menu.clone(), Vec2::new(100.0, 100.0))));

        key(&mut c, Key::Menu, Modifiers::default());
        assert_eq!(c.host().menus.len(), 3);

        c.tree_mut()
            .subscribe(root, EventKind::ShowContextMenu, |_, _, args| {
                if let Some(m) = args.context_menu_mut() {
                    m.handled = true;
                }
            })
            .unwrap();
        assert_eq!(c.window_proc(WindowMessage::ContextMenu { pos: None }), MessageResult::Handled);
        assert_eq!(c.host().menus.len(), 3);
    }

    #[test]
    fn keyboard_menus_open_over_the_focused_control() {
        let mut c = container();
        let root = c.root();
        c.tree_mut().set_context_menu(root, Some(ContextMenu::new().item("Paste"))).unwrap();
        let field = add(&mut c, root, ctl("field", 120.0, 140.0, 60.0, 20.0).tab_stop(true));
        assert!(c.tree_mut().focus(field));

        key(&mut c, Key::Menu, Modifiers::default());
        assert_eq!(c.host().menus.last().map(|(_, at)| *at), Some(Vec2::new(150.0, 150.0)));
    }

    // ── drag and drop ─────────────────────────────────────────────────────

    fn text() -> DragData {
        DragData::Text("payload".into())
    }

    #[test]
    fn drag_target_changes_raise_leave_then_enter() {
        let mut c = container();
        let root = c.root();
        let copy_zone = add(&mut c, root, ctl("copy", 0.0, 0.0, 50.0, 50.0).allow_drop(true));
        let plain_zone = add(&mut c, root, ctl("plain", 100.0, 0.0, 50.0, 50.0).allow_drop(true));
        let log = Log::default();
        let kinds = [EventKind::DragEnter, EventKind::DragOver, EventKind::DragLeave, EventKind::DragDrop];
        for id in [copy_zone, plain_zone] {
            record(&mut c, id, &kinds, &log);
        }
        for kind in [EventKind::DragEnter, EventKind::DragOver, EventKind::DragDrop] {
            c.tree_mut()
                .subscribe(copy_zone, kind, |_, _, args| {
                    if let Some(d) = args.drag_mut() {
                        d.effect = DragEffect::Copy;
                    }
                })
                .unwrap();
        }

        let all = DragEffects::ALL;
        let r = c.window_proc(WindowMessage::DragEnter { pos: Vec2::new(10.0, 10.0), data: text(), allowed: all });
        assert_eq!(r, MessageResult::Drag(DragEffect::Copy));
        let r = c.window_proc(WindowMessage::DragOver { pos: Vec2::new(120.0, 10.0), data: text(), allowed: all });
        assert_eq!(r, MessageResult::Drag(DragEffect::None));
        c.window_proc(WindowMessage::DragOver { pos: Vec2::new(75.0, 10.0), data: text(), allowed: all });
        assert_eq!(c.drag_target(), None);

        let moves_only = DragEffects { copy: false, moves: true, link: false };
        let r = c.window_proc(WindowMessage::DragDrop { pos: Vec2::new(10.0, 10.0), data: text(), allowed: moves_only });
        assert_eq!(r, MessageResult::Drag(DragEffect::None));
        assert_eq!(c.drag_target(), None);

        assert_eq!(
            *log.borrow(),
            [
                "copy:DragEnter",
                "copy:DragLeave",
                "plain:DragEnter",
                "plain:DragOver",
                "plain:DragLeave",
                "copy:DragEnter",
                "copy:DragDrop",
            ]
        );
    }

    #[test]
    fn auto_scroll_runs_while_the_drag_sits_in_a_band() {
        let mut c = container();
        let root = c.root();
        add(&mut c, root, ctl("content", 0.0, 0.0, 200.0, 1000.0));
        let all = DragEffects::ALL;

        c.window_proc(WindowMessage::DragEnter { pos: Vec2::new(100.0, 190.0), data: text(), allowed: all });
        assert_eq!(c.auto_scroll_mode(), AutoScrollMode::Down);
        assert_eq!(c.host().timer_interval(AUTO_SCROLL_TIMER), Some(Duration::from_millis(400)));

        pump_timers(&mut c, Duration::from_millis(400));
        // 15 px deep into a 25 px band: round(15 / 25 * 12) = 7.
        assert_eq!(c.scroll_offset(), 7.0);
        assert_eq!(c.host().timer_interval(AUTO_SCROLL_TIMER), Some(Duration::from_millis(50)));
        pump_timers(&mut c, Duration::from_millis(100));
        assert_eq!(c.scroll_offset(), 21.0);

        c.window_proc(WindowMessage::DragOver { pos: Vec2::new(100.0, 100.0), data: text(), allowed: all });
        assert_eq!(c.auto_scroll_mode(), AutoScrollMode::Off);
        assert!(!c.host().timer_running(AUTO_SCROLL_TIMER));

        c.window_proc(WindowMessage::DragOver { pos: Vec2::new(100.0, 10.0), data: text(), allowed: all });
        assert_eq!(c.auto_scroll_mode(), AutoScrollMode::Up);
        c.window_proc(WindowMessage::DragOver { pos: Vec2::new(100.0, 30.0), data: text(), allowed: all });
        assert_eq!(c.auto_scroll_mode(), AutoScrollMode::Off);

        c.window_proc(WindowMessage::DragOver { pos: Vec2::new(100.0, 10.0), data: text(), allowed: all });
        c.window_proc(WindowMessage::DragLeave);
        assert_eq!(c.auto_scroll_mode(), AutoScrollMode::Off);
        assert!(!c.host().timer_running(AUTO_SCROLL_TIMER));
    }

    #[test]
    fn auto_scroll_stops_at_the_limit() {
        let mut c = container();
        let root = c.root();
        add(&mut c, root, ctl("content", 0.0, 0.0, 200.0, 210.0));
        c.window_proc(WindowMessage::DragEnter {
            pos: Vec2::new(100.0, 199.0),
            data: text(),
            allowed: DragEffects::ALL,
        });
        pump_timers(&mut c, Duration::from_millis(400));
        pump_timers(&mut c, Duration::from_millis(50));
        assert_eq!(c.scroll_offset(), 10.0);
        assert_eq!(c.auto_scroll_mode(), AutoScrollMode::Off);
        assert!(!c.host().timer_running(AUTO_SCROLL_TIMER));
    }

    // ── paint, resize, invalidation ───────────────────────────────────────

    #[test]
    fn paint_offsets_children_by_the_scroll_and_clips_them() {
        let mut c = container();
        let root = c.root();
        add(&mut c, root, ctl("content", 0.0, 0.0, 200.0, 1000.0));
        let boxed = add(&mut c, root, ctl("box", 0.0, 100.0, 50.0, 50.0));
        c.tree_mut()
            .on_paint(root, |tree, id, p| {
                let rect = tree.get(id).unwrap().virtual_client_rect();
                p.fill_rect(rect, ColorRgba::white());
            })
            .unwrap();
        c.tree_mut()
            .on_paint(boxed, |_, _, p| p.fill_rect(Rect::new(0.0, 0.0, 60.0, 60.0), ColorRgba::black()))
            .unwrap();

        assert!(c.scroll_to(60.0));
        c.window_proc(WindowMessage::Paint { clip: Rect::new(0.0, 0.0, 200.0, 200.0) });

        let frame = &c.host().last_frame;
        assert_eq!(c.host().frames, 1);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.items()[0].cmd.bounds(), Some(Rect::new(0.0, 0.0, 200.0, 200.0)));
        assert_eq!(frame.items()[1].cmd.bounds(), Some(Rect::new(0.0, 40.0, 60.0, 60.0)));
        assert_eq!(frame.items()[1].visible_bounds(), Some(Rect::new(0.0, 40.0, 50.0, 50.0)));
    }

    #[test]
    fn resize_lays_out_the_surface_and_reclamps_scroll() {
        let mut c = container();
        let root = c.root();
        add(&mut c, root, ctl("content", 0.0, 0.0, 200.0, 1000.0));
        let log = Log::default();
        record(&mut c, root, &[EventKind::Layout, EventKind::SizeChanged], &log);

        assert!(c.scroll_to(900.0));
        assert_eq!(c.scroll_offset(), 800.0);
        c.window_proc(WindowMessage::Resize { size: Viewport::new(200.0, 400.0) });
        assert_eq!(c.scroll_offset(), 600.0);
        assert_eq!(c.tree().virtual_bounds(root), Some(Rect::new(0.0, 0.0, 200.0, 400.0)));
        assert_eq!(*log.borrow(), ["container:Layout", "container:SizeChanged"]);
    }

    #[test]
    fn flush_forwards_invalidations_in_client_space() {
        let mut c = container();
        let root = c.root();
        add(&mut c, root, ctl("content", 0.0, 0.0, 200.0, 1000.0));
        let a = add(&mut c, root, ctl("a", 10.0, 100.0, 20.0, 20.0));
        c.scroll_to(50.0);
        c.flush();
        c.host_mut().invalidated.clear();

        c.tree_mut().set_visible(a, false).unwrap();
        c.flush();
        assert_eq!(c.host().invalidated, [Rect::new(10.0, 50.0, 20.0, 20.0)]);
    }

    #[test]
    fn tabbing_back_from_a_native_child_reclaims_window_focus() {
        use crate::host::{NativeControlInfo, NativeHandle};

        let mut c = container();
        let root = c.root();
        let t0 = add(&mut c, root, ctl("t0", 0.0, 0.0, 10.0, 10.0).tab_stop(true));
        let edit = NativeHandle(7);
        c.host_mut().add_native(
            edit,
            NativeControlInfo {
                name: "edit".into(),
                visible: true,
                enabled: true,
                focusable: true,
                bounds: Rect::new(0.0, 50.0, 100.0, 20.0),
            },
        );
        c.register_focus_target(t0);
        c.register_focus_target(edit);
        c.window_proc(WindowMessage::FocusEnter { backward: false });
        assert_eq!(c.tree().focused_control(), Some(t0));

        key(&mut c, Key::Tab, Modifiers::default());
        assert_eq!(c.tree().focused_control(), None);
        assert_eq!(c.host().native_focus, Some(edit));

        key(&mut c, Key::Tab, Modifiers::SHIFT);
        assert_eq!(c.tree().focused_control(), Some(t0));
        assert_eq!(c.host().native_focus, None);
    }
}
