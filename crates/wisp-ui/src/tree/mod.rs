//! Arena-backed tree of lightweight controls.
//!
//! The tree owns every control of one container surface. The surface itself
//! is the tree's root node, so the root adapter (driven by native messages)
//! and nested controls (driven by their parent) share one set of hit-testing,
//! layout, focus and dispatch routines.
//!
//! Controls never hold owning pointers to each other: a container owns its
//! children through an ordered id list and each child keeps a plain id back
//! to its container.

mod collection;
mod focus;
mod layout;
mod paint;

pub use layout::LayoutGuard;

use log::{debug, trace, warn};
use slotmap::SlotMap;
use wisp_engine::coords::{Rect, Vec2, Viewport};

use crate::accessibility::AccessibleRole;
use crate::control::{ControlId, ControlNode, LightweightControl};
use crate::error::TreeError;
use crate::event::{ContextMenu, EventArgs, EventKind, Handler, ListenerId, PaintHandler};

/// The control tree of one container surface.
pub struct ControlTree {
    nodes: SlotMap<ControlId, ControlNode>,
    root: ControlId,
    /// Vertical scroll of the root's content, in pixels.
    scroll_offset: f32,
    /// Client-space rectangles queued for repaint.
    invalid: Vec<Rect>,
    update_requested: bool,
    /// Last control that took focus since the container last looked.
    focus_notice: Option<ControlId>,
}

impl ControlTree {
    pub fn new(viewport: Viewport) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(
            LightweightControl::new("container")
                .role(AccessibleRole::Client)
                .bounds(viewport.rect())
                .into_node(),
        );
        Self {
            nodes,
            root,
            scroll_offset: 0.0,
            invalid: Vec::new(),
            update_requested: false,
            focus_notice: None,
        }
    }

    /// The node standing for the container surface itself.
    #[inline]
    pub fn root(&self) -> ControlId {
        self.root
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Creates a detached control.
    pub fn create(&mut self, control: LightweightControl) -> ControlId {
        let id = self.nodes.insert(control.into_node());
        trace!("created control {:?} ({})", id, self.nodes[id].name);
        id
    }

    /// Removes the control from its container and destroys it and its
    /// whole subtree. Raises `Disposed` on each control, children first.
    pub fn dispose(&mut self, id: ControlId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootNotAllowed);
        }
        let node = self.node(id)?;
        if let Some(parent) = node.parent {
            self.remove(parent, id)?;
        }
        self.dispose_subtree(id);
        Ok(())
    }

    fn dispose_subtree(&mut self, id: ControlId) {
        let children = match self.nodes.get_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            if let Some(c) = self.nodes.get_mut(child) {
                c.parent = None;
            }
            self.dispose_subtree(child);
        }
        self.raise(id, EventKind::Disposed, &mut EventArgs::None);
        if let Some(node) = self.nodes.remove(id) {
            debug!("disposed control {:?} ({})", id, node.name);
        }
        if self.focus_notice == Some(id) {
            self.focus_notice = None;
        }
    }

    #[inline]
    pub fn contains(&self, id: ControlId) -> bool {
        self.nodes.contains_key(id)
    }

    #[inline]
    pub fn get(&self, id: ControlId) -> Option<&ControlNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root is always present.
        self.nodes.len() <= 1
    }

    pub(crate) fn node(&self, id: ControlId) -> Result<&ControlNode, TreeError> {
        self.nodes.get(id).ok_or(TreeError::StaleControl(id))
    }

    pub(crate) fn node_mut(&mut self, id: ControlId) -> Result<&mut ControlNode, TreeError> {
        self.nodes.get_mut(id).ok_or(TreeError::StaleControl(id))
    }

    // ── properties ────────────────────────────────────────────────────────

    pub fn set_name(&mut self, id: ControlId, name: impl Into<String>) -> Result<(), TreeError> {
        self.node_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_role(&mut self, id: ControlId, role: AccessibleRole) -> Result<(), TreeError> {
        self.node_mut(id)?.role = role;
        Ok(())
    }

    /// Shows or hides the control. Hiding drops focus held inside it.
    pub fn set_visible(&mut self, id: ControlId, visible: bool) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootNotAllowed);
        }
        let node = self.node(id)?;
        if node.visible == visible {
            return Ok(());
        }
        let parent = node.parent;
        // Invalidate while still visible so the vacated area repaints.
        self.invalidate(id);
        self.node_mut(id)?.visible = visible;
        if !visible {
            self.drop_focus_within(id);
        }
        self.invalidate(id);
        self.raise(id, EventKind::VisibleChanged, &mut EventArgs::None);
        if let Some(parent) = parent {
            self.perform_layout(parent);
        }
        Ok(())
    }

    /// Enables or disables the control. Disabling drops focus held inside it.
    pub fn set_enabled(&mut self, id: ControlId, enabled: bool) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if node.enabled == enabled {
            return Ok(());
        }
        node.enabled = enabled;
        if !enabled {
            self.drop_focus_within(id);
        }
        self.invalidate(id);
        Ok(())
    }

    pub fn set_tab_stop(&mut self, id: ControlId, v: bool) -> Result<(), TreeError> {
        self.node_mut(id)?.tab_stop = v;
        Ok(())
    }

    pub fn set_allow_drop(&mut self, id: ControlId, v: bool) -> Result<(), TreeError> {
        self.node_mut(id)?.allow_drop = v;
        Ok(())
    }

    pub fn set_allow_mouse_wheel(&mut self, id: ControlId, v: bool) -> Result<(), TreeError> {
        self.node_mut(id)?.allow_mouse_wheel = v;
        Ok(())
    }

    pub fn set_context_menu(
        &mut self,
        id: ControlId,
        menu: Option<ContextMenu>,
    ) -> Result<(), TreeError> {
        self.node_mut(id)?.context_menu = menu;
        Ok(())
    }

    /// Visible and enabled, together with every ancestor.
    pub fn is_effectively_enabled(&self, id: ControlId) -> bool {
        self.ancestors_inclusive(id)
            .all(|n| self.nodes.get(n).is_some_and(|node| node.visible && node.enabled))
    }

    // ── geometry ──────────────────────────────────────────────────────────

    pub fn virtual_bounds(&self, id: ControlId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.bounds)
    }

    /// Moves and/or resizes the control.
    ///
    /// Runs the control's own layout, then its container's, then raises
    /// `LocationChanged` / `SizeChanged` for whichever part changed.
    pub fn set_virtual_bounds(&mut self, id: ControlId, bounds: Rect) -> Result<(), TreeError> {
        let bounds = bounds.clamped();
        let old = self.node(id)?.bounds;
        if old == bounds {
            return Ok(());
        }
        if id == self.root && bounds.origin != Vec2::zero() {
            return Err(TreeError::RootNotAllowed);
        }

        self.invalidate(id);
        let node = self.node_mut(id)?;
        node.bounds = bounds;
        let parent = node.parent;
        self.invalidate(id);

        if old.size != bounds.size {
            self.perform_layout(id);
        }
        if let Some(parent) = parent {
            self.perform_layout(parent);
        }
        if old.origin != bounds.origin {
            self.raise(id, EventKind::LocationChanged, &mut EventArgs::None);
        }
        if old.size != bounds.size {
            self.raise(id, EventKind::SizeChanged, &mut EventArgs::None);
        }
        Ok(())
    }

    pub fn set_virtual_location(&mut self, id: ControlId, location: Vec2) -> Result<(), TreeError> {
        let size = self.node(id)?.bounds.size;
        self.set_virtual_bounds(id, Rect::from_origin_size(location, size))
    }

    pub fn set_virtual_size(&mut self, id: ControlId, size: Vec2) -> Result<(), TreeError> {
        let origin = self.node(id)?.bounds.origin;
        self.set_virtual_bounds(id, Rect::from_origin_size(origin, size))
    }

    // ── coordinate transforms ─────────────────────────────────────────────

    /// `id`, then each container up to (and including) the top of its chain.
    pub fn ancestors_inclusive(&self, id: ControlId) -> impl Iterator<Item = ControlId> + '_ {
        std::iter::successors(Some(id), move |&cur| self.nodes.get(cur).and_then(|n| n.parent))
    }

    /// True when the control's container chain ends at this surface's root.
    pub fn is_rooted(&self, id: ControlId) -> bool {
        self.contains(id) && self.ancestors_inclusive(id).last() == Some(self.root)
    }

    /// Client-space position of the control's local origin, accumulating
    /// offsets at each level. `None` unless the control is rooted.
    pub fn client_offset(&self, id: ControlId) -> Option<Vec2> {
        if !self.is_rooted(id) {
            return None;
        }
        if id == self.root {
            return Some(Vec2::zero());
        }
        let mut offset = Vec2::new(0.0, -self.scroll_offset);
        for cur in self.ancestors_inclusive(id) {
            if cur != self.root {
                offset += self.nodes[cur].bounds.origin;
            }
        }
        Some(offset)
    }

    /// Local content space of the root: client space shifted by the scroll.
    fn content_offset(&self, id: ControlId) -> Option<Vec2> {
        if id == self.root {
            Some(Vec2::new(0.0, -self.scroll_offset))
        } else {
            self.client_offset(id)
        }
    }

    pub fn point_to_client(&self, id: ControlId, local: Vec2) -> Option<Vec2> {
        self.content_offset(id).map(|o| local + o)
    }

    pub fn point_to_local(&self, id: ControlId, client: Vec2) -> Option<Vec2> {
        self.content_offset(id).map(|o| client - o)
    }

    pub fn rect_to_client(&self, id: ControlId, local: Rect) -> Option<Rect> {
        self.content_offset(id).map(|o| local.translate(o))
    }

    // ── invalidation ──────────────────────────────────────────────────────

    /// Queues the control's whole area for repaint on the native surface.
    /// No-op for detached or invisible controls.
    pub fn invalidate(&mut self, id: ControlId) {
        let Some(size) = self.nodes.get(id).map(|n| n.bounds.size) else {
            return;
        };
        if id == self.root {
            self.invalid.push(Rect::from_size(size));
            return;
        }
        self.invalidate_rect(id, Rect::from_size(size));
    }

    /// Queues `local` (in the control's coordinates) for repaint.
    pub fn invalidate_rect(&mut self, id: ControlId, local: Rect) {
        if !self.contains(id) {
            return;
        }
        let shown = self.ancestors_inclusive(id).all(|n| self.nodes[n].visible);
        if !shown {
            return;
        }
        if let Some(rect) = self.rect_to_client(id, local) {
            self.invalid.push(rect);
        }
    }

    /// Asks the native surface to repaint its invalid region synchronously.
    pub fn update(&mut self, id: ControlId) {
        if self.is_rooted(id) {
            self.update_requested = true;
        }
    }

    /// Drains queued invalidations and the update request.
    pub(crate) fn take_invalidations(&mut self) -> (Vec<Rect>, bool) {
        let update = std::mem::take(&mut self.update_requested);
        (std::mem::take(&mut self.invalid), update)
    }

    pub(crate) fn take_focus_notice(&mut self) -> Option<ControlId> {
        self.focus_notice.take()
    }

    // ── scrolling ─────────────────────────────────────────────────────────

    #[inline]
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub(crate) fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset;
    }

    /// Bottom edge of the lowest visible top-level control.
    pub fn content_extent(&self) -> f32 {
        self.nodes[self.root]
            .children
            .iter()
            .filter_map(|&c| self.nodes.get(c))
            .filter(|n| n.visible)
            .map(|n| n.bounds.bottom())
            .fold(0.0, f32::max)
    }

    // ── events ────────────────────────────────────────────────────────────

    pub fn subscribe(
        &mut self,
        id: ControlId,
        kind: EventKind,
        handler: impl FnMut(&mut ControlTree, ControlId, &mut EventArgs) + 'static,
    ) -> Result<ListenerId, TreeError> {
        let boxed: Handler = Box::new(handler);
        Ok(self.node_mut(id)?.handlers.add(kind, boxed))
    }

    pub fn on_paint(
        &mut self,
        id: ControlId,
        handler: impl FnMut(&ControlTree, ControlId, &mut crate::painter::Painter<'_>) + 'static,
    ) -> Result<ListenerId, TreeError> {
        let boxed: PaintHandler = Box::new(handler);
        Ok(self.node_mut(id)?.handlers.add_paint(boxed))
    }

    /// Returns `false` if the listener was not subscribed on `id`.
    pub fn unsubscribe(&mut self, id: ControlId, listener: ListenerId) -> bool {
        self.nodes
            .get_mut(id)
            .is_some_and(|n| n.handlers.remove(listener))
    }

    pub fn listener_count(&self, id: ControlId, kind: EventKind) -> usize {
        self.nodes.get(id).map_or(0, |n| n.handlers.count(kind))
    }

    /// Runs every `kind` listener of `id` with `args`.
    ///
    /// Entry point for the container and for parents routing to children;
    /// application code triggers events through the container instead.
    pub(crate) fn raise(&mut self, id: ControlId, kind: EventKind, args: &mut EventArgs) {
        let snapshot = match self.nodes.get(id) {
            Some(node) => node.handlers.snapshot(kind),
            None => return,
        };
        for (listener, handler) in snapshot {
            // Skip listeners removed (or whose control was disposed) by an
            // earlier handler in this same dispatch.
            let live = self
                .nodes
                .get(id)
                .is_some_and(|n| n.handlers.contains(kind, listener));
            if !live {
                continue;
            }
            match handler.try_borrow_mut() {
                Ok(mut f) => (*f)(self, id, args),
                Err(_) => warn!("{kind:?} handler on {id:?} re-entered itself; skipped"),
            }
        }
    }
}
