use slotmap::new_key_type;
use wisp_engine::coords::{Rect, Vec2};

use crate::accessibility::AccessibleRole;
use crate::event::{ContextMenu, Handlers};

new_key_type! {
    /// Handle to a lightweight control. Stable until the control is disposed.
    pub struct ControlId;
}

// ── LightweightControl ────────────────────────────────────────────────────

/// Initial properties of a windowless control.
///
/// Pass it to [`ControlTree::create`](crate::tree::ControlTree::create) to
/// get a [`ControlId`]; the control starts detached and becomes part of a
/// surface once added to a collection.
///
/// ```rust,ignore
/// let id = tree.create(
///     LightweightControl::new("drop-zone")
///         .bounds(Rect::new(0.0, 0.0, 120.0, 40.0))
///         .allow_drop(true),
/// );
/// tree.add(tree.root(), id)?;
/// ```
#[derive(Debug, Clone)]
pub struct LightweightControl {
    name: String,
    role: AccessibleRole,
    bounds: Rect,
    visible: bool,
    enabled: bool,
    tab_stop: bool,
    allow_drop: bool,
    allow_mouse_wheel: bool,
    context_menu: Option<ContextMenu>,
}

impl LightweightControl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: AccessibleRole::Pane,
            bounds: Rect::default(),
            visible: true,
            enabled: true,
            tab_stop: false,
            allow_drop: false,
            allow_mouse_wheel: false,
            context_menu: None,
        }
    }

    pub fn role(mut self, role: AccessibleRole) -> Self {
        self.role = role;
        self
    }

    /// Bounds in the coordinate space of the future container. Negative
    /// extents are clamped to zero.
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds.clamped();
        self
    }

    pub fn visible(mut self, v: bool) -> Self {
        self.visible = v;
        self
    }

    pub fn enabled(mut self, v: bool) -> Self {
        self.enabled = v;
        self
    }

    pub fn tab_stop(mut self, v: bool) -> Self {
        self.tab_stop = v;
        self
    }

    /// Opt into drag-and-drop target resolution.
    pub fn allow_drop(mut self, v: bool) -> Self {
        self.allow_drop = v;
        self
    }

    /// Opt into mouse-wheel target resolution.
    pub fn allow_mouse_wheel(mut self, v: bool) -> Self {
        self.allow_mouse_wheel = v;
        self
    }

    pub fn context_menu(mut self, menu: ContextMenu) -> Self {
        self.context_menu = Some(menu);
        self
    }

    pub(crate) fn into_node(self) -> ControlNode {
        ControlNode {
            name: self.name,
            role: self.role,
            bounds: self.bounds,
            visible: self.visible,
            enabled: self.enabled,
            tab_stop: self.tab_stop,
            focused: false,
            allow_drop: self.allow_drop,
            allow_mouse_wheel: self.allow_mouse_wheel,
            context_menu: self.context_menu,
            parent: None,
            children: Vec::new(),
            active: None,
            layout_suspend: 0,
            layout_pending: false,
            handlers: Handlers::default(),
        }
    }
}

// ── ControlNode ───────────────────────────────────────────────────────────

/// Arena entry: one control plus its links into the tree.
///
/// `parent` is the non-owning back-reference to the immediate container; the
/// container owns the child through its `children` list. Both sides are only
/// ever updated together by the collection operations.
pub struct ControlNode {
    pub(crate) name: String,
    pub(crate) role: AccessibleRole,
    pub(crate) bounds: Rect,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) tab_stop: bool,
    pub(crate) focused: bool,
    pub(crate) allow_drop: bool,
    pub(crate) allow_mouse_wheel: bool,
    pub(crate) context_menu: Option<ContextMenu>,

    pub(crate) parent: Option<ControlId>,
    /// Z-ordered: last is topmost.
    pub(crate) children: Vec<ControlId>,
    /// Child (or the last child) holding logical focus at this level.
    pub(crate) active: Option<ControlId>,

    pub(crate) layout_suspend: u32,
    pub(crate) layout_pending: bool,

    pub(crate) handlers: Handlers,
}

impl ControlNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> AccessibleRole {
        self.role
    }

    pub fn virtual_bounds(&self) -> Rect {
        self.bounds
    }

    pub fn virtual_location(&self) -> Vec2 {
        self.bounds.origin
    }

    pub fn virtual_size(&self) -> Vec2 {
        self.bounds.size
    }

    /// The control's own coordinate space: origin at zero, its size.
    pub fn virtual_client_rect(&self) -> Rect {
        Rect::from_size(self.bounds.size)
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn tab_stop(&self) -> bool {
        self.tab_stop
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn allow_drop(&self) -> bool {
        self.allow_drop
    }

    pub fn allow_mouse_wheel(&self) -> bool {
        self.allow_mouse_wheel
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    /// Immediate container, `None` while detached (or for the root).
    pub fn container(&self) -> Option<ControlId> {
        self.parent
    }

    pub fn children(&self) -> &[ControlId] {
        &self.children
    }

    pub fn active_control(&self) -> Option<ControlId> {
        self.active
    }

    pub fn is_layout_suspended(&self) -> bool {
        self.layout_suspend > 0
    }
}
