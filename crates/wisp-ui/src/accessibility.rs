//! Structural hooks for a screen-reader tree walker.
//!
//! The framework does not talk to any platform accessibility API; it exposes
//! snapshots that an external bridge can walk: a child count, the n-th
//! visible child, and each control's role, name, bounds and focus state.

use wisp_engine::coords::Rect;

use crate::control::ControlId;
use crate::focus::FocusTarget;
use crate::tree::ControlTree;

/// Role reported for a control.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum AccessibleRole {
    #[default]
    Pane,
    /// The container surface itself.
    Client,
    Grouping,
    PushButton,
    StaticText,
    List,
    ListItem,
    /// A native child window hosted next to the lightweight controls.
    Window,
}

/// Snapshot of one control as seen by assistive technology.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessibleObject {
    pub target: FocusTarget,
    pub role: AccessibleRole,
    pub name: String,
    /// Client-space bounds; `None` while the control is detached.
    pub bounds: Option<Rect>,
    pub focused: bool,
    pub visible: bool,
    pub focusable: bool,
    /// Number of visible children.
    pub child_count: usize,
}

impl ControlTree {
    pub fn accessible_object(&self, id: ControlId) -> Option<AccessibleObject> {
        let node = self.get(id)?;
        let bounds = if id == self.root() {
            Some(node.virtual_client_rect())
        } else {
            self.container_of(id)
                .and_then(|parent| self.rect_to_client(parent, node.virtual_bounds()))
        };
        Some(AccessibleObject {
            target: FocusTarget::Lightweight(id),
            role: node.role(),
            name: node.name().to_string(),
            bounds,
            focused: node.focused(),
            visible: node.visible(),
            focusable: node.tab_stop() && self.can_focus(id),
            child_count: self.accessible_child_count(id),
        })
    }

    pub fn accessible_child_count(&self, id: ControlId) -> usize {
        self.visible_children(id).count()
    }

    /// The `index`-th visible child of `id`, in z-order.
    pub fn accessible_child(&self, id: ControlId, index: usize) -> Option<AccessibleObject> {
        let child = self.visible_children(id).nth(index)?;
        self.accessible_object(child)
    }

    fn visible_children(&self, id: ControlId) -> impl Iterator<Item = ControlId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.get(c).is_some_and(|n| n.visible()))
    }
}

#[cfg(test)]
mod tests {
    use wisp_engine::coords::{Rect, Viewport};

    use super::*;
    use crate::control::LightweightControl;

    #[test]
    fn children_are_enumerated_by_visible_index() {
        let mut t = ControlTree::new(Viewport::new(100.0, 100.0));
        let root = t.root();
        let hidden = t.create(LightweightControl::new("hidden").visible(false));
        let ok = t.create(
            LightweightControl::new("ok")
                .role(AccessibleRole::PushButton)
                .bounds(Rect::new(10.0, 20.0, 30.0, 10.0))
                .tab_stop(true),
        );
        t.add(root, hidden).unwrap();
        t.add(root, ok).unwrap();

        let surface = t.accessible_object(root).unwrap();
        assert_eq!(surface.role, AccessibleRole::Client);
        assert_eq!(surface.child_count, 1);

        let button = t.accessible_child(root, 0).unwrap();
        assert_eq!(button.target, FocusTarget::Lightweight(ok));
        assert_eq!(button.role, AccessibleRole::PushButton);
        assert_eq!(button.bounds, Some(Rect::new(10.0, 20.0, 30.0, 10.0)));
        assert!(button.focusable);
        assert!(t.accessible_child(root, 1).is_none());
    }

    #[test]
    fn nested_bounds_are_client_space_and_detached_have_none() {
        let mut t = ControlTree::new(Viewport::new(100.0, 100.0));
        let root = t.root();
        let panel = t.create(LightweightControl::new("panel").bounds(Rect::new(5.0, 5.0, 50.0, 50.0)));
        let leaf = t.create(LightweightControl::new("leaf").bounds(Rect::new(1.0, 2.0, 3.0, 4.0)));
        t.add(root, panel).unwrap();
        t.add(panel, leaf).unwrap();
        assert_eq!(t.accessible_object(leaf).unwrap().bounds, Some(Rect::new(6.0, 7.0, 3.0, 4.0)));

        t.remove(root, panel).unwrap();
        assert_eq!(t.accessible_object(leaf).unwrap().bounds, None);
    }
}
