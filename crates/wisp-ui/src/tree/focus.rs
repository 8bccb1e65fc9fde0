//! Logical focus inside one surface.
//!
//! Each container remembers the child through which focus last passed
//! (`active`). Following those links down from the root reaches the focused
//! control, and at most one control along any chain has its focused flag set.

use log::debug;

use super::ControlTree;
use crate::control::ControlId;
use crate::event::{EventArgs, EventKind};

impl ControlTree {
    /// A rooted, visible, enabled control other than the root itself.
    pub fn can_focus(&self, id: ControlId) -> bool {
        id != self.root && self.is_rooted(id) && self.is_effectively_enabled(id)
    }

    /// Gives `id` logical focus. Returns `false` if it cannot take focus.
    ///
    /// The control becomes the active control of every container up its
    /// chain (unfocusing the previous holders), anything focused below it is
    /// unfocused, and the surface is asked to take native focus.
    pub fn focus(&mut self, id: ControlId) -> bool {
        if !self.can_focus(id) {
            return false;
        }
        if self.nodes[id].focused {
            return true;
        }

        let chain: Vec<ControlId> = self.ancestors_inclusive(id).collect();
        for pair in chain.windows(2) {
            let (child, owner) = (pair[0], pair[1]);
            self.set_active_control(owner, Some(child));
            self.clear_own_focus(owner);
        }
        if let Some(below) = self.nodes.get_mut(id).and_then(|n| n.active.take()) {
            self.unfocus(below);
        }

        // A LostFocus handler above may have hidden or disposed the control.
        if !self.can_focus(id) {
            return false;
        }
        self.nodes[id].focused = true;
        debug!("focus -> {:?} ({})", id, self.nodes[id].name);
        self.raise(id, EventKind::GotFocus, &mut EventArgs::None);
        self.invalidate(id);
        self.focus_notice = Some(id);
        true
    }

    /// Clears focus on `id`, unfocusing its focused descendant first.
    pub fn unfocus(&mut self, id: ControlId) {
        let Some(active) = self.nodes.get(id).map(|n| n.active) else {
            return;
        };
        if let Some(active) = active {
            self.unfocus(active);
        }
        self.clear_own_focus(id);
    }

    fn clear_own_focus(&mut self, id: ControlId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if !node.focused {
            return;
        }
        node.focused = false;
        debug!("focus lost by {:?} ({})", id, node.name);
        self.raise(id, EventKind::LostFocus, &mut EventArgs::None);
        self.invalidate(id);
    }

    pub fn active_control(&self, owner: ControlId) -> Option<ControlId> {
        self.nodes.get(owner).and_then(|n| n.active)
    }

    /// Sets `owner`'s active child, unfocusing the previous holder first.
    pub fn set_active_control(&mut self, owner: ControlId, child: Option<ControlId>) {
        let Some(previous) = self.nodes.get(owner).map(|n| n.active) else {
            return;
        };
        if previous == child {
            return;
        }
        if let Some(previous) = previous {
            self.unfocus(previous);
        }
        if let Some(node) = self.nodes.get_mut(owner) {
            node.active = child;
        }
    }

    /// The focused control, found by following active links from the root.
    pub fn focused_control(&self) -> Option<ControlId> {
        let mut cur = self.root;
        loop {
            let node = self.nodes.get(cur)?;
            if node.focused {
                return Some(cur);
            }
            cur = node.active?;
        }
    }

    /// True when `id` or one of its descendants holds focus.
    pub fn contains_focus(&self, id: ControlId) -> bool {
        self.focused_control()
            .is_some_and(|f| self.ancestors_inclusive(f).any(|a| a == id))
    }

    /// Unfocuses whatever holds focus on this surface.
    pub fn clear_focus(&mut self) {
        let root = self.root;
        self.unfocus(root);
    }

    /// Drops focus held at or below `id` and forgets `id` as its container's
    /// active child. Used before a control is hidden, disabled or detached.
    pub(crate) fn drop_focus_within(&mut self, id: ControlId) {
        self.unfocus(id);
        let parent = self.nodes.get(id).and_then(|n| n.parent);
        if let Some(node) = parent.and_then(|p| self.nodes.get_mut(p)) {
            if node.active == Some(id) {
                node.active = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wisp_engine::coords::Viewport;

    use crate::control::{ControlId, LightweightControl};
    use crate::event::EventKind;
    use crate::tree::ControlTree;

    struct Fixture {
        tree: ControlTree,
        left: ControlId,
        a: ControlId,
        b: ControlId,
        right: ControlId,
        c: ControlId,
    }

    // root ─┬─ left ─┬─ a
    //       │        └─ b
    //       └─ right ── c
    fn fixture() -> Fixture {
        let mut tree = ControlTree::new(Viewport::new(100.0, 100.0));
        let root = tree.root();
        let make = |tree: &mut ControlTree, name: &str, parent: ControlId| {
            let id = tree.create(LightweightControl::new(name).tab_stop(true));
            tree.add(parent, id).unwrap();
            id
        };
        let left = make(&mut tree, "left", root);
        let a = make(&mut tree, "a", left);
        let b = make(&mut tree, "b", left);
        let right = make(&mut tree, "right", root);
        let c = make(&mut tree, "c", right);
        Fixture { tree, left, a, b, right, c }
    }

    fn focused_count(t: &ControlTree) -> usize {
        let mut stack = vec![t.root()];
        let mut n = 0;
        while let Some(id) = stack.pop() {
            let node = t.get(id).unwrap();
            n += usize::from(node.focused());
            stack.extend_from_slice(node.children());
        }
        n
    }

    #[test]
    fn focus_is_exclusive_across_branches() {
        let mut f = fixture();
        assert!(f.tree.focus(f.a));
        assert_eq!(f.tree.focused_control(), Some(f.a));
        assert_eq!(f.tree.active_control(f.left), Some(f.a));

        assert!(f.tree.focus(f.c));
        assert_eq!(f.tree.focused_control(), Some(f.c));
        assert!(!f.tree.get(f.a).unwrap().focused());
        assert_eq!(focused_count(&f.tree), 1);

        assert!(f.tree.focus(f.b));
        assert_eq!(f.tree.active_control(f.left), Some(f.b));
        assert_eq!(focused_count(&f.tree), 1);
    }

    #[test]
    fn focusing_a_container_unfocuses_its_descendant() {
        let mut f = fixture();
        f.tree.focus(f.c);
        f.tree.focus(f.right);
        assert_eq!(f.tree.focused_control(), Some(f.right));
        assert!(!f.tree.get(f.c).unwrap().focused());

        f.tree.focus(f.c);
        assert!(!f.tree.get(f.right).unwrap().focused());
        assert!(f.tree.contains_focus(f.right));
        assert!(!f.tree.contains_focus(f.left));
    }

    #[test]
    fn focus_events_fire_in_order() {
        let mut f = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (id, name) in [(f.a, "a"), (f.c, "c")] {
            for kind in [EventKind::GotFocus, EventKind::LostFocus] {
                let log = Rc::clone(&log);
                f.tree
                    .subscribe(id, kind, move |_, _, _| log.borrow_mut().push(format!("{name}:{kind:?}")))
                    .unwrap();
            }
        }
        f.tree.focus(f.a);
        f.tree.focus(f.c);
        assert_eq!(*log.borrow(), ["a:GotFocus", "a:LostFocus", "c:GotFocus"]);
    }

    #[test]
    fn unfocus_recurses_through_active_links() {
        let mut f = fixture();
        f.tree.focus(f.a);
        f.tree.unfocus(f.left);
        assert_eq!(f.tree.focused_control(), None);
        assert_eq!(focused_count(&f.tree), 0);
    }

    #[test]
    fn hiding_or_removing_drops_focus() {
        let mut f = fixture();
        f.tree.focus(f.a);
        f.tree.set_visible(f.left, false).unwrap();
        assert_eq!(f.tree.focused_control(), None);
        assert!(!f.tree.focus(f.a));

        f.tree.focus(f.c);
        f.tree.remove(f.right, f.c).unwrap();
        assert_eq!(f.tree.focused_control(), None);
        assert_eq!(f.tree.active_control(f.right), None);
    }

    #[test]
    fn root_and_detached_controls_cannot_take_focus() {
        let mut f = fixture();
        let root = f.tree.root();
        assert!(!f.tree.focus(root));
        let loose = f.tree.create(LightweightControl::new("loose"));
        assert!(!f.tree.focus(loose));
        f.tree.set_enabled(f.b, false).unwrap();
        assert!(!f.tree.can_focus(f.b));
    }

    #[test]
    fn focus_notice_is_taken_once() {
        let mut f = fixture();
        f.tree.focus(f.b);
        assert_eq!(f.tree.take_focus_notice(), Some(f.b));
        assert_eq!(f.tree.take_focus_notice(), None);
    }
}
