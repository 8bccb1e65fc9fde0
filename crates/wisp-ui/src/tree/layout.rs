//! Layout passes and the suspension counter.
//!
//! `perform_layout` raises the control's `Layout` hook with the control's
//! own suspension counter held, so a hook that resizes its control (or that
//! moves children, which re-requests the parent's layout) does not recurse.
//! Requests made while the counter is non-zero are remembered and replayed
//! by the `resume_layout` that brings it back to zero; requests made from
//! inside the running hook are absorbed by that pass.

use std::ops::{Deref, DerefMut};

use log::{trace, warn};

use super::ControlTree;
use crate::control::ControlId;
use crate::event::{EventArgs, EventKind};

impl ControlTree {
    /// Increments the control's layout-suspension counter.
    pub fn suspend_layout(&mut self, id: ControlId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.layout_suspend += 1;
        }
    }

    /// Decrements the counter. When it reaches zero and `perform` is set, a
    /// layout requested meanwhile runs now.
    pub fn resume_layout(&mut self, id: ControlId, perform: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.layout_suspend == 0 {
            debug_assert!(false, "resume_layout without matching suspend_layout");
            warn!("unbalanced resume_layout on {id:?} ignored");
            return;
        }
        node.layout_suspend -= 1;
        if node.layout_suspend == 0 && perform && node.layout_pending {
            self.perform_layout(id);
        }
    }

    pub fn is_layout_suspended(&self, id: ControlId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.layout_suspend > 0)
    }

    /// Suspends layout on `id` until the returned guard drops.
    ///
    /// ```rust,ignore
    /// {
    ///     let mut tree = tree.layout_scope(panel);
    ///     tree.add(panel, a)?;
    ///     tree.add(panel, b)?;
    /// } // one layout pass here
    /// ```
    pub fn layout_scope(&mut self, id: ControlId) -> LayoutGuard<'_> {
        self.suspend_layout(id);
        LayoutGuard { tree: self, id }
    }

    /// Runs the control's layout hook, unless layout is suspended on it.
    pub fn perform_layout(&mut self, id: ControlId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.layout_suspend > 0 {
            node.layout_pending = true;
            return;
        }
        node.layout_suspend += 1;
        trace!("layout {:?} ({})", id, node.name);

        self.raise(id, EventKind::Layout, &mut EventArgs::None);

        if let Some(node) = self.nodes.get_mut(id) {
            node.layout_suspend = node.layout_suspend.saturating_sub(1);
            node.layout_pending = false;
        }
    }
}

/// Scope guard returned by [`ControlTree::layout_scope`].
///
/// Dereferences to the tree; resumes (and performs pending) layout on drop.
pub struct LayoutGuard<'t> {
    tree: &'t mut ControlTree,
    id: ControlId,
}

impl Deref for LayoutGuard<'_> {
    type Target = ControlTree;

    fn deref(&self) -> &ControlTree {
        self.tree
    }
}

impl DerefMut for LayoutGuard<'_> {
    fn deref_mut(&mut self) -> &mut ControlTree {
        self.tree
    }
}

impl Drop for LayoutGuard<'_> {
    fn drop(&mut self) {
        self.tree.resume_layout(self.id, true);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use wisp_engine::coords::{Rect, Vec2, Viewport};

    use crate::control::LightweightControl;
    use crate::event::EventKind;
    use crate::tree::ControlTree;

    fn counting(tree: &mut ControlTree, id: crate::control::ControlId) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        tree.subscribe(id, EventKind::Layout, move |_, _, _| c.set(c.get() + 1)).unwrap();
        count
    }

    #[test]
    fn suspension_is_a_counter() {
        let mut tree = ControlTree::new(Viewport::new(100.0, 100.0));
        let panel = tree.create(LightweightControl::new("panel"));
        let passes = counting(&mut tree, panel);

        tree.suspend_layout(panel);
        tree.suspend_layout(panel);
        tree.resume_layout(panel, true);
        assert!(tree.is_layout_suspended(panel));

        tree.perform_layout(panel);
        assert_eq!(passes.get(), 0);

        tree.resume_layout(panel, true);
        assert!(!tree.is_layout_suspended(panel));
        assert_eq!(passes.get(), 1);
    }

    #[test]
    fn resume_without_request_does_not_lay_out() {
        let mut tree = ControlTree::new(Viewport::new(100.0, 100.0));
        let panel = tree.create(LightweightControl::new("panel"));
        let passes = counting(&mut tree, panel);
        tree.suspend_layout(panel);
        tree.resume_layout(panel, true);
        assert_eq!(passes.get(), 0);
    }

    #[test]
    fn hook_resizing_its_own_control_does_not_recurse() {
        let mut tree = ControlTree::new(Viewport::new(100.0, 100.0));
        let panel = tree.create(LightweightControl::new("panel"));
        let passes = counting(&mut tree, panel);
        tree.subscribe(panel, EventKind::Layout, |tree, id, _| {
            // Grow to fit "content" every pass.
            tree.set_virtual_size(id, Vec2::new(40.0, 40.0)).unwrap();
        })
        .unwrap();

        tree.set_virtual_bounds(panel, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(passes.get(), 1);
        assert_eq!(tree.virtual_bounds(panel), Some(Rect::new(0.0, 0.0, 40.0, 40.0)));
        assert!(!tree.is_layout_suspended(panel));
    }

    #[test]
    fn layout_scope_batches_collection_changes() {
        let mut tree = ControlTree::new(Viewport::new(100.0, 100.0));
        let panel = tree.create(LightweightControl::new("panel"));
        let a = tree.create(LightweightControl::new("a"));
        let b = tree.create(LightweightControl::new("b"));
        let passes = counting(&mut tree, panel);
        {
            let mut scoped = tree.layout_scope(panel);
            scoped.add(panel, a).unwrap();
            scoped.add(panel, b).unwrap();
            assert_eq!(passes.get(), 0);
        }
        assert_eq!(passes.get(), 1);
    }
}
