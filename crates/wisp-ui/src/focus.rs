//! Tab order across the container.
//!
//! [`FocusController`] owns a flat list of [`FocusTarget`]s, independent of
//! any native tab index. A target is either a lightweight control in the
//! tree or a native child window the host knows about; both answer the same
//! questions, so traversal never needs to know which kind it is looking at.
//!
//! # How tab traversal works
//!
//! 1. The application registers targets in the order Tab should visit them.
//! 2. On Tab the container asks [`FocusController::next_index`] for the next
//!    eligible target after the one holding focus (or before it, with Shift).
//! 3. When traversal runs off the end and wrapping is off, focus leaves the
//!    container through [`NativeHost::tab_out`].
//! 4. When the window itself is deactivated while focus is inside, the index
//!    is remembered and restored on the next focus-enter.

use wisp_engine::coords::Rect;

use crate::accessibility::{AccessibleObject, AccessibleRole};
use crate::control::ControlId;
use crate::host::{NativeHandle, NativeHost};
use crate::tree::ControlTree;

// ── FocusTarget ───────────────────────────────────────────────────────────

/// Something that can hold keyboard focus inside the container.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FocusTarget {
    Lightweight(ControlId),
    Native(NativeHandle),
}

impl FocusTarget {
    /// Visible, enabled and accepting focus right now.
    pub fn is_focusable(&self, tree: &ControlTree, host: &dyn NativeHost) -> bool {
        match *self {
            FocusTarget::Lightweight(id) => {
                tree.get(id).is_some_and(|n| n.tab_stop()) && tree.can_focus(id)
            }
            FocusTarget::Native(handle) => host
                .native_control(handle)
                .is_some_and(|n| n.visible && n.enabled && n.focusable),
        }
    }

    /// Moves focus to the target. Returns `false` if it refused.
    pub fn focus(&self, tree: &mut ControlTree, host: &mut dyn NativeHost) -> bool {
        match *self {
            FocusTarget::Lightweight(id) => tree.focus(id),
            FocusTarget::Native(handle) => {
                tree.clear_focus();
                host.focus_native_control(handle)
            }
        }
    }

    /// Client-space bounds.
    pub fn bounds(&self, tree: &ControlTree, host: &dyn NativeHost) -> Option<Rect> {
        match *self {
            FocusTarget::Lightweight(id) => {
                let bounds = tree.virtual_bounds(id)?;
                let parent = tree.container_of(id)?;
                tree.rect_to_client(parent, bounds)
            }
            FocusTarget::Native(handle) => host.native_control(handle).map(|n| n.bounds),
        }
    }

    /// True while the target (or something inside it) holds focus.
    pub fn contains_focus(&self, tree: &ControlTree, host: &dyn NativeHost) -> bool {
        match *self {
            FocusTarget::Lightweight(id) => tree.contains_focus(id),
            FocusTarget::Native(handle) => host.native_control_focused() == Some(handle),
        }
    }

    pub fn accessible(&self, tree: &ControlTree, host: &dyn NativeHost) -> Option<AccessibleObject> {
        match *self {
            FocusTarget::Lightweight(id) => tree.accessible_object(id),
            FocusTarget::Native(handle) => {
                let info = host.native_control(handle)?;
                Some(AccessibleObject {
                    target: *self,
                    role: AccessibleRole::Window,
                    focused: host.native_control_focused() == Some(handle),
                    focusable: info.visible && info.enabled && info.focusable,
                    visible: info.visible,
                    bounds: Some(info.bounds),
                    name: info.name,
                    child_count: 0,
                })
            }
        }
    }
}

impl From<ControlId> for FocusTarget {
    fn from(id: ControlId) -> Self {
        FocusTarget::Lightweight(id)
    }
}

impl From<NativeHandle> for FocusTarget {
    fn from(handle: NativeHandle) -> Self {
        FocusTarget::Native(handle)
    }
}

// ── FocusController ───────────────────────────────────────────────────────

/// Linear tab order plus the focus-restore memory of one container.
#[derive(Debug, Default)]
pub struct FocusController {
    targets: Vec<FocusTarget>,
    /// Index to restore on the next focus-enter.
    restore: Option<usize>,
    /// Focus is inside the container because of traversal or a click, as
    /// opposed to having tabbed out.
    entered: bool,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `target` to the tab order. Returns its index; registering a
    /// target twice keeps the first position.
    pub fn register(&mut self, target: impl Into<FocusTarget>) -> usize {
        let target = target.into();
        match self.targets.iter().position(|&t| t == target) {
            Some(i) => i,
            None => {
                self.targets.push(target);
                self.targets.len() - 1
            }
        }
    }

    pub fn unregister(&mut self, target: impl Into<FocusTarget>) -> bool {
        let target = target.into();
        let Some(index) = self.targets.iter().position(|&t| t == target) else {
            return false;
        };
        self.targets.remove(index);
        self.restore = match self.restore {
            Some(r) if r == index => None,
            Some(r) if r > index => Some(r - 1),
            other => other,
        };
        true
    }

    pub fn targets(&self) -> &[FocusTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Index of the next target that `is_focusable` accepts.
    ///
    /// Steps from `from` one position at a time (backwards unless
    /// `forward`), wrapping around when `wrap` is set and stopping at the
    /// ends otherwise. With no starting point the scan begins at the first
    /// (or last) target. `None` when nothing qualifies.
    pub fn next_index(
        &self,
        from: Option<usize>,
        forward: bool,
        wrap: bool,
        is_focusable: impl Fn(&FocusTarget) -> bool,
    ) -> Option<usize> {
        let n = self.targets.len();
        if n == 0 {
            return None;
        }
        let mut cur = from.filter(|&i| i < n);
        for _ in 0..n {
            let next = match cur {
                None if forward => 0,
                None => n - 1,
                Some(i) if forward => {
                    if i + 1 < n {
                        i + 1
                    } else if wrap {
                        0
                    } else {
                        return None;
                    }
                }
                Some(i) => {
                    if i > 0 {
                        i - 1
                    } else if wrap {
                        n - 1
                    } else {
                        return None;
                    }
                }
            };
            if is_focusable(&self.targets[next]) {
                return Some(next);
            }
            cur = Some(next);
        }
        None
    }

    /// Index of the target currently holding focus.
    pub fn index_of_focused(&self, tree: &ControlTree, host: &dyn NativeHost) -> Option<usize> {
        self.targets.iter().position(|t| t.contains_focus(tree, host))
    }

    #[inline]
    pub fn is_entered(&self) -> bool {
        self.entered
    }

    #[inline]
    pub fn set_entered(&mut self, entered: bool) {
        self.entered = entered;
    }

    pub fn remember(&mut self, index: Option<usize>) {
        self.restore = index;
    }

    pub fn take_restore(&mut self) -> Option<usize> {
        self.restore.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HeadlessHost, NativeControlInfo};
    use crate::control::LightweightControl;
    use wisp_engine::coords::Viewport;

    fn controller_of(n: usize) -> (ControlTree, FocusController, Vec<ControlId>) {
        let mut tree = ControlTree::new(Viewport::new(100.0, 100.0));
        let root = tree.root();
        let mut fc = FocusController::new();
        let ids: Vec<_> = (0..n)
            .map(|i| {
                let id = tree.create(LightweightControl::new(format!("t{i}")).tab_stop(true));
                tree.add(root, id).unwrap();
                fc.register(id);
                id
            })
            .collect();
        (tree, fc, ids)
    }

    #[test]
    fn steps_and_skips_unfocusable_targets() {
        let (mut tree, fc, ids) = controller_of(4);
        tree.set_enabled(ids[1], false).unwrap();
        let host = HeadlessHost::new();
        let ok = |t: &FocusTarget| t.is_focusable(&tree, &host);

        assert_eq!(fc.next_index(None, true, false, ok), Some(0));
        assert_eq!(fc.next_index(Some(0), true, false, ok), Some(2));
        assert_eq!(fc.next_index(None, false, false, ok), Some(3));
        assert_eq!(fc.next_index(Some(2), false, false, ok), Some(0));
    }

    #[test]
    fn wraps_only_when_asked() {
        let (_tree, fc, _) = controller_of(3);
        let all = |_: &FocusTarget| true;
        assert_eq!(fc.next_index(Some(2), true, false, all), None);
        assert_eq!(fc.next_index(Some(2), true, true, all), Some(0));
        assert_eq!(fc.next_index(Some(0), false, false, all), None);
        assert_eq!(fc.next_index(Some(0), false, true, all), Some(2));
    }

    #[test]
    fn nothing_focusable_after_a_full_scan() {
        let (_tree, fc, _) = controller_of(3);
        assert_eq!(fc.next_index(Some(1), true, true, |_| false), None);
        assert_eq!(FocusController::new().next_index(None, true, true, |_| true), None);
    }

    #[test]
    fn native_targets_answer_through_the_host() {
        let (mut tree, mut fc, ids) = controller_of(1);
        let mut host = HeadlessHost::new();
        let edit = NativeHandle(9);
        host.add_native(
            edit,
            NativeControlInfo {
                name: "edit".into(),
                visible: true,
                enabled: true,
                focusable: true,
                bounds: Rect::new(0.0, 50.0, 100.0, 20.0),
            },
        );
        let i = fc.register(edit);
        assert_eq!(i, 1);

        assert!(fc.targets()[0].focus(&mut tree, &mut host));
        assert_eq!(fc.index_of_focused(&tree, &host), Some(0));

        assert!(fc.targets()[1].focus(&mut tree, &mut host));
        assert!(!tree.contains_focus(ids[0]));
        assert_eq!(fc.index_of_focused(&tree, &host), Some(1));
        let acc = fc.targets()[1].accessible(&tree, &host).unwrap();
        assert_eq!(acc.role, AccessibleRole::Window);
        assert!(acc.focused);
    }

    #[test]
    fn unregister_keeps_restore_index_pointing_at_the_same_target() {
        let (_tree, mut fc, ids) = controller_of(3);
        fc.remember(Some(2));
        assert!(fc.unregister(ids[0]));
        assert_eq!(fc.take_restore(), Some(1));
        assert_eq!(fc.take_restore(), None);

        fc.remember(Some(0));
        assert!(fc.unregister(ids[1]));
        assert_eq!(fc.take_restore(), None);
        assert!(!fc.unregister(ids[1]));
    }
}
