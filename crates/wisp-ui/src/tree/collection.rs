//! Child collections.
//!
//! Each control owns an ordered list of children; the order is the z-order
//! (last = topmost: painted last, hit-tested first). Every mutation keeps the
//! child's back-reference in step with the list and runs one layout pass on
//! the owner.

use log::debug;

use super::ControlTree;
use crate::control::ControlId;
use crate::error::TreeError;

impl ControlTree {
    /// Children of `owner` in z-order (bottom first).
    pub fn children(&self, owner: ControlId) -> &[ControlId] {
        self.nodes.get(owner).map_or(&[], |n| n.children.as_slice())
    }

    /// The immediate container of `id`.
    pub fn container_of(&self, id: ControlId) -> Option<ControlId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn index_of(&self, owner: ControlId, child: ControlId) -> Option<usize> {
        self.children(owner).iter().position(|&c| c == child)
    }

    pub fn contains_child(&self, owner: ControlId, child: ControlId) -> bool {
        self.index_of(owner, child).is_some()
    }

    /// Appends `child` on top of `owner`'s children.
    pub fn add(&mut self, owner: ControlId, child: ControlId) -> Result<(), TreeError> {
        let already_here = self.container_of(child) == Some(owner);
        let len = self.node(owner)?.children.len() - usize::from(already_here);
        self.insert(owner, len, child)
    }

    /// Inserts `child` at z-position `index`. A child that lives in another
    /// collection is moved out of it first; one already in `owner` is only
    /// restacked and keeps its focus.
    pub fn insert(&mut self, owner: ControlId, index: usize, child: ControlId) -> Result<(), TreeError> {
        self.check_attach(owner, child)?;

        let previous = self.node(child)?.parent;
        let restack = previous == Some(owner);
        let len = self.node(owner)?.children.len() - usize::from(restack);
        if index > len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        match previous {
            Some(_) if restack => self.node_mut(owner)?.children.retain(|&c| c != child),
            Some(previous) => self.remove(previous, child)?,
            None => {}
        }
        self.node_mut(owner)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(owner);
        debug!("added {child:?} to {owner:?} at {index}");

        self.invalidate(child);
        self.perform_layout(owner);
        Ok(())
    }

    /// Detaches `child` from `owner`. Focus held inside the child is dropped.
    pub fn remove(&mut self, owner: ControlId, child: ControlId) -> Result<(), TreeError> {
        let index = self
            .index_of(owner, child)
            .ok_or(TreeError::NotAChild { parent: owner, child })?;

        self.drop_focus_within(child);
        self.invalidate(child);

        self.node_mut(owner)?.children.remove(index);
        self.node_mut(child)?.parent = None;
        debug!("removed {child:?} from {owner:?}");

        self.perform_layout(owner);
        Ok(())
    }

    /// Removes every child of `owner` with a single layout pass.
    pub fn clear(&mut self, owner: ControlId) -> Result<(), TreeError> {
        let children = self.node(owner)?.children.clone();
        if children.is_empty() {
            return Ok(());
        }
        self.suspend_layout(owner);
        for child in children {
            self.remove(owner, child)?;
        }
        self.resume_layout(owner, true);
        Ok(())
    }

    /// Moves `child` to the top of its container's z-order.
    pub fn bring_to_front(&mut self, child: ControlId) -> Result<(), TreeError> {
        self.restack(child, true)
    }

    /// Moves `child` to the bottom of its container's z-order.
    pub fn send_to_back(&mut self, child: ControlId) -> Result<(), TreeError> {
        self.restack(child, false)
    }

    fn restack(&mut self, child: ControlId, to_front: bool) -> Result<(), TreeError> {
        let owner = self.node(child)?.parent.ok_or(TreeError::Detached(child))?;
        let list = &mut self.node_mut(owner)?.children;
        let Some(index) = list.iter().position(|&c| c == child) else {
            return Err(TreeError::NotAChild { parent: owner, child });
        };
        list.remove(index);
        if to_front {
            list.push(child);
        } else {
            list.insert(0, child);
        }
        self.invalidate(child);
        self.perform_layout(owner);
        Ok(())
    }

    fn check_attach(&self, owner: ControlId, child: ControlId) -> Result<(), TreeError> {
        self.node(owner)?;
        self.node(child)?;
        if child == self.root {
            return Err(TreeError::RootNotAllowed);
        }
        if self.ancestors_inclusive(owner).any(|a| a == child) {
            return Err(TreeError::WouldCreateCycle { parent: owner, child });
        }
        Ok(())
    }
}
