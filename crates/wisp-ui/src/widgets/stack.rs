use log::warn;
use wisp_engine::coords::{Rect, Vec2};

use crate::accessibility::AccessibleRole;
use crate::control::{ControlId, LightweightControl};
use crate::error::TreeError;
use crate::event::EventKind;
use crate::tree::ControlTree;

// ── StackPanel ────────────────────────────────────────────────────────────

/// Stacks its visible children top to bottom and grows to fit them.
///
/// Children keep their own height; each is placed at the panel's left
/// padding, `spacing` pixels below the previous one. The panel's height is
/// recomputed on every layout pass, which the framework runs whenever a
/// child is added, removed, moved, resized, shown or hidden.
///
/// Wrap bulk changes in [`ControlTree::layout_scope`] to lay out once:
///
/// ```rust,ignore
/// let list = StackPanel::new("files").spacing(4.0).width(180.0).build(&mut tree)?;
/// {
///     let mut tree = tree.layout_scope(list);
///     for name in names {
///         let row = Label::new(name).bounds(Rect::new(0.0, 0.0, 180.0, 18.0)).build(&mut tree)?;
///         tree.add(list, row)?;
///     }
/// } // one layout pass here
/// ```
pub struct StackPanel {
    name: String,
    origin: Vec2,
    width: f32,
    spacing: f32,
    padding: f32,
}

impl StackPanel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), origin: Vec2::zero(), width: 100.0, spacing: 0.0, padding: 0.0 }
    }

    pub fn origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width.max(0.0);
        self
    }

    /// Gap between consecutive children.
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    /// Inset on all four sides.
    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Creates the detached panel.
    pub fn build(self, tree: &mut ControlTree) -> Result<ControlId, TreeError> {
        let id = tree.create(
            LightweightControl::new(self.name)
                .role(AccessibleRole::Grouping)
                .bounds(Rect::new(self.origin.x, self.origin.y, self.width, 2.0 * self.padding)),
        );
        let (spacing, padding) = (self.spacing, self.padding);
        tree.subscribe(id, EventKind::Layout, move |tree, id, _| {
            if let Err(e) = arrange(tree, id, spacing, padding) {
                warn!("stack layout of {id:?} failed: {e}");
            }
        })?;
        Ok(id)
    }
}

fn arrange(tree: &mut ControlTree, id: ControlId, spacing: f32, padding: f32) -> Result<(), TreeError> {
    let children: Vec<ControlId> = tree
        .children(id)
        .iter()
        .copied()
        .filter(|&c| tree.get(c).is_some_and(|n| n.visible()))
        .collect();

    let mut y = padding;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            y += spacing;
        }
        tree.set_virtual_location(*child, Vec2::new(padding, y))?;
        y += tree.virtual_bounds(*child).map_or(0.0, |b| b.size.y);
    }

    let width = tree.virtual_bounds(id).map_or(0.0, |b| b.size.x);
    tree.set_virtual_size(id, Vec2::new(width, y + padding))
}
