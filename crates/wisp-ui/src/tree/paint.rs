//! Top-down paint traversal.
//!
//! A control's own paint handlers run first, then its visible children in
//! ascending z-order. Each child is entered with the painter translated to
//! its origin and clipped to its bounds, so it can neither draw outside
//! itself nor over a sibling above it.

use log::{trace, warn};
use wisp_engine::coords::Rect;

use super::ControlTree;
use crate::control::ControlId;
use crate::painter::Painter;

impl ControlTree {
    /// Paints `id` and its subtree. `clip` is the region to repaint in the
    /// control's local coordinates; the painter must already be positioned
    /// at the control's origin.
    pub fn paint_control(&self, id: ControlId, painter: &mut Painter<'_>, clip: Rect) {
        self.paint_self(id, painter);
        self.paint_children(id, painter, clip);
    }

    /// Runs the paint handlers of `id` alone.
    pub(crate) fn paint_self(&self, id: ControlId, painter: &mut Painter<'_>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        for handler in node.handlers.paint_snapshot() {
            match handler.try_borrow_mut() {
                Ok(mut f) => (*f)(self, id, painter),
                Err(_) => warn!("paint handler on {id:?} re-entered itself; skipped"),
            }
        }
    }

    /// Paints the visible children of `id` that intersect `clip` (local to
    /// `id`), bottom to top.
    pub fn paint_children(&self, id: ControlId, painter: &mut Painter<'_>, clip: Rect) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        for &child in &node.children {
            let Some(c) = self.nodes.get(child) else {
                continue;
            };
            if !c.visible {
                continue;
            }
            let Some(visible) = c.bounds.intersect(clip) else {
                continue;
            };
            trace!("paint {:?} ({})", child, c.name);
            painter.enter_child(c.bounds);
            self.paint_control(child, painter, visible.translate(-c.bounds.origin));
            painter.leave_child();
        }
    }
}
