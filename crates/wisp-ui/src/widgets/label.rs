use wisp_engine::coords::{ColorRgba, Rect, Vec2};

use crate::accessibility::AccessibleRole;
use crate::control::{ControlId, LightweightControl};
use crate::error::TreeError;
use crate::tree::ControlTree;

/// A single line of static text.
///
/// The text doubles as the control's accessible name, so
/// [`Label::set_text`] and a screen reader always agree.
///
/// # Example
/// ```rust,ignore
/// let title = Label::new("Downloads")
///     .color(ColorRgba::white())
///     .bounds(Rect::new(8.0, 8.0, 200.0, 20.0))
///     .build(&mut tree)?;
/// tree.add(tree.root(), title)?;
/// ```
pub struct Label {
    text: String,
    color: ColorRgba,
    bounds: Rect,
    padding: Vec2,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: ColorRgba::black(),
            bounds: Rect::default(),
            padding: Vec2::new(2.0, 2.0),
        }
    }

    pub fn color(mut self, color: ColorRgba) -> Self {
        self.color = color;
        self
    }

    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Offset of the text origin from the top-left corner.
    pub fn padding(mut self, padding: Vec2) -> Self {
        self.padding = padding;
        self
    }

    /// Creates the detached control.
    pub fn build(self, tree: &mut ControlTree) -> Result<ControlId, TreeError> {
        let id = tree.create(
            LightweightControl::new(self.text)
                .role(AccessibleRole::StaticText)
                .bounds(self.bounds),
        );
        let (color, padding) = (self.color, self.padding);
        tree.on_paint(id, move |tree, id, painter| {
            if let Some(node) = tree.get(id) {
                painter.text(padding, node.name(), color);
            }
        })?;
        Ok(id)
    }

    /// Replaces the text and repaints.
    pub fn set_text(tree: &mut ControlTree, id: ControlId, text: impl Into<String>) -> Result<(), TreeError> {
        tree.set_name(id, text)?;
        tree.invalidate(id);
        Ok(())
    }
}
