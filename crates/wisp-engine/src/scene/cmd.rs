use crate::coords::{ColorRgba, Rect, Vec2};

/// Backend-agnostic draw command. Coordinates are client-space.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect { rect: Rect, color: ColorRgba },
    StrokeRect { rect: Rect, color: ColorRgba, width: f32 },
    Text { origin: Vec2, text: String, color: ColorRgba },
    /// Bitmap looked up by logical resource name.
    Image { rect: Rect, name: String },
}

impl DrawCmd {
    /// The area the command touches, before clipping.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            DrawCmd::FillRect { rect, .. }
            | DrawCmd::StrokeRect { rect, .. }
            | DrawCmd::Image { rect, .. } => Some(*rect),
            DrawCmd::Text { .. } => None,
        }
    }
}
