use wisp_engine::coords::{ColorRgba, Rect, Vec2};
use wisp_engine::scene::{DrawCmd, DrawList};

/// Drawing surface passed to paint handlers.
///
/// Wraps the engine's `DrawList` with a translation stack: every handler
/// draws in its own control's local coordinates and the painter maps them to
/// client space. Entering a child pushes both an offset and a clip equal to
/// the child's bounds, so a child cannot draw outside itself.
pub struct Painter<'a> {
    draw_list: &'a mut DrawList,
    /// Local → client translation currently in effect.
    offset: Vec2,
    saved: Vec<Vec2>,
}

impl<'a> Painter<'a> {
    pub fn new(draw_list: &'a mut DrawList) -> Self {
        Self { draw_list, offset: Vec2::zero(), saved: Vec::new() }
    }

    /// Client-space position of the local origin.
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Current clip in local coordinates, `None` if unclipped.
    pub fn clip_rect(&self) -> Option<Rect> {
        self.draw_list.current_clip().map(|c| c.translate(-self.offset))
    }

    // ── transforms ────────────────────────────────────────────────────────

    /// Shifts the local origin by `by`. Pair with [`pop_translate`](Self::pop_translate).
    pub fn push_translate(&mut self, by: Vec2) {
        self.saved.push(self.offset);
        self.offset += by;
    }

    pub fn pop_translate(&mut self) {
        match self.saved.pop() {
            Some(prev) => self.offset = prev,
            None => debug_assert!(false, "pop_translate without push_translate"),
        }
    }

    /// Begin a scissor region in local coordinates. Pair with [`pop_clip`](Self::pop_clip).
    pub fn push_clip(&mut self, rect: Rect) {
        self.draw_list.push_clip(rect.translate(self.offset));
    }

    pub fn pop_clip(&mut self) {
        self.draw_list.pop_clip();
    }

    /// Enters a child whose bounds (in current local space) are `bounds`.
    pub(crate) fn enter_child(&mut self, bounds: Rect) {
        self.push_translate(bounds.origin);
        self.push_clip(Rect::from_size(bounds.size));
    }

    pub(crate) fn leave_child(&mut self) {
        self.pop_clip();
        self.pop_translate();
    }

    // ── drawing ───────────────────────────────────────────────────────────

    pub fn fill_rect(&mut self, rect: Rect, color: ColorRgba) {
        let rect = rect.translate(self.offset);
        self.draw_list.push(DrawCmd::FillRect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: ColorRgba, width: f32) {
        let rect = rect.translate(self.offset);
        self.draw_list.push(DrawCmd::StrokeRect { rect, color, width });
    }

    pub fn text(&mut self, origin: Vec2, text: impl Into<String>, color: ColorRgba) {
        let origin = origin + self.offset;
        self.draw_list.push(DrawCmd::Text { origin, text: text.into(), color });
    }

    /// Bitmap looked up by logical resource name.
    pub fn image(&mut self, rect: Rect, name: impl Into<String>) {
        let rect = rect.translate(self.offset);
        self.draw_list.push(DrawCmd::Image { rect, name: name.into() });
    }
}
