use crate::coords::Rect;

use super::DrawCmd;

/// A single draw item: command + clip rect.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub cmd: DrawCmd,
    /// Scissor rect in client pixels. `None` = no clipping.
    pub clip_rect: Option<Rect>,
}

impl DrawItem {
    /// The visible part of the item, if its extent is known.
    pub fn visible_bounds(&self) -> Option<Rect> {
        let bounds = self.cmd.bounds()?;
        match self.clip_rect {
            None => Some(bounds),
            Some(clip) => bounds.intersect(clip),
        }
    }
}

/// Recorded draw stream for one paint message, in paint order (back-to-front).
///
/// # Clipping
///
/// Use [`push_clip`](Self::push_clip) / [`pop_clip`](Self::pop_clip) to scope
/// commands to a scissor rect. Clips intersect with the current parent, so a
/// nested control can never widen its container's clip.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    items: Vec<DrawItem>,

    /// Top is always the current effective clip, already intersected with all parents.
    clip_stack: Vec<Rect>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items and the clip stack. Keeps allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.clip_stack.clear();
    }

    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a command; it inherits the current clip rect.
    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(DrawItem { cmd, clip_rect: self.current_clip() });
    }

    #[inline]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Begins a scissor region, intersected with any parent clip.
    ///
    /// Calls must be balanced with [`pop_clip`](Self::pop_clip).
    #[inline]
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect,
            // No overlap: zero-area rect so the backend skips those draws.
            Some(&parent) => parent.intersect(rect).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        };
        self.clip_stack.push(effective);
    }

    /// Ends the most recent scissor region.
    #[inline]
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip called without matching push_clip");
        self.clip_stack.pop();
    }

    #[inline]
    pub fn clip_depth(&self) -> usize {
        self.clip_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::ColorRgba;

    fn fill(x: f32, y: f32, w: f32, h: f32) -> DrawCmd {
        DrawCmd::FillRect { rect: Rect::new(x, y, w, h), color: ColorRgba::black() }
    }

    #[test]
    fn nested_clips_intersect() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        list.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        list.push(fill(0.0, 0.0, 200.0, 200.0));
        assert_eq!(list.items()[0].clip_rect, Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
        list.pop_clip();
        list.pop_clip();
        assert_eq!(list.clip_depth(), 0);
    }

    #[test]
    fn disjoint_clip_collapses_to_empty() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        list.push_clip(Rect::new(20.0, 20.0, 10.0, 10.0));
        list.push(fill(0.0, 0.0, 50.0, 50.0));
        assert_eq!(list.items()[0].visible_bounds(), None);
    }

    #[test]
    fn unclipped_items_keep_full_bounds() {
        let mut list = DrawList::new();
        list.push(fill(1.0, 2.0, 3.0, 4.0));
        assert_eq!(list.items()[0].visible_bounds(), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
    }
}
