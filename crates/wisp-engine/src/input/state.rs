use std::collections::HashSet;

use crate::coords::Vec2;

use super::message::WindowMessage;
use super::types::{Modifiers, MouseButton};

/// Current input state for a single native surface.
///
/// Updated from every [`WindowMessage`] before it is dispatched, so handlers
/// can query held buttons and the last pointer position.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the surface holds native keyboard focus.
    pub focused: bool,

    /// Pointer position in client coordinates, `None` while outside.
    pub pointer_pos: Option<Vec2>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,

    /// True between a drag-enter and the matching drag-leave/drop.
    pub dragging: bool,
}

impl InputState {
    /// Applies `msg` to the tracked state.
    pub fn apply(&mut self, msg: &WindowMessage) {
        match msg {
            WindowMessage::MouseMove { pos } | WindowMessage::MouseHover { pos } => {
                self.pointer_pos = Some(*pos);
            }
            WindowMessage::MouseDown { button, pos, .. } => {
                self.pointer_pos = Some(*pos);
                self.buttons_down.insert(*button);
            }
            WindowMessage::MouseUp { button, pos } => {
                self.pointer_pos = Some(*pos);
                self.buttons_down.remove(button);
            }
            WindowMessage::MouseWheel { pos, .. } => {
                self.pointer_pos = Some(*pos);
            }
            WindowMessage::MouseLeave => {
                self.pointer_pos = None;
            }
            WindowMessage::KeyDown { modifiers, .. } | WindowMessage::KeyUp { modifiers, .. } => {
                self.modifiers = *modifiers;
            }
            WindowMessage::DragEnter { pos, .. } | WindowMessage::DragOver { pos, .. } => {
                self.pointer_pos = Some(*pos);
                self.dragging = true;
            }
            WindowMessage::DragLeave | WindowMessage::DragDrop { .. } => {
                self.dragging = false;
            }
            WindowMessage::FocusEnter { .. } => {
                self.focused = true;
            }
            WindowMessage::FocusLeave => {
                self.focused = false;
                // Avoids stuck buttons when focus changes mid-press.
                self.buttons_down.clear();
                self.modifiers = Modifiers::default();
            }
            _ => {}
        }
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }

    pub fn any_button_down(&self) -> bool {
        !self.buttons_down.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    #[test]
    fn buttons_tracked_between_down_and_up() {
        let mut s = InputState::default();
        let pos = Vec2::new(3.0, 4.0);
        s.apply(&WindowMessage::MouseDown { button: MouseButton::Left, pos, clicks: 1 });
        assert!(s.button_down(MouseButton::Left));
        assert_eq!(s.pointer_pos, Some(pos));
        s.apply(&WindowMessage::MouseUp { button: MouseButton::Left, pos });
        assert!(!s.any_button_down());
    }

    #[test]
    fn focus_leave_clears_held_state() {
        let mut s = InputState::default();
        s.apply(&WindowMessage::FocusEnter { backward: false });
        s.apply(&WindowMessage::MouseDown { button: MouseButton::Right, pos: Vec2::zero(), clicks: 1 });
        s.apply(&WindowMessage::KeyDown { key: Key::Shift, modifiers: Modifiers::SHIFT });
        s.apply(&WindowMessage::FocusLeave);
        assert!(!s.focused);
        assert!(!s.any_button_down());
        assert!(!s.modifiers.any());
    }

    #[test]
    fn mouse_leave_forgets_pointer() {
        let mut s = InputState::default();
        s.apply(&WindowMessage::MouseMove { pos: Vec2::new(1.0, 1.0) });
        s.apply(&WindowMessage::MouseLeave);
        assert_eq!(s.pointer_pos, None);
    }
}
