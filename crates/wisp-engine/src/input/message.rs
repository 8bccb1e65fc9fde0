use crate::coords::{Rect, Vec2, Viewport};

use super::types::{DragData, DragEffects, Key, Modifiers, MouseButton, TimerId};

/// A native window message, already translated out of the platform's
/// encoding.
///
/// Positions are client-area coordinates of the receiving surface in logical
/// pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowMessage {
    MouseMove { pos: Vec2 },
    MouseDown { button: MouseButton, pos: Vec2, clicks: u8 },
    MouseUp { button: MouseButton, pos: Vec2 },
    /// `delta` is in notches; positive scrolls the content up (reveals what is above).
    MouseWheel { pos: Vec2, delta: f32 },
    /// The pointer rested at `pos` for the platform hover time.
    MouseHover { pos: Vec2 },
    /// The pointer left the client area.
    MouseLeave,

    KeyDown { key: Key, modifiers: Modifiers },
    KeyUp { key: Key, modifiers: Modifiers },
    /// Committed character input.
    Char { ch: char },

    /// Repaint the region `clip`.
    Paint { clip: Rect },

    /// Context-menu request. `pos` is `None` when invoked from the keyboard.
    ContextMenu { pos: Option<Vec2> },

    DragEnter { pos: Vec2, data: DragData, allowed: DragEffects },
    DragOver { pos: Vec2, data: DragData, allowed: DragEffects },
    DragLeave,
    DragDrop { pos: Vec2, data: DragData, allowed: DragEffects },

    /// The surface received native keyboard focus. `backward` is set when
    /// focus arrived through Shift+Tab.
    FocusEnter { backward: bool },
    /// The surface lost native keyboard focus.
    FocusLeave,

    Resize { size: Viewport },
    Timer { id: TimerId },
}

impl WindowMessage {
    /// Pointer position carried by the message, if any.
    pub fn pointer_pos(&self) -> Option<Vec2> {
        match self {
            WindowMessage::MouseMove { pos }
            | WindowMessage::MouseDown { pos, .. }
            | WindowMessage::MouseUp { pos, .. }
            | WindowMessage::MouseWheel { pos, .. }
            | WindowMessage::MouseHover { pos }
            | WindowMessage::DragEnter { pos, .. }
            | WindowMessage::DragOver { pos, .. }
            | WindowMessage::DragDrop { pos, .. } => Some(*pos),
            WindowMessage::ContextMenu { pos } => *pos,
            _ => None,
        }
    }

    /// Short name used in trace output.
    pub fn name(&self) -> &'static str {
        match self {
            WindowMessage::MouseMove { .. } => "mouse-move",
            WindowMessage::MouseDown { .. } => "mouse-down",
            WindowMessage::MouseUp { .. } => "mouse-up",
            WindowMessage::MouseWheel { .. } => "mouse-wheel",
            WindowMessage::MouseHover { .. } => "mouse-hover",
            WindowMessage::MouseLeave => "mouse-leave",
            WindowMessage::KeyDown { .. } => "key-down",
            WindowMessage::KeyUp { .. } => "key-up",
            WindowMessage::Char { .. } => "char",
            WindowMessage::Paint { .. } => "paint",
            WindowMessage::ContextMenu { .. } => "context-menu",
            WindowMessage::DragEnter { .. } => "drag-enter",
            WindowMessage::DragOver { .. } => "drag-over",
            WindowMessage::DragLeave => "drag-leave",
            WindowMessage::DragDrop { .. } => "drag-drop",
            WindowMessage::FocusEnter { .. } => "focus-enter",
            WindowMessage::FocusLeave => "focus-leave",
            WindowMessage::Resize { .. } => "resize",
            WindowMessage::Timer { .. } => "timer",
        }
    }
}
