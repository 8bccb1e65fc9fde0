use std::fmt;

/// Keyboard key identifier.
///
/// The platform layer maps its virtual-key codes into these variants where
/// possible; anything else travels as `Key::Unknown(code)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,
    /// The dedicated context-menu ("Apps") key.
    Menu,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

/// Modifier keys state.
///
/// Stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false, alt: false, meta: false };

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Outcome of a drag-and-drop operation, chosen by the drop target.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum DragEffect {
    #[default]
    None,
    Copy,
    Move,
    Link,
}

/// Effects the drag source permits.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DragEffects {
    pub copy: bool,
    pub moves: bool,
    pub link: bool,
}

impl DragEffects {
    pub const ALL: DragEffects = DragEffects { copy: true, moves: true, link: true };

    pub fn allows(&self, effect: DragEffect) -> bool {
        match effect {
            DragEffect::None => true,
            DragEffect::Copy => self.copy,
            DragEffect::Move => self.moves,
            DragEffect::Link => self.link,
        }
    }
}

/// Payload carried by a drag-and-drop operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DragData {
    Text(String),
    Files(Vec<std::path::PathBuf>),
    /// Application-defined format name and raw bytes.
    Custom { format: String, bytes: Vec<u8> },
}

/// Identifier of a native timer owned by one surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);
