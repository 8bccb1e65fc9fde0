//! Input subsystem.
//!
//! Public API is platform-agnostic. The platform binding translates its raw
//! window messages into [`WindowMessage`] values and feeds them to the
//! container surface, which keeps an [`InputState`] alongside.

mod message;
mod state;
mod types;

pub use message::WindowMessage;
pub use state::InputState;
pub use types::{
    DragData,
    DragEffect,
    DragEffects,
    Key,
    Modifiers,
    MouseButton,
    TimerId,
};
