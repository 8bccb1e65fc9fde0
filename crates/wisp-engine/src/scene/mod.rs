//! Recorded draw stream.
//!
//! The control tree paints into a [`DrawList`]; the platform binding replays
//! it with whatever 2D API it owns.

mod cmd;
mod list;

pub use cmd::DrawCmd;
pub use list::{DrawItem, DrawList};
