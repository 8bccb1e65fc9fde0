//! Coordinate and geometry types shared by the engine and the control tree.
//!
//! Canonical space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Every lightweight control expresses its bounds in the space of its
//! immediate container; see `Rect::translate` for moving between levels.

mod color;
mod rect;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
