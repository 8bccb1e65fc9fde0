//! Wisp UI: windowless lightweight controls inside one native container.
//!
//! A [`LightweightContainer`] owns a single native surface and a
//! [`ControlTree`] of controls that have no window handle of their own. The
//! container translates native messages into per-control events: it hit-tests
//! the pointer, pairs enter/leave, captures the mouse between press and
//! release, routes keys to the focused control, runs tab traversal, resolves
//! drag-and-drop targets (with auto-scroll near the edges) and paints the tree
//! top-down into a recorded draw list.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use wisp_ui::prelude::*;
//!
//! let mut ui = LightweightContainer::new(HeadlessHost::new(), Viewport::new(320.0, 240.0), ContainerConfig::default());
//! let root = ui.root();
//! let ok = PushButton::new("OK")
//!     .bounds(Rect::new(10.0, 10.0, 80.0, 24.0))
//!     .on_click(|_, _| log::info!("ok"))
//!     .build(ui.tree_mut())?;
//! ui.tree_mut().add(root, ok)?;
//! ui.register_focus_target(ok);
//!
//! // From the native window procedure:
//! ui.window_proc(WindowMessage::MouseMove { pos: Vec2::new(20.0, 20.0) });
//! ```
//!
//! # Custom controls
//!
//! A control is plain data plus event subscriptions; there is no trait to
//! implement:
//!
//! ```rust,ignore
//! let swatch = tree.create(LightweightControl::new("swatch").bounds(Rect::new(0.0, 0.0, 16.0, 16.0)));
//! tree.on_paint(swatch, |tree, id, p| {
//!     let size = tree.get(id).map_or(Vec2::zero(), |n| n.virtual_size());
//!     p.fill_rect(Rect::from_size(size), ColorRgba::from_rgb8(255, 0, 0));
//! })?;
//! tree.subscribe(swatch, EventKind::Click, |_, id, _| log::info!("{id:?} clicked"))?;
//! ```

pub mod accessibility;
pub mod autoscroll;
pub mod config;
pub mod container;
pub mod control;
pub mod error;
pub mod event;
pub mod focus;
pub mod host;
pub mod painter;
pub mod tree;
pub mod widgets;

pub use container::{LightweightContainer, MessageResult};
pub use tree::ControlTree;

/// Everything needed to build and drive a container.
pub mod prelude {
    pub use crate::accessibility::{AccessibleObject, AccessibleRole};
    pub use crate::autoscroll::AutoScrollMode;
    pub use crate::config::{AutoScrollConfig, ContainerConfig};
    pub use crate::container::{LightweightContainer, MessageResult};
    pub use crate::control::{ControlId, LightweightControl};
    pub use crate::error::TreeError;
    pub use crate::event::{ContextMenu, EventArgs, EventKind, ListenerId};
    pub use crate::focus::{FocusController, FocusTarget};
    pub use crate::host::{HeadlessHost, NativeControlInfo, NativeHandle, NativeHost};
    pub use crate::painter::Painter;
    pub use crate::tree::{ControlTree, LayoutGuard};
    pub use crate::widgets::{Label, PushButton, StackPanel};

    pub use wisp_engine::coords::{ColorRgba, Rect, Vec2, Viewport};
    pub use wisp_engine::input::{DragData, DragEffect, DragEffects, Key, Modifiers, MouseButton, WindowMessage};
}
