//! Event identifiers, argument payloads and per-control listener storage.
//!
//! Every control carries its own sparse listener map keyed by [`EventKind`].
//! Handlers receive the tree mutably (except paint handlers, which only get a
//! shared borrow: the tree cannot change shape while it is being painted).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use wisp_engine::coords::Vec2;
use wisp_engine::input::{DragData, DragEffect, DragEffects, Key, Modifiers, MouseButton};

use crate::control::ControlId;
use crate::painter::Painter;
use crate::tree::ControlTree;

// ── EventKind ─────────────────────────────────────────────────────────────

/// Every event a lightweight control can raise, except paint.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    Click,
    DoubleClick,
    MouseDown,
    MouseMove,
    MouseUp,
    MouseEnter,
    MouseLeave,
    MouseHover,
    MouseWheel,
    KeyDown,
    KeyPress,
    KeyUp,
    DragEnter,
    DragOver,
    DragLeave,
    DragDrop,
    GotFocus,
    LostFocus,
    ShowContextMenu,
    VisibleChanged,
    LocationChanged,
    SizeChanged,
    /// The "on layout" hook. Raised by `ControlTree::perform_layout`.
    Layout,
    Disposed,
}

// ── argument payloads ─────────────────────────────────────────────────────

/// Mouse payload. `pos` is in the receiving control's local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEventArgs {
    pub button: Option<MouseButton>,
    pub pos: Vec2,
    pub clicks: u8,
    /// Wheel notches; zero for non-wheel events.
    pub delta: f32,
}

impl MouseEventArgs {
    pub fn at(pos: Vec2) -> Self {
        Self { button: None, pos, clicks: 0, delta: 0.0 }
    }
}

/// Keyboard payload. Set `handled` to tell the container the key was consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEventArgs {
    pub key: Option<Key>,
    /// Character for `KeyPress`.
    pub ch: Option<char>,
    pub modifiers: Modifiers,
    pub handled: bool,
}

/// Drag-and-drop payload. Handlers pick `effect`; the container reports it
/// back to the drag source when the source allows it.
#[derive(Debug, Clone, PartialEq)]
pub struct DragEventArgs {
    pub pos: Vec2,
    pub data: DragData,
    pub allowed: DragEffects,
    pub effect: DragEffect,
}

/// Context-menu payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenuEventArgs {
    /// Local position, `None` for keyboard invocation.
    pub pos: Option<Vec2>,
    /// The menu about to be shown; handlers may replace or clear it.
    pub menu: Option<ContextMenu>,
    /// Set to suppress the host's menu.
    pub handled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventArgs {
    None,
    Mouse(MouseEventArgs),
    Key(KeyEventArgs),
    Drag(DragEventArgs),
    ContextMenu(ContextMenuEventArgs),
}

impl EventArgs {
    pub fn mouse(&self) -> Option<&MouseEventArgs> {
        match self {
            EventArgs::Mouse(m) => Some(m),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&KeyEventArgs> {
        match self {
            EventArgs::Key(k) => Some(k),
            _ => None,
        }
    }

    pub fn key_mut(&mut self) -> Option<&mut KeyEventArgs> {
        match self {
            EventArgs::Key(k) => Some(k),
            _ => None,
        }
    }

    pub fn drag_mut(&mut self) -> Option<&mut DragEventArgs> {
        match self {
            EventArgs::Drag(d) => Some(d),
            _ => None,
        }
    }

    pub fn context_menu_mut(&mut self) -> Option<&mut ContextMenuEventArgs> {
        match self {
            EventArgs::ContextMenu(c) => Some(c),
            _ => None,
        }
    }
}

// ── ContextMenu ───────────────────────────────────────────────────────────

/// A context menu as a flat list of item labels. The host renders it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextMenu {
    pub items: Vec<String>,
}

impl ContextMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, label: impl Into<String>) -> Self {
        self.items.push(label.into());
        self
    }
}

// ── listeners ─────────────────────────────────────────────────────────────

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Token returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn next() -> Self {
        ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Event handler: `(tree, sender, args)`.
pub type Handler = Box<dyn FnMut(&mut ControlTree, ControlId, &mut EventArgs)>;

/// Paint handler. Draws in the sender's local coordinates, already clipped
/// to its bounds.
pub type PaintHandler = Box<dyn FnMut(&ControlTree, ControlId, &mut Painter<'_>)>;

pub(crate) type SharedHandler = Rc<RefCell<Handler>>;
pub(crate) type SharedPaintHandler = Rc<RefCell<PaintHandler>>;

/// Sparse per-control listener map.
///
/// Dispatch iterates a snapshot of shared handles, so a handler may subscribe
/// or unsubscribe (even itself) while it runs.
#[derive(Default)]
pub(crate) struct Handlers {
    by_kind: HashMap<EventKind, Vec<(ListenerId, SharedHandler)>>,
    paint: Vec<(ListenerId, SharedPaintHandler)>,
}

impl Handlers {
    pub(crate) fn add(&mut self, kind: EventKind, handler: Handler) -> ListenerId {
        let id = ListenerId::next();
        self.by_kind
            .entry(kind)
            .or_default()
            .push((id, Rc::new(RefCell::new(handler))));
        id
    }

    pub(crate) fn add_paint(&mut self, handler: PaintHandler) -> ListenerId {
        let id = ListenerId::next();
        self.paint.push((id, Rc::new(RefCell::new(handler))));
        id
    }

    pub(crate) fn remove(&mut self, listener: ListenerId) -> bool {
        if let Some(pos) = self.paint.iter().position(|(id, _)| *id == listener) {
            self.paint.remove(pos);
            return true;
        }
        for list in self.by_kind.values_mut() {
            if let Some(pos) = list.iter().position(|(id, _)| *id == listener) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    pub(crate) fn contains(&self, kind: EventKind, listener: ListenerId) -> bool {
        self.by_kind
            .get(&kind)
            .is_some_and(|list| list.iter().any(|(id, _)| *id == listener))
    }

    pub(crate) fn snapshot(&self, kind: EventKind) -> Vec<(ListenerId, SharedHandler)> {
        self.by_kind.get(&kind).cloned().unwrap_or_default()
    }

    pub(crate) fn paint_snapshot(&self) -> Vec<SharedPaintHandler> {
        self.paint.iter().map(|(_, h)| Rc::clone(h)).collect()
    }

    pub(crate) fn count(&self, kind: EventKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }
}
