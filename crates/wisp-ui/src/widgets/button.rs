use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{trace, warn};
use wisp_engine::coords::{ColorRgba, Rect, Vec2};
use wisp_engine::input::{Key, MouseButton};

use crate::accessibility::AccessibleRole;
use crate::control::{ControlId, LightweightControl};
use crate::error::TreeError;
use crate::event::{EventArgs, EventKind};
use crate::tree::ControlTree;

type ClickFn = Rc<RefCell<Box<dyn FnMut(&mut ControlTree, ControlId)>>>;

/// Visual state shared between the input handlers and the paint handler.
#[derive(Debug, Copy, Clone, Default)]
struct Visual {
    hovered: bool,
    pressed: bool,
}

/// A clickable control with a text caption.
///
/// Activated by a left click, or by Space / Enter while it holds focus.
/// Hover and press state is kept by the control's own handlers, so the
/// paint handler only reads it.
///
/// # Example
/// ```rust,ignore
/// let save = PushButton::new("Save")
///     .bounds(Rect::new(10.0, 10.0, 80.0, 24.0))
///     .hover_background(ColorRgba::from_rgb8(200, 220, 255))
///     .on_click(|tree, id| log::info!("{} clicked", tree.get(id).unwrap().name()))
///     .build(&mut tree)?;
/// ```
pub struct PushButton {
    caption: String,
    bounds: Rect,
    on_click: Option<Box<dyn FnMut(&mut ControlTree, ControlId)>>,

    background: ColorRgba,
    hover_background: ColorRgba,
    press_background: ColorRgba,
    text_color: ColorRgba,
    focus_color: ColorRgba,
}

impl PushButton {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            bounds: Rect::default(),
            on_click: None,
            background: ColorRgba::from_rgb8(225, 225, 225),
            hover_background: ColorRgba::from_rgb8(229, 241, 251),
            press_background: ColorRgba::from_rgb8(204, 228, 247),
            text_color: ColorRgba::black(),
            focus_color: ColorRgba::from_rgb8(0, 120, 215),
        }
    }

    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Callback invoked when the button is activated.
    pub fn on_click(mut self, f: impl FnMut(&mut ControlTree, ControlId) + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    pub fn background(mut self, color: ColorRgba) -> Self {
        self.background = color;
        self
    }

    /// Background while the pointer is over the button.
    pub fn hover_background(mut self, color: ColorRgba) -> Self {
        self.hover_background = color;
        self
    }

    /// Background while the left button is held on it.
    pub fn press_background(mut self, color: ColorRgba) -> Self {
        self.press_background = color;
        self
    }

    pub fn text_color(mut self, color: ColorRgba) -> Self {
        self.text_color = color;
        self
    }

    /// Creates the detached control.
    pub fn build(self, tree: &mut ControlTree) -> Result<ControlId, TreeError> {
        let id = tree.create(
            LightweightControl::new(self.caption)
                .role(AccessibleRole::PushButton)
                .bounds(self.bounds)
                .tab_stop(true),
        );

        let visual = Rc::new(Cell::new(Visual::default()));
        let on_click: Box<dyn FnMut(&mut ControlTree, ControlId)> = match self.on_click {
            Some(f) => f,
            None => Box::new(|_: &mut ControlTree, _: ControlId| {}),
        };
        let click: ClickFn = Rc::new(RefCell::new(on_click));

        let v = Rc::clone(&visual);
        tree.subscribe(id, EventKind::MouseEnter, move |tree, id, _| {
            v.set(Visual { hovered: true, ..v.get() });
            tree.invalidate(id);
        })?;

        let v = Rc::clone(&visual);
        tree.subscribe(id, EventKind::MouseLeave, move |tree, id, _| {
            v.set(Visual::default());
            tree.invalidate(id);
        })?;

        let v = Rc::clone(&visual);
        tree.subscribe(id, EventKind::MouseDown, move |tree, id, args| {
            if is_left(args) {
                v.set(Visual { pressed: true, ..v.get() });
                tree.invalidate(id);
            }
        })?;

        let v = Rc::clone(&visual);
        tree.subscribe(id, EventKind::MouseUp, move |tree, id, args| {
            if is_left(args) {
                v.set(Visual { pressed: false, ..v.get() });
                tree.invalidate(id);
            }
        })?;

        let c = Rc::clone(&click);
        tree.subscribe(id, EventKind::Click, move |tree, id, args| {
            if is_left(args) {
                activate(&c, tree, id);
            }
        })?;

        let c = Rc::clone(&click);
        tree.subscribe(id, EventKind::KeyDown, move |tree, id, args| {
            let Some(key) = args.key_mut() else {
                return;
            };
            if matches!(key.key, Some(Key::Space | Key::Enter)) && !key.modifiers.any() {
                key.handled = true;
                activate(&c, tree, id);
            }
        })?;

        let (background, hover, press) = (self.background, self.hover_background, self.press_background);
        let (text_color, focus_color) = (self.text_color, self.focus_color);
        tree.on_paint(id, move |tree, id, painter| {
            let Some(node) = tree.get(id) else {
                return;
            };
            let state = visual.get();
            let bg = if state.pressed && state.hovered {
                press
            } else if state.hovered {
                hover
            } else {
                background
            };
            let rect = node.virtual_client_rect();
            painter.fill_rect(rect, bg);
            painter.text(Vec2::new(6.0, 4.0), node.name(), text_color);
            if node.focused() {
                painter.stroke_rect(rect, focus_color, 1.0);
            }
        })?;

        Ok(id)
    }
}

fn is_left(args: &EventArgs) -> bool {
    args.mouse().is_some_and(|m| m.button == Some(MouseButton::Left))
}

fn activate(click: &ClickFn, tree: &mut ControlTree, id: ControlId) {
    trace!("button {id:?} activated");
    match click.try_borrow_mut() {
        Ok(mut f) => (*f)(tree, id),
        Err(_) => warn!("click callback of {id:?} re-entered itself; skipped"),
    }
}
