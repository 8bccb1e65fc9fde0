use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::info;
use wisp_engine::logging::{init_logging, LoggingConfig};
use wisp_engine::time::TickClock;
use wisp_ui::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

type Container = LightweightContainer<HeadlessHost>;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    // Startup banner, printed before the script runs.
    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║          WISP STUDIO  v0.1             ║");
    println!("  ║   headless host  ·  scripted messages  ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    let mut ui = Container::new(HeadlessHost::new(), Viewport::new(320.0, 240.0), ContainerConfig::default());
    let clicks = Rc::new(Cell::new(0u32));
    let layout = build(&mut ui, &clicks)?;

    // ── pointer ───────────────────────────────────────────────────────────
    ui.window_proc(WindowMessage::MouseMove { pos: Vec2::new(20.0, 40.0) });
    ui.window_proc(WindowMessage::MouseMove { pos: Vec2::new(250.0, 40.0) });
    click(&mut ui, Vec2::new(250.0, 40.0));
    info!("open clicked {} time(s), focus on {:?}", clicks.get(), name_of(&ui, ui.tree().focused_control()));

    // ── keyboard ──────────────────────────────────────────────────────────
    ui.window_proc(WindowMessage::FocusEnter { backward: false });
    for _ in 0..3 {
        key(&mut ui, Key::Tab, Modifiers::default());
        info!("tab -> {:?}", focused_name(&ui));
    }
    for _ in 0..3 {
        key(&mut ui, Key::Tab, Modifiers::SHIFT);
    }
    key(&mut ui, Key::Space, Modifiers::default());
    info!("shift+tab x3, space: focus {:?}, clicks {}", focused_name(&ui), clicks.get());

    ui.window_proc(WindowMessage::FocusLeave);
    ui.window_proc(WindowMessage::FocusEnter { backward: false });
    info!("focus restored to {:?}", focused_name(&ui));

    // ── context menu ──────────────────────────────────────────────────────
    ui.window_proc(WindowMessage::ContextMenu { pos: Some(Vec2::new(40.0, 80.0)) });
    key(&mut ui, Key::F10, Modifiers::SHIFT);
    for (menu, at) in &ui.host().menus {
        info!("menu {:?} at {:?}", menu.items, at);
    }

    // ── drag and drop with auto-scroll ────────────────────────────────────
    let data = DragData::Text("report.txt".into());
    let allowed = DragEffects::ALL;
    let result = ui.window_proc(WindowMessage::DragEnter { pos: Vec2::new(60.0, 100.0), data: data.clone(), allowed });
    info!("drag enter over {:?}: {result:?}", name_of(&ui, ui.drag_target()));

    ui.window_proc(WindowMessage::DragOver { pos: Vec2::new(60.0, 236.0), data: data.clone(), allowed });
    info!("auto-scroll {:?}", ui.auto_scroll_mode());
    let mut clock = TickClock::new();
    let start = Instant::now();
    clock.tick_at(start);
    for frame in 1..=60 {
        let tick = clock.tick_at(start + FRAME * frame);
        for msg in ui.host_mut().advance_timers(tick.dt) {
            ui.window_proc(msg);
        }
    }
    info!("scrolled to {} of {} ({:?})", ui.scroll_offset(), ui.max_scroll(), ui.auto_scroll_mode());

    ui.window_proc(WindowMessage::DragOver { pos: Vec2::new(60.0, 120.0), data: data.clone(), allowed });
    let result = ui.window_proc(WindowMessage::DragDrop { pos: Vec2::new(60.0, 120.0), data, allowed });
    info!("dropped: {result:?}, auto-scroll {:?}", ui.auto_scroll_mode());

    // ── paint and resize ──────────────────────────────────────────────────
    ui.window_proc(WindowMessage::Resize { size: Viewport::new(320.0, 480.0) });
    ui.window_proc(WindowMessage::Paint { clip: Rect::new(0.0, 0.0, 320.0, 480.0) });
    let host = ui.host();
    info!(
        "{} frame(s) presented, last with {} draw items; {} invalidations",
        host.frames,
        host.last_frame.len(),
        host.invalidated.len()
    );

    let files = ui.tree().accessible_object(layout.files).context("file list vanished")?;
    info!("accessible: {} ({:?}) with {} rows", files.name, files.role, files.child_count);

    println!();
    println!("  Script complete. {} click(s) handled.", clicks.get());
    println!();
    Ok(())
}

struct Layout {
    files: ControlId,
}

fn build(ui: &mut Container, clicks: &Rc<Cell<u32>>) -> anyhow::Result<Layout> {
    let root = ui.root();
    ui.tree_mut()
        .set_context_menu(root, Some(ContextMenu::new().item("Refresh").item("Properties")))?;

    let title = Label::new("Downloads")
        .bounds(Rect::new(8.0, 4.0, 200.0, 20.0))
        .build(ui.tree_mut())?;
    ui.tree_mut().add(root, title)?;

    let n = Rc::clone(clicks);
    let open = PushButton::new("Open")
        .bounds(Rect::new(230.0, 28.0, 80.0, 24.0))
        .on_click(move |tree, id| {
            n.set(n.get() + 1);
            info!("{} clicked", tree.get(id).map_or("?", |c| c.name()));
        })
        .build(ui.tree_mut())?;
    let delete = PushButton::new("Delete")
        .bounds(Rect::new(230.0, 56.0, 80.0, 24.0))
        .build(ui.tree_mut())?;
    ui.tree_mut().add(root, open)?;
    ui.tree_mut().add(root, delete)?;

    let files = StackPanel::new("files")
        .origin(Vec2::new(8.0, 28.0))
        .width(200.0)
        .spacing(2.0)
        .padding(4.0)
        .build(ui.tree_mut())?;
    ui.tree_mut().set_allow_drop(files, true)?;
    ui.tree_mut()
        .set_context_menu(files, Some(ContextMenu::new().item("Open").item("Rename").item("Delete")))?;
    ui.tree_mut().subscribe(files, EventKind::DragOver, |_, _, args| {
        if let Some(drag) = args.drag_mut() {
            drag.effect = DragEffect::Copy;
        }
    })?;
    ui.tree_mut().subscribe(files, EventKind::DragDrop, |_, _, args| {
        if let Some(drag) = args.drag_mut() {
            info!("received {:?}", drag.data);
            drag.effect = DragEffect::Copy;
        }
    })?;
    {
        let mut tree = ui.tree_mut().layout_scope(files);
        for i in 0..30 {
            let row = Label::new(format!("file-{i:02}.dat"))
                .bounds(Rect::new(0.0, 0.0, 192.0, 18.0))
                .build(&mut tree)?;
            tree.add(files, row)?;
        }
    }
    ui.tree_mut().add(root, files)?;

    ui.host_mut().add_native(
        NativeHandle(1),
        NativeControlInfo {
            name: "search".into(),
            visible: true,
            enabled: true,
            focusable: true,
            bounds: Rect::new(230.0, 90.0, 80.0, 22.0),
        },
    );
    ui.register_focus_target(open);
    ui.register_focus_target(delete);
    ui.register_focus_target(NativeHandle(1));

    info!("built {} controls, content {} px tall", ui.tree().len(), ui.tree().content_extent());
    Ok(Layout { files })
}

fn click(ui: &mut Container, pos: Vec2) {
    ui.window_proc(WindowMessage::MouseDown { button: MouseButton::Left, pos, clicks: 1 });
    ui.window_proc(WindowMessage::MouseUp { button: MouseButton::Left, pos });
}

fn key(ui: &mut Container, key: Key, modifiers: Modifiers) {
    ui.window_proc(WindowMessage::KeyDown { key, modifiers });
    ui.window_proc(WindowMessage::KeyUp { key, modifiers });
}

fn focused_name(ui: &Container) -> String {
    match (ui.tree().focused_control(), ui.host().native_control_focused()) {
        (None, Some(handle)) => format!("native #{}", handle.0),
        (id, _) => name_of(ui, id),
    }
}

fn name_of(ui: &Container, id: Option<ControlId>) -> String {
    id.and_then(|id| ui.tree().get(id))
        .map_or_else(|| "nothing".to_string(), |n| n.name().to_string())
}
