//! Integration tests: free-form canvas placement through the session.
//!
//! Covers palette drops, moving and resizing placed items, selection, and
//! rollback of cancelled drags, driven both through the `on_*` callbacks
//! and through raw `InputEvent`s.

use ab_core::{
    BuilderConfig, ComponentKind, GridSettingsPatch, ItemId, Palette, Position, Rect, RowId, Size,
};
use ab_editor::{
    BuilderSession, ClickTarget, DragPayload, DragPhase, DropTarget, DropZone, InputEvent,
};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Canvas element as laid out by the page: offset by the palette column.
const CANVAS: Rect = Rect::new(288.0, 72.0, 1000.0, 1000.0);

fn session() -> BuilderSession {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = BuilderConfig::from_json(include_str!("fixtures/config.json")).unwrap();
    let mut session = BuilderSession::from_config(config, Palette::builtin()).unwrap();
    session.on_canvas_bounds(CANVAS);
    session
}

/// Client point for a canvas-relative point.
fn client(x: f32, y: f32) -> Position {
    Position::new(CANVAS.x + x, CANVAS.y + y)
}

fn place(session: &mut BuilderSession, kind: ComponentKind, x: f32, y: f32) -> ItemId {
    assert!(session.on_drag_start(DragPayload::Palette { kind }, Position::new(40.0, 300.0)));
    session.on_pointer_move(client(x, y));
    assert!(session.on_drop(DropTarget::Canvas {
        client: client(x, y)
    }));
    session.selected().unwrap()
}

fn position_of(session: &BuilderSession, id: ItemId) -> Position {
    session.canvas().item(id).unwrap().position
}

// ─── Placement ──────────────────────────────────────────────────────────

#[test]
fn palette_button_snaps_to_grid() {
    let mut session = session();
    let id = place(&mut session, ComponentKind::Button, 137.0, 52.0);
    assert_eq!(position_of(&session, id), Position::new(100.0, 80.0));
    assert_eq!(session.items().len(), 1);
    assert_eq!(session.selected(), Some(id));
}

#[test]
fn existing_item_moves_to_snapped_drop_point() {
    let mut session = session();
    let id = place(&mut session, ComponentKind::Text, 0.0, 0.0);

    session.on_drag_start(DragPayload::CanvasItem { item: id, origin: None }, client(10.0, 10.0));
    assert!(session.on_drop(DropTarget::Canvas {
        client: client(362.0, 250.0)
    }));
    assert_eq!(position_of(&session, id), Position::new(400.0, 240.0));
    assert_eq!(session.last_drag_outcome(), Some(DragPhase::Dropped));
}

#[test]
fn resize_snaps_width_down_and_height_up() {
    let mut session = session();
    let id = place(&mut session, ComponentKind::Container, 0.0, 0.0);
    assert!(session.on_size_change(id, Size::new(205.0, 58.0)));
    assert_eq!(session.canvas().item(id).unwrap().size, Size::new(200.0, 80.0));
}

// ─── Rollback ───────────────────────────────────────────────────────────

#[test]
fn cancelled_drag_restores_exact_position() {
    let mut session = session();
    let id = place(&mut session, ComponentKind::Image, 200.0, 160.0);
    // Position set from the property panel with snapping off stays off-grid.
    session.on_grid_settings_change(GridSettingsPatch {
        snap: Some(false),
        ..Default::default()
    });
    session.on_position_change(id, Position::new(213.0, 171.0));
    let start = position_of(&session, id);

    session.on_drag_start(DragPayload::CanvasItem { item: id, origin: None }, client(220.0, 180.0));
    session.on_pointer_move(client(500.0, 420.0));
    assert_eq!(position_of(&session, id), Position::new(500.0, 420.0), "item follows pointer");
    session.on_pointer_move(Position::new(5.0, 5.0));

    session.on_drag_end(false);
    assert_eq!(position_of(&session, id), start);
    assert_eq!(session.last_drag_outcome(), Some(DragPhase::Cancelled));

    // A repeated cancel is harmless.
    session.cancel_drag();
    session.on_drag_end(false);
    assert_eq!(position_of(&session, id), start);
}

#[test]
fn drop_off_canvas_rolls_back() {
    let mut session = session();
    let id = place(&mut session, ComponentKind::Chart, 300.0, 240.0);
    let start = position_of(&session, id);

    session.on_drag_start(DragPayload::CanvasItem { item: id, origin: None }, client(310.0, 250.0));
    session.on_pointer_move(client(700.0, 640.0));
    assert!(!session.on_drop(DropTarget::Canvas {
        client: Position::new(10.0, 10.0)
    }));
    assert_eq!(position_of(&session, id), start);
}

#[test]
fn unmounted_source_rolls_back() {
    let mut session = session();
    let id = place(&mut session, ComponentKind::Text, 100.0, 80.0);
    session.on_drag_start(DragPayload::CanvasItem { item: id, origin: None }, client(100.0, 80.0));
    session.on_pointer_move(client(600.0, 80.0));

    session.on_source_unmounted(id);
    assert!(!session.is_dragging());
    assert_eq!(position_of(&session, id), Position::new(100.0, 80.0));
}

// ─── Input routing ──────────────────────────────────────────────────────

#[test]
fn pointer_events_drive_a_palette_drop() {
    let mut session = session();
    session.on_drag_start(
        DragPayload::Palette {
            kind: ComponentKind::Button,
        },
        Position::new(40.0, 300.0),
    );
    session.handle(&InputEvent::from_pointer_move(CANVAS.x + 137.0, CANVAS.y + 52.0));
    assert_eq!(session.drop_preview(), Some(Rect::new(100.0, 80.0, 100.0, 80.0)));
    session.handle(&InputEvent::from_pointer_up(CANVAS.x + 137.0, CANVAS.y + 52.0));

    assert!(!session.is_dragging());
    let item = session.selected_item().unwrap();
    assert_eq!(item.position, Position::new(100.0, 80.0));
}

#[test]
fn cancel_event_rolls_back() {
    let mut session = session();
    let id = place(&mut session, ComponentKind::Button, 0.0, 0.0);
    session.on_drag_start(DragPayload::CanvasItem { item: id, origin: None }, client(0.0, 0.0));
    session.handle(&InputEvent::from_pointer_move(CANVAS.x + 420.0, CANVAS.y + 330.0));
    assert_eq!(position_of(&session, id), Position::new(400.0, 320.0));
    session.handle(&InputEvent::Cancel);
    assert_eq!(position_of(&session, id), Position::new(0.0, 0.0));
}

#[test]
fn canvas_item_release_ignores_row_slots() {
    let mut session = session();
    let id = place(&mut session, ComponentKind::Button, 0.0, 0.0);
    session.on_drag_start(DragPayload::CanvasItem { item: id, origin: None }, client(0.0, 0.0));
    // A row slot mounted elsewhere on the page.
    session.register_zone(DropZone::new(
        RowId::intern("canvas-side-row"),
        0,
        Rect::new(0.0, 1400.0, 20.0, 70.0),
    ));

    session.handle(&InputEvent::from_pointer_move(CANVAS.x + 420.0, CANVAS.y + 330.0));
    assert_eq!(session.nearest_zone(), None);
    session.handle(&InputEvent::from_pointer_up(CANVAS.x + 420.0, CANVAS.y + 330.0));

    assert_eq!(position_of(&session, id), Position::new(400.0, 320.0));
    assert_eq!(session.last_drag_outcome(), Some(DragPhase::Dropped));
}

#[test]
fn resize_gesture_through_pointer_events() {
    let mut session = session();
    let id = place(&mut session, ComponentKind::Button, 0.0, 0.0);
    // Button default size is 120x40; the handle sits at its corner.
    assert!(session.on_resize_start(id, client(120.0, 40.0)));
    session.handle(&InputEvent::from_pointer_move(CANVAS.x + 205.0, CANVAS.y + 60.0));
    assert_eq!(session.canvas().item(id).unwrap().size, Size::new(200.0, 80.0));
    session.handle(&InputEvent::from_pointer_up(CANVAS.x + 205.0, CANVAS.y + 60.0));
    assert!(!session.canvas().is_resizing());
}

// ─── Selection & editing ────────────────────────────────────────────────

#[test]
fn background_click_clears_selection() {
    let mut session = session();
    let a = place(&mut session, ComponentKind::Text, 0.0, 0.0);
    let b = place(&mut session, ComponentKind::Text, 300.0, 0.0);
    assert_eq!(session.selected(), Some(b));

    assert!(session.on_click(ClickTarget::Item(a)));
    assert_eq!(session.selected(), Some(a));
    assert!(session.on_click(ClickTarget::Background));
    assert_eq!(session.selected(), None);
}

#[test]
fn delete_and_edit_unknown_ids_are_noops() {
    let mut session = session();
    let id = place(&mut session, ComponentKind::Text, 0.0, 0.0);
    let ghost = ItemId::intern("canvas-ghost");

    assert!(!session.on_delete_item(ghost));
    assert!(!session.on_property_change(ghost, "content", json!("hi")));
    assert!(!session.on_position_change(ghost, Position::new(1.0, 1.0)));
    assert_eq!(session.items().len(), 1);

    assert!(session.on_property_change(id, "fontSize", json!("24")));
    assert_eq!(
        session.canvas().item(id).unwrap().properties["fontSize"],
        json!(24)
    );
    assert!(session.on_delete_item(id));
    assert_eq!(session.selected(), None);
}
