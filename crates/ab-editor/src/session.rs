//! Builder session: the single owner of all builder state.
//!
//! The presentation layer forwards gestures here (`on_*` callbacks) and
//! reads back rows, items, selection, the highlighted drop zone and the
//! drag-in-progress flag. Every state change goes through [`Mutation`] and
//! [`BuilderSession::apply`], which applies a mutation completely or not
//! at all.
//!
//! Engine errors never reach the caller as errors: callbacks log them and
//! report `false`, leaving prior state intact. Only configuration errors
//! surface, from [`BuilderSession::from_config`].

use crate::drag::{DragPayload, DragPhase, DragTracker, ItemOrigin};
use crate::input::{ClickTarget, InputEvent};
use crate::placement::Canvas;
use crate::registry::{DropZone, DropZoneRegistry, ZoneKey};
use crate::reorder::RowBoard;
use ab_core::{
    BuilderConfig, BuilderError, ComponentItem, ComponentKind, GridSettingsPatch, ItemId, Palette,
    Position, Rect, Result, RowId, RowItem, Size, coerce_property,
};

/// Default canvas rectangle until the presentation layer reports one.
const DEFAULT_CANVAS: Rect = Rect::new(0.0, 0.0, 1000.0, 1000.0);

/// A state change, applied atomically by [`BuilderSession::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Place a palette template on the canvas at a canvas-relative point.
    AddToCanvas { kind: ComponentKind, at: Position },
    MoveOnCanvas { id: ItemId, to: Position },
    /// Put a canvas item back exactly, bypassing the grid.
    RestorePosition { id: ItemId, position: Position },
    Resize { id: ItemId, size: Size },
    InsertIntoRow {
        row: RowId,
        slot: usize,
        kind: ComponentKind,
    },
    MoveInRows {
        from_row: RowId,
        from_index: usize,
        to_row: RowId,
        to_slot: usize,
    },
    /// Start the board with a first row holding a new item.
    CreateRow { kind: ComponentKind },
    MoveRow { from: usize, to: usize },
    Delete { id: ItemId },
    SetProperty {
        id: ItemId,
        key: String,
        value: serde_json::Value,
    },
    Select { id: Option<ItemId> },
    UpdateGrid(GridSettingsPatch),
}

/// Where a drag gesture was released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropTarget {
    /// A row slot, resolved by nearest-zone targeting.
    Slot,
    /// The free-form canvas, resolved by direct hit at this client point.
    Canvas { client: Position },
    /// The row board background.
    Board,
}

pub struct BuilderSession {
    config: BuilderConfig,
    palette: Palette,
    registry: DropZoneRegistry,
    tracker: DragTracker,
    board: RowBoard,
    canvas: Canvas,
    preview: Option<Rect>,
}

impl BuilderSession {
    /// Create a session with default configuration and the built-in palette.
    pub fn new() -> Self {
        Self::build(BuilderConfig::default(), Palette::builtin())
    }

    /// Create a session from a validated configuration.
    ///
    /// # Errors
    /// Fails fast on invalid geometry or id prefixes.
    pub fn from_config(config: BuilderConfig, palette: Palette) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, palette))
    }

    fn build(config: BuilderConfig, palette: Palette) -> Self {
        let canvas = Canvas::new(config.grid, config.min_dimension, DEFAULT_CANVAS)
            .with_id_prefix(config.item_id_prefix.clone());
        let board = RowBoard::new(config.reorder);
        Self {
            config,
            palette,
            registry: DropZoneRegistry::new(),
            tracker: DragTracker::new(),
            board,
            canvas,
            preview: None,
        }
    }

    /// Replace the row board, e.g. when loading a screen.
    pub fn load_rows(&mut self, rows: Vec<RowItem>) {
        self.board = RowBoard::from_rows(rows, self.config.reorder);
    }

    // ─── Views ───────────────────────────────────────────────────────────

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn rows(&self) -> &[RowItem] {
        self.board.rows()
    }

    pub fn board(&self) -> &RowBoard {
        &self.board
    }

    pub fn items(&self) -> &[ComponentItem] {
        self.canvas.items()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.canvas.selected()
    }

    pub fn selected_item(&self) -> Option<&ComponentItem> {
        self.canvas.selected_item()
    }

    /// Drop zone to highlight.
    pub fn nearest_zone(&self) -> Option<ZoneKey> {
        self.tracker.nearest()
    }

    pub fn is_dragging(&self) -> bool {
        self.tracker.is_dragging()
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.tracker.phase()
    }

    pub fn last_drag_outcome(&self) -> Option<DragPhase> {
        self.tracker.last_outcome()
    }

    /// Grid cell to highlight while a drag hovers the canvas.
    pub fn drop_preview(&self) -> Option<Rect> {
        self.preview
    }

    pub fn registry(&self) -> &DropZoneRegistry {
        &self.registry
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply one mutation. On `Err` nothing has changed.
    pub fn apply(&mut self, mutation: Mutation) -> Result<()> {
        match mutation {
            Mutation::AddToCanvas { kind, at } => {
                let template = self
                    .palette
                    .get(&kind)
                    .ok_or_else(|| BuilderError::not_found("palette template", &kind))?;
                self.canvas.add_item(template, at);
                Ok(())
            }
            Mutation::MoveOnCanvas { id, to } => self.canvas.move_item(id, to),
            Mutation::RestorePosition { id, position } => {
                self.canvas.restore_position(id, position)
            }
            Mutation::Resize { id, size } => self.canvas.resize_item(id, size),
            Mutation::InsertIntoRow { row, slot, kind } => {
                if self.board.row(row).is_none() {
                    return Err(BuilderError::not_found("row", row));
                }
                let item = self.new_row_item(kind);
                self.board.insert_item(row, slot, item)
            }
            Mutation::MoveInRows {
                from_row,
                from_index,
                to_row,
                to_slot,
            } => self.board.move_item(from_row, from_index, to_row, to_slot),
            Mutation::CreateRow { kind } => {
                let item = self.new_row_item(kind);
                let id = RowId::with_prefix(&self.config.row_id_prefix);
                self.board.push_row(id, item);
                Ok(())
            }
            Mutation::MoveRow { from, to } => self.board.move_row(from, to),
            Mutation::Delete { id } => {
                if self.canvas.item(id).is_some() {
                    self.canvas.delete_item(id).map(drop)
                } else {
                    self.board.remove_item(id).map(drop)
                }
            }
            Mutation::SetProperty { id, key, value } => {
                if self.canvas.item(id).is_some() {
                    return self.canvas.set_property(id, &key, value);
                }
                let item = self
                    .board
                    .item_mut(id)
                    .ok_or_else(|| BuilderError::not_found("item", id))?;
                let value = coerce_property(&item.kind, &key, value)
                    .ok_or_else(|| BuilderError::InvalidProperty { key: key.clone() })?;
                item.properties.insert(key, value);
                Ok(())
            }
            Mutation::Select { id } => self.canvas.select(id),
            Mutation::UpdateGrid(patch) => {
                self.canvas.update_grid(patch)?;
                self.config.grid = self.canvas.grid();
                Ok(())
            }
        }
    }

    /// Apply a mutation on the UI's behalf: errors become a logged no-op.
    fn commit(&mut self, mutation: Mutation) -> bool {
        match self.apply(mutation) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("mutation ignored: {err}");
                false
            }
        }
    }

    /// A new row-board item from its palette template, or a bare item
    /// labelled after its kind when there is no template.
    fn new_row_item(&self, kind: ComponentKind) -> ComponentItem {
        let id = ItemId::with_prefix(&self.config.item_id_prefix);
        match self.palette.get(&kind) {
            Some(template) => ComponentItem {
                id,
                kind,
                name: template.name.clone(),
                icon: template.icon.clone(),
                properties: template.default_properties.clone(),
                position: Position::default(),
                size: template.default_size,
            },
            None => {
                let name = format!("Item {kind}");
                ComponentItem::new(id, kind, name)
            }
        }
    }

    // ─── Drop zones ──────────────────────────────────────────────────────

    pub fn register_zone(&mut self, zone: DropZone) {
        self.registry.register(zone);
    }

    pub fn unregister_zone(&mut self, row: RowId, slot: usize) {
        self.registry.unregister(row, slot);
    }

    pub fn unregister_row_zones(&mut self, row: RowId) {
        self.registry.unregister_row(row);
    }

    // ─── Drag gestures ───────────────────────────────────────────────────

    /// A drag started at client `offset`. Returns `false` if ignored.
    pub fn on_drag_start(&mut self, payload: DragPayload, offset: Position) -> bool {
        let origin = match &payload {
            DragPayload::CanvasItem { item, origin: None } => match self.canvas.item(*item) {
                Some(placed) => Some(placed.position),
                None => {
                    log::warn!("drag start for unknown canvas item {item}");
                    return false;
                }
            },
            DragPayload::CanvasItem {
                item,
                origin: Some(origin),
            } => {
                if self.board.locate(*item) != Some((origin.row, origin.index)) {
                    log::warn!("drag start for {item} with stale origin {origin:?}");
                    return false;
                }
                None
            }
            DragPayload::Row { row, index } => {
                if self.board.rows().get(*index).map(|r| r.id) != Some(*row) {
                    log::warn!("drag start for row {row} with stale index {index}");
                    return false;
                }
                None
            }
            DragPayload::Palette { .. } => None,
        };
        let started = self.tracker.begin(payload, offset, origin);
        if started {
            self.update_preview(offset);
        }
        started
    }

    /// The pointer moved during a drag. Returns the zone to highlight.
    ///
    /// A free-form canvas item follows the pointer while it is over the
    /// canvas.
    pub fn on_pointer_move(&mut self, offset: Position) -> Option<ZoneKey> {
        if !self.tracker.is_dragging() {
            return None;
        }
        let nearest = self.tracker.update(offset, &self.registry);
        self.update_preview(offset);

        if let Some(DragPayload::CanvasItem { item, origin: None }) = self.tracker.payload()
            && self.canvas.contains_client(offset)
        {
            let id = *item;
            let to = self.canvas.to_canvas(offset);
            self.commit(Mutation::MoveOnCanvas { id, to });
        }
        nearest
    }

    fn update_preview(&mut self, offset: Position) {
        self.preview = match self.tracker.payload() {
            Some(DragPayload::Palette { .. } | DragPayload::CanvasItem { origin: None, .. }) => {
                self.canvas.drop_preview(offset)
            }
            _ => None,
        };
    }

    /// The dragged row item hovers item `index` of `row`: reorder live.
    pub fn on_hover_item(&mut self, row: RowId, index: usize) -> bool {
        let Some(DragPayload::CanvasItem {
            origin: Some(ItemOrigin {
                row: drag_row,
                index: drag_index,
            }),
            ..
        }) = self.tracker.payload().cloned()
        else {
            return false;
        };
        match self.board.hover_item(drag_row, drag_index, row, index) {
            Ok(Some((new_row, new_index))) => {
                self.tracker.retarget_item(new_row, new_index);
                true
            }
            Ok(None) => false,
            Err(err) => {
                log::warn!("hover reorder ignored: {err}");
                false
            }
        }
    }

    /// The dragged row hovers row `index`: reorder live.
    pub fn on_hover_row(&mut self, index: usize) -> bool {
        let Some(DragPayload::Row {
            index: drag_index, ..
        }) = self.tracker.payload().cloned()
        else {
            return false;
        };
        match self.board.hover_row(drag_index, index) {
            Ok(Some(new_index)) => {
                self.tracker.retarget_row(new_index);
                true
            }
            Ok(None) => false,
            Err(err) => {
                log::warn!("row hover ignored: {err}");
                false
            }
        }
    }

    /// Translate a drop into the mutation it commits, if any.
    fn resolve_drop(&self, payload: &DragPayload, target: DropTarget) -> Result<Option<Mutation>> {
        match target {
            DropTarget::Slot => {
                let key = self.tracker.validated_target(&self.registry)?;
                match payload {
                    DragPayload::Palette { kind } => Ok(Some(Mutation::InsertIntoRow {
                        row: key.row,
                        slot: key.slot,
                        kind: kind.clone(),
                    })),
                    DragPayload::CanvasItem {
                        origin: Some(origin),
                        ..
                    } => Ok(Some(Mutation::MoveInRows {
                        from_row: origin.row,
                        from_index: origin.index,
                        to_row: key.row,
                        to_slot: key.slot,
                    })),
                    DragPayload::CanvasItem { item, origin: None } => {
                        Err(BuilderError::not_found("row item", item))
                    }
                    DragPayload::Row { row, .. } => {
                        Err(BuilderError::not_found("slot for row", row))
                    }
                }
            }
            DropTarget::Canvas { client } => {
                if !self.canvas.contains_client(client) {
                    return Err(BuilderError::not_found(
                        "drop target",
                        format!("({}, {})", client.x, client.y),
                    ));
                }
                let at = self.canvas.to_canvas(client);
                match payload {
                    DragPayload::Palette { kind } => Ok(Some(Mutation::AddToCanvas {
                        kind: kind.clone(),
                        at,
                    })),
                    DragPayload::CanvasItem { item, origin: None } => {
                        Ok(Some(Mutation::MoveOnCanvas { id: *item, to: at }))
                    }
                    DragPayload::CanvasItem { item, .. } => {
                        Err(BuilderError::not_found("canvas item", item))
                    }
                    DragPayload::Row { row, .. } => Err(BuilderError::not_found("canvas row", row)),
                }
            }
            DropTarget::Board => match payload {
                // Rows were already reordered while hovering.
                DragPayload::Row { .. } => Ok(None),
                DragPayload::Palette { kind } if self.board.is_empty() => {
                    Ok(Some(Mutation::CreateRow { kind: kind.clone() }))
                }
                _ => Err(BuilderError::not_found("drop target", "board")),
            },
        }
    }

    /// The gesture ended over `target`. Returns `true` if the drop
    /// committed; otherwise the drag is cancelled and rolled back.
    pub fn on_drop(&mut self, target: DropTarget) -> bool {
        let Some(payload) = self.tracker.payload().cloned() else {
            return false;
        };
        let committed = match self.resolve_drop(&payload, target) {
            Ok(Some(mutation)) => self.commit(mutation),
            Ok(None) => true,
            Err(err) => {
                log::warn!("drop of {payload:?} on {target:?} ignored: {err}");
                false
            }
        };
        if committed {
            self.tracker.finish_drop();
            self.end_gesture();
        } else {
            self.cancel_drag();
        }
        committed
    }

    /// The drag source reported the end of the gesture. A gesture that was
    /// not committed is rolled back; calling this after `on_drop` is a no-op.
    pub fn on_drag_end(&mut self, committed: bool) {
        if !self.tracker.is_dragging() {
            return;
        }
        if committed {
            self.tracker.finish_drop();
            self.end_gesture();
        } else {
            self.cancel_drag();
        }
    }

    /// Cancel the gesture in flight and restore a moved canvas item.
    /// Idempotent.
    pub fn cancel_drag(&mut self) {
        if let Some(rollback) = self.tracker.cancel() {
            self.commit(Mutation::RestorePosition {
                id: rollback.item,
                position: rollback.position,
            });
        }
        self.end_gesture();
    }

    /// The draggable for `item` unmounted mid-drag.
    pub fn on_source_unmounted(&mut self, item: ItemId) {
        if let Some(rollback) = self.tracker.source_unmounted(item) {
            self.commit(Mutation::RestorePosition {
                id: rollback.item,
                position: rollback.position,
            });
            self.end_gesture();
        }
    }

    fn end_gesture(&mut self) {
        self.registry.clear();
        self.preview = None;
    }

    /// Route a raw pointer event. Releases resolve their drop target in
    /// order: nearest slot, canvas under the pointer, empty board.
    pub fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerMove { x, y } => {
                let p = Position::new(x, y);
                if self.canvas.is_resizing() {
                    self.on_resize_move(p);
                } else {
                    self.on_pointer_move(p);
                }
            }
            InputEvent::PointerUp { x, y } => {
                if self.canvas.is_resizing() {
                    self.on_resize_end();
                    return;
                }
                if !self.tracker.is_dragging() {
                    return;
                }
                let client = Position::new(x, y);
                let target = if self.tracker.nearest().is_some() {
                    DropTarget::Slot
                } else if self.canvas.contains_client(client) {
                    DropTarget::Canvas { client }
                } else {
                    DropTarget::Board
                };
                self.on_drop(target);
            }
            InputEvent::Cancel => {
                self.on_resize_end();
                self.cancel_drag();
            }
            InputEvent::PointerDown { .. } => {}
        }
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    pub fn on_click(&mut self, target: ClickTarget) -> bool {
        let id = match target {
            ClickTarget::Background => None,
            ClickTarget::Item(id) => Some(id),
        };
        self.commit(Mutation::Select { id })
    }

    pub fn on_delete_item(&mut self, id: ItemId) -> bool {
        self.on_source_unmounted(id);
        self.commit(Mutation::Delete { id })
    }

    pub fn on_property_change(&mut self, id: ItemId, key: &str, value: serde_json::Value) -> bool {
        self.commit(Mutation::SetProperty {
            id,
            key: key.to_string(),
            value,
        })
    }

    /// Position typed into the property panel (canvas-relative).
    pub fn on_position_change(&mut self, id: ItemId, position: Position) -> bool {
        self.commit(Mutation::MoveOnCanvas { id, to: position })
    }

    /// Size typed into the property panel.
    pub fn on_size_change(&mut self, id: ItemId, size: Size) -> bool {
        self.commit(Mutation::Resize { id, size })
    }

    pub fn on_grid_settings_change(&mut self, patch: GridSettingsPatch) -> bool {
        self.commit(Mutation::UpdateGrid(patch))
    }

    /// The canvas element moved or resized in the viewport.
    pub fn on_canvas_bounds(&mut self, bounds: Rect) {
        self.canvas.set_bounds(bounds);
    }

    pub fn on_resize_start(&mut self, id: ItemId, pointer: Position) -> bool {
        match self.canvas.begin_resize(id, pointer) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("resize start ignored: {err}");
                false
            }
        }
    }

    pub fn on_resize_move(&mut self, pointer: Position) -> Option<Size> {
        match self.canvas.resize_to(pointer) {
            Ok(size) => size,
            Err(err) => {
                log::warn!("resize ignored: {err}");
                self.canvas.end_resize();
                None
            }
        }
    }

    pub fn on_resize_end(&mut self) {
        self.canvas.end_resize();
    }
}

impl Default for BuilderSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn button() -> DragPayload {
        DragPayload::Palette {
            kind: ComponentKind::Button,
        }
    }

    #[test]
    fn palette_drop_on_canvas_snaps() {
        let mut session = BuilderSession::new();
        assert!(session.on_drag_start(button(), Position::new(10.0, 10.0)));
        session.on_pointer_move(Position::new(137.0, 52.0));
        assert_eq!(session.drop_preview(), Some(Rect::new(100.0, 80.0, 100.0, 80.0)));
        assert!(session.on_drop(DropTarget::Canvas {
            client: Position::new(137.0, 52.0)
        }));

        let item = session.selected_item().unwrap();
        assert_eq!(item.kind, ComponentKind::Button);
        assert_eq!(item.position, Position::new(100.0, 80.0));
        assert!(!session.is_dragging());
        assert_eq!(session.drop_preview(), None);
    }

    #[test]
    fn drop_outside_canvas_cancels() {
        let mut session = BuilderSession::new();
        session.on_canvas_bounds(Rect::new(300.0, 0.0, 1000.0, 1000.0));
        session.on_drag_start(button(), Position::new(10.0, 10.0));
        assert!(!session.on_drop(DropTarget::Canvas {
            client: Position::new(10.0, 10.0)
        }));
        assert!(session.items().is_empty());
        assert_eq!(session.last_drag_outcome(), Some(DragPhase::Cancelled));
    }

    #[test]
    fn delete_during_drag_cancels_it() {
        let mut session = BuilderSession::new();
        session.on_drag_start(button(), Position::default());
        session.on_drop(DropTarget::Canvas {
            client: Position::new(0.0, 0.0),
        });
        let id = session.selected().unwrap();

        session.on_drag_start(
            DragPayload::CanvasItem { item: id, origin: None },
            Position::new(10.0, 10.0),
        );
        assert!(session.on_delete_item(id));
        assert!(!session.is_dragging());
        assert_eq!(session.selected(), None);
        assert!(session.items().is_empty());
    }

    #[test]
    fn unknown_palette_kind_is_ignored() {
        let mut session = BuilderSession::new();
        session.on_drag_start(
            DragPayload::Palette {
                kind: ComponentKind::Other("map".into()),
            },
            Position::default(),
        );
        assert!(!session.on_drop(DropTarget::Canvas {
            client: Position::new(50.0, 50.0)
        }));
        assert!(session.items().is_empty());
    }

    #[test]
    fn grid_patch_updates_config() {
        let mut session = BuilderSession::new();
        assert!(session.on_grid_settings_change(GridSettingsPatch {
            show: Some(false),
            ..Default::default()
        }));
        assert!(!session.config().grid.show);
        assert!(!session.on_grid_settings_change(GridSettingsPatch {
            size: Some(ab_core::GridSize { x: -1.0, y: 1.0 }),
            ..Default::default()
        }));
        assert_eq!(session.config().grid.size, ab_core::GridSize::default());
    }

    #[test]
    fn property_change_on_row_item() {
        let mut session = BuilderSession::new();
        session.on_drag_start(
            DragPayload::Palette {
                kind: ComponentKind::Chart,
            },
            Position::default(),
        );
        assert!(session.on_drop(DropTarget::Board));
        let id = session.rows()[0].items[0].id;

        assert!(session.on_property_change(id, "chartType", json!("line")));
        assert!(!session.on_property_change(id, "chartType", json!("radar")));
        assert_eq!(
            session.board().item(id).unwrap().properties["chartType"],
            json!("line")
        );
    }

    #[test]
    fn failed_commit_leaves_state_unchanged() {
        let mut session = BuilderSession::new();
        session.on_drag_start(button(), Position::default());
        session.on_drop(DropTarget::Canvas {
            client: Position::new(0.0, 0.0),
        });
        let before = session.items().to_vec();

        let ghost = ItemId::intern("session-ghost");
        assert!(!session.commit(Mutation::MoveOnCanvas {
            id: ghost,
            to: Position::new(300.0, 300.0),
        }));
        assert!(!session.commit(Mutation::Resize {
            id: ghost,
            size: Size::new(10.0, 10.0),
        }));
        assert_eq!(session.items(), before.as_slice());
    }

    #[test]
    fn row_item_without_template_gets_kind_label() {
        let mut session = BuilderSession::new();
        session.on_drag_start(
            DragPayload::Palette {
                kind: ComponentKind::Other("signature".into()),
            },
            Position::default(),
        );
        assert!(session.on_drop(DropTarget::Board));
        assert_eq!(session.rows()[0].items[0].name, "Item signature");
    }
}
