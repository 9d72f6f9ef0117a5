//! Canvas placement engine for free-form screens.
//!
//! Converts client pointer coordinates into canvas-relative, grid-snapped
//! positions and owns the placed items, the selection, and any resize
//! gesture in progress. At most one item is selected at a time.

use crate::hit::hit_test;
use crate::input::ClickTarget;
use ab_core::{
    BuilderError, ComponentItem, GridSettings, GridSettingsPatch, ItemId, PaletteItem, Position,
    Rect, Result, Size, coerce_property,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeGesture {
    item: ItemId,
    start_size: Size,
    start_pointer: Position,
}

#[derive(Debug, Clone)]
pub struct Canvas {
    items: Vec<ComponentItem>,
    selected: Option<ItemId>,
    grid: GridSettings,
    min_dimension: f32,
    /// Canvas rectangle in client coordinates.
    bounds: Rect,
    id_prefix: String,
    resize: Option<ResizeGesture>,
}

impl Canvas {
    pub fn new(grid: GridSettings, min_dimension: f32, bounds: Rect) -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            grid,
            min_dimension,
            bounds,
            id_prefix: "item".to_string(),
            resize: None,
        }
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn items(&self) -> &[ComponentItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&ComponentItem> {
        self.items.iter().find(|i| i.id == id)
    }

    fn item_mut(&mut self, id: ItemId) -> Result<&mut ComponentItem> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| BuilderError::not_found("item", id))
    }

    pub fn grid(&self) -> GridSettings {
        self.grid
    }

    pub fn update_grid(&mut self, patch: GridSettingsPatch) -> Result<()> {
        self.grid.apply(patch)
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The canvas moved or was resized in the viewport.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    // ─── Coordinates ─────────────────────────────────────────────────────

    /// Client coordinates → canvas-relative coordinates.
    pub fn to_canvas(&self, client: Position) -> Position {
        Position::new(client.x - self.bounds.x, client.y - self.bounds.y)
    }

    /// Direct-hit test for drops: is the pointer over the canvas?
    pub fn contains_client(&self, client: Position) -> bool {
        self.bounds.contains(client.x, client.y)
    }

    /// Grid cell highlighted while a drag hovers the canvas.
    pub fn drop_preview(&self, client: Position) -> Option<Rect> {
        if !self.contains_client(client) {
            return None;
        }
        Some(self.grid.cell_at(self.to_canvas(client)))
    }

    /// Topmost item under a client position.
    pub fn item_at(&self, client: Position) -> Option<ItemId> {
        let p = self.to_canvas(client);
        hit_test(&self.items, p.x, p.y)
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Place a new item from a palette template at a canvas-relative
    /// position, and select it.
    pub fn add_item(&mut self, template: &PaletteItem, raw: Position) -> ItemId {
        let id = ItemId::with_prefix(&self.id_prefix);
        let position = self.grid.snap_position(raw);
        self.items.push(ComponentItem {
            id,
            kind: template.kind.clone(),
            name: template.name.clone(),
            icon: template.icon.clone(),
            properties: template.default_properties.clone(),
            position,
            size: template.default_size,
        });
        self.selected = Some(id);
        log::debug!("add {id} ({}) at ({}, {})", template.kind, position.x, position.y);
        id
    }

    /// Move an item to a canvas-relative position, snapped to the grid.
    pub fn move_item(&mut self, id: ItemId, raw: Position) -> Result<()> {
        let position = self.grid.snap_position(raw);
        self.item_mut(id)?.position = position;
        log::debug!("move {id} to ({}, {})", position.x, position.y);
        Ok(())
    }

    /// Put an item back exactly where it was, bypassing the grid.
    pub fn restore_position(&mut self, id: ItemId, position: Position) -> Result<()> {
        self.item_mut(id)?.position = position;
        Ok(())
    }

    /// Resize an item, snapped to the grid and floored at the minimum.
    pub fn resize_item(&mut self, id: ItemId, raw: Size) -> Result<()> {
        let size = self.grid.snap_size(raw, self.min_dimension);
        self.item_mut(id)?.size = size;
        log::debug!("resize {id} to {}x{}", size.width, size.height);
        Ok(())
    }

    pub fn begin_resize(&mut self, id: ItemId, pointer: Position) -> Result<()> {
        let start_size = self
            .item(id)
            .map(|i| i.size)
            .ok_or_else(|| BuilderError::not_found("item", id))?;
        self.resize = Some(ResizeGesture {
            item: id,
            start_size,
            start_pointer: pointer,
        });
        Ok(())
    }

    /// Apply the pointer delta since `begin_resize`. Returns the new size,
    /// or `None` when no resize is in progress.
    pub fn resize_to(&mut self, pointer: Position) -> Result<Option<Size>> {
        let Some(gesture) = self.resize else {
            return Ok(None);
        };
        let raw = Size::new(
            gesture.start_size.width + (pointer.x - gesture.start_pointer.x),
            gesture.start_size.height + (pointer.y - gesture.start_pointer.y),
        );
        self.resize_item(gesture.item, raw)?;
        Ok(self.item(gesture.item).map(|i| i.size))
    }

    pub fn end_resize(&mut self) {
        self.resize = None;
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Set one property, normalized by the kind's editor schema.
    pub fn set_property(&mut self, id: ItemId, key: &str, value: serde_json::Value) -> Result<()> {
        let item = self.item_mut(id)?;
        let value = coerce_property(&item.kind, key, value).ok_or_else(|| {
            BuilderError::InvalidProperty {
                key: key.to_string(),
            }
        })?;
        item.properties.insert(key.to_string(), value);
        Ok(())
    }

    pub fn delete_item(&mut self, id: ItemId) -> Result<ComponentItem> {
        let idx = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| BuilderError::not_found("item", id))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.resize.is_some_and(|g| g.item == id) {
            self.resize = None;
        }
        log::debug!("delete {id}");
        Ok(self.items.remove(idx))
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&ComponentItem> {
        self.selected.and_then(|id| self.item(id))
    }

    /// Select an item (replacing any previous selection) or clear it.
    pub fn select(&mut self, id: Option<ItemId>) -> Result<()> {
        if let Some(id) = id
            && self.item(id).is_none()
        {
            return Err(BuilderError::not_found("item", id));
        }
        self.selected = id;
        Ok(())
    }

    pub fn click(&mut self, target: ClickTarget) -> Result<()> {
        match target {
            ClickTarget::Background => self.select(None),
            ClickTarget::Item(id) => self.select(Some(id)),
        }
    }
}
