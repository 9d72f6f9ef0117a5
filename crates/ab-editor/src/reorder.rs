//! Reorder engine for the row board.
//!
//! Moves lift an item out of its source sequence and splice it back in at
//! the destination. Indices past the end are clamped to "append". How a
//! forward move inside one sequence is interpreted is decided by
//! [`ReorderPolicy`]; the board applies one policy to items and rows alike.
//!
//! Every operation either succeeds completely or returns `Err` with the
//! board untouched.

use ab_core::{BuilderError, ComponentItem, ItemId, ReorderPolicy, Result, RowId, RowItem};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowBoard {
    rows: Vec<RowItem>,
    #[serde(skip)]
    policy: ReorderPolicy,
}

impl RowBoard {
    pub fn new(policy: ReorderPolicy) -> Self {
        Self {
            rows: Vec::new(),
            policy,
        }
    }

    pub fn from_rows(rows: Vec<RowItem>, policy: ReorderPolicy) -> Self {
        Self { rows, policy }
    }

    pub fn policy(&self) -> ReorderPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ReorderPolicy) {
        self.policy = policy;
    }

    pub fn rows(&self) -> &[RowItem] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&RowItem> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row_index(&self, id: RowId) -> Result<usize> {
        self.rows
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| BuilderError::not_found("row", id))
    }

    // ─── Item moves ──────────────────────────────────────────────────────

    /// Move the item at `from_index` of `from_row` to slot `to_slot` of
    /// `to_row`.
    ///
    /// # Errors
    /// `NotFound` if either row is missing or `from_index` is out of range.
    pub fn move_item(
        &mut self,
        from_row: RowId,
        from_index: usize,
        to_row: RowId,
        to_slot: usize,
    ) -> Result<()> {
        let from = self.row_index(from_row)?;
        let to = self.row_index(to_row)?;
        if from_index >= self.rows[from].items.len() {
            return Err(BuilderError::not_found(
                "item index",
                format!("{from_row}[{from_index}]"),
            ));
        }

        if from == to {
            let at = self.policy.insertion_index(from_index, to_slot);
            let items = &mut self.rows[from].items;
            let item = items.remove(from_index);
            let at = at.min(items.len());
            items.insert(at, item);
        } else {
            let item = self.rows[from].items.remove(from_index);
            let items = &mut self.rows[to].items;
            let at = to_slot.min(items.len());
            items.insert(at, item);
        }
        log::debug!("move item {from_row}[{from_index}] -> {to_row} slot {to_slot}");
        Ok(())
    }

    /// Live reorder while the dragged item hovers another item: the dragged
    /// item ends up at `hover_index` of `hover_row`.
    ///
    /// Returns the item's new coordinates, or `None` if it is already there.
    pub fn hover_item(
        &mut self,
        drag_row: RowId,
        drag_index: usize,
        hover_row: RowId,
        hover_index: usize,
    ) -> Result<Option<(RowId, usize)>> {
        if drag_row == hover_row && drag_index == hover_index {
            return Ok(None);
        }
        let id = self
            .row(drag_row)
            .and_then(|r| r.items.get(drag_index))
            .map(|i| i.id)
            .ok_or_else(|| {
                BuilderError::not_found("item index", format!("{drag_row}[{drag_index}]"))
            })?;
        let slot = match self.policy {
            ReorderPolicy::Slot if drag_row == hover_row && drag_index < hover_index => {
                hover_index.saturating_add(1)
            }
            _ => hover_index,
        };
        self.move_item(drag_row, drag_index, hover_row, slot)?;
        log::trace!("hover reorder {id} -> {hover_row}[{hover_index}]");
        Ok(self.locate(id))
    }

    /// Insert a new item at `slot` of `row`.
    pub fn insert_item(&mut self, row: RowId, slot: usize, item: ComponentItem) -> Result<()> {
        let idx = self.row_index(row)?;
        let items = &mut self.rows[idx].items;
        let at = slot.min(items.len());
        log::debug!("insert {} into {row} at {at}", item.id);
        items.insert(at, item);
        Ok(())
    }

    /// Append a new row holding a single item.
    pub fn push_row(&mut self, id: RowId, item: ComponentItem) -> RowId {
        log::debug!("new row {id} with {}", item.id);
        self.rows.push(RowItem::with_items(id, vec![item]));
        id
    }

    pub fn remove_item(&mut self, id: ItemId) -> Result<ComponentItem> {
        let (row, index) = self
            .locate(id)
            .ok_or_else(|| BuilderError::not_found("item", id))?;
        let idx = self.row_index(row)?;
        Ok(self.rows[idx].items.remove(index))
    }

    pub fn remove_row(&mut self, id: RowId) -> Result<RowItem> {
        let idx = self.row_index(id)?;
        Ok(self.rows.remove(idx))
    }

    // ─── Row moves ───────────────────────────────────────────────────────

    /// Move the row at `from` to slot `to` of the row sequence.
    ///
    /// # Errors
    /// `NotFound` if `from` is out of range.
    pub fn move_row(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= self.rows.len() {
            return Err(BuilderError::not_found("row index", from));
        }
        let at = self.policy.insertion_index(from, to);
        let row = self.rows.remove(from);
        let at = at.min(self.rows.len());
        self.rows.insert(at, row);
        log::debug!("move row {from} -> slot {to}");
        Ok(())
    }

    /// Live reorder while a dragged row hovers another row. Returns the
    /// row's new index, or `None` if it is already there.
    pub fn hover_row(&mut self, drag_index: usize, hover_index: usize) -> Result<Option<usize>> {
        if drag_index == hover_index {
            return Ok(None);
        }
        let slot = match self.policy {
            ReorderPolicy::Slot if drag_index < hover_index => hover_index.saturating_add(1),
            _ => hover_index,
        };
        let id = self
            .rows
            .get(drag_index)
            .map(|r| r.id)
            .ok_or_else(|| BuilderError::not_found("row index", drag_index))?;
        self.move_row(drag_index, slot)?;
        Ok(self.rows.iter().position(|r| r.id == id))
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Row and index of an item.
    pub fn locate(&self, id: ItemId) -> Option<(RowId, usize)> {
        self.rows
            .iter()
            .find_map(|r| r.position_of(id).map(|i| (r.id, i)))
    }

    pub fn item(&self, id: ItemId) -> Option<&ComponentItem> {
        self.rows.iter().flat_map(|r| r.items.iter()).find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut ComponentItem> {
        self.rows
            .iter_mut()
            .flat_map(|r| r.items.iter_mut())
            .find(|i| i.id == id)
    }

    pub fn item_count(&self) -> usize {
        self.rows.iter().map(RowItem::len).sum()
    }

    /// All item ids, row by row.
    pub fn ids(&self) -> Vec<ItemId> {
        self.rows
            .iter()
            .flat_map(|r| r.items.iter().map(|i| i.id))
            .collect()
    }
}
