//! Drag session tracking.
//!
//! One gesture at a time moves through `Idle → Dragging → {Dropped,
//! Cancelled} → Idle`. While dragging, every pointer update recomputes the
//! nearest registered drop zone. Cancelling a drag of an existing canvas
//! item hands back its pre-drag position so the caller can roll it back.
//!
//! ## Targeting
//!
//! | Drop target      | Policy       | Resolved by                    |
//! |------------------|--------------|--------------------------------|
//! | Row slot         | Nearest zone | [`DragTracker::validated_target`] |
//! | Free-form canvas | Direct hit   | pointer inside the canvas rect |

use crate::registry::{DropZone, DropZoneRegistry, ZoneKey};
use ab_core::{BuilderError, ComponentKind, ItemId, Position, Result, RowId};

/// Where a row-board item sat when the drag (or the last hover move) began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemOrigin {
    pub row: RowId,
    pub index: usize,
}

/// What is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPayload {
    /// A new component from the palette.
    Palette { kind: ComponentKind },
    /// An item already placed. `origin` is set for row-board items.
    CanvasItem {
        item: ItemId,
        origin: Option<ItemOrigin>,
    },
    /// A whole row, dragged by its handle.
    Row { row: RowId, index: usize },
}

impl DragPayload {
    /// Whether this payload can land in a row slot. Free-form canvas items
    /// only ever land on the canvas.
    pub fn targets_slots(&self) -> bool {
        match self {
            Self::Palette { .. } | Self::CanvasItem { origin: Some(_), .. } => true,
            Self::CanvasItem { origin: None, .. } | Self::Row { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    Dropped,
    Cancelled,
}

/// Position to restore after a cancelled move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rollback {
    pub item: ItemId,
    pub position: Position,
}

/// Choose the zone whose center is closest to `pointer`.
///
/// Ties keep the first zone in registry order.
pub fn nearest_zone(zones: &[DropZone], pointer: Position) -> Option<ZoneKey> {
    let mut best: Option<(ZoneKey, f32)> = None;
    for zone in zones {
        let d = pointer.distance(zone.rect.center());
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((zone.key(), d)),
        }
    }
    best.map(|(key, _)| key)
}

#[derive(Debug, Default)]
pub struct DragTracker {
    phase: DragPhase,
    last_outcome: Option<DragPhase>,
    payload: Option<DragPayload>,
    offset: Position,
    nearest: Option<ZoneKey>,
    /// Pre-drag position of a dragged canvas item.
    origin_position: Option<Position>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a gesture. Returns `false` and keeps the current gesture if
    /// one is already in flight.
    pub fn begin(
        &mut self,
        payload: DragPayload,
        offset: Position,
        origin_position: Option<Position>,
    ) -> bool {
        if self.phase == DragPhase::Dragging {
            log::warn!("drag start ignored: a drag is already in progress");
            return false;
        }
        log::trace!("drag start {payload:?} at ({}, {})", offset.x, offset.y);
        self.phase = DragPhase::Dragging;
        self.origin_position = match payload {
            DragPayload::CanvasItem { .. } => origin_position,
            _ => None,
        };
        self.payload = Some(payload);
        self.offset = offset;
        self.nearest = None;
        true
    }

    /// Record a pointer move and recompute the nearest zone.
    pub fn update(&mut self, offset: Position, registry: &DropZoneRegistry) -> Option<ZoneKey> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        self.offset = offset;
        let targets_slots = self
            .payload
            .as_ref()
            .is_some_and(DragPayload::targets_slots);
        let nearest = if targets_slots {
            nearest_zone(registry.query_all(), offset)
        } else {
            None
        };
        if nearest != self.nearest {
            log::trace!("nearest zone -> {nearest:?}");
        }
        self.nearest = nearest;
        nearest
    }

    /// Re-check the last nearest zone against the live registry.
    ///
    /// # Errors
    /// `StaleDropZone` if it was unregistered since it was computed,
    /// `NotFound` if no zone was ever in reach.
    pub fn validated_target(&self, registry: &DropZoneRegistry) -> Result<ZoneKey> {
        let key = self
            .nearest
            .ok_or_else(|| BuilderError::not_found("drop zone", "<none>"))?;
        if registry.contains(key) {
            Ok(key)
        } else {
            Err(BuilderError::StaleDropZone {
                row: key.row.to_string(),
                slot: key.slot,
            })
        }
    }

    /// Keep a row-board payload in step with a live hover reorder.
    pub fn retarget_item(&mut self, row: RowId, index: usize) {
        if let Some(DragPayload::CanvasItem { origin, .. }) = &mut self.payload {
            *origin = Some(ItemOrigin { row, index });
        }
    }

    /// Keep a row payload in step with a live row reorder.
    pub fn retarget_row(&mut self, new_index: usize) {
        if let Some(DragPayload::Row { index, .. }) = &mut self.payload {
            *index = new_index;
        }
    }

    /// End the gesture over a valid target. Returns the payload.
    pub fn finish_drop(&mut self) -> Option<DragPayload> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        self.phase = DragPhase::Dropped;
        let payload = self.payload.take();
        self.reset();
        payload
    }

    /// End the gesture without a target. Safe to call repeatedly; only
    /// the first call after a drag yields a rollback.
    pub fn cancel(&mut self) -> Option<Rollback> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        self.phase = DragPhase::Cancelled;
        let rollback = match (&self.payload, self.origin_position) {
            (Some(DragPayload::CanvasItem { item, .. }), Some(position)) => Some(Rollback {
                item: *item,
                position,
            }),
            _ => None,
        };
        log::trace!("drag cancelled, rollback {rollback:?}");
        self.payload = None;
        self.reset();
        rollback
    }

    /// The dragged item unmounted mid-drag: cancel if it is ours.
    pub fn source_unmounted(&mut self, item: ItemId) -> Option<Rollback> {
        let ours = matches!(
            &self.payload,
            Some(DragPayload::CanvasItem { item: dragged, .. }) if *dragged == item
        );
        if ours { self.cancel() } else { None }
    }

    fn reset(&mut self) {
        self.last_outcome = Some(self.phase);
        self.phase = DragPhase::Idle;
        self.nearest = None;
        self.origin_position = None;
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// How the previous gesture ended (`Dropped` or `Cancelled`).
    pub fn last_outcome(&self) -> Option<DragPhase> {
        self.last_outcome
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        self.payload.as_ref()
    }

    pub fn nearest(&self) -> Option<ZoneKey> {
        self.nearest
    }

    pub fn offset(&self) -> Position {
        self.offset
    }
}
