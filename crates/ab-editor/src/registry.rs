//! Drop zone registry.
//!
//! Droppable row slots register their screen rectangle while the current
//! drag can land in them, and unregister when they unmount or stop
//! accepting it. Entries are keyed by `(row, slot)` and the registry keeps
//! at most one entry per key.

use ab_core::{Rect, RowId};
use smallvec::SmallVec;

/// Identity of a drop slot: insertion point `slot` in row `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneKey {
    pub row: RowId,
    pub slot: usize,
}

impl ZoneKey {
    pub const fn new(row: RowId, slot: usize) -> Self {
        Self { row, slot }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropZone {
    pub row: RowId,
    pub slot: usize,
    pub rect: Rect,
}

impl DropZone {
    pub const fn new(row: RowId, slot: usize, rect: Rect) -> Self {
        Self { row, slot, rect }
    }

    pub fn key(&self) -> ZoneKey {
        ZoneKey::new(self.row, self.slot)
    }
}

/// Live set of registered drop zones, in registration order.
#[derive(Debug, Clone, Default)]
pub struct DropZoneRegistry {
    /// A handful of rows with a slot per gap; rarely spills to the heap.
    zones: SmallVec<[DropZone; 16]>,
}

impl DropZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the zone with the same key. A replaced zone keeps
    /// its place in iteration order.
    pub fn register(&mut self, zone: DropZone) {
        let key = zone.key();
        match self.zones.iter_mut().find(|z| z.key() == key) {
            Some(existing) => existing.rect = zone.rect,
            None => {
                log::trace!("register zone {}[{}]", zone.row, zone.slot);
                self.zones.push(zone);
            }
        }
    }

    /// Remove the zone with this key. Absent keys are ignored.
    pub fn unregister(&mut self, row: RowId, slot: usize) {
        self.zones.retain(|z| !(z.row == row && z.slot == slot));
    }

    /// Remove every slot belonging to `row`.
    pub fn unregister_row(&mut self, row: RowId) {
        self.zones.retain(|z| z.row != row);
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    pub fn query_all(&self) -> &[DropZone] {
        &self.zones
    }

    pub fn get(&self, key: ZoneKey) -> Option<&DropZone> {
        self.zones.iter().find(|z| z.key() == key)
    }

    pub fn contains(&self, key: ZoneKey) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rect(x: f32) -> Rect {
        Rect::new(x, 0.0, 20.0, 70.0)
    }

    #[test]
    fn register_upserts_by_key() {
        let row = RowId::intern("reg-upsert");
        let mut reg = DropZoneRegistry::new();
        reg.register(DropZone::new(row, 0, rect(0.0)));
        reg.register(DropZone::new(row, 1, rect(100.0)));
        reg.register(DropZone::new(row, 0, rect(50.0)));

        assert_eq!(reg.len(), 2);
        assert_eq!(reg.query_all()[0].rect, rect(50.0));
        assert_eq!(reg.query_all()[1].slot, 1);
    }

    #[test]
    fn unregister_missing_is_noop() {
        let row = RowId::intern("reg-missing");
        let mut reg = DropZoneRegistry::new();
        reg.register(DropZone::new(row, 0, rect(0.0)));
        reg.unregister(row, 5);
        reg.unregister(RowId::intern("reg-other"), 0);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn churn_leaves_no_stale_entries() {
        let row = RowId::intern("reg-churn");
        let mut reg = DropZoneRegistry::new();
        for round in 0..50 {
            for slot in 0..4 {
                reg.register(DropZone::new(row, slot, rect(round as f32)));
            }
            for slot in 0..4 {
                reg.unregister(row, slot);
            }
        }
        assert!(reg.is_empty());
    }

    #[test]
    fn unregister_row_keeps_other_rows() {
        let a = RowId::intern("reg-row-a");
        let b = RowId::intern("reg-row-b");
        let mut reg = DropZoneRegistry::new();
        reg.register(DropZone::new(a, 0, rect(0.0)));
        reg.register(DropZone::new(b, 0, rect(0.0)));
        reg.register(DropZone::new(a, 1, rect(40.0)));
        reg.unregister_row(a);
        assert_eq!(reg.len(), 1);
        assert!(reg.contains(ZoneKey::new(b, 0)));
    }
}
