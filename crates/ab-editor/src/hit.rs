//! Hit testing: point → item lookup on the free-form canvas.
//!
//! Items later in the collection paint on top, so the walk runs back to
//! front.

use ab_core::{ComponentItem, ItemId};

/// Find the topmost item at canvas position (px, py).
/// Returns `None` if no item is hit (background).
pub fn hit_test(items: &[ComponentItem], px: f32, py: f32) -> Option<ItemId> {
    items
        .iter()
        .rev()
        .find(|item| item.bounds().contains(px, py))
        .map(|item| item.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_core::{ComponentKind, Position, Size};

    fn placed(id: &str, x: f32, y: f32, w: f32, h: f32) -> ComponentItem {
        let mut item = ComponentItem::new(ItemId::intern(id), ComponentKind::Container, id);
        item.position = Position::new(x, y);
        item.size = Size::new(w, h);
        item
    }

    #[test]
    fn topmost_item_wins() {
        let items = vec![
            placed("hit-under", 0.0, 0.0, 300.0, 200.0),
            placed("hit-over", 100.0, 80.0, 100.0, 40.0),
        ];
        assert_eq!(hit_test(&items, 150.0, 100.0), Some(ItemId::intern("hit-over")));
        assert_eq!(hit_test(&items, 10.0, 10.0), Some(ItemId::intern("hit-under")));
        assert_eq!(hit_test(&items, 500.0, 10.0), None);
    }
}
