use std::collections::HashMap;

use super::marker::Marker;

/// Which orders currently have a marker on one page's map.
///
/// Not a source of truth: entries are a projection of stored orders and are
/// dropped once their order stops being active.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: HashMap<i64, Marker>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks `marker`. Returns false, leaving the existing entry untouched,
    /// when the order already has one.
    pub fn insert(&mut self, marker: Marker) -> bool {
        if self.markers.contains_key(&marker.order_id) {
            return false;
        }
        self.markers.insert(marker.order_id, marker);
        true
    }

    pub fn remove(&mut self, order_id: i64) -> Option<Marker> {
        self.markers.remove(&order_id)
    }

    pub fn contains(&self, order_id: i64) -> bool {
        self.markers.contains_key(&order_id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Snapshot of tracked ids, sorted.
    pub fn ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.markers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
