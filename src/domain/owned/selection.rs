use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of selected collection ids, used to drive bulk release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: BTreeSet<u32>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one id; returns whether it is selected afterwards
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Replace the selection with every given id
    pub fn select_all<I: IntoIterator<Item = u32>>(&mut self, ids: I) {
        self.ids = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.ids.is_empty()
    }

    /// True when the visible list is non-empty and every entry is selected
    pub fn is_all_selected(&self, visible: &[u32]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id))
    }

    pub fn ids(&self) -> Vec<u32> {
        self.ids.iter().copied().collect()
    }
}
