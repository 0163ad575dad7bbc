//! Marked-for-export record identifiers
//!
//! Once an id is marked it stays marked regardless of later filter changes;
//! only `toggle`, `select_all` and `clear` change membership.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the id if absent, removes it if present.
    ///
    /// Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Select-all / deselect-all toggle over the visible ids.
    ///
    /// Clears when the selection's size equals `visible_ids.len()`, otherwise
    /// replaces the selection with the visible ids. The comparison is on
    /// cardinality only, not membership. Empty ids are never inserted.
    pub fn select_all<S: AsRef<str>>(&mut self, visible_ids: &[S]) {
        if self.ids.len() == visible_ids.len() {
            self.ids.clear();
        } else {
            self.ids = visible_ids
                .iter()
                .map(|id| id.as_ref())
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
