//! In-memory record store
//!
//! Holds the full fetched record set. Read-only between `load`/`replace`
//! calls; reloading discards the previous records.

use crate::filter::{self, Facet};
use crate::types::DesignRecord;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<DesignRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `records`, dropping records without an id and later duplicates
    /// of an id already seen.
    ///
    /// Returns how many records were dropped.
    pub fn load(&mut self, records: Vec<DesignRecord>) -> usize {
        let before = records.len();
        let mut seen: HashSet<String> = HashSet::new();
        self.records = records
            .into_iter()
            .filter(|r| r.has_id() && seen.insert(r.id.clone()))
            .collect();
        before - self.records.len()
    }

    /// Swaps in a new record set and hands back the old one.
    pub fn replace(&mut self, records: Vec<DesignRecord>) -> Vec<DesignRecord> {
        let old = std::mem::take(&mut self.records);
        self.load(records);
        old
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[DesignRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&DesignRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn categories(&self) -> Vec<Facet> {
        filter::categories(&self.records)
    }

    pub fn suppliers(&self) -> Vec<Facet> {
        filter::suppliers(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_get() {
        let mut store = RecordStore::new();
        let dropped = store.load(vec![DesignRecord::new("1"), DesignRecord::new("2")]);
        assert_eq!(dropped, 0);
        assert_eq!(store.len(), 2);
        assert!(store.get("2").is_some());
        assert!(store.get("3").is_none());
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let mut first = DesignRecord::new("1");
        first.design_number = Some("GR0001".into());
        let mut dup = DesignRecord::new("1");
        dup.design_number = Some("GR9999".into());

        let mut store = RecordStore::new();
        let dropped = store.load(vec![first, DesignRecord::new("2"), dup]);

        assert_eq!(dropped, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("1").and_then(|r| r.design_number()), Some("GR0001"));
    }

    #[test]
    fn test_load_drops_records_without_id() {
        let mut store = RecordStore::new();
        let dropped = store.load(vec![
            DesignRecord::default(),
            DesignRecord::new("1"),
            DesignRecord::default(),
        ]);
        assert_eq!(dropped, 2);
        assert_eq!(store.len(), 1);
        assert!(store.get("").is_none());
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut store = RecordStore::new();
        store.load(vec![DesignRecord::new("old")]);
        let old = store.replace(vec![DesignRecord::new("a"), DesignRecord::new("b")]);

        assert_eq!(old.len(), 1);
        assert_eq!(old[0].id, "old");
        assert_eq!(store.len(), 2);
        assert!(store.get("old").is_none());
    }

    #[test]
    fn test_clear() {
        let mut store = RecordStore::new();
        store.load(vec![DesignRecord::new("1")]);
        store.clear();
        assert!(store.is_empty());
    }
}
