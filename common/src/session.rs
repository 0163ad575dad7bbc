//! Catalog session
//!
//! Owns one record store, the current filter criteria, the derived visible
//! subset and the selection. The visible subset is recomputed in full
//! whenever the records or the criteria change.

use crate::filter::{Facet, FilterCriteria};
use crate::selection::SelectionSet;
use crate::store::RecordStore;
use crate::types::DesignRecord;

#[derive(Debug, Clone, Default)]
pub struct CatalogSession {
    store: RecordStore,
    criteria: FilterCriteria,
    /// Indices into the store, in store order.
    visible: Vec<usize>,
    selection: SelectionSet,
}

impl CatalogSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<DesignRecord>) -> Self {
        let mut session = Self::new();
        session.load(records);
        session
    }

    /// Loads a fresh record set. The selection is cleared since the old
    /// records no longer exist. Returns the number of records dropped for a
    /// missing or duplicate id.
    pub fn load(&mut self, records: Vec<DesignRecord>) -> usize {
        let dropped = self.store.load(records);
        self.selection.clear();
        self.refresh();
        dropped
    }

    /// Same as `load`, handing back the replaced records.
    pub fn replace(&mut self, records: Vec<DesignRecord>) -> Vec<DesignRecord> {
        let old = self.store.replace(records);
        self.selection.clear();
        self.refresh();
        old
    }

    fn refresh(&mut self) {
        let criteria = &self.criteria;
        self.visible = self
            .store
            .records()
            .iter()
            .enumerate()
            .filter(|(_, r)| criteria.matches(r))
            .map(|(i, _)| i)
            .collect();
    }

    // ============================================
    // Filtering
    // ============================================

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.criteria.category = category;
        self.refresh();
    }

    pub fn set_supplier(&mut self, supplier: Option<String>) {
        self.criteria.supplier = supplier;
        self.refresh();
    }

    pub fn set_search_text(&mut self, text: Option<String>) {
        self.criteria.search_text = text;
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.refresh();
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn total_len(&self) -> usize {
        self.store.len()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn visible(&self) -> Vec<&DesignRecord> {
        let records = self.store.records();
        self.visible.iter().map(|&i| &records[i]).collect()
    }

    pub fn visible_ids(&self) -> Vec<&str> {
        self.visible().into_iter().map(|r| r.id.as_str()).collect()
    }

    pub fn categories(&self) -> Vec<Facet> {
        self.store.categories()
    }

    pub fn suppliers(&self) -> Vec<Facet> {
        self.store.suppliers()
    }

    // ============================================
    // Selection
    // ============================================

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    /// Toggles `id` only if a loaded record carries it; `None` otherwise.
    pub fn toggle_known(&mut self, id: &str) -> Option<bool> {
        if id.is_empty() || self.store.get(id).is_none() {
            return None;
        }
        Some(self.selection.toggle(id))
    }

    /// Select-all / deselect-all over the current visible subset.
    pub fn select_all_visible(&mut self) {
        let records = self.store.records();
        let ids: Vec<&str> = self.visible.iter().map(|&i| records[i].id.as_str()).collect();
        self.selection.select_all(&ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Marked records in store order, including ones the current filter hides.
    pub fn marked_records(&self) -> Vec<&DesignRecord> {
        self.store
            .records()
            .iter()
            .filter(|r| r.has_id() && self.selection.contains(&r.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, category: &str, supplier: &str) -> DesignRecord {
        DesignRecord {
            id: id.into(),
            design_number: Some(format!("D{}", id)),
            item_category: Some(category.into()),
            supplier_name: Some(supplier.into()),
            ..Default::default()
        }
    }

    fn session() -> CatalogSession {
        CatalogSession::with_records(vec![
            record("1", "Ring", "AAA Jewels"),
            record("2", "Necklace", "AAA Jewels"),
            record("3", "Ring", "AAA Jewels"),
            record("4", "Bangle", "BBB Gems"),
            record("5", "Ring", "AAA Jewels"),
            record("6", "Ring", "AAA Jewels"),
            record("7", "Ring", "BBB Gems"),
        ])
    }

    #[test]
    fn test_initial_visible_is_everything() {
        let s = session();
        assert_eq!(s.total_len(), 7);
        assert_eq!(s.visible_len(), 7);
    }

    #[test]
    fn test_criteria_change_replaces_visible() {
        let mut s = session();
        s.set_category(Some("Ring".into()));
        assert_eq!(s.visible_ids(), vec!["1", "3", "5", "6", "7"]);

        s.set_category(Some("Necklace".into()));
        assert_eq!(s.visible_ids(), vec!["2"]);

        s.clear_filters();
        assert_eq!(s.visible_len(), 7);
    }

    #[test]
    fn test_selection_survives_filter_changes() {
        let mut s = session();
        s.toggle("2");
        s.set_category(Some("Ring".into()));

        assert!(s.is_selected("2"));
        let marked: Vec<&str> = s.marked_records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(marked, vec!["2"]);
    }

    #[test]
    fn test_marked_records_in_store_order() {
        let mut s = session();
        s.toggle("6");
        s.toggle("1");
        s.toggle("4");
        let marked: Vec<&str> = s.marked_records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(marked, vec!["1", "4", "6"]);
    }

    #[test]
    fn test_select_all_visible_toggles() {
        let mut s = session();
        s.set_category(Some("Ring".into()));
        s.select_all_visible();
        assert_eq!(s.selection().len(), 5);

        s.select_all_visible();
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_select_all_size_caveat_after_filter_change() {
        let mut s = session();
        s.set_category(Some("Ring".into()));
        s.select_all_visible();
        assert_eq!(s.selection().len(), 5);

        // Five visible again, but "2" was never selected and "7" is hidden.
        s.clear_filters();
        s.set_supplier(Some("AAA Jewels".into()));
        assert_eq!(s.visible_ids(), vec!["1", "2", "3", "5", "6"]);

        s.select_all_visible();
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_select_all_twice_clears_when_a_record_has_no_id() {
        let mut s = CatalogSession::new();
        let dropped = s.load(vec![
            record("1", "Ring", "AAA Jewels"),
            record("2", "Ring", "AAA Jewels"),
            record("", "Ring", "AAA Jewels"),
        ]);
        assert_eq!(dropped, 1);
        assert_eq!(s.visible_ids(), vec!["1", "2"]);

        s.select_all_visible();
        assert_eq!(s.selection().len(), 2);
        s.select_all_visible();
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_toggle_known_rejects_unknown_and_empty_ids() {
        let mut s = session();
        assert_eq!(s.toggle_known("1"), Some(true));
        assert_eq!(s.toggle_known("1"), Some(false));
        assert_eq!(s.toggle_known("missing"), None);
        assert_eq!(s.toggle_known(""), None);
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_reload_clears_selection() {
        let mut s = session();
        s.toggle("1");
        let old = s.replace(vec![record("9", "Ring", "CCC Diamonds")]);
        assert_eq!(old.len(), 7);
        assert!(s.selection().is_empty());
        assert_eq!(s.visible_ids(), vec!["9"]);
    }

    #[test]
    fn test_empty_session() {
        let s = CatalogSession::new();
        assert_eq!(s.visible_len(), 0);
        assert!(s.marked_records().is_empty());
    }
}
