//! Filter pipeline
//!
//! Three independent predicates (category, supplier, free text) combined
//! with AND. An absent or empty criterion places no constraint.

use crate::types::{present, DesignRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub search_text: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// True when no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        present(&self.category).is_none()
            && present(&self.supplier).is_none()
            && present(&self.search_text).is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, record: &DesignRecord) -> bool {
        if let Some(category) = present(&self.category) {
            if record.item_category() != Some(category) {
                return false;
            }
        }

        if let Some(supplier) = present(&self.supplier) {
            if record.supplier_name() != Some(supplier) {
                return false;
            }
        }

        if let Some(text) = present(&self.search_text) {
            let query = text.to_lowercase();
            let hit = [record.design_number(), record.parent_design(), record.design_code()]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }

        true
    }
}

/// Visible subset of `records` under `criteria`, in store order.
pub fn apply<'a>(records: &'a [DesignRecord], criteria: &FilterCriteria) -> Vec<&'a DesignRecord> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

/// One option in the category or supplier filter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub value: String,
    pub count: usize,
}

fn facets<'a, F>(records: &'a [DesignRecord], key: F) -> Vec<Facet>
where
    F: Fn(&'a DesignRecord) -> Option<&'a str>,
{
    let mut out: Vec<Facet> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for value in records.iter().filter_map(key) {
        match index.get(value) {
            Some(&i) => out[i].count += 1,
            None => {
                index.insert(value, out.len());
                out.push(Facet {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    out
}

/// Distinct categories in first-seen order, with record counts.
pub fn categories(records: &[DesignRecord]) -> Vec<Facet> {
    facets(records, DesignRecord::item_category)
}

/// Distinct supplier names in first-seen order, with record counts.
pub fn suppliers(records: &[DesignRecord]) -> Vec<Facet> {
    facets(records, DesignRecord::supplier_name)
}
