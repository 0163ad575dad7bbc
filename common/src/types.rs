//! Design record types
//!
//! A record arrives from the catalog source either with camelCase keys or
//! with the design-master column names (`aks_*`). Both spellings map onto
//! the same fields.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Fallback for headers and detail rows in the exported document.
pub const UNKNOWN: &str = "Unknown";

/// Fallback for read-only table views.
pub const NOT_AVAILABLE: &str = "-";

/// One jewelry design entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRecord {
    #[serde(default, alias = "aks_designmasterid")]
    pub id: String,

    #[serde(default, alias = "aks_designno", skip_serializing_if = "Option::is_none")]
    pub design_number: Option<String>,

    #[serde(default, alias = "aks_supplierid", skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,

    #[serde(default, alias = "aks_supplieridname", skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,

    #[serde(default, alias = "aks_parentdesign", skip_serializing_if = "Option::is_none")]
    pub parent_design: Option<String>,

    #[serde(default, alias = "aks_itemname", skip_serializing_if = "Option::is_none")]
    pub item_category: Option<String>,

    #[serde(default, alias = "aks_designcode", skip_serializing_if = "Option::is_none")]
    pub design_code: Option<String>,

    #[serde(default, alias = "aks_designimage_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Returns the value only when it is present and non-empty.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl DesignRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn design_number(&self) -> Option<&str> {
        present(&self.design_number)
    }

    pub fn supplier_name(&self) -> Option<&str> {
        present(&self.supplier_name)
    }

    pub fn parent_design(&self) -> Option<&str> {
        present(&self.parent_design)
    }

    pub fn item_category(&self) -> Option<&str> {
        present(&self.item_category)
    }

    pub fn design_code(&self) -> Option<&str> {
        present(&self.design_code)
    }

    pub fn image_url(&self) -> Option<&str> {
        present(&self.image_url)
    }

    /// Supplier as shown in table views: name, then id, then `-`.
    pub fn supplier_display(&self) -> &str {
        present(&self.supplier_name)
            .or_else(|| present(&self.supplier_id))
            .unwrap_or(NOT_AVAILABLE)
    }

    /// Whether the record has an id. Records without one are dropped at load.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Shapes a catalog source may return.
///
/// A bare array, or an envelope with `value` (OData style) or `data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CatalogPayload {
    Records(Vec<DesignRecord>),
    Value { value: Vec<DesignRecord> },
    Data { data: Vec<DesignRecord> },
}

impl CatalogPayload {
    pub fn into_records(self) -> Vec<DesignRecord> {
        match self {
            CatalogPayload::Records(records) => records,
            CatalogPayload::Value { value } => value,
            CatalogPayload::Data { data } => data,
        }
    }
}

/// Parses a catalog JSON document into records.
pub fn parse_catalog(json: &str) -> Result<Vec<DesignRecord>> {
    let payload: CatalogPayload = serde_json::from_str(json)?;
    Ok(payload.into_records())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_record_default() {
        let record = DesignRecord::default();
        assert_eq!(record.id, "");
        assert!(record.design_number.is_none());
        assert!(!record.has_id());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "7",
            "designNumber": "NK0001",
            "supplierName": "AAA Jewels",
            "itemCategory": "Necklace",
            "imageUrl": "https://example.com/nk.jpg"
        }"#;

        let record: DesignRecord = serde_json::from_str(json).expect("deserialize failed");
        assert_eq!(record.id, "7");
        assert_eq!(record.design_number(), Some("NK0001"));
        assert_eq!(record.item_category(), Some("Necklace"));
        assert_eq!(record.image_url(), Some("https://example.com/nk.jpg"));
        assert!(record.design_code.is_none());
    }

    #[test]
    fn test_deserialize_design_master_columns() {
        let json = r#"{
            "aks_designmasterid": "1",
            "aks_designno": "GR0001",
            "aks_supplierid": "SUP001",
            "aks_supplieridname": "AAA Jewels",
            "aks_parentdesign": "GR1",
            "aks_itemname": "Gents Ring",
            "aks_designcode": "GR-AAA-001",
            "aks_designimage_url": null,
            "aks_prefix": "GR",
            "versionnumber": 1
        }"#;

        let record: DesignRecord = serde_json::from_str(json).expect("deserialize failed");
        assert_eq!(record.id, "1");
        assert_eq!(record.design_number(), Some("GR0001"));
        assert_eq!(record.supplier_id.as_deref(), Some("SUP001"));
        assert_eq!(record.parent_design(), Some("GR1"));
        assert_eq!(record.design_code(), Some("GR-AAA-001"));
        assert_eq!(record.image_url(), None);
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let record = DesignRecord {
            id: "1".into(),
            design_number: Some(String::new()),
            image_url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(record.design_number(), None);
        assert_eq!(record.image_url(), None);
    }

    #[test]
    fn test_supplier_display_fallbacks() {
        let mut record = DesignRecord::new("1");
        assert_eq!(record.supplier_display(), "-");

        record.supplier_id = Some("SUP009".into());
        assert_eq!(record.supplier_display(), "SUP009");

        record.supplier_name = Some("CCC Diamonds".into());
        assert_eq!(record.supplier_display(), "CCC Diamonds");
    }

    #[test]
    fn test_parse_catalog_shapes() {
        let bare = r#"[{"id": "1"}, {"id": "2"}]"#;
        let value = r#"{"value": [{"id": "1"}]}"#;
        let data = r#"{"data": [{"id": "1"}, {"id": "2"}, {"id": "3"}]}"#;

        assert_eq!(parse_catalog(bare).unwrap().len(), 2);
        assert_eq!(parse_catalog(value).unwrap().len(), 1);
        assert_eq!(parse_catalog(data).unwrap().len(), 3);
    }

    #[test]
    fn test_parse_catalog_rejects_garbage() {
        assert!(parse_catalog("{\"rows\": 3}").is_err());
        assert!(parse_catalog("not json").is_err());
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let record = DesignRecord {
            id: "5".into(),
            design_number: Some("ER0001".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).expect("serialize failed");
        assert!(json.contains("\"designNumber\":\"ER0001\""));
        assert!(!json.contains("imageUrl"));
    }
}
