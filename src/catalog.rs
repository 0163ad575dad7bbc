//! Catalog loading
//!
//! Reads design records from a JSON file, an `.xlsx` workbook or an HTTP(S)
//! endpoint returning JSON. An empty result is a load failure.

use crate::error::{CatalogError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use jewelry_catalog_common::types::parse_catalog;
use jewelry_catalog_common::DesignRecord;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const NO_DESIGNS: &str = "No designs found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// JSON file
    File(PathBuf),
    /// Spreadsheet, first sheet, header row names the fields
    Workbook(PathBuf),
    /// http(s) URL returning JSON
    Remote(String),
}

impl CatalogSource {
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            return CatalogSource::Remote(source.to_string());
        }

        let path = PathBuf::from(source.strip_prefix("file://").unwrap_or(source));
        let is_workbook = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| matches!(e.to_lowercase().as_str(), "xlsx" | "xlsm" | "xls" | "ods"))
            .unwrap_or(false);

        if is_workbook {
            CatalogSource::Workbook(path)
        } else {
            CatalogSource::File(path)
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(p) | CatalogSource::Workbook(p) => write!(f, "{}", p.display()),
            CatalogSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Loads the catalog; fails with `DataLoad` when nothing usable came back.
pub async fn load_catalog(source: &CatalogSource, timeout: Duration) -> Result<Vec<DesignRecord>> {
    info!(%source, "loading catalog");

    let records = match source {
        CatalogSource::File(path) => load_json_file(path).await?,
        CatalogSource::Workbook(path) => {
            let path = path.clone();
            tokio::task::spawn_blocking(move || load_workbook(&path))
                .await
                .map_err(|e| CatalogError::DataLoad(format!("workbook task failed: {}", e)))??
        }
        CatalogSource::Remote(url) => load_remote(url, timeout).await?,
    };

    let total = records.len();
    let records: Vec<DesignRecord> = records.into_iter().filter(DesignRecord::has_id).collect();
    if records.len() < total {
        warn!(skipped = total - records.len(), "design records without an id skipped");
    }
    if records.is_empty() {
        return Err(CatalogError::DataLoad(NO_DESIGNS.into()));
    }

    debug!(count = records.len(), "catalog loaded");
    Ok(records)
}

async fn load_json_file(path: &Path) -> Result<Vec<DesignRecord>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogError::DataLoad(format!("{}: {}", path.display(), e)))?;
    parse_catalog(&content).map_err(|e| CatalogError::DataLoad(format!("{}: {}", path.display(), e)))
}

async fn load_remote(url: &str, timeout: Duration) -> Result<Vec<DesignRecord>> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CatalogError::DataLoad(format!("HTTP client: {}", e)))?;

    let body = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| CatalogError::DataLoad(format!("{}: {}", url, e)))?
        .text()
        .await
        .map_err(|e| CatalogError::DataLoad(format!("{}: {}", url, e)))?;

    parse_catalog(&body).map_err(|e| CatalogError::DataLoad(format!("{}: {}", url, e)))
}

/// Maps a header cell to the record field it names. Accepts the field name
/// itself, the design-master column name, or the spreadsheet export header.
pub fn header_key(header: &str) -> String {
    let key = header.trim();
    let mapped = match key.to_lowercase().as_str() {
        "id" => "id",
        "design no" | "design number" => "designNumber",
        "supplier" | "supplier name" => "supplierName",
        "supplier id" => "supplierId",
        "parent design" => "parentDesign",
        "category" | "item category" => "itemCategory",
        "design code" => "designCode",
        "image url" | "image" => "imageUrl",
        _ => return key.to_string(),
    };
    mapped.to_string()
}

fn cell_value(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Int(n) => n.to_string(),
        Data::Float(n) if n.fract() == 0.0 => format!("{}", *n as i64),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Reads the first sheet of a workbook.
pub fn load_workbook(path: &Path) -> Result<Vec<DesignRecord>> {
    let load_err = |e: String| CatalogError::DataLoad(format!("{}: {}", path.display(), e));

    let mut workbook = open_workbook_auto(path).map_err(|e| load_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| load_err("workbook has no sheets".into()))?
        .map_err(|e| load_err(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row
            .iter()
            .map(|c| cell_value(c).map(|h| header_key(&h)).unwrap_or_default())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        let mut object = Map::new();
        for (header, cell) in headers.iter().zip(row) {
            if header.is_empty() {
                continue;
            }
            if let Some(value) = cell_value(cell) {
                object.insert(header.clone(), Value::String(value));
            }
        }
        if object.is_empty() {
            continue;
        }

        let record: DesignRecord = serde_json::from_value(Value::Object(object))
            .map_err(|e| load_err(format!("row {}: {}", i + 2, e)))?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            CatalogSource::parse("https://example.com/designs"),
            CatalogSource::Remote("https://example.com/designs".into())
        );
        assert_eq!(
            CatalogSource::parse("designs.XLSX"),
            CatalogSource::Workbook(PathBuf::from("designs.XLSX"))
        );
        assert_eq!(
            CatalogSource::parse("file:///tmp/designs.json"),
            CatalogSource::File(PathBuf::from("/tmp/designs.json"))
        );
        assert_eq!(
            CatalogSource::parse(" designs "),
            CatalogSource::File(PathBuf::from("designs"))
        );
    }

    #[test]
    fn test_header_key() {
        assert_eq!(header_key("Design No"), "designNumber");
        assert_eq!(header_key(" CATEGORY "), "itemCategory");
        assert_eq!(header_key("aks_designno"), "aks_designno");
        assert_eq!(header_key("designCode"), "designCode");
    }

    #[test]
    fn test_cell_value() {
        assert_eq!(cell_value(&Data::Empty), None);
        assert_eq!(cell_value(&Data::String("  ".into())), None);
        assert_eq!(cell_value(&Data::Float(42.0)), Some("42".into()));
        assert_eq!(cell_value(&Data::Int(7)), Some("7".into()));
        assert_eq!(cell_value(&Data::String(" GR0001 ".into())), Some("GR0001".into()));
    }
}
