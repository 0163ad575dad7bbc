//! Excel generation (CLI)
//!
//! Thin wrapper over the shared workbook builder.

use crate::error::{CatalogError, Result};
use jewelry_catalog_common::export::excel_core::generate_catalog_buffer;
use jewelry_catalog_common::DesignRecord;

pub fn generate_excel(records: &[&DesignRecord]) -> Result<Vec<u8>> {
    if records.is_empty() {
        return Err(CatalogError::EmptySelection);
    }
    generate_catalog_buffer(records).map_err(|e| CatalogError::ExcelGeneration(e.to_string()))
}
