//! Excel generation (shared library)
//!
//! Writes the marked designs as a flat table, one row per design, using the
//! same "-" fallbacks as the read-only table view.

use crate::error::{Error, Result};
use crate::types::{DesignRecord, NOT_AVAILABLE};
use rust_xlsxwriter::*;

pub const SHEET_NAME: &str = "Designs";

/// (header, column width in characters)
pub const COLUMNS: [(&str, f64); 6] = [
    ("Design No", 14.0),
    ("Supplier", 24.0),
    ("Parent Design", 16.0),
    ("Category", 18.0),
    ("Design Code", 16.0),
    ("Image URL", 48.0),
];

fn sheet_err(context: &str, e: XlsxError) -> Error {
    Error::Sheet(format!("{}: {}", context, e))
}

/// Cell values for one design, in `COLUMNS` order
pub fn row_values(record: &DesignRecord) -> [&str; 6] {
    [
        record.design_number().unwrap_or(NOT_AVAILABLE),
        record.supplier_display(),
        record.parent_design().unwrap_or(NOT_AVAILABLE),
        record.item_category().unwrap_or(NOT_AVAILABLE),
        record.design_code().unwrap_or(NOT_AVAILABLE),
        record.image_url().unwrap_or(NOT_AVAILABLE),
    ]
}

/// Builds the workbook into a buffer.
pub fn generate_catalog_buffer(records: &[&DesignRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_font_color(Color::RGB(0x323232))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_font_size(10.0)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| sheet_err("sheet name", e))?;

    for (col, (header, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet
            .set_column_width(col, *width)
            .map_err(|e| sheet_err("column width", e))?;
        worksheet
            .write_string_with_format(0, col, *header, &header_format)
            .map_err(|e| sheet_err("header", e))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, value) in row_values(record).iter().enumerate() {
            worksheet
                .write_string_with_format(row, col as u16, *value, &value_format)
                .map_err(|e| sheet_err("cell", e))?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| sheet_err("freeze panes", e))?;

    workbook
        .save_to_buffer()
        .map_err(|e| sheet_err("save", e))
}
