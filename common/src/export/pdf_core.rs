//! PDF export core: card text and style shared by every PDF backend.

use crate::layout::{mm_to_pt, Point, A4_HEIGHT_MM};
use crate::types::{DesignRecord, UNKNOWN};
use chrono::NaiveDate;

/// Placeholder when the record has no image URL
pub const NO_IMAGE_TEXT: &str = "No image available";

/// Placeholder when fetching or decoding the image failed
pub const IMAGE_FAILED_TEXT: &str = "Image could not be loaded";

// ============================================
// Style
// ============================================

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    /// Components scaled to 0.0..=1.0
    pub fn unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

pub const CARD_BORDER_COLOR: Rgb8 = Rgb8(180, 180, 180);
pub const CARD_FILL_COLOR: Rgb8 = Rgb8(252, 252, 252);
pub const HEADER_TEXT_COLOR: Rgb8 = Rgb8(50, 50, 50);
pub const DIVIDER_COLOR: Rgb8 = Rgb8(220, 220, 220);
pub const LABEL_TEXT_COLOR: Rgb8 = Rgb8(90, 90, 90);
pub const VALUE_TEXT_COLOR: Rgb8 = Rgb8(0, 0, 0);
pub const PLACEHOLDER_TEXT_COLOR: Rgb8 = Rgb8(120, 120, 120);
pub const FOOTER_RULE_COLOR: Rgb8 = Rgb8(180, 180, 180);
pub const FOOTER_TEXT_COLOR: Rgb8 = Rgb8(80, 80, 80);

/// Line widths (mm)
pub const CARD_BORDER_WIDTH_MM: f32 = 0.5;
pub const DIVIDER_WIDTH_MM: f32 = 0.2;
pub const FOOTER_RULE_WIDTH_MM: f32 = 0.3;

/// Font sizes (pt)
pub const HEADER_FONT_SIZE: f32 = 10.0;
pub const DETAIL_FONT_SIZE: f32 = 8.0;
pub const PLACEHOLDER_FONT_SIZE: f32 = 8.0;
pub const FOOTER_FONT_SIZE: f32 = 8.0;

/// Average Helvetica glyph width as a fraction of the font size.
/// Used to centre the footer without font metrics.
const HELVETICA_AVG_WIDTH: f32 = 0.5;

// ============================================
// Text
// ============================================

/// Card header line
pub fn header_text(record: &DesignRecord) -> String {
    format!("Design: {}", record.design_number().unwrap_or(UNKNOWN))
}

/// One label/value line below the image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// Category, design code and supplier, in that order
pub fn detail_rows(record: &DesignRecord) -> [DetailRow; 3] {
    let row = |label, value: Option<&str>| DetailRow {
        label,
        value: value.unwrap_or(UNKNOWN).to_string(),
    };

    [
        row("Category:", record.item_category()),
        row("Design Code:", record.design_code()),
        row("Supplier:", record.supplier_name()),
    ]
}

/// Footer line repeated on every page
pub fn footer_text(date: NaiveDate, total: usize) -> String {
    format!(
        "Generated on: {} | Total designs: {}",
        date.format("%d/%m/%Y"),
        total
    )
}

/// e.g. `jewelry-designs-05-03-2025.pdf`
pub fn export_file_name(date: NaiveDate, extension: &str) -> String {
    format!("jewelry-designs-{}.{}", date.format("%d-%m-%Y"), extension)
}

/// Approximate rendered width of `text` in mm for a built-in font.
pub fn estimate_text_width_mm(text: &str, font_size_pt: f32) -> f32 {
    let width_pt = text.chars().count() as f32 * font_size_pt * HELVETICA_AVG_WIDTH;
    width_pt / mm_to_pt(1.0)
}

// ============================================
// Text encoding
// ============================================

/// Encodes `text` as WinAnsi (Windows-1252) bytes for the built-in Type1 fonts.
///
/// Characters outside the code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch as u32 {
            0x00..=0x7F | 0xA0..=0xFF => ch as u8,
            0x20AC => 0x80,
            0x201A => 0x82,
            0x0192 => 0x83,
            0x201E => 0x84,
            0x2026 => 0x85,
            0x2020 => 0x86,
            0x2021 => 0x87,
            0x02C6 => 0x88,
            0x2030 => 0x89,
            0x0160 => 0x8A,
            0x2039 => 0x8B,
            0x0152 => 0x8C,
            0x017D => 0x8E,
            0x2018 => 0x91,
            0x2019 => 0x92,
            0x201C => 0x93,
            0x201D => 0x94,
            0x2022 => 0x95,
            0x2013 => 0x96,
            0x2014 => 0x97,
            0x02DC => 0x98,
            0x2122 => 0x99,
            0x0161 => 0x9A,
            0x203A => 0x9B,
            0x0153 => 0x9C,
            0x017E => 0x9E,
            0x0178 => 0x9F,
            _ => b'?',
        })
        .collect()
}

// ============================================
// Coordinates
// ============================================

/// Converts a top-left mm point into bottom-left pt coordinates.
pub fn to_pdf_pt(point: Point) -> (f32, f32) {
    (mm_to_pt(point.x), mm_to_pt(A4_HEIGHT_MM - point.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> DesignRecord {
        DesignRecord {
            id: "1".into(),
            design_number: Some("GR0001".into()),
            item_category: Some("Gents Ring".into()),
            design_code: Some("GR-01".into()),
            supplier_name: Some("AAA Jewels".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_header_text() {
        assert_eq!(header_text(&full_record()), "Design: GR0001");
        assert_eq!(header_text(&DesignRecord::new("x")), "Design: Unknown");
    }

    #[test]
    fn test_detail_rows() {
        let rows = detail_rows(&full_record());
        assert_eq!(rows[0].label, "Category:");
        assert_eq!(rows[0].value, "Gents Ring");
        assert_eq!(rows[1].label, "Design Code:");
        assert_eq!(rows[1].value, "GR-01");
        assert_eq!(rows[2].label, "Supplier:");
        assert_eq!(rows[2].value, "AAA Jewels");
    }

    #[test]
    fn test_detail_rows_fallback() {
        let mut record = DesignRecord::new("x");
        record.design_code = Some(String::new());
        let rows = detail_rows(&record);
        assert!(rows.iter().all(|r| r.value == UNKNOWN));
    }

    #[test]
    fn test_footer_and_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(footer_text(date, 7), "Generated on: 05/03/2025 | Total designs: 7");
        assert_eq!(export_file_name(date, "pdf"), "jewelry-designs-05-03-2025.pdf");
        assert_eq!(export_file_name(date, "xlsx"), "jewelry-designs-05-03-2025.xlsx");
    }

    #[test]
    fn test_to_pdf_pt_flips_y() {
        let (x, y) = to_pdf_pt(Point { x: 10.0, y: 0.0 });
        assert!((x - 28.35).abs() < 0.1);
        assert!((y - mm_to_pt(297.0)).abs() < 0.01);

        let (_, bottom) = to_pdf_pt(Point { x: 0.0, y: 297.0 });
        assert!(bottom.abs() < 0.01);
    }

    #[test]
    fn test_text_width_estimate() {
        assert_eq!(estimate_text_width_mm("", 8.0), 0.0);
        let short = estimate_text_width_mm("abc", 8.0);
        let long = estimate_text_width_mm("abcdef", 8.0);
        assert!((long - short * 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("GR-01"), b"GR-01".to_vec());
        assert_eq!(
            encode_win_ansi("Müller & Söhne"),
            b"M\xFCller & S\xF6hne".to_vec()
        );
        assert_eq!(encode_win_ansi("€ “x”"), vec![0x80, b' ', 0x93, b'x', 0x94]);
        // one byte per char, unmapped glyphs become '?'
        assert_eq!(encode_win_ansi("宝石"), b"??".to_vec());
    }

    #[test]
    fn test_rgb_unit() {
        let (r, g, b) = Rgb8(255, 0, 51).unit();
        assert_eq!((r, g), (1.0, 0.0));
        assert!((b - 0.2).abs() < 1e-4);
    }
}
