//! Page layout module
//!
//! Fixed mm-based geometry for the export document (source of truth).
//! Origin is the top-left corner of the page, y grows downwards; the PDF
//! backend flips to bottom-left when it emits operations.

// ============================================
// mm geometry
// ============================================

/// A4 size (mm)
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Page margin (mm)
pub const MARGIN_MM: f32 = 10.0;

/// Space reserved at the bottom of the page for the footer (mm)
pub const FOOTER_SPACE_MM: f32 = 15.0;

/// Vertical gap between cards in one column (mm)
pub const CARD_SPACING_MM: f32 = 5.0;

pub const COLUMNS: usize = 2;
pub const ROWS: usize = 3;

/// Always 6 cards per page, independent of content.
pub const CARDS_PER_PAGE: usize = COLUMNS * ROWS;

/// Column width: two columns with a margin on each side and one between
pub const COLUMN_WIDTH_MM: f32 = (A4_WIDTH_MM - MARGIN_MM * 3.0) / 2.0; // 90mm

/// Usable height above the footer
pub const USABLE_HEIGHT_MM: f32 = A4_HEIGHT_MM - MARGIN_MM - FOOTER_SPACE_MM; // 272mm

/// Card height: three cards per column with spacing
pub const CARD_HEIGHT_MM: f32 = (USABLE_HEIGHT_MM - 2.0 * CARD_SPACING_MM) / 3.0; // 87.33mm

// ============================================
// Card internals
// ============================================

pub const CARD_PADDING_MM: f32 = 4.0;
pub const CARD_RADIUS_MM: f32 = 3.0;

/// Header band height, measured from the padded top of the card
pub const HEADER_BAND_MM: f32 = 10.0;

/// Height kept free below the image for dividers and detail rows
pub const DETAIL_RESERVE_MM: f32 = 40.0;

pub const DETAIL_ROW_MM: f32 = 5.0;
pub const DETAIL_ROWS: usize = 3;

/// Offset from a detail label to its value
pub const DETAIL_VALUE_OFFSET_MM: f32 = 40.0;

/// Dividers are inset 2mm from the card edges
const DIVIDER_INSET_MM: f32 = 2.0;

// ============================================
// Conversion
// ============================================

/// mm → pt (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}

// ============================================
// Geometry types
// ============================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Horizontal rule from `x1` to `x2` at height `y`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HLine {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

/// Where one card lands in the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPlacement {
    /// Position in the export list
    pub index: usize,
    pub page: usize,
    /// 0..6 within the page; 0-2 left column, 3-5 right column
    pub slot: usize,
    pub column: usize,
    pub row: usize,
    pub rect: Rect,
}

/// Sub-regions of a card, all derived from the card rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRegions {
    pub card: Rect,
    pub header_baseline: Point,
    pub header_divider: HLine,
    pub image_band: Rect,
    /// Baseline for "No image available" / "Image could not be loaded"
    pub placeholder_baseline: Point,
    pub image_divider: HLine,
    /// (label, value) baselines per detail row
    pub detail_rows: [(Point, Point); DETAIL_ROWS],
}

// ============================================
// Page geometry
// ============================================

/// Page layout settings
#[derive(Debug, Clone)]
pub struct PageGeometry {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub footer_space_mm: f32,
    pub column_width_mm: f32,
    pub card_height_mm: f32,
    pub card_spacing_mm: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometry {
    /// A4 portrait, 2 columns × 3 rows
    pub fn a4() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: MARGIN_MM,
            footer_space_mm: FOOTER_SPACE_MM,
            column_width_mm: COLUMN_WIDTH_MM,
            card_height_mm: CARD_HEIGHT_MM,
            card_spacing_mm: CARD_SPACING_MM,
        }
    }

    pub fn cards_per_page(&self) -> usize {
        CARDS_PER_PAGE
    }

    /// Number of pages needed for `count` cards.
    pub fn page_count(&self, count: usize) -> usize {
        count.div_ceil(CARDS_PER_PAGE)
    }

    /// Placement of the card at position `index` in the export list.
    pub fn layout(&self, index: usize) -> CardPlacement {
        let page = index / CARDS_PER_PAGE;
        let slot = index % CARDS_PER_PAGE;
        let column = if slot >= ROWS { 1 } else { 0 };
        let row = slot % ROWS;

        let x = if column == 0 {
            self.margin_mm
        } else {
            self.margin_mm * 2.0 + self.column_width_mm
        };
        let y = self.margin_mm + row as f32 * (self.card_height_mm + self.card_spacing_mm);

        CardPlacement {
            index,
            page,
            slot,
            column,
            row,
            rect: Rect::new(x, y, self.column_width_mm, self.card_height_mm),
        }
    }

    /// Header, image band and detail rows for a card.
    pub fn regions(&self, placement: &CardPlacement) -> CardRegions {
        let card = placement.rect;
        let top = card.y + CARD_PADDING_MM;

        let divider = |y: f32| HLine {
            x1: card.x + DIVIDER_INSET_MM,
            x2: card.right() - DIVIDER_INSET_MM,
            y,
        };

        let image_band = Rect::new(
            card.x + CARD_PADDING_MM,
            top + HEADER_BAND_MM,
            card.width - CARD_PADDING_MM * 2.0,
            card.height - DETAIL_RESERVE_MM,
        );

        let details_y = image_band.bottom() + 6.0;
        let label_x = card.x + CARD_PADDING_MM + 2.0;
        let value_x = label_x + DETAIL_VALUE_OFFSET_MM;
        let detail_rows = std::array::from_fn(|i| {
            let y = details_y + i as f32 * DETAIL_ROW_MM;
            (Point { x: label_x, y }, Point { x: value_x, y })
        });

        CardRegions {
            card,
            header_baseline: Point {
                x: card.x + CARD_PADDING_MM,
                y: top + 4.0,
            },
            header_divider: divider(top + 6.0),
            image_band,
            placeholder_baseline: Point {
                x: image_band.x,
                y: image_band.y + 10.0,
            },
            image_divider: divider(image_band.bottom() + 2.0),
            detail_rows,
        }
    }

    /// Separator line above the footer text.
    pub fn footer_rule(&self) -> HLine {
        HLine {
            x1: self.margin_mm,
            x2: self.page_width_mm - self.margin_mm,
            y: self.page_height_mm - self.footer_space_mm + 2.0,
        }
    }

    /// Centre point of the footer text baseline.
    pub fn footer_anchor(&self) -> Point {
        Point {
            x: self.page_width_mm / 2.0,
            y: self.page_height_mm - self.margin_mm,
        }
    }
}

/// Scales an image of `width`×`height` to fit `band`, keeping the aspect
/// ratio and centring it on both axes.
///
/// Returns `None` for degenerate sizes.
pub fn fit_image(width: u32, height: u32, band: &Rect) -> Option<Rect> {
    if width == 0 || height == 0 || band.width <= 0.0 || band.height <= 0.0 {
        return None;
    }

    let (w, h) = (width as f32, height as f32);
    let mut fitted_w = band.width;
    let mut fitted_h = h * fitted_w / w;

    if fitted_h > band.height {
        fitted_h = band.height;
        fitted_w = w * fitted_h / h;
    }

    Some(Rect::new(
        band.x + (band.width - fitted_w) / 2.0,
        band.y + (band.height - fitted_h) / 2.0,
        fitted_w,
        fitted_h,
    ))
}

// ============================================
// Gallery grid (presentation helper)
// ============================================

/// Gap between gallery cards (px, 1rem)
pub const GALLERY_GAP_PX: u32 = 16;

/// (min viewport width, min card width) in px, widest breakpoint last
const GALLERY_BREAKPOINTS: &[(u32, u32)] = &[
    (0, 180),
    (576, 200),
    (768, 220),
    (992, 220),
    (1200, 240),
    (1600, 250),
];

/// Column count of the gallery grid for a viewport width in px.
///
/// Up to 480px the grid collapses to one column; otherwise it auto-fills
/// tracks of the breakpoint's minimum width.
pub fn gallery_columns_for(viewport_px: u32) -> u32 {
    if viewport_px <= 480 {
        return 1;
    }

    let min_track = GALLERY_BREAKPOINTS
        .iter()
        .rev()
        .find(|(min_viewport, _)| viewport_px >= *min_viewport)
        .map(|&(_, track)| track)
        .unwrap_or(GALLERY_BREAKPOINTS[0].1);

    ((viewport_px + GALLERY_GAP_PX) / (min_track + GALLERY_GAP_PX)).max(1)
}
