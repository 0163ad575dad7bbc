//! PDF document assembly
//!
//! Cards are laid out by `PageGeometry` (mm, top-left origin) and emitted as
//! printpdf operations (pt, bottom-left origin). Images are fetched up front
//! through a bounded, order-preserving stream, then embedded in record order.

use crate::error::{CatalogError, Result};
use crate::fetcher::{fetch_ordered, fetch_progress, ImageFetcher, ImageSlot, PixelBuffer};
use chrono::{DateTime, Local};
use jewelry_catalog_common::export::pdf_core::{
    detail_rows, encode_win_ansi, estimate_text_width_mm, footer_text, header_text, to_pdf_pt,
    Rgb8,
    CARD_BORDER_COLOR, CARD_BORDER_WIDTH_MM, CARD_FILL_COLOR, DETAIL_FONT_SIZE, DIVIDER_COLOR,
    DIVIDER_WIDTH_MM, FOOTER_FONT_SIZE, FOOTER_RULE_COLOR, FOOTER_RULE_WIDTH_MM,
    FOOTER_TEXT_COLOR, HEADER_FONT_SIZE, HEADER_TEXT_COLOR, IMAGE_FAILED_TEXT, LABEL_TEXT_COLOR,
    NO_IMAGE_TEXT, PLACEHOLDER_FONT_SIZE, PLACEHOLDER_TEXT_COLOR, VALUE_TEXT_COLOR,
};
use jewelry_catalog_common::layout::{
    fit_image, mm_to_pt, HLine, Point, CARD_RADIUS_MM, A4_HEIGHT_MM, A4_WIDTH_MM,
};
use jewelry_catalog_common::{CardPlacement, DesignRecord, PageGeometry, Rect};
use printpdf::graphics::{
    LinePoint, PaintMode, Point as PdfPoint, Polygon, PolygonRing, WindingOrder,
};
use printpdf::ops::Op;
use printpdf::xobject::{DictItem, XObjectTransform};
use printpdf::{BuiltinFont, Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb, TextMatrix};
use tracing::{debug, info, warn};

pub const DOCUMENT_TITLE: &str = "Jewelry Designs";

/// Default number of image fetches in flight
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Segments used to approximate each rounded corner
const CORNER_SEGMENTS: usize = 4;

/// What ended up in a card's image band
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImage {
    /// Embedded at the given pixel size
    Embedded { width: u32, height: u32 },
    /// Fetch or decode failed; "Image could not be loaded" shown
    Failed(String),
    /// No image URL; "No image available" shown
    Missing,
}

impl CardImage {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            CardImage::Embedded { .. } => None,
            CardImage::Failed(_) => Some(IMAGE_FAILED_TEXT),
            CardImage::Missing => Some(NO_IMAGE_TEXT),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CardReport {
    pub id: String,
    pub header: String,
    pub placement: CardPlacement,
    pub image: CardImage,
}

/// Finished document plus what went into it
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub count: usize,
    pub page_count: usize,
    pub generated_at: DateTime<Local>,
    /// Footer line shared by every page
    pub footer: String,
    pub cards: Vec<CardReport>,
    pub payload: Vec<u8>,
}

impl ExportResult {
    pub fn cards_on_page(&self, page: usize) -> impl Iterator<Item = &CardReport> {
        self.cards.iter().filter(move |c| c.placement.page == page)
    }
}

/// Builds the catalog PDF from marked records.
pub struct DocumentAssembler<'a, F: ImageFetcher> {
    fetcher: &'a F,
    geometry: PageGeometry,
    concurrency: usize,
    show_progress: bool,
}

impl<'a, F: ImageFetcher> DocumentAssembler<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            geometry: PageGeometry::a4(),
            concurrency: DEFAULT_CONCURRENCY,
            show_progress: false,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub async fn build(&self, records: &[&DesignRecord]) -> Result<ExportResult> {
        self.build_at(records, Local::now()).await
    }

    /// Same as `build` with a fixed generation time.
    pub async fn build_at(
        &self,
        records: &[&DesignRecord],
        generated_at: DateTime<Local>,
    ) -> Result<ExportResult> {
        if records.is_empty() {
            return Err(CatalogError::EmptySelection);
        }

        let count = records.len();
        let page_count = self.geometry.page_count(count);
        info!(count, page_count, "assembling catalog document");

        let urls: Vec<Option<&str>> = records.iter().map(|r| r.image_url()).collect();
        let wanted = urls.iter().filter(|u| u.is_some()).count();
        let progress = (self.show_progress && wanted > 0).then(|| fetch_progress(count));
        let slots = fetch_ordered(self.fetcher, &urls, self.concurrency, progress.as_ref()).await;
        if let Some(progress) = &progress {
            progress.finish_with_message("images fetched");
        }

        let footer = footer_text(generated_at.date_naive(), count);
        let mut doc = PdfDocument::new(DOCUMENT_TITLE);
        let mut cards = Vec::with_capacity(count);
        let mut ops: Vec<Op> = Vec::new();
        let mut current_page = 0;

        for (index, (record, slot)) in records.iter().zip(slots).enumerate() {
            let placement = self.geometry.layout(index);
            if placement.page != current_page {
                self.finish_page(&mut doc, std::mem::take(&mut ops), &footer);
                current_page = placement.page;
            }

            let image = self.draw_card(&mut doc, &mut ops, record, &placement, slot);
            debug!(id = %record.id, page = placement.page, slot = placement.slot, ?image, "card placed");

            cards.push(CardReport {
                id: record.id.clone(),
                header: header_text(record),
                placement,
                image,
            });
        }
        self.finish_page(&mut doc, ops, &footer);

        let mut warnings = Vec::new();
        let payload = doc.save(&save_options(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "pdf serializer reported warnings");
        }

        Ok(ExportResult {
            count,
            page_count,
            generated_at,
            footer,
            cards,
            payload,
        })
    }

    fn finish_page(&self, doc: &mut PdfDocument, mut ops: Vec<Op>, footer: &str) {
        let rule = self.geometry.footer_rule();
        draw_rule(&mut ops, &rule, FOOTER_RULE_COLOR, FOOTER_RULE_WIDTH_MM);

        let anchor = self.geometry.footer_anchor();
        let width = estimate_text_width_mm(footer, FOOTER_FONT_SIZE);
        let origin = Point {
            x: anchor.x - width / 2.0,
            y: anchor.y,
        };
        draw_text(&mut ops, footer, origin, FOOTER_FONT_SIZE, BuiltinFont::Helvetica, FOOTER_TEXT_COLOR);

        doc.pages.push(PdfPage::new(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), ops));
    }

    fn draw_card(
        &self,
        doc: &mut PdfDocument,
        ops: &mut Vec<Op>,
        record: &DesignRecord,
        placement: &CardPlacement,
        slot: ImageSlot,
    ) -> CardImage {
        let regions = self.geometry.regions(placement);

        // Background
        ops.push(Op::SetOutlineThickness { pt: Pt(mm_to_pt(CARD_BORDER_WIDTH_MM)) });
        ops.push(Op::SetOutlineColor { col: pdf_color(CARD_BORDER_COLOR) });
        ops.push(Op::SetFillColor { col: pdf_color(CARD_FILL_COLOR) });
        ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![rounded_ring(&regions.card, CARD_RADIUS_MM)],
                mode: PaintMode::FillStroke,
                winding_order: WindingOrder::NonZero,
            },
        });

        // Header
        draw_text(
            ops,
            &header_text(record),
            regions.header_baseline,
            HEADER_FONT_SIZE,
            BuiltinFont::HelveticaBold,
            HEADER_TEXT_COLOR,
        );
        draw_rule(ops, &regions.header_divider, DIVIDER_COLOR, DIVIDER_WIDTH_MM);

        // Image band
        let image = match slot {
            ImageSlot::Missing => CardImage::Missing,
            ImageSlot::Failed(e) => CardImage::Failed(e.to_string()),
            ImageSlot::Loaded(buffer) => embed_image(doc, ops, &buffer, &regions.image_band, &record.id),
        };
        if let Some(text) = image.placeholder() {
            draw_text(
                ops,
                text,
                regions.placeholder_baseline,
                PLACEHOLDER_FONT_SIZE,
                BuiltinFont::Helvetica,
                PLACEHOLDER_TEXT_COLOR,
            );
        }
        draw_rule(ops, &regions.image_divider, DIVIDER_COLOR, DIVIDER_WIDTH_MM);

        // Details
        for (row, (label_at, value_at)) in detail_rows(record).iter().zip(regions.detail_rows) {
            draw_text(ops, row.label, label_at, DETAIL_FONT_SIZE, BuiltinFont::Helvetica, LABEL_TEXT_COLOR);
            draw_text(ops, &row.value, value_at, DETAIL_FONT_SIZE, BuiltinFont::Helvetica, VALUE_TEXT_COLOR);
        }

        image
    }
}

/// Embeds the JPEG scaled to fit `band`. A buffer printpdf cannot decode is
/// treated like a failed fetch.
fn embed_image(
    doc: &mut PdfDocument,
    ops: &mut Vec<Op>,
    buffer: &PixelBuffer,
    band: &Rect,
    id: &str,
) -> CardImage {
    let mut warnings = Vec::new();
    let raw = match printpdf::image::RawImage::decode_from_bytes(&buffer.jpeg, &mut warnings) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(id, error = %e, "image could not be embedded");
            return CardImage::Failed(e);
        }
    };

    let (px_w, px_h) = (raw.width as u32, raw.height as u32);
    let Some(fitted) = fit_image(px_w, px_h, band) else {
        return CardImage::Failed(format!("degenerate image size {}x{}", px_w, px_h));
    };

    let xobject = doc.add_image(&raw);
    // Bottom-left corner of the fitted rect in PDF space.
    let (x, y) = to_pdf_pt(Point {
        x: fitted.x,
        y: fitted.bottom(),
    });
    ops.push(Op::UseXobject {
        id: xobject,
        transform: XObjectTransform {
            translate_x: Some(Pt(x)),
            translate_y: Some(Pt(y)),
            scale_x: Some(mm_to_pt(fitted.width) / px_w as f32),
            scale_y: Some(mm_to_pt(fitted.height) / px_h as f32),
            rotate: None,
            dpi: Some(72.0),
        },
    });

    CardImage::Embedded {
        width: px_w,
        height: px_h,
    }
}

/// Raw text operators are only serialized when `secure` is off.
fn save_options() -> PdfSaveOptions {
    PdfSaveOptions {
        secure: false,
        ..PdfSaveOptions::default()
    }
}

fn pdf_color(color: Rgb8) -> printpdf::color::Color {
    let (r, g, b) = color.unit();
    printpdf::color::Color::Rgb(Rgb::new(r, g, b, None))
}

fn pdf_point(point: Point) -> LinePoint {
    let (x, y) = to_pdf_pt(point);
    LinePoint {
        p: PdfPoint { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn draw_text(ops: &mut Vec<Op>, text: &str, at: Point, size: f32, font: BuiltinFont, color: Rgb8) {
    if text.is_empty() {
        return;
    }
    let (x, y) = to_pdf_pt(at);
    ops.push(Op::StartTextSection);
    ops.push(Op::SetFillColor { col: pdf_color(color) });
    ops.push(Op::SetFontSizeBuiltinFont { size: Pt(size), font });
    ops.push(Op::SetTextMatrix {
        matrix: TextMatrix::Translate(Pt(x), Pt(y)),
    });
    // printpdf passes built-in font text through as UTF-8; the empty write only
    // registers the font resource and the raw `Tj` carries WinAnsi bytes.
    ops.push(Op::WriteTextBuiltinFont {
        items: Vec::new(),
        font,
    });
    ops.push(Op::Unknown {
        key: "Tj".to_string(),
        value: vec![DictItem::String {
            data: encode_win_ansi(text),
            literal: false,
        }],
    });
    ops.push(Op::EndTextSection);
}

fn draw_rule(ops: &mut Vec<Op>, line: &HLine, color: Rgb8, width_mm: f32) {
    ops.push(Op::SetOutlineThickness { pt: Pt(mm_to_pt(width_mm)) });
    ops.push(Op::SetOutlineColor { col: pdf_color(color) });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    pdf_point(Point { x: line.x1, y: line.y }),
                    pdf_point(Point { x: line.x2, y: line.y }),
                ],
            }],
            mode: PaintMode::Stroke,
            winding_order: WindingOrder::NonZero,
        },
    });
}

/// Rounded rectangle as a polyline, clockwise from the top-left corner.
fn rounded_ring(rect: &Rect, radius: f32) -> PolygonRing {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    // (corner centre, start angle) for each corner; angles in y-down space
    let corners = [
        (rect.x + r, rect.y + r, 180.0_f32),
        (rect.right() - r, rect.y + r, 270.0),
        (rect.right() - r, rect.bottom() - r, 0.0),
        (rect.x + r, rect.bottom() - r, 90.0),
    ];

    let mut points = Vec::with_capacity(corners.len() * (CORNER_SEGMENTS + 1));
    for (cx, cy, start) in corners {
        for step in 0..=CORNER_SEGMENTS {
            let angle = (start + 90.0 * step as f32 / CORNER_SEGMENTS as f32).to_radians();
            points.push(pdf_point(Point {
                x: cx + r * angle.cos(),
                y: cy + r * angle.sin(),
            }));
        }
    }

    PolygonRing { points }
}
