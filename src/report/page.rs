// ==========================================
// Price list generator - page canvas
// ==========================================
// Responsibility: a cursor-based drawing surface over a PDF document.
// Landscape A4, top-down coordinates in millimeters; every page carries
// the document header, the page-number footer, and the optional
// background image. Link rectangles are recorded here and materialized
// as annotations after the merge step.
// ==========================================

use crate::report::error::ReportResult;
use crate::report::fonts::{FontFamily, FontSource, FontStyle, PT_TO_MM};
use printpdf::image_crate::GenericImageView;
use printpdf::{
    Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point,
};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::warn;

// ===== Page geometry (landscape A4) =====
pub const PAGE_WIDTH_MM: f64 = 297.0;
pub const PAGE_HEIGHT_MM: f64 = 210.0;
pub const MARGIN_MM: f64 = 10.0;

/// Bottom margin triggering the automatic page break on content pages.
pub const CONTENT_BOTTOM_MARGIN_MM: f64 = 20.0;
/// Tighter bottom margin used by the table of contents.
pub const TOC_BOTTOM_MARGIN_MM: f64 = 15.0;

/// Height of the centered document header band.
const HEADER_BAND_MM: f64 = 10.0;
/// The footer band starts this far above the page bottom.
const FOOTER_RISE_MM: f64 = 15.0;

/// Horizontal inset between a cell border and its text.
pub const CELL_PAD_MM: f64 = 1.0;

const IMAGE_DPI: f64 = 300.0;
const BORDER_THICKNESS_MM: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

// ==========================================
// Link recording
// ==========================================

#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    /// External URL.
    Url(String),
    /// 1-based page number in the final merged document.
    Page(usize),
}

/// A clickable rectangle, in top-down page millimeters.
#[derive(Debug, Clone)]
pub struct LinkRect {
    /// 1-based page number within the document being built.
    pub page: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub target: LinkTarget,
}

// ==========================================
// DocumentBuilder - one PDF document in progress
// ==========================================
pub struct DocumentBuilder {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: HashMap<FontStyle, IndirectFontRef>,
    family: FontFamily,
    title: String,
    background: Option<PathBuf>,
    bottom_margin: f64,
    cursor_x: f64,
    cursor_y: f64,
    page_count: usize,
    links: Vec<LinkRect>,
}

impl DocumentBuilder {
    /// Opens a document with its first page already decorated.
    pub fn new(
        title: &str,
        family: &FontFamily,
        background: Option<&Path>,
        bottom_margin: f64,
    ) -> ReportResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM), "base");

        let mut fonts = HashMap::new();
        for style in [FontStyle::Regular, FontStyle::Bold, FontStyle::Italic] {
            let font_ref = match &family.variant(style).source {
                FontSource::External(path) => doc.add_external_font(File::open(path)?)?,
                FontSource::Builtin(builtin) => doc.add_builtin_font(*builtin)?,
            };
            fonts.insert(style, font_ref);
        }

        let layer_ref = doc.get_page(page).get_layer(layer);
        let mut builder = Self {
            doc,
            layer: layer_ref,
            fonts,
            family: family.clone(),
            title: title.to_string(),
            background: background.map(Path::to_path_buf),
            bottom_margin,
            cursor_x: MARGIN_MM,
            cursor_y: MARGIN_MM + HEADER_BAND_MM,
            page_count: 1,
            links: Vec::new(),
        };
        builder.decorate_page();
        Ok(builder)
    }

    // ===== Cursor and geometry =====

    pub fn page_no(&self) -> usize {
        self.page_count
    }

    pub fn x(&self) -> f64 {
        self.cursor_x
    }

    pub fn y(&self) -> f64 {
        self.cursor_y
    }

    pub fn set_y(&mut self, y: f64) {
        self.cursor_y = y;
    }

    /// Line feed: back to the left margin, down by `height`.
    pub fn ln(&mut self, height: f64) {
        self.cursor_x = MARGIN_MM;
        self.cursor_y += height;
    }

    pub fn printable_width(&self) -> f64 {
        PAGE_WIDTH_MM - 2.0 * MARGIN_MM
    }

    /// Lowest cursor position before a break is due.
    pub fn break_threshold(&self) -> f64 {
        PAGE_HEIGHT_MM - self.bottom_margin
    }

    pub fn text_width(&self, text: &str, style: FontStyle, font_size_pt: f64) -> f64 {
        self.family.text_width_mm(text, style, font_size_pt)
    }

    /// Baseline position for text vertically centered in a cell.
    pub fn cell_baseline(top: f64, height: f64, font_size_pt: f64) -> f64 {
        top + 0.5 * height + 0.3 * font_size_pt * PT_TO_MM
    }

    // ===== Pages =====

    /// Starts a fresh decorated page and resets the cursor.
    pub fn add_page(&mut self) {
        let (page, layer) = self.doc.add_page(mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM), "base");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page_count += 1;
        self.cursor_x = MARGIN_MM;
        self.cursor_y = MARGIN_MM + HEADER_BAND_MM;
        self.decorate_page();
    }

    /// Background, header band and footer for the current page.
    fn decorate_page(&mut self) {
        if let Some(background) = self.background.clone() {
            self.full_page_image(&background);
        }

        let title = self.title.clone();
        let baseline = Self::cell_baseline(MARGIN_MM, HEADER_BAND_MM, 10.0);
        let x = MARGIN_MM + (self.printable_width() - self.text_width(&title, FontStyle::Bold, 10.0)) / 2.0;
        self.text_at(&title, FontStyle::Bold, 10.0, x, baseline);

        let footer = format!("Page {}", self.page_count);
        let footer_top = PAGE_HEIGHT_MM - FOOTER_RISE_MM;
        let baseline = Self::cell_baseline(footer_top, HEADER_BAND_MM, 8.0);
        let x = MARGIN_MM + (self.printable_width() - self.text_width(&footer, FontStyle::Italic, 8.0)) / 2.0;
        self.text_at(&footer, FontStyle::Italic, 8.0, x, baseline);
    }

    // ===== Drawing primitives =====

    /// Raw text at an absolute position; does not move the cursor.
    pub fn text_at(&mut self, text: &str, style: FontStyle, font_size_pt: f64, x: f64, baseline_y: f64) {
        if text.is_empty() {
            return;
        }
        let font = &self.fonts[&style];
        self.layer
            .use_text(text, font_size_pt as _, mm(x), mm(PAGE_HEIGHT_MM - baseline_y), font);
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, thickness_mm: f64) {
        self.layer.set_outline_thickness(mm_to_pt(thickness_mm) as _);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(mm(x1), mm(PAGE_HEIGHT_MM - y1)), false),
                (Point::new(mm(x2), mm(PAGE_HEIGHT_MM - y2)), false),
            ],
            is_closed: false,
        });
    }

    /// Horizontal dashed line with equal dash and gap lengths.
    pub fn dashed_line(&mut self, x: f64, y: f64, width: f64, dash_length: f64) {
        let end = x + width;
        let mut start = x;
        while start < end {
            self.line(start, y, (start + dash_length).min(end), y, BORDER_THICKNESS_MM);
            start += dash_length * 2.0;
        }
    }

    /// Rectangle outline in top-down coordinates.
    pub fn rect(&mut self, x: f64, y_top: f64, width: f64, height: f64) {
        self.layer.set_outline_thickness(mm_to_pt(BORDER_THICKNESS_MM) as _);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(mm(x), mm(PAGE_HEIGHT_MM - y_top)), false),
                (Point::new(mm(x + width), mm(PAGE_HEIGHT_MM - y_top)), false),
                (
                    Point::new(mm(x + width), mm(PAGE_HEIGHT_MM - y_top - height)),
                    false,
                ),
                (Point::new(mm(x), mm(PAGE_HEIGHT_MM - y_top - height)), false),
            ],
            is_closed: true,
        });
    }

    /// Bordered single-line cell. A zero width extends to the right
    /// margin. Advances the cursor horizontally, like a table cell.
    #[allow(clippy::too_many_arguments)]
    pub fn cell(
        &mut self,
        width: f64,
        height: f64,
        text: &str,
        style: FontStyle,
        font_size_pt: f64,
        align: Align,
        border: bool,
        link: Option<LinkTarget>,
    ) {
        let width = if width == 0.0 {
            PAGE_WIDTH_MM - MARGIN_MM - self.cursor_x
        } else {
            width
        };
        let (x, y) = (self.cursor_x, self.cursor_y);

        if border {
            self.rect(x, y, width, height);
        }

        let text_w = self.text_width(text, style, font_size_pt);
        let text_x = match align {
            Align::Left => x + CELL_PAD_MM,
            Align::Center => x + (width - text_w) / 2.0,
            Align::Right => x + width - text_w - CELL_PAD_MM,
        };
        let baseline = Self::cell_baseline(y, height, font_size_pt);
        self.text_at(text, style, font_size_pt, text_x, baseline);

        if let Some(target) = link {
            self.record_link(x, y, width, height, target);
        }
        self.cursor_x += width;
    }

    pub fn record_link(&mut self, x: f64, y: f64, width: f64, height: f64, target: LinkTarget) {
        self.links.push(LinkRect {
            page: self.page_count,
            x,
            y,
            width,
            height,
            target,
        });
    }

    // ===== Images =====

    /// Draws an image scaled to a target height, preserving aspect
    /// ratio. Returns the drawn width, or None when the file cannot be
    /// loaded (layout continues without it).
    pub fn image_with_height(&mut self, path: &Path, x: f64, y_top: f64, height_mm: f64) -> Option<f64> {
        let dynamic = match printpdf::image_crate::open(path) {
            Ok(img) => img,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "image skipped");
                return None;
            }
        };
        let (px_w, px_h) = dynamic.dimensions();
        if px_w == 0 || px_h == 0 {
            warn!(path = %path.display(), "image skipped: empty");
            return None;
        }
        let native_w = f64::from(px_w) / IMAGE_DPI * 25.4;
        let native_h = f64::from(px_h) / IMAGE_DPI * 25.4;
        let scale = height_mm / native_h;
        let drawn_w = native_w * scale;

        self.place_image(dynamic, x, PAGE_HEIGHT_MM - y_top - height_mm, scale, scale);
        Some(drawn_w)
    }

    /// Stretches an image across the whole page, beneath later content.
    fn full_page_image(&mut self, path: &Path) {
        let dynamic = match printpdf::image_crate::open(path) {
            Ok(img) => img,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "background skipped");
                return;
            }
        };
        let (px_w, px_h) = dynamic.dimensions();
        if px_w == 0 || px_h == 0 {
            return;
        }
        let scale_x = PAGE_WIDTH_MM / (f64::from(px_w) / IMAGE_DPI * 25.4);
        let scale_y = PAGE_HEIGHT_MM / (f64::from(px_h) / IMAGE_DPI * 25.4);
        self.place_image(dynamic, 0.0, 0.0, scale_x, scale_y);
    }

    fn place_image(
        &mut self,
        dynamic: printpdf::image_crate::DynamicImage,
        x: f64,
        y_bottom_up: f64,
        scale_x: f64,
        scale_y: f64,
    ) {
        // Alpha channels are not representable in the embedded XObject.
        let rgb = printpdf::image_crate::DynamicImage::ImageRgb8(dynamic.to_rgb8());
        let image = Image::from_dynamic_image(&rgb);
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(mm(x)),
                translate_y: Some(mm(y_bottom_up)),
                scale_x: Some(scale_x as _),
                scale_y: Some(scale_y as _),
                dpi: Some(IMAGE_DPI as _),
                ..Default::default()
            },
        );
    }

    // ===== Output =====

    /// Serializes the document; returns bytes, recorded link rectangles
    /// and the page count.
    pub fn finish(self) -> ReportResult<(Vec<u8>, Vec<LinkRect>, usize)> {
        let links = self.links;
        let pages = self.page_count;
        let bytes = self.doc.save_to_bytes()?;
        Ok((bytes, links, pages))
    }
}

fn mm(value: f64) -> Mm {
    Mm(value as _)
}

fn mm_to_pt(value: f64) -> f64 {
    value * 72.0 / 25.4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_advances_cursor() {
        let family = FontFamily::builtin();
        let mut doc = DocumentBuilder::new("Price List", &family, None, CONTENT_BOTTOM_MARGIN_MM)
            .unwrap();
        let y = doc.y();
        doc.cell(40.0, 10.0, "a", FontStyle::Regular, 7.0, Align::Left, true, None);
        doc.cell(40.0, 10.0, "b", FontStyle::Regular, 7.0, Align::Left, true, None);
        assert_eq!(doc.x(), MARGIN_MM + 80.0);
        assert_eq!(doc.y(), y);
        doc.ln(10.0);
        assert_eq!(doc.x(), MARGIN_MM);
        assert_eq!(doc.y(), y + 10.0);
    }

    #[test]
    fn test_add_page_resets_cursor_and_counts() {
        let family = FontFamily::builtin();
        let mut doc =
            DocumentBuilder::new("Price List", &family, None, CONTENT_BOTTOM_MARGIN_MM).unwrap();
        assert_eq!(doc.page_no(), 1);
        doc.ln(100.0);
        doc.add_page();
        assert_eq!(doc.page_no(), 2);
        assert_eq!(doc.y(), MARGIN_MM + 10.0);
    }

    #[test]
    fn test_links_survive_finish() {
        let family = FontFamily::builtin();
        let mut doc =
            DocumentBuilder::new("Price List", &family, None, CONTENT_BOTTOM_MARGIN_MM).unwrap();
        doc.cell(
            40.0,
            10.0,
            "product",
            FontStyle::Regular,
            7.0,
            Align::Left,
            true,
            Some(LinkTarget::Url("https://example.com/p".to_string())),
        );
        let (bytes, links, pages) = doc.finish().unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(pages, 1);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].page, 1);
    }
}
