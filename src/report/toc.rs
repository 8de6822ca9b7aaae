// ==========================================
// Price list generator - table of contents
// ==========================================
// Responsibility: fit the collected chapter entries into a TOC of at
// most two pages by shrinking font and row height, then render the
// final TOC with every content page number shifted by the TOC's own
// page count. Final page numbers are only knowable once the TOC size
// is fixed, so a throwaway measuring pass always runs first.
// ==========================================

use crate::report::composer::{TocEntry, TocEntryKind};
use crate::report::error::ReportResult;
use crate::report::fonts::{FontFamily, FontStyle};
use crate::report::page::{Align, DocumentBuilder, LinkRect, LinkTarget, TOC_BOTTOM_MARGIN_MM};
use crate::report::DOCUMENT_TITLE;
use std::path::PathBuf;
use tracing::debug;

/// Page budget the TOC must shrink into.
pub const TOC_MAX_PAGES: usize = 2;

const INITIAL_FONT_PT: f64 = 10.0;
const INITIAL_ROW_MM: f64 = 6.0;
const FONT_STEP_PT: f64 = 0.5;
const ROW_STEP_MM: f64 = 0.2;
/// Shrinking stops at these sizes even if the budget is still missed.
const MIN_FONT_PT: f64 = 5.0;
const MIN_ROW_MM: f64 = 4.0;

const TITLE_BAND_MM: f64 = 8.0;
const DASH_LENGTH_MM: f64 = 2.0;

/// Finished TOC document. Link targets already point at final merged
/// page numbers.
pub struct TocDocument {
    pub bytes: Vec<u8>,
    pub links: Vec<LinkRect>,
    pub pages: usize,
}

// ==========================================
// TocBuilder
// ==========================================
pub struct TocBuilder<'a> {
    fonts: &'a FontFamily,
    background: Option<PathBuf>,
}

impl<'a> TocBuilder<'a> {
    pub fn new(fonts: &'a FontFamily, background: Option<PathBuf>) -> Self {
        Self { fonts, background }
    }

    /// Measures, fits and renders the final TOC for the given entries.
    pub fn build(&self, entries: &[TocEntry]) -> ReportResult<TocDocument> {
        let rows = collapse(entries);
        let (font_size, row_height, toc_pages) = self.fit(&rows)?;
        debug!(
            rows = rows.len(),
            font_size, row_height, toc_pages, "table of contents fitted"
        );
        let doc = self.render_document(&rows, toc_pages, font_size, row_height, true)?;
        let (bytes, links, pages) = doc.finish()?;
        Ok(TocDocument { bytes, links, pages })
    }

    /// Measuring pass: renders throwaway documents at decreasing sizes
    /// until the page budget holds or the size floor is reached.
    fn fit(&self, rows: &[(String, String, usize)]) -> ReportResult<(f64, f64, usize)> {
        let mut font_size = INITIAL_FONT_PT;
        let mut row_height = INITIAL_ROW_MM;
        loop {
            let doc = self.render_document(rows, 0, font_size, row_height, false)?;
            let pages = doc.page_no();
            if pages <= TOC_MAX_PAGES || font_size <= MIN_FONT_PT || row_height <= MIN_ROW_MM {
                return Ok((font_size, row_height, pages));
            }
            font_size -= FONT_STEP_PT;
            row_height -= ROW_STEP_MM;
        }
    }

    fn render_document(
        &self,
        rows: &[(String, String, usize)],
        offset: usize,
        font_size: f64,
        row_height: f64,
        record_links: bool,
    ) -> ReportResult<DocumentBuilder> {
        let mut doc = DocumentBuilder::new(
            DOCUMENT_TITLE,
            self.fonts,
            self.background.as_deref(),
            TOC_BOTTOM_MARGIN_MM,
        )?;
        doc.cell(
            0.0,
            TITLE_BAND_MM,
            "Table of Contents",
            FontStyle::Bold,
            font_size,
            Align::Center,
            false,
            None,
        );
        doc.ln(TITLE_BAND_MM);
        doc.ln(1.0);

        let row_font = font_size - 2.0;
        let col_width = doc.printable_width() / 3.0;

        for (group, brand, page) in rows {
            if doc.y() + row_height > doc.break_threshold() {
                doc.add_page();
            }
            let display_page = page + offset;
            let top = doc.y();

            doc.cell(col_width, row_height, group, FontStyle::Bold, row_font, Align::Left, false, None);
            let x_chapter_end = doc.x();
            doc.cell(col_width, row_height, brand, FontStyle::Bold, row_font, Align::Left, false, None);
            let x_brand_end = doc.x();
            let link = record_links.then(|| LinkTarget::Page(display_page));
            doc.cell(
                col_width,
                row_height,
                &display_page.to_string(),
                FontStyle::Bold,
                row_font,
                Align::Right,
                false,
                link,
            );
            let x_page_end = doc.x();

            let leader_y = top + row_height;
            doc.dashed_line(x_chapter_end, leader_y, x_brand_end - x_chapter_end, DASH_LENGTH_MM);
            doc.dashed_line(x_brand_end, leader_y, x_page_end - x_brand_end, DASH_LENGTH_MM);

            doc.ln(row_height);
        }
        doc.ln(2.0);
        Ok(doc)
    }
}

/// Collapses the recorded heading stream into (group, brand, page)
/// rows. The group title appears only on its first brand's row.
fn collapse(entries: &[TocEntry]) -> Vec<(String, String, usize)> {
    let mut rows = Vec::new();
    let mut pending_group = String::new();
    for entry in entries {
        match entry.kind {
            TocEntryKind::Group => pending_group = entry.title.clone(),
            TocEntryKind::Brand => rows.push((
                std::mem::take(&mut pending_group),
                entry.title.clone(),
                entry.page,
            )),
        }
    }
    rows
}
