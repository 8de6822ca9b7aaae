// ==========================================
// Price list generator - content composer
// ==========================================
// Responsibility: lay the display table out as a sectioned document,
// one chapter per product group, one heading + logo banner + table per
// brand, and collect the chapter entries the table of contents needs.
// Red line: pages recorded here are relative to the content document
// alone; the merge step shifts them by the TOC page count.
// ==========================================

use crate::config::settings::GenerationConfig;
use crate::domain::catalog::{AttributeCatalog, LogoRegistry};
use crate::engine::presenter::DisplayTable;
use crate::report::error::ReportResult;
use crate::report::fonts::{FontFamily, FontStyle};
use crate::report::page::{
    Align, DocumentBuilder, LinkRect, LinkTarget, CELL_PAD_MM, CONTENT_BOTTOM_MARGIN_MM,
    MARGIN_MM, PAGE_HEIGHT_MM,
};
use crate::report::DOCUMENT_TITLE;
use std::path::PathBuf;
use tracing::debug;

const TABLE_FONT_PT: f64 = 7.0;
const TITLE_FONT_PT: f64 = 10.0;
const TITLE_BAND_MM: f64 = 10.0;
const BANNER_X_MM: f64 = 12.0;
const BANNER_HEIGHT_MM: f64 = 20.0;
const PRE_TABLE_GAP_MM: f64 = 5.0;
const POST_TABLE_GAP_MM: f64 = 10.0;
/// One rendered text line inside a table cell.
const LINE_HEIGHT_MM: f64 = 5.0;
const MAX_CELL_LINES: usize = 2;
/// Padding added around measured text when sizing columns.
const WIDTH_PAD_MM: f64 = 2.0;
const PRODUCT_NAME_MIN_WIDTH_MM: f64 = 50.0;
/// Width reduction applied to columns whose header wraps to two lines.
const WRAPPED_HEADER_SHRINK: f64 = 0.8;
/// A chapter heading this close to the page bottom starts a new page.
const CHAPTER_BREAK_RISE_MM: f64 = 70.0;
/// Columns whose cell values may wrap onto a second line.
const LONG_COLUMNS: [&str; 3] = ["panel_colour", "product_name", "panel_design"];

// ==========================================
// TOC bookkeeping
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocEntryKind {
    Group,
    Brand,
}

/// One heading recorded while composing the content document.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    pub kind: TocEntryKind,
    pub title: String,
    /// 1-based page within the content document.
    pub page: usize,
}

/// Finished content document plus everything the TOC and the merge
/// step need to know about it.
pub struct ComposedContent {
    pub bytes: Vec<u8>,
    pub links: Vec<LinkRect>,
    pub pages: usize,
    pub entries: Vec<TocEntry>,
}

// ==========================================
// ContentComposer
// ==========================================
pub struct ContentComposer<'a> {
    config: &'a GenerationConfig,
    attributes: &'a AttributeCatalog,
    logos: &'a LogoRegistry,
    fonts: &'a FontFamily,
    background: Option<PathBuf>,
}

struct TableColumn {
    table_idx: usize,
    key: String,
    header: String,
    width: f64,
    header_lines: Vec<String>,
    wraps: bool,
}

impl<'a> ContentComposer<'a> {
    pub fn new(
        config: &'a GenerationConfig,
        attributes: &'a AttributeCatalog,
        logos: &'a LogoRegistry,
        fonts: &'a FontFamily,
        background: Option<PathBuf>,
    ) -> Self {
        Self {
            config,
            attributes,
            logos,
            fonts,
            background,
        }
    }

    /// Renders the content document. Rows must already be in canonical
    /// group order with brands contiguous inside each group.
    pub fn compose(&self, table: &DisplayTable) -> ReportResult<ComposedContent> {
        let group_idx = table
            .column_index("Group")
            .ok_or_else(|| anyhow::anyhow!("display table has no group column"))?;
        let brand_idx = table
            .column_index("brand")
            .ok_or_else(|| anyhow::anyhow!("display table has no brand column"))?;

        let mut doc = DocumentBuilder::new(
            DOCUMENT_TITLE,
            self.fonts,
            self.background.as_deref(),
            CONTENT_BOTTOM_MARGIN_MM,
        )?;
        let mut entries = Vec::new();

        let all_rows: Vec<&Vec<String>> = table.rows.iter().collect();
        for (group_no, (group, group_rows)) in
            consecutive_runs(&all_rows, group_idx).into_iter().enumerate()
        {
            if group_no > 0 {
                doc.add_page();
            }
            self.chapter_title(
                &mut doc,
                &format!("{group} Products"),
                TocEntryKind::Group,
                &mut entries,
            );
            for (brand, brand_rows) in consecutive_runs(&group_rows, brand_idx) {
                self.chapter_title(&mut doc, brand, TocEntryKind::Brand, &mut entries);
                self.brand_banner(&mut doc, brand);
                doc.ln(PRE_TABLE_GAP_MM);
                self.render_table(&mut doc, table, group, &brand_rows);
                doc.ln(POST_TABLE_GAP_MM);
            }
        }

        debug!(pages = doc.page_no(), headings = entries.len(), "content composed");
        let (bytes, links, pages) = doc.finish()?;
        Ok(ComposedContent {
            bytes,
            links,
            pages,
            entries,
        })
    }

    fn chapter_title(
        &self,
        doc: &mut DocumentBuilder,
        title: &str,
        kind: TocEntryKind,
        entries: &mut Vec<TocEntry>,
    ) {
        if doc.y() > PAGE_HEIGHT_MM - CHAPTER_BREAK_RISE_MM {
            doc.add_page();
        }
        doc.cell(
            0.0,
            TITLE_BAND_MM,
            title,
            FontStyle::Bold,
            TITLE_FONT_PT,
            Align::Left,
            false,
            None,
        );
        doc.ln(TITLE_BAND_MM);
        doc.ln(2.0);
        entries.push(TocEntry {
            kind,
            title: title.to_string(),
            page: doc.page_no(),
        });
    }

    /// Brand logo, falling back to the default logo; the banner band is
    /// reserved even when no image can be drawn.
    fn brand_banner(&self, doc: &mut DocumentBuilder, brand: &str) {
        if let Some(path) = self.logos.resolve(brand) {
            let y = doc.y();
            doc.image_with_height(path, BANNER_X_MM, y, BANNER_HEIGHT_MM);
        }
        doc.ln(BANNER_HEIGHT_MM);
    }

    fn render_table(
        &self,
        doc: &mut DocumentBuilder,
        table: &DisplayTable,
        group: &str,
        rows: &[&Vec<String>],
    ) {
        let columns = self.layout_columns(doc, table, group, rows);
        if columns.is_empty() {
            return;
        }
        let header_height = columns
            .iter()
            .map(|c| c.header_lines.len())
            .max()
            .unwrap_or(1) as f64
            * LINE_HEIGHT_MM;

        if doc.y() + header_height > doc.break_threshold() {
            doc.add_page();
        }
        self.render_header_row(doc, &columns, header_height);

        for row in rows {
            let cells: Vec<Vec<String>> = columns
                .iter()
                .map(|col| {
                    let value = row[col.table_idx].as_str();
                    if col.wraps {
                        wrap_text(value, col.width - 2.0 * CELL_PAD_MM, |t| {
                            doc.text_width(t, FontStyle::Regular, TABLE_FONT_PT)
                        })
                    } else {
                        vec![value.to_string()]
                    }
                })
                .collect();
            let line_count = cells.iter().map(Vec::len).max().unwrap_or(1);
            let row_height = line_count as f64 * LINE_HEIGHT_MM;

            if doc.y() + row_height > doc.break_threshold() {
                doc.add_page();
                self.render_header_row(doc, &columns, header_height);
            }

            let top = doc.y();
            let mut x = MARGIN_MM;
            for (col, lines) in columns.iter().zip(&cells) {
                doc.rect(x, top, col.width, row_height);
                for (line_no, line) in lines.iter().enumerate() {
                    let band_top = top + line_no as f64 * LINE_HEIGHT_MM;
                    let baseline =
                        DocumentBuilder::cell_baseline(band_top, LINE_HEIGHT_MM, TABLE_FONT_PT);
                    doc.text_at(line, FontStyle::Regular, TABLE_FONT_PT, x + CELL_PAD_MM, baseline);
                }
                if col.key == "product_name" {
                    if let Some(url) = self.attributes.product_link(row[col.table_idx].as_str()) {
                        let target = LinkTarget::Url(url.to_string());
                        doc.record_link(x, top, col.width, row_height, target);
                    }
                }
                x += col.width;
            }
            doc.ln(row_height);
        }
    }

    fn render_header_row(&self, doc: &mut DocumentBuilder, columns: &[TableColumn], height: f64) {
        let top = doc.y();
        let mut x = MARGIN_MM;
        for col in columns {
            doc.rect(x, top, col.width, height);
            for (line_no, line) in col.header_lines.iter().enumerate() {
                let band_top = top + line_no as f64 * LINE_HEIGHT_MM;
                let baseline =
                    DocumentBuilder::cell_baseline(band_top, LINE_HEIGHT_MM, TABLE_FONT_PT);
                let text_x =
                    x + (col.width - doc.text_width(line, FontStyle::Bold, TABLE_FONT_PT)) / 2.0;
                doc.text_at(line, FontStyle::Bold, TABLE_FONT_PT, text_x, baseline);
            }
            x += col.width;
        }
        doc.ln(height);
    }

    /// Column layout for one brand sub-table.
    ///
    /// # Rules
    /// - group and brand columns are dropped, they repeat the headings
    /// - columns blank for every row of the sub-table are dropped
    /// - price headers resolve against this section's group
    /// - widths fit the widest of header and values, product name gets
    ///   extra room, everything scales to the printable width
    /// - a header wrapping to two lines costs its column 20% width,
    ///   then widths rescale once more
    fn layout_columns(
        &self,
        doc: &DocumentBuilder,
        table: &DisplayTable,
        group: &str,
        rows: &[&Vec<String>],
    ) -> Vec<TableColumn> {
        let page_width = doc.printable_width();
        let mut columns: Vec<TableColumn> = Vec::new();

        for (idx, column) in table.columns.iter().enumerate() {
            if column.key == "Group" || column.key == "brand" {
                continue;
            }
            if rows.iter().all(|row| row[idx].is_empty()) {
                continue;
            }
            let header = match column.slot {
                Some(slot) => self.config.rules.label_for(group, slot),
                None => column.header.clone(),
            };
            let mut width = doc.text_width(&header, FontStyle::Bold, TABLE_FONT_PT) + WIDTH_PAD_MM;
            for row in rows {
                width = width
                    .max(doc.text_width(&row[idx], FontStyle::Bold, TABLE_FONT_PT) + WIDTH_PAD_MM);
            }
            if column.key == "product_name" {
                width = width.max(PRODUCT_NAME_MIN_WIDTH_MM);
            }
            columns.push(TableColumn {
                table_idx: idx,
                key: column.key.clone(),
                header,
                width,
                header_lines: Vec::new(),
                wraps: LONG_COLUMNS.contains(&column.key.as_str()),
            });
        }
        if columns.is_empty() {
            return columns;
        }

        rescale(&mut columns, page_width);

        let mut any_wrapped = false;
        for col in &mut columns {
            let lines = wrap_text(&col.header, col.width - 2.0 * CELL_PAD_MM, |t| {
                doc.text_width(t, FontStyle::Bold, TABLE_FONT_PT)
            });
            if lines.len() > 1 {
                col.width *= WRAPPED_HEADER_SHRINK;
                any_wrapped = true;
            }
        }
        if any_wrapped {
            rescale(&mut columns, page_width);
        }

        for col in &mut columns {
            col.header_lines = wrap_text(&col.header, col.width - 2.0 * CELL_PAD_MM, |t| {
                doc.text_width(t, FontStyle::Bold, TABLE_FONT_PT)
            });
        }
        columns
    }
}

fn rescale(columns: &mut [TableColumn], page_width: f64) {
    let total: f64 = columns.iter().map(|c| c.width).sum();
    if total <= 0.0 {
        return;
    }
    let scale = page_width / total;
    for col in columns.iter_mut() {
        col.width *= scale;
    }
}

/// Splits rows into runs of equal values in one column, preserving
/// order. Rows are expected pre-sorted, so each value forms one run.
fn consecutive_runs<'r>(
    rows: &[&'r Vec<String>],
    column: usize,
) -> Vec<(&'r str, Vec<&'r Vec<String>>)> {
    let mut runs: Vec<(&'r str, Vec<&'r Vec<String>>)> = Vec::new();
    for &row in rows {
        let value = row[column].as_str();
        match runs.last_mut() {
            Some((current, members)) if *current == value => members.push(row),
            _ => runs.push((value, vec![row])),
        }
    }
    runs
}

/// Greedy word wrap into at most two lines; words past the second line
/// are dropped.
fn wrap_text<F: Fn(&str) -> f64>(text: &str, max_width: f64, measure: F) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
            if lines.len() >= MAX_CELL_LINES {
                return lines;
            }
        }
    }
    lines.push(current);
    lines
}
