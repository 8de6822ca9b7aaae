// ==========================================
// Price list generator - spreadsheet export
// ==========================================
// Responsibility: write the display table to a spreadsheet, one row
// per aggregated product, columns in final display order. Values are
// the already-formatted display strings, matching the document.
// ==========================================

use crate::engine::presenter::DisplayTable;
use crate::export::error::ExportResult;
use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

const SHEET_NAME: &str = "Price List";
const MIN_COLUMN_CHARS: f64 = 8.0;
const MAX_COLUMN_CHARS: f64 = 40.0;

pub struct SpreadsheetExporter;

impl SpreadsheetExporter {
    /// Builds the workbook in memory and returns its bytes; the caller
    /// decides where (and how atomically) they land on disk.
    pub fn export(table: &DisplayTable) -> ExportResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let header_format = Format::new().set_bold();
        for (col, header) in table.headers().iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        }
        for (row_no, row) in table.rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                worksheet.write_string((row_no + 1) as u32, col as u16, value)?;
            }
        }
        for (col, width) in Self::column_widths(table).into_iter().enumerate() {
            worksheet.set_column_width(col as u16, width)?;
        }

        debug!(
            rows = table.rows.len(),
            columns = table.columns.len(),
            "spreadsheet built"
        );
        Ok(workbook.save_to_buffer()?)
    }

    fn column_widths(table: &DisplayTable) -> Vec<f64> {
        table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut chars = column.header.chars().count();
                for row in &table.rows {
                    chars = chars.max(row[idx].chars().count());
                }
                (chars as f64 + 2.0).clamp(MIN_COLUMN_CHARS, MAX_COLUMN_CHARS)
            })
            .collect()
    }
}
