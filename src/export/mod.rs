// ==========================================
// Price list generator - export layer
// ==========================================

pub mod error;
pub mod spreadsheet;

pub use error::{ExportError, ExportResult};
pub use spreadsheet::SpreadsheetExporter;
