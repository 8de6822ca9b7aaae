// ==========================================
// Price list generator - export errors
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    // ===== Workbook =====
    #[error("failed to build spreadsheet: {0}")]
    WorkbookError(String),

    // ===== Filesystem =====
    #[error("failed to write export file: {0}")]
    FileWriteError(String),

    // ===== General =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::WorkbookError(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::FileWriteError(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
