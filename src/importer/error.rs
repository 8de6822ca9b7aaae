// ==========================================
// Price list generator - import module error types
// ==========================================

use thiserror::Error;

/// Import module error type.
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (only .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("csv parse failed: {0}")]
    CsvParseError(String),

    #[error("workbook has no readable worksheet: {0}")]
    SheetNotFound(String),

    // ===== Schema errors =====
    #[error("dataset is missing required columns: {0}")]
    MissingColumns(String),

    #[error("dataset is empty: {0}")]
    EmptyDataset(String),

    // ===== Refresh errors =====
    #[error("refresh token mismatch")]
    TokenMismatch,

    #[error("refresh payload parse failed: {0}")]
    PayloadParseError(String),

    #[error("refresh payload is missing column: {0}")]
    MissingPayloadColumn(String),

    // ===== General errors =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::PayloadParseError(err.to_string())
    }
}

/// Result type alias.
pub type ImportResult<T> = Result<T, ImportError>;
