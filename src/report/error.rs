// ==========================================
// Price list generator - report module error types
// ==========================================

use thiserror::Error;

/// Report module error type.
#[derive(Error, Debug)]
pub enum ReportError {
    // ===== Font errors =====
    #[error("font load failed: {0}")]
    FontError(String),

    // ===== Document errors =====
    #[error("pdf build failed: {0}")]
    PdfError(String),

    #[error("image load failed: {0}")]
    ImageError(String),

    // ===== Merge errors =====
    #[error("pdf merge failed: {0}")]
    MergeError(String),

    #[error("document has no pages")]
    EmptyDocument,

    // ===== General errors =====
    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::FileReadError(err.to_string())
    }
}

impl From<printpdf::Error> for ReportError {
    fn from(err: printpdf::Error) -> Self {
        ReportError::PdfError(err.to_string())
    }
}

impl From<lopdf::Error> for ReportError {
    fn from(err: lopdf::Error) -> Self {
        ReportError::MergeError(err.to_string())
    }
}

/// Result type alias.
pub type ReportResult<T> = Result<T, ReportError>;
