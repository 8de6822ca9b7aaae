// ==========================================
// Price list generator - pipeline error types
// ==========================================

use crate::export::error::ExportError;
use crate::importer::error::ImportError;
use crate::report::error::ReportError;
use thiserror::Error;

/// Generation pipeline error type.
#[derive(Error, Debug)]
pub enum PipelineError {
    // ===== Configuration errors =====
    #[error("configuration invalid: {0}")]
    ConfigError(String),

    // ===== Dataset errors =====
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("no products match the configured groups and filters")]
    EmptyResult,

    // ===== Document errors =====
    #[error(transparent)]
    Report(#[from] ReportError),

    // ===== Export errors =====
    #[error(transparent)]
    Export(#[from] ExportError),

    // ===== General errors =====
    #[error("artifact write failed: {0}")]
    ArtifactWriteError(String),

    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::ArtifactWriteError(err.to_string())
    }
}

impl From<Box<dyn std::error::Error>> for PipelineError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        PipelineError::ConfigError(err.to_string())
    }
}

/// Result type alias.
pub type PipelineResult<T> = Result<T, PipelineError>;
