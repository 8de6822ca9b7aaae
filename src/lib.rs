// ==========================================
// Price list generator - core library
// ==========================================
// Pipeline: dataset -> filter -> pricing -> aggregation -> sectioned
// PDF with a reconciled table of contents, plus a spreadsheet export.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - records, catalogs, shared types
pub mod domain;

// Import layer - dataset loading and authenticated refresh
pub mod importer;

// Engine layer - pipeline stages and orchestration
pub mod engine;

// Configuration layer - saved configurations and site paths
pub mod config;

// Report layer - page canvas, composition, TOC, merge
pub mod report;

// Export layer - spreadsheet output
pub mod export;

// Logging setup
pub mod logging;

// ==========================================
// Core re-exports
// ==========================================

pub use config::{FilterSpec, GenerationConfig, PricingRules, SitePaths};
pub use domain::{
    AggregatedRow, AttributeCatalog, GroupCatalog, LogoRegistry, PriceOp, ProductRecord,
    Warehouse,
};
pub use engine::{
    Aggregator, DisplayTable, GenerationResult, PipelineError, PipelineResult, Presenter,
    PriceListGenerator, PricingEngine, ProductFilter,
};
pub use export::SpreadsheetExporter;
pub use importer::{DatasetLoader, DatasetRefresher, ImportError};
pub use report::{ContentComposer, DocumentMerger, TocBuilder};

// ==========================================
// Constants
// ==========================================

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const APP_NAME: &str = "Price List Generator";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
