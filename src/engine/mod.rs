// ==========================================
// Price list generator - engine layer
// ==========================================
// Responsibility: the pure pipeline stages between the loaded dataset
// and the display table, plus the orchestrator driving a full run.
// Red line: stages stay side-effect free; only the orchestrator
// touches the filesystem.
// ==========================================

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod orchestrator;
pub mod presenter;
pub mod pricing;

pub use aggregate::Aggregator;
pub use error::{PipelineError, PipelineResult};
pub use filter::ProductFilter;
pub use orchestrator::{GenerationResult, PriceListGenerator, PDF_ARTIFACT, XLSX_ARTIFACT};
pub use presenter::{DisplayColumn, DisplayTable, Presenter};
pub use pricing::PricingEngine;
