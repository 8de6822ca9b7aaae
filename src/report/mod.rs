// ==========================================
// Price list generator - report layer
// ==========================================
// Document generation: page canvas, font metrics, content composition,
// table of contents reconciliation and the final merge.
// ==========================================

pub mod composer;
pub mod error;
pub mod fonts;
pub mod merge;
pub mod page;
pub mod toc;

pub use composer::{ComposedContent, ContentComposer, TocEntry, TocEntryKind};
pub use error::{ReportError, ReportResult};
pub use fonts::{FontFamily, FontStyle};
pub use merge::DocumentMerger;
pub use page::{DocumentBuilder, LinkRect, LinkTarget};
pub use toc::{TocBuilder, TocDocument};

/// Header title rendered on every page of every generated document.
pub const DOCUMENT_TITLE: &str = "Price List";
