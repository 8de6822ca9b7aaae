// ==========================================
// Price list generator - domain model layer
// ==========================================
// Defines the dataset row types, lookup catalogs, and shared value types.
// No file access beyond catalog loading, no pipeline logic.
// ==========================================

pub mod catalog;
pub mod record;
pub mod types;

// Re-export core types
pub use catalog::{
    AttributeCatalog, GroupCatalog, LogoRegistry, DEFAULT_LOGO_BRAND, UNKNOWN_GROUP,
};
pub use record::{
    is_blank_value, AggregatedRow, PricedRecord, ProductRecord, EMPTY_VALUE_SENTINELS,
    REQUIRED_COLUMNS,
};
pub use types::{PriceOp, Warehouse, MAX_PRICE_SLOTS};
