// ==========================================
// Price list generator - import layer
// ==========================================
// Responsibility: external data ingestion. Loads the product dataset
// from CSV/Excel and accepts authenticated dataset refresh pushes.
// ==========================================

pub mod dataset_loader;
pub mod error;
pub mod refresh;

pub use dataset_loader::DatasetLoader;
pub use error::{ImportError, ImportResult};
pub use refresh::{DatasetRefresher, REFRESH_TOKEN_ENV_VAR};
