// ==========================================
// Price list generator - pipeline orchestrator
// ==========================================
// Responsibility: run one generation end to end, from dataset to the
// delivered PDF and spreadsheet.
// Red line: artifacts are replaced only after the whole run succeeds;
// a failed run must leave a previous run's artifacts untouched.
// ==========================================

use crate::config::settings::{GenerationConfig, SitePaths};
use crate::domain::catalog::{AttributeCatalog, GroupCatalog, LogoRegistry};
use crate::engine::aggregate::Aggregator;
use crate::engine::error::{PipelineError, PipelineResult};
use crate::engine::filter::ProductFilter;
use crate::engine::presenter::Presenter;
use crate::engine::pricing::PricingEngine;
use crate::export::spreadsheet::SpreadsheetExporter;
use crate::importer::dataset_loader::DatasetLoader;
use crate::report::composer::ContentComposer;
use crate::report::fonts::FontFamily;
use crate::report::merge::DocumentMerger;
use crate::report::toc::TocBuilder;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Delivered artifact names, one pair per user.
pub const PDF_ARTIFACT: &str = "price_list_with_selling_prices.pdf";
pub const XLSX_ARTIFACT: &str = "price_list_with_selling_prices.xlsx";

const CONTENT_BACKGROUND_FILE: &str = "content_background.png";
const TOC_BACKGROUND_FILE: &str = "toc_background.png";

// ==========================================
// GenerationResult - outcome of one run
// ==========================================

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub pdf_path: PathBuf,
    pub spreadsheet_path: PathBuf,
    pub row_count: usize,
    pub content_pages: usize,
    pub toc_pages: usize,
    pub elapsed_time: std::time::Duration,
}

// ==========================================
// PriceListGenerator - pipeline driver
// ==========================================

pub struct PriceListGenerator {
    paths: SitePaths,
    groups: GroupCatalog,
    attributes: AttributeCatalog,
}

impl PriceListGenerator {
    pub fn new(paths: SitePaths) -> Self {
        Self {
            paths,
            groups: GroupCatalog::builtin(),
            attributes: AttributeCatalog::builtin(),
        }
    }

    /// Builds a generator for an installation home, honoring the
    /// optional mapping override and product link files next to the
    /// dataset. Missing files fall back to the built-in tables; a file
    /// that fails to parse is ignored with a warning.
    pub fn from_site(paths: SitePaths) -> Self {
        let groups = load_override(&paths.group_mappings_path(), GroupCatalog::from_json_file)
            .unwrap_or_else(GroupCatalog::builtin);
        let mut attributes = load_override(
            &paths.attribute_mappings_path(),
            AttributeCatalog::from_json_file,
        )
        .unwrap_or_else(AttributeCatalog::builtin);
        if let Some(links) = load_override(&paths.product_links_path(), read_product_links) {
            attributes = attributes.with_product_links(links);
        }
        Self::new(paths).with_catalogs(groups, attributes)
    }

    /// Replaces the built-in lookup tables, e.g. with tables loaded
    /// from site-specific JSON files.
    pub fn with_catalogs(mut self, groups: GroupCatalog, attributes: AttributeCatalog) -> Self {
        self.groups = groups;
        self.attributes = attributes;
        self
    }

    /// Runs the full pipeline for one configuration.
    ///
    /// # Returns
    /// Paths of the delivered artifacts and run statistics.
    pub fn generate(&self, config: &GenerationConfig) -> PipelineResult<GenerationResult> {
        let start_time = std::time::Instant::now();
        config.validate()?;
        info!(
            config = %config.name,
            user = %config.user,
            warehouse = %config.warehouse,
            groups = config.selected_groups.len(),
            "generation started"
        );

        // ==========================================
        // Step 1: load the dataset
        // ==========================================
        debug!("step 1: loading dataset");
        let loader = DatasetLoader::new(self.groups.clone(), self.attributes.clone());
        let records = loader.load(&self.paths.dataset_path)?;

        // ==========================================
        // Step 2: filter
        // ==========================================
        debug!("step 2: applying filters");
        let filtered = ProductFilter::apply(config, &records);
        info!(
            input_rows = records.len(),
            filtered_rows = filtered.len(),
            "filters applied"
        );

        // ==========================================
        // Step 3: price
        // ==========================================
        debug!("step 3: computing prices");
        let priced = PricingEngine::price(config, filtered);

        // ==========================================
        // Step 4: aggregate
        // ==========================================
        debug!("step 4: aggregating");
        let rows = Aggregator::aggregate(&self.groups, priced);
        if rows.is_empty() {
            return Err(PipelineError::EmptyResult);
        }
        info!(aggregated_rows = rows.len(), "aggregation finished");

        // ==========================================
        // Step 5: build the display table
        // ==========================================
        let table = Presenter::build_table(config, &rows);

        // ==========================================
        // Step 6: compose the content document
        // ==========================================
        debug!("step 6: composing content document");
        let fonts = FontFamily::load(&self.paths.fonts_dir);
        let logos = LogoRegistry::from_dir(&self.paths.logos_dir);
        let composer = ContentComposer::new(
            config,
            &self.attributes,
            &logos,
            &fonts,
            self.background(CONTENT_BACKGROUND_FILE, config),
        );
        let content = composer.compose(&table)?;
        info!(content_pages = content.pages, "content document composed");

        // ==========================================
        // Step 7: reconcile the table of contents
        // ==========================================
        let toc = if config.filters.skip_toc {
            None
        } else {
            debug!("step 7: reconciling table of contents");
            let builder = TocBuilder::new(&fonts, self.background(TOC_BACKGROUND_FILE, config));
            Some(builder.build(&content.entries)?)
        };
        let toc_pages = toc.as_ref().map(|t| t.pages).unwrap_or(0);

        // ==========================================
        // Step 8: merge and export
        // ==========================================
        debug!("step 8: merging and exporting");
        let pdf_bytes = DocumentMerger::merge(toc.as_ref(), &content)?;
        let xlsx_bytes = SpreadsheetExporter::export(&table)?;

        // ==========================================
        // Step 9: publish
        // ==========================================
        let output_dir = self.paths.user_output_dir(&config.user);
        fs::create_dir_all(&output_dir)?;
        let pdf_path = output_dir.join(PDF_ARTIFACT);
        let spreadsheet_path = output_dir.join(XLSX_ARTIFACT);
        publish(&pdf_path, &pdf_bytes)?;
        publish(&spreadsheet_path, &xlsx_bytes)?;

        let elapsed_time = start_time.elapsed();
        info!(
            pdf = %pdf_path.display(),
            spreadsheet = %spreadsheet_path.display(),
            rows = rows.len(),
            total_pages = toc_pages + content.pages,
            elapsed_ms = elapsed_time.as_millis(),
            "generation finished"
        );
        Ok(GenerationResult {
            pdf_path,
            spreadsheet_path,
            row_count: rows.len(),
            content_pages: content.pages,
            toc_pages,
            elapsed_time,
        })
    }

    /// Background image for a document kind, honoring the user toggle.
    /// A missing file means no background, never an error.
    fn background(&self, file_name: &str, config: &GenerationConfig) -> Option<PathBuf> {
        if config.filters.exclude_background {
            return None;
        }
        let path = self.paths.backgrounds_dir.join(file_name);
        path.is_file().then_some(path)
    }
}

/// Writes through a same-directory scratch file and renames over the
/// target, so readers only ever see a previous or a complete artifact.
fn publish(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("artifact");
    let scratch = dir.join(format!(".{}-{}", file_name, Uuid::new_v4()));
    if let Err(err) = fs::write(&scratch, bytes) {
        let _ = fs::remove_file(&scratch);
        return Err(err);
    }
    if let Err(err) = fs::rename(&scratch, path) {
        let _ = fs::remove_file(&scratch);
        return Err(err);
    }
    Ok(())
}

/// Loads an optional site file. An absent file is fine; a present file
/// that fails to load is skipped with a warning.
fn load_override<T>(path: &Path, load: impl Fn(&Path) -> Result<T, std::io::Error>) -> Option<T> {
    if !path.is_file() {
        return None;
    }
    match load(path) {
        Ok(value) => {
            info!(path = %path.display(), "site override loaded");
            Some(value)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "site override ignored");
            None
        }
    }
}

fn read_product_links(path: &Path) -> Result<HashMap<String, String>, std::io::Error> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
