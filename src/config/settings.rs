// ==========================================
// Price list generator - configuration management
// ==========================================
// A GenerationConfig is a saved, named bundle of group/brand selection,
// warehouse, pricing rules, column selection, and filter predicates.
// Stored as JSON, immutable during a run except through edit-and-resave.
// ==========================================

use crate::config::price_labels::PricingRules;
use crate::domain::types::{Warehouse, MAX_PRICE_SLOTS};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};

// ==========================================
// FilterSpec - declarative row predicates
// ==========================================

/// Optional predicates applied to dataset rows. Predicates without a value
/// are skipped entirely; an empty FilterSpec keeps every row.
///
/// The document toggles (`exclude_background`, `skip_toc`) ride along here
/// because they are part of the same stored filter bundle; the row filter
/// ignores them and the document pipeline reads them directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    // ===== Numeric ranges =====
    #[serde(default)]
    pub power_min: Option<f64>,
    #[serde(default)]
    pub power_max: Option<f64>,
    #[serde(default)]
    pub length_min: Option<f64>,
    #[serde(default)]
    pub length_max: Option<f64>,
    #[serde(default)]
    pub width_min: Option<f64>,
    #[serde(default)]
    pub width_max: Option<f64>,
    #[serde(default)]
    pub height_min: Option<f64>,
    #[serde(default)]
    pub height_max: Option<f64>,
    #[serde(default)]
    pub available_min: Option<f64>,
    #[serde(default)]
    pub available_max: Option<f64>,

    // ===== Set membership =====
    #[serde(default)]
    pub colours: Vec<String>,
    #[serde(default)]
    pub designs: Vec<String>,

    // ===== Delivery window =====
    /// Inclusive month bounds, "YYYY-MM".
    #[serde(default)]
    pub delivery_month_from: Option<String>,
    #[serde(default)]
    pub delivery_month_to: Option<String>,
    /// Keep only rows with no delivery month. Takes precedence over the
    /// month bounds when both are supplied.
    #[serde(default)]
    pub no_delivery_date: bool,

    // ===== Availability density =====
    /// Upper bound on available / pcs_pal (full pallets on stock).
    #[serde(default)]
    pub max_pallets: Option<f64>,
    /// Upper bound on available / pcs_ctn (full cartons on stock).
    #[serde(default)]
    pub max_cartons: Option<f64>,

    // ===== Toggles =====
    /// Keep only rows whose status marks them urgent.
    #[serde(default)]
    pub urgent_only: bool,
    /// Keep only rows whose two largest dimensions cover at most 2 m2.
    #[serde(default)]
    pub small_area_only: bool,
    /// Suppress background images in the generated document.
    #[serde(default)]
    pub exclude_background: bool,
    /// Deliver the content document without a table of contents.
    #[serde(default)]
    pub skip_toc: bool,
}

// ==========================================
// GenerationConfig - one saved configuration
// ==========================================

/// A saved configuration bundle owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub name: String,

    /// Owning user; output artifacts are scoped to this name.
    pub user: String,

    /// Display groups included in the run, e.g. ["Panels", "Inverters"].
    pub selected_groups: Vec<String>,

    /// Brands included in the run; ignored when `select_all_brands` is set.
    #[serde(default)]
    pub selected_brands: Vec<String>,
    #[serde(default)]
    pub select_all_brands: bool,

    pub warehouse: Warehouse,

    /// Number of derived price columns, 0..=4.
    pub num_prices: usize,

    /// Per-group pricing rules ("coefficients").
    #[serde(default)]
    pub rules: PricingRules,

    /// Raw column keys to include; empty selects every display column.
    #[serde(default)]
    pub selected_columns: Vec<String>,

    #[serde(default)]
    pub filters: FilterSpec,
}

impl GenerationConfig {
    /// Loads a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let config: GenerationConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Structural validation independent of any dataset.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.selected_groups.is_empty() {
            return Err("configuration selects no product groups".into());
        }
        if self.num_prices > MAX_PRICE_SLOTS {
            return Err(format!(
                "num_prices {} exceeds the maximum of {}",
                self.num_prices, MAX_PRICE_SLOTS
            )
            .into());
        }
        self.rules.validate().map_err(|e| -> Box<dyn Error> { e.into() })?;
        Ok(())
    }

    /// True when the given brand participates in the run.
    pub fn brand_selected(&self, brand: &str) -> bool {
        self.select_all_brands
            || self.selected_brands.is_empty()
            || self.selected_brands.iter().any(|b| b == brand)
    }
}

// ==========================================
// SitePaths - on-disk layout of one installation
// ==========================================

/// Environment variable overriding the installation home directory.
pub const HOME_ENV_VAR: &str = "PRICELIST_GEN_HOME";

/// Resolved locations of the dataset, image assets, fonts, and outputs.
#[derive(Debug, Clone)]
pub struct SitePaths {
    pub dataset_path: PathBuf,
    pub logos_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub backgrounds_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl SitePaths {
    /// Standard layout under an installation home directory.
    pub fn from_home(home: &Path) -> Self {
        Self {
            dataset_path: home.join("data").join("data.csv"),
            logos_dir: home.join("logos"),
            fonts_dir: home.join("fonts"),
            backgrounds_dir: home.join("backgrounds"),
            output_dir: home.join("generated_files"),
        }
    }

    /// Optional group mapping override file, next to the dataset.
    pub fn group_mappings_path(&self) -> PathBuf {
        self.dataset_path.with_file_name("group_mappings.json")
    }

    /// Optional attribute mapping override file, next to the dataset.
    pub fn attribute_mappings_path(&self) -> PathBuf {
        self.dataset_path.with_file_name("attribute_mappings.json")
    }

    /// Optional product name to external URL registry.
    pub fn product_links_path(&self) -> PathBuf {
        self.dataset_path.with_file_name("product_links.json")
    }

    /// Resolves the default home directory.
    ///
    /// Order: the PRICELIST_GEN_HOME environment variable, the user data
    /// directory, the current directory as a last resort.
    pub fn resolve_default() -> Self {
        if let Ok(home) = std::env::var(HOME_ENV_VAR) {
            let trimmed = home.trim();
            if !trimmed.is_empty() {
                return Self::from_home(Path::new(trimmed));
            }
        }

        let mut home = PathBuf::from(".");
        if let Some(data_dir) = dirs::data_dir() {
            #[cfg(debug_assertions)]
            {
                home = data_dir.join("pricelist-gen-dev");
            }
            #[cfg(not(debug_assertions))]
            {
                home = data_dir.join("pricelist-gen");
            }
        }

        Self::from_home(&home)
    }

    /// Output directory scoped to one user; concurrent runs for different
    /// users never write to the same location.
    pub fn user_output_dir(&self, user: &str) -> PathBuf {
        self.output_dir.join(sanitize_user_dir(user))
    }
}

/// Restricts a user name to a safe directory component.
fn sanitize_user_dir(user: &str) -> String {
    let cleaned: String = user
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "anonymous".to_string()
    } else {
        cleaned
    }
}
