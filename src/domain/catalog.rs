// ==========================================
// Price list generator - lookup catalogs
// ==========================================
// Immutable mapping tables loaded once per generation run and passed
// explicitly to the pipeline stages. No process-wide mutable registry.
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ==========================================
// GroupCatalog - nomenclature prefix -> display group
// ==========================================

/// Display group assigned to nomenclature prefixes with no mapping entry.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Maps the 3-letter nomenclature prefix to a display group and fixes the
/// canonical ordering of groups in every output document.
///
/// The canonical ordering is the declaration order of the mapping entries,
/// never alphabetical and never input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCatalog {
    entries: Vec<(String, String)>,
}

impl GroupCatalog {
    /// Built-in nomenclature mapping.
    pub fn builtin() -> Self {
        let entries = [
            ("PAN", "Panels"),
            ("INV", "Inverters"),
            ("BAT", "Batteries"),
            ("EVC", "EV Chargers"),
            ("ACC", "Accessories"),
            ("CON", "Constructions"),
            ("PPS", "Portable Power Station"),
            ("ARC", "Air Conditions"),
            ("HEP", "Heat Pumps"),
            ("SMF", "SmartFlowers"),
            ("CAB", "Cables"),
        ];
        Self {
            entries: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Loads a mapping override from a JSON file of `[[prefix, group], ...]`
    /// pairs. Entry order defines the canonical group ordering.
    pub fn from_json_file(path: &Path) -> Result<Self, std::io::Error> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<(String, String)> = serde_json::from_str(&raw)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(Self { entries })
    }

    /// Resolves a raw nomenclature code to its display group.
    ///
    /// Only the first three characters of the code are significant. Unmapped
    /// prefixes resolve to the "Unknown" sentinel, never an error.
    pub fn resolve(&self, nomenclature_code: &str) -> String {
        let prefix: String = nomenclature_code.trim().chars().take(3).collect();
        self.entries
            .iter()
            .find(|(key, _)| *key == prefix)
            .map(|(_, group)| group.clone())
            .unwrap_or_else(|| UNKNOWN_GROUP.to_string())
    }

    /// Canonical ordering of display groups.
    pub fn canonical_groups(&self) -> Vec<String> {
        self.entries.iter().map(|(_, g)| g.clone()).collect()
    }

    /// Rank of a display group in the canonical ordering.
    ///
    /// Unknown groups rank after every known group.
    pub fn rank(&self, group: &str) -> usize {
        self.entries
            .iter()
            .position(|(_, g)| g == group)
            .unwrap_or(usize::MAX)
    }
}

// ==========================================
// AttributeCatalog - coded attributes -> display values
// ==========================================

/// Maps coded panel attribute values (colour and design codes) to display
/// strings and carries the external product reference registry.
///
/// Codes without a mapping entry render blank, matching the dataset
/// convention that unmapped attribute codes carry no display value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeCatalog {
    panel_attributes: HashMap<String, String>,
    #[serde(default)]
    product_links: HashMap<String, String>,
}

impl AttributeCatalog {
    /// Built-in panel attribute mapping.
    pub fn builtin() -> Self {
        let panel_attributes = [
            ("GLASS", "Glass foil"),
            ("2GLASS", "Double glass"),
            ("BIF", "Bifacial"),
            ("FLEXIBLE", "Flexible"),
            ("GRID", "Grid feed-in"),
            ("HYBRID", "Hybrid"),
            ("3PH", "Triple phase"),
            ("1PH", "Single phase"),
            ("BF", "Black Frame"),
            ("FB", "Full Black"),
            ("FF_ANTHRACITE", "Frameless Full Anthracite (G001)"),
            ("FF_BLACK", "Frameless Full Black (B001)"),
            ("FF_BLUE", "Frameless Full Blue (7003)"),
            ("FF_BRONZE", "Frameless Full Bronze (3001)"),
            ("FF_DARK_BLUE", "Frameless Full Dark blue (7002)"),
            ("FF_GOLD", "Frameless Full Gold (3002)"),
            ("FF_GREEN", "Frameless Full Green (4002)"),
            ("FF_GREY", "Frameless Full Grey (G002)"),
            ("FF_LIGHT_BLUE", "Frameless Full Light blue (7004)"),
            ("FF_LIGHT_GREEN", "Frameless Full Light green (4001)"),
            ("FF_LIGHT_GREY", "Frameless Full Light grey (G004)"),
            ("SF", "Silver Frame"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            panel_attributes,
            product_links: HashMap::new(),
        }
    }

    /// Loads the catalog from a JSON file with `panel_attributes` and
    /// optional `product_links` maps.
    pub fn from_json_file(path: &Path) -> Result<Self, std::io::Error> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Replaces the product link registry.
    pub fn with_product_links(mut self, links: HashMap<String, String>) -> Self {
        self.product_links = links;
        self
    }

    /// Display value for a coded panel attribute. Unmapped codes are blank.
    pub fn panel_attribute(&self, code: &str) -> String {
        self.panel_attributes
            .get(code.trim())
            .cloned()
            .unwrap_or_default()
    }

    /// External reference URL for an exact product name, if registered.
    pub fn product_link(&self, product_name: &str) -> Option<&str> {
        self.product_links.get(product_name).map(|s| s.as_str())
    }
}

// ==========================================
// LogoRegistry - brand name -> logo image path
// ==========================================

/// Brand whose logo serves as the fallback for unregistered brands.
pub const DEFAULT_LOGO_BRAND: &str = "NANOSUN";

const LOGO_EXTENSIONS: [&str; 3] = ["jpeg", "png", "jpg"];

/// Resolves brand names to logo image files by exact file-stem match.
#[derive(Debug, Clone, Default)]
pub struct LogoRegistry {
    logos: HashMap<String, PathBuf>,
}

impl LogoRegistry {
    /// Builds the registry by scanning a directory for image files.
    /// The file stem (case-sensitive) is the brand key.
    ///
    /// A missing or unreadable directory yields an empty registry; logo
    /// lookups then resolve to nothing and layout proceeds without images.
    pub fn from_dir(dir: &Path) -> Self {
        let mut logos = HashMap::new();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "logo directory not readable");
                return Self { logos };
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| LOGO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if !is_image {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                logos.insert(stem.to_string(), path.clone());
            }
        }

        Self { logos }
    }

    /// Resolves the logo path for a brand: exact match first, then the
    /// default fallback brand. Returns None when neither is registered.
    pub fn resolve(&self, brand: &str) -> Option<&Path> {
        self.logos
            .get(brand)
            .or_else(|| self.logos.get(DEFAULT_LOGO_BRAND))
            .map(|p| p.as_path())
    }

    pub fn is_empty(&self) -> bool {
        self.logos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_resolution_uses_prefix() {
        let catalog = GroupCatalog::builtin();
        assert_eq!(catalog.resolve("PAN-400-FB"), "Panels");
        assert_eq!(catalog.resolve("INVERTER"), "Inverters");
        assert_eq!(catalog.resolve("XYZ123"), UNKNOWN_GROUP);
        assert_eq!(catalog.resolve(""), UNKNOWN_GROUP);
    }

    #[test]
    fn test_canonical_rank_order() {
        let catalog = GroupCatalog::builtin();
        assert!(catalog.rank("Panels") < catalog.rank("Inverters"));
        assert!(catalog.rank("Cables") < catalog.rank(UNKNOWN_GROUP));
        assert_eq!(catalog.canonical_groups()[0], "Panels");
    }

    #[test]
    fn test_panel_attribute_unmapped_is_blank() {
        let catalog = AttributeCatalog::builtin();
        assert_eq!(catalog.panel_attribute("FB"), "Full Black");
        assert_eq!(catalog.panel_attribute("NO_SUCH_CODE"), "");
    }

    #[test]
    fn test_product_link_lookup() {
        let mut links = HashMap::new();
        links.insert("Panel X".to_string(), "https://example.com/x".to_string());
        let catalog = AttributeCatalog::builtin().with_product_links(links);
        assert_eq!(catalog.product_link("Panel X"), Some("https://example.com/x"));
        assert_eq!(catalog.product_link("Panel Y"), None);
    }
}
