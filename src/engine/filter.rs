// ==========================================
// Price list generator - filter engine
// ==========================================
// Responsibility: row selection from declarative predicates.
// Red line: stateless, no side effects, no I/O.
// ==========================================

use crate::config::settings::{FilterSpec, GenerationConfig};
use crate::domain::record::{is_blank_value, ProductRecord};
use tracing::debug;

/// Largest allowed footprint for the small-area toggle, in square meters.
pub const MAX_FACE_AREA_M2: f64 = 2.0;

/// Status value marking urgent stock.
pub const URGENT_STATUS: &str = "Urgent";

// ==========================================
// ProductFilter - declarative row predicates
// ==========================================
pub struct ProductFilter;

impl ProductFilter {
    /// Keeps the rows satisfying every active predicate (logical AND).
    ///
    /// # Rules
    /// - predicates without a value are skipped, an empty FilterSpec
    ///   keeps every row
    /// - group and brand membership come from the configuration
    /// - "no delivery date" takes precedence over the month window;
    ///   when both are set the window is ignored for the whole run
    /// - the density predicates require a pack size of at least 1,
    ///   otherwise the row is excluded rather than dividing by zero
    pub fn apply(config: &GenerationConfig, records: &[ProductRecord]) -> Vec<ProductRecord> {
        let before = records.len();
        let kept: Vec<ProductRecord> = records
            .iter()
            .filter(|r| Self::keeps(config, r))
            .cloned()
            .collect();
        debug!(before, after = kept.len(), "filter applied");
        kept
    }

    fn keeps(config: &GenerationConfig, record: &ProductRecord) -> bool {
        if !config.selected_groups.iter().any(|g| g == &record.group) {
            return false;
        }
        if !config.brand_selected(&record.brand) {
            return false;
        }

        let filters = &config.filters;

        if !in_range(record.panel_power, filters.power_min, filters.power_max) {
            return false;
        }
        if !in_range(record.length, filters.length_min, filters.length_max) {
            return false;
        }
        if !in_range(record.width, filters.width_min, filters.width_max) {
            return false;
        }
        if !in_range(record.height, filters.height_min, filters.height_max) {
            return false;
        }
        if !in_range(record.available, filters.available_min, filters.available_max) {
            return false;
        }

        if !filters.colours.is_empty() && !filters.colours.contains(&record.panel_colour) {
            return false;
        }
        if !filters.designs.is_empty() && !filters.designs.contains(&record.panel_design) {
            return false;
        }

        if !Self::delivery_window_keeps(filters, record) {
            return false;
        }

        if let Some(max_pallets) = filters.max_pallets {
            if record.pcs_pal < 1.0 || record.available / record.pcs_pal > max_pallets {
                return false;
            }
        }
        if let Some(max_cartons) = filters.max_cartons {
            if record.pcs_ctn < 1.0 || record.available / record.pcs_ctn > max_cartons {
                return false;
            }
        }

        if filters.urgent_only && !record.status.eq_ignore_ascii_case(URGENT_STATUS) {
            return false;
        }
        if filters.small_area_only && record.largest_face_area_m2() > MAX_FACE_AREA_M2 {
            return false;
        }

        true
    }

    fn delivery_window_keeps(filters: &FilterSpec, record: &ProductRecord) -> bool {
        if filters.no_delivery_date {
            return !record.has_delivery_date();
        }

        let from = filters.delivery_month_from.as_deref().and_then(normalize_month);
        let to = filters.delivery_month_to.as_deref().and_then(normalize_month);
        if from.is_none() && to.is_none() {
            return true;
        }

        // A month window excludes rows without a parseable month.
        let month = match normalize_month(&record.delivery_month) {
            Some(m) => m,
            None => return false,
        };
        if let Some(from) = from {
            if month < from {
                return false;
            }
        }
        if let Some(to) = to {
            if month > to {
                return false;
            }
        }
        true
    }
}

/// Normalizes a delivery month to "YYYY-MM" so the window comparison is
/// plain string ordering. Values that carry a day ("2026-03-15") keep
/// only the month part; blanks and sentinels yield None.
pub fn normalize_month(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if is_blank_value(trimmed) {
        return None;
    }
    let mut parts = trimmed.split('-');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(format!("{year:04}-{month:02}"))
}

fn in_range(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    if let Some(min) = min {
        if value < min {
            return false;
        }
    }
    if let Some(max) = max {
        if value > max {
            return false;
        }
    }
    true
}
