// ==========================================
// Price list generator - dataset row types
// ==========================================
// One ProductRecord per source dataset row, plus the derived shapes the
// pipeline stages hand to each other (priced rows, aggregated rows).
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Column contract
// ==========================================

/// Raw column names, in the canonical dataset order.
pub mod columns {
    pub const PRODUCT_NAME: &str = "product_name";
    pub const STATUS: &str = "status";
    pub const BP_EUR: &str = "bp_eur";
    pub const BP_EUR_CZ: &str = "bp_eur_cz";
    pub const DELIVERY_MONTH: &str = "delivery_month";
    pub const AVAILABLE: &str = "available";
    pub const AVAILABLE_CZ: &str = "available_cz";
    pub const RELEASED_RTD: &str = "released_rtd";
    pub const BRAND: &str = "brand";
    pub const PANEL_COLOUR: &str = "panel_colour";
    pub const PANEL_DESIGN: &str = "panel_design";
    pub const PANEL_POWER: &str = "panel_power";
    pub const INVERTER_POWER: &str = "inverter_power";
    pub const NOMENCLATURE_GROUP: &str = "nomenclature_group";
    pub const DELIVERY_CW: &str = "delivery_cw";
    pub const LENGTH: &str = "length";
    pub const HEIGHT: &str = "height";
    pub const WIDTH: &str = "width";
    pub const PCS_CTN: &str = "pcs_ctn";
    pub const PCS_PAL: &str = "pcs_pal";
}

/// Columns every dataset must carry. A dataset missing any of these aborts
/// the run before any row is processed.
pub const REQUIRED_COLUMNS: [&str; 20] = [
    columns::PRODUCT_NAME,
    columns::STATUS,
    columns::BP_EUR,
    columns::BP_EUR_CZ,
    columns::DELIVERY_MONTH,
    columns::AVAILABLE,
    columns::AVAILABLE_CZ,
    columns::RELEASED_RTD,
    columns::BRAND,
    columns::PANEL_COLOUR,
    columns::PANEL_DESIGN,
    columns::PANEL_POWER,
    columns::INVERTER_POWER,
    columns::NOMENCLATURE_GROUP,
    columns::DELIVERY_CW,
    columns::LENGTH,
    columns::HEIGHT,
    columns::WIDTH,
    columns::PCS_CTN,
    columns::PCS_PAL,
];

/// String representations treated as "no value" throughout the pipeline.
/// Cells matching one of these render blank, never as a literal zero.
pub const EMPTY_VALUE_SENTINELS: [&str; 6] = ["0", "NaN", "None", "NULL", "nan", "0.0"];

/// True when a raw cell value carries no usable content.
pub fn is_blank_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || EMPTY_VALUE_SENTINELS.contains(&trimmed)
}

// ==========================================
// ProductRecord - one loaded dataset row
// ==========================================

/// A single dataset row after loading.
///
/// Numeric fields are always valid numbers; parse failures degrade to zero
/// at load time. `panel_colour`/`panel_design` already hold display values,
/// and `group` holds the display group derived from the nomenclature code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_name: String,
    pub status: String,
    pub bp_eur: f64,
    pub bp_eur_cz: f64,
    pub delivery_month: String,
    pub available: f64,
    pub available_cz: f64,
    pub released_rtd: f64,
    pub brand: String,
    pub panel_colour: String,
    pub panel_design: String,
    pub panel_power: f64,
    pub inverter_power: f64,
    pub nomenclature_group: String,
    pub group: String,
    pub delivery_cw: String,
    pub length: f64,
    pub height: f64,
    pub width: f64,
    pub pcs_ctn: f64,
    pub pcs_pal: f64,
}

impl ProductRecord {
    /// True when the row carries a delivery month.
    pub fn has_delivery_date(&self) -> bool {
        !is_blank_value(&self.delivery_month)
    }

    /// Footprint of the two largest dimensions in square meters.
    /// Dimension fields are millimeters.
    pub fn largest_face_area_m2(&self) -> f64 {
        let mut dims = [self.length, self.width, self.height];
        dims.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        (dims[0] / 1000.0) * (dims[1] / 1000.0)
    }
}

// ==========================================
// PricedRecord - after warehouse accounting and pricing
// ==========================================

/// A record with the warehouse-effective availability, the selected base
/// price, and one computed price per configured slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedRecord {
    pub record: ProductRecord,
    pub base_price: f64,
    pub effective_available: f64,
    pub slot_prices: Vec<f64>,
}

// ==========================================
// AggregatedRow - one row per (group, brand, product)
// ==========================================

/// One output row per product variant after aggregation.
///
/// Availability is summed across the collapsed rows, prices take the
/// maximum, and descriptive columns keep the first-encountered value.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    pub group: String,
    pub brand: String,
    pub product_name: String,
    pub available: f64,
    pub base_price: f64,
    pub slot_prices: Vec<f64>,
    pub delivery_month: String,
    pub delivery_cw: String,
    pub panel_power: f64,
    pub panel_colour: String,
    pub panel_design: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub pcs_pal: f64,
    pub pcs_ctn: f64,
}
