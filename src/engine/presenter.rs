// ==========================================
// Price list generator - presenter
// ==========================================
// Responsibility: turn aggregated rows into the final display table,
// with renamed headers, blanked sentinels, and formatted numbers.
// The composer and the spreadsheet exporter both consume this table.
// ==========================================

use crate::config::settings::GenerationConfig;
use crate::domain::record::{is_blank_value, AggregatedRow};

/// Display headers of the fixed (non-price) columns, in final order.
const FIXED_COLUMNS: [(&str, &str); 14] = [
    ("Group", "Product Group"),
    ("brand", "Brand"),
    ("product_name", "Product Name"),
    ("available", "Available"),
    ("delivery_month", "Delivery"),
    ("delivery_cw", "CW"),
    ("panel_power", "Power(W)"),
    ("panel_colour", "Colour"),
    ("panel_design", "Design"),
    ("length", "Length"),
    ("width", "Width"),
    ("height", "Height"),
    ("pcs_pal", "Pcs Pal"),
    ("pcs_ctn", "Pcs ctn"),
];

/// Columns the configuration may deselect. Identity and price columns
/// are always present.
const OPTIONAL_KEYS: [&str; 11] = [
    "available",
    "delivery_month",
    "delivery_cw",
    "panel_power",
    "panel_colour",
    "panel_design",
    "length",
    "width",
    "height",
    "pcs_pal",
    "pcs_ctn",
];

// ==========================================
// DisplayTable - formatted rows ready for output
// ==========================================

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayColumn {
    /// Internal key, stable across runs ("product_name", "Price 1", ...).
    pub key: String,
    /// Header as rendered; price slots use the first selected group's
    /// label here, the composer re-resolves them per group section.
    pub header: String,
    /// Price-slot index for derived price columns.
    pub slot: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayTable {
    pub columns: Vec<DisplayColumn>,
    pub rows: Vec<Vec<String>>,
}

impl DisplayTable {
    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }
}

// ==========================================
// Presenter - table construction
// ==========================================
pub struct Presenter;

impl Presenter {
    /// Builds the display table in final column order.
    ///
    /// # Rules
    /// - fixed columns first, then one column per price slot
    /// - a non-empty column selection drops unselected descriptive
    ///   columns; group, brand, product name and prices always stay
    /// - sentinel values ("0", "NaN", "None", "NULL", "nan", "0.0")
    ///   render blank, all other numerics get space-grouped thousands
    pub fn build_table(config: &GenerationConfig, rows: &[AggregatedRow]) -> DisplayTable {
        let mut columns: Vec<DisplayColumn> = FIXED_COLUMNS
            .iter()
            .filter(|(key, _)| Self::column_selected(config, key))
            .map(|(key, header)| DisplayColumn {
                key: key.to_string(),
                header: header.to_string(),
                slot: None,
            })
            .collect();

        let first_group = config
            .selected_groups
            .first()
            .map(String::as_str)
            .unwrap_or_default();
        for slot in 1..=config.num_prices {
            columns.push(DisplayColumn {
                key: format!("Price {slot}"),
                header: config.rules.label_for(first_group, slot),
                slot: Some(slot),
            });
        }

        let table_rows = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| Self::cell(row, column))
                    .collect()
            })
            .collect();

        DisplayTable {
            columns,
            rows: table_rows,
        }
    }

    fn column_selected(config: &GenerationConfig, key: &str) -> bool {
        if config.selected_columns.is_empty() || !OPTIONAL_KEYS.contains(&key) {
            return true;
        }
        config.selected_columns.iter().any(|c| c == key)
    }

    fn cell(row: &AggregatedRow, column: &DisplayColumn) -> String {
        if let Some(slot) = column.slot {
            return row
                .slot_prices
                .get(slot - 1)
                .map(|p| format_quantity(*p))
                .unwrap_or_default();
        }
        match column.key.as_str() {
            "Group" => format_display_value(&row.group),
            "brand" => format_display_value(&row.brand),
            "product_name" => format_display_value(&row.product_name),
            "available" => format_quantity(row.available),
            "delivery_month" => format_display_value(&row.delivery_month),
            "delivery_cw" => format_display_value(&row.delivery_cw),
            "panel_power" => format_quantity(row.panel_power),
            "panel_colour" => format_display_value(&row.panel_colour),
            "panel_design" => format_display_value(&row.panel_design),
            "length" => format_quantity(row.length),
            "width" => format_quantity(row.width),
            "height" => format_quantity(row.height),
            "pcs_pal" => format_quantity(row.pcs_pal),
            "pcs_ctn" => format_quantity(row.pcs_ctn),
            _ => String::new(),
        }
    }
}

/// Formats a numeric value for display. Zero and non-finite values are
/// structurally "missing" and render blank; integers render without
/// decimals; everything else keeps exactly 3 decimals.
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return String::new();
    }
    if value.fract() == 0.0 {
        group_thousands(value, 0)
    } else {
        group_thousands(value, 3)
    }
}

/// Formats a raw string cell: sentinels render blank, numeric-looking
/// values get the numeric treatment, everything else passes through.
pub fn format_display_value(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_blank_value(trimmed) {
        return String::new();
    }
    match trimmed.parse::<f64>() {
        Ok(value) => format_quantity(value),
        Err(_) => trimmed.to_string(),
    }
}

/// Space-separated thousands grouping with a fixed decimal count.
fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::price_labels::PricingRules;
    use crate::config::settings::FilterSpec;
    use crate::domain::types::Warehouse;

    fn sample_row() -> AggregatedRow {
        AggregatedRow {
            group: "Panels".to_string(),
            brand: "Jinko".to_string(),
            product_name: "Tiger Neo 430".to_string(),
            available: 1000.0,
            base_price: 10.0,
            slot_prices: vec![12.0],
            delivery_month: "2026-03".to_string(),
            delivery_cw: "0".to_string(),
            panel_power: 430.0,
            panel_colour: "Full Black".to_string(),
            panel_design: String::new(),
            length: 1722.0,
            width: 1134.0,
            height: 30.0,
            pcs_pal: 36.0,
            pcs_ctn: 0.0,
        }
    }

    fn config() -> GenerationConfig {
        GenerationConfig {
            name: "t".to_string(),
            user: "u".to_string(),
            selected_groups: vec!["Panels".to_string()],
            selected_brands: vec![],
            select_all_brands: true,
            warehouse: Warehouse::Decin,
            num_prices: 1,
            rules: PricingRules::default(),
            selected_columns: vec![],
            filters: FilterSpec::default(),
        }
    }

    #[test]
    fn test_format_quantity_cases() {
        assert_eq!(format_quantity(1000.0), "1 000");
        assert_eq!(format_quantity(1000.5), "1 000.500");
        assert_eq!(format_quantity(0.0), "");
        assert_eq!(format_quantity(12.0), "12");
        assert_eq!(format_quantity(1234567.0), "1 234 567");
        assert_eq!(format_quantity(-1234.5), "-1 234.500");
    }

    #[test]
    fn test_format_display_value_sentinels() {
        assert_eq!(format_display_value("0"), "");
        assert_eq!(format_display_value("nan"), "");
        assert_eq!(format_display_value("None"), "");
        assert_eq!(format_display_value("2026-03"), "2026-03");
        assert_eq!(format_display_value("12.5"), "12.500");
        assert_eq!(format_display_value("Full Black"), "Full Black");
    }

    #[test]
    fn test_table_has_final_column_order() {
        let table = Presenter::build_table(&config(), &[sample_row()]);
        let keys: Vec<&str> = table.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "Group",
                "brand",
                "product_name",
                "available",
                "delivery_month",
                "delivery_cw",
                "panel_power",
                "panel_colour",
                "panel_design",
                "length",
                "width",
                "height",
                "pcs_pal",
                "pcs_ctn",
                "Price 1",
            ]
        );
        assert_eq!(table.columns.last().unwrap().slot, Some(1));
    }

    #[test]
    fn test_row_rendering_blanks_missing_values() {
        let table = Presenter::build_table(&config(), &[sample_row()]);
        let row = &table.rows[0];
        let idx = |key: &str| table.column_index(key).unwrap();
        assert_eq!(row[idx("available")], "1 000");
        assert_eq!(row[idx("delivery_cw")], "");
        assert_eq!(row[idx("panel_design")], "");
        assert_eq!(row[idx("pcs_ctn")], "");
        assert_eq!(row[idx("Price 1")], "12");
    }

    #[test]
    fn test_column_selection_keeps_identity_and_prices() {
        let mut config = config();
        config.selected_columns = vec!["available".to_string(), "panel_power".to_string()];
        let table = Presenter::build_table(&config, &[sample_row()]);
        let keys: Vec<&str> = table.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "Group",
                "brand",
                "product_name",
                "available",
                "panel_power",
                "Price 1",
            ]
        );
    }

    #[test]
    fn test_price_header_uses_first_group_label() {
        let mut config = config();
        config.rules = PricingRules::new(
            [(
                "Panels".to_string(),
                vec![crate::config::price_labels::PriceRule {
                    operation: crate::domain::types::PriceOp::Multiply,
                    coefficient: 1.2,
                    header: "MOC EUR".to_string(),
                }],
            )]
            .into_iter()
            .collect(),
        );
        let table = Presenter::build_table(&config, &[sample_row()]);
        assert_eq!(table.columns.last().unwrap().header, "MOC EUR");
    }
}
