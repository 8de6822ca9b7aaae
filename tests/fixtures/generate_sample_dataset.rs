// ==========================================
// Sample dataset generator
// ==========================================
// Purpose: generates 5 sample dataset CSV files
// Output: tests/fixtures/datasets/*.csv
// Usage: cargo run --bin generate_sample_dataset
// ==========================================

use chrono::{Datelike, Local, Months};
use csv::Writer;
use std::error::Error;
use std::fs::File;

// Dataset header, canonical column order
const CSV_HEADER: &[&str] = &[
    "product_name",
    "status",
    "bp_eur",
    "bp_eur_cz",
    "delivery_month",
    "available",
    "available_cz",
    "released_rtd",
    "brand",
    "panel_colour",
    "panel_design",
    "panel_power",
    "inverter_power",
    "nomenclature_group",
    "delivery_cw",
    "length",
    "height",
    "width",
    "pcs_ctn",
    "pcs_pal",
];

const PANEL_BRANDS: &[&str] = &["NANOSUN", "Jinko", "JA Solar", "Canadian Solar"];
const INVERTER_BRANDS: &[&str] = &["SolaX", "GoodWe", "Growatt"];
const BATTERY_BRANDS: &[&str] = &["Pylontech", "Dyness"];
const ACCESSORY_ITEMS: &[&str] = &[
    "MC4 Connector Pair",
    "Solar Cable 6mm Black 500m",
    "End Clamp 30mm",
    "Mid Clamp 30mm",
];

// Raw dataset row, all cells as written to the file
#[derive(Clone)]
struct ProductRow {
    product_name: String,
    status: String,
    bp_eur: String,
    bp_eur_cz: String,
    delivery_month: String,
    available: String,
    available_cz: String,
    released_rtd: String,
    brand: String,
    panel_colour: String,
    panel_design: String,
    panel_power: String,
    inverter_power: String,
    nomenclature_group: String,
    delivery_cw: String,
    length: String,
    height: String,
    width: String,
    pcs_ctn: String,
    pcs_pal: String,
}

impl ProductRow {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.product_name.clone(),
            self.status.clone(),
            self.bp_eur.clone(),
            self.bp_eur_cz.clone(),
            self.delivery_month.clone(),
            self.available.clone(),
            self.available_cz.clone(),
            self.released_rtd.clone(),
            self.brand.clone(),
            self.panel_colour.clone(),
            self.panel_design.clone(),
            self.panel_power.clone(),
            self.inverter_power.clone(),
            self.nomenclature_group.clone(),
            self.delivery_cw.clone(),
            self.length.clone(),
            self.height.clone(),
            self.width.clone(),
            self.pcs_ctn.clone(),
            self.pcs_pal.clone(),
        ]
    }
}

/// Delivery month and calendar week a few months out; every 5th row is
/// stock on hand with no delivery date at all.
fn delivery(index: usize) -> (String, String) {
    if index % 5 == 0 {
        return (String::new(), String::new());
    }
    let date = Local::now().date_naive() + Months::new((index % 4) as u32);
    (
        date.format("%Y-%m").to_string(),
        format!("{}", date.iso_week().week()),
    )
}

fn generate_panel_row(index: usize) -> ProductRow {
    let brand = PANEL_BRANDS[index % PANEL_BRANDS.len()];
    let power = 400 + (index % 9) * 5;
    let (delivery_month, delivery_cw) = delivery(index);
    let available = 200 + (index * 37) % 800;

    ProductRow {
        product_name: format!("{brand} Module {power} Wp"),
        status: ["Available", "On the way"][index % 2].to_string(),
        bp_eur: format!("{:.2}", power as f64 * 0.105),
        bp_eur_cz: format!("{:.2}", power as f64 * 0.1),
        delivery_month,
        available: format!("{available}"),
        available_cz: format!("{}", available / 3),
        released_rtd: "0".to_string(),
        brand: brand.to_string(),
        panel_colour: ["FB", "BF", "SF"][index % 3].to_string(),
        panel_design: ["GLASS", "2GLASS", "BIF"][index % 3].to_string(),
        panel_power: format!("{power}"),
        inverter_power: "0".to_string(),
        nomenclature_group: format!("PAN{:03}", index % 40 + 1),
        delivery_cw,
        length: "1722".to_string(),
        height: "30".to_string(),
        width: "1134".to_string(),
        pcs_ctn: "0".to_string(),
        pcs_pal: "36".to_string(),
    }
}

fn generate_inverter_row(index: usize) -> ProductRow {
    let brand = INVERTER_BRANDS[index % INVERTER_BRANDS.len()];
    let power_kw = 3 + (index % 10);
    let (delivery_month, delivery_cw) = delivery(index);
    let available = 40 + (index * 13) % 160;

    ProductRow {
        product_name: format!("{brand} Hybrid {power_kw}K"),
        status: "Available".to_string(),
        bp_eur: format!("{:.2}", power_kw as f64 * 118.0),
        bp_eur_cz: format!("{:.2}", power_kw as f64 * 112.0),
        delivery_month,
        available: format!("{available}"),
        available_cz: format!("{}", available / 4),
        released_rtd: "0".to_string(),
        brand: brand.to_string(),
        panel_colour: ["3PH", "1PH"][index % 2].to_string(),
        panel_design: ["HYBRID", "GRID"][index % 2].to_string(),
        panel_power: "0".to_string(),
        inverter_power: format!("{power_kw}"),
        nomenclature_group: format!("INV{:03}", index % 20 + 1),
        delivery_cw,
        length: "503".to_string(),
        height: "199".to_string(),
        width: "403".to_string(),
        pcs_ctn: "1".to_string(),
        pcs_pal: "4".to_string(),
    }
}

fn generate_battery_row(index: usize) -> ProductRow {
    let brand = BATTERY_BRANDS[index % BATTERY_BRANDS.len()];
    let kwh = 5 + (index % 3) * 5;
    let (delivery_month, delivery_cw) = delivery(index);
    let available = 25 + (index * 7) % 90;

    ProductRow {
        product_name: format!("{brand} HV Battery {kwh} kWh"),
        status: "Available".to_string(),
        bp_eur: format!("{:.2}", kwh as f64 * 182.0),
        bp_eur_cz: format!("{:.2}", kwh as f64 * 175.0),
        delivery_month,
        available: format!("{available}"),
        available_cz: format!("{}", available / 5),
        released_rtd: "0".to_string(),
        brand: brand.to_string(),
        panel_colour: String::new(),
        panel_design: String::new(),
        panel_power: "0".to_string(),
        inverter_power: "0".to_string(),
        nomenclature_group: format!("BAT{:03}", index % 10 + 1),
        delivery_cw,
        length: "480".to_string(),
        height: "160".to_string(),
        width: "445".to_string(),
        pcs_ctn: "1".to_string(),
        pcs_pal: "8".to_string(),
    }
}

fn generate_accessory_row(index: usize) -> ProductRow {
    let item = ACCESSORY_ITEMS[index % ACCESSORY_ITEMS.len()];
    let available = 500 + (index * 91) % 4000;

    ProductRow {
        product_name: item.to_string(),
        status: "Available".to_string(),
        bp_eur: format!("{:.2}", 1.5 + (index % 6) as f64 * 0.8),
        bp_eur_cz: format!("{:.2}", 1.4 + (index % 6) as f64 * 0.8),
        delivery_month: String::new(),
        available: format!("{available}"),
        available_cz: format!("{}", available / 2),
        released_rtd: "0".to_string(),
        brand: "NANOSUN".to_string(),
        panel_colour: String::new(),
        panel_design: String::new(),
        panel_power: "0".to_string(),
        inverter_power: "0".to_string(),
        nomenclature_group: format!("ACC{:03}", index % 30 + 1),
        delivery_cw: String::new(),
        length: "120".to_string(),
        height: "25".to_string(),
        width: "40".to_string(),
        pcs_ctn: "100".to_string(),
        pcs_pal: "0".to_string(),
    }
}

/// One catalog row per index, mixed across the product groups.
/// Panels dominate, matching a real dataset.
fn generate_catalog_row(index: usize) -> ProductRow {
    match index % 8 {
        0..=3 => generate_panel_row(index),
        4 | 5 => generate_inverter_row(index),
        6 => generate_battery_row(index),
        _ => generate_accessory_row(index),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("Generating sample datasets...");
    std::fs::create_dir_all("tests/fixtures/datasets")?;

    // 1. Full catalog across all groups (66 rows)
    generate_full_catalog()?;

    // 2. Filter edge cases
    generate_filter_edge_cases()?;

    // 3. Unparseable numeric cells
    generate_unparseable_numbers()?;

    // 4. Dataset with required columns missing
    generate_missing_columns()?;

    // 5. Large catalog (600 rows)
    generate_large_catalog()?;

    println!("✓ all sample datasets written");
    Ok(())
}

fn generate_full_catalog() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/01_full_catalog.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    for i in 0..60 {
        wtr.write_record(&generate_catalog_row(i).to_row())?;
    }

    // 4 duplicate variants, same product at a second stock position.
    // Aggregation sums their availability and keeps the highest price.
    for i in [0, 1, 4, 6] {
        let mut row = generate_catalog_row(i);
        row.available = "150".to_string();
        row.available_cz = "60".to_string();
        row.bp_eur = format!("{:.2}", row.bp_eur.parse::<f64>()? + 2.0);
        wtr.write_record(&row.to_row())?;
    }

    // 2 rows with an unmapped nomenclature prefix, resolve to "Unknown"
    for i in 0..2 {
        let mut row = generate_panel_row(i + 200);
        row.product_name = format!("Legacy Stock Item {}", i + 1);
        row.nomenclature_group = "ZZZ999".to_string();
        wtr.write_record(&row.to_row())?;
    }

    wtr.flush()?;
    println!("✓ wrote 01_full_catalog.csv (66 rows)");
    Ok(())
}

fn generate_filter_edge_cases() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/02_filter_edge_cases.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    // 3 panels with no delivery date (stock on hand)
    for i in 0..3 {
        let mut row = generate_panel_row(i + 300);
        row.delivery_month = String::new();
        row.delivery_cw = String::new();
        wtr.write_record(&row.to_row())?;
    }

    // 2 oversized panels, face area above 2 m2
    for i in 0..2 {
        let mut row = generate_panel_row(i + 303);
        row.length = "2279".to_string();
        row.width = "1134".to_string();
        wtr.write_record(&row.to_row())?;
    }

    // 3 urgent rows, status case varies in real exports
    for (i, status) in ["Urgent", "URGENT", "urgent"].iter().enumerate() {
        let mut row = generate_panel_row(i + 305);
        row.status = status.to_string();
        wtr.write_record(&row.to_row())?;
    }

    // 2 rows without a pallet size, excluded by the pallet density filter
    for i in 0..2 {
        let mut row = generate_panel_row(i + 308);
        row.pcs_pal = "0".to_string();
        wtr.write_record(&row.to_row())?;
    }

    // 2 rows with a zero or negative base price
    for (i, price) in ["0", "-5.0"].iter().enumerate() {
        let mut row = generate_panel_row(i + 310);
        row.bp_eur = price.to_string();
        row.bp_eur_cz = price.to_string();
        wtr.write_record(&row.to_row())?;
    }

    // 2 rows with more Decin stock than total, Rotterdam share goes negative
    for i in 0..2 {
        let mut row = generate_panel_row(i + 312);
        row.available = "10".to_string();
        row.available_cz = "15".to_string();
        wtr.write_record(&row.to_row())?;
    }

    // 2 normal control rows
    for i in 0..2 {
        wtr.write_record(&generate_panel_row(i + 314).to_row())?;
    }

    wtr.flush()?;
    println!("✓ wrote 02_filter_edge_cases.csv (16 rows)");
    Ok(())
}

fn generate_unparseable_numbers() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/03_unparseable_numbers.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    // Price cells with placeholder text, coerced to zero on load
    for (i, junk) in ["N/A", "TBD", ""].iter().enumerate() {
        let mut row = generate_panel_row(i + 400);
        row.bp_eur = junk.to_string();
        wtr.write_record(&row.to_row())?;
    }

    // Availability cells with text
    for (i, junk) in ["unknown", "-"].iter().enumerate() {
        let mut row = generate_panel_row(i + 403);
        row.available = junk.to_string();
        wtr.write_record(&row.to_row())?;
    }

    // Dimension cells with text
    for i in 0..2 {
        let mut row = generate_panel_row(i + 405);
        row.length = "see datasheet".to_string();
        wtr.write_record(&row.to_row())?;
    }

    // 3 normal control rows
    for i in 0..3 {
        wtr.write_record(&generate_panel_row(i + 407).to_row())?;
    }

    wtr.flush()?;
    println!("✓ wrote 03_unparseable_numbers.csv (10 rows)");
    Ok(())
}

fn generate_missing_columns() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/04_missing_columns.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    // Header without bp_eur_cz and pcs_pal; loading this file must abort
    let header: Vec<&str> = CSV_HEADER
        .iter()
        .filter(|c| **c != "bp_eur_cz" && **c != "pcs_pal")
        .copied()
        .collect();
    wtr.write_record(&header)?;

    for i in 0..3 {
        let row = generate_panel_row(i + 500).to_row();
        let truncated: Vec<String> = row
            .iter()
            .enumerate()
            .filter(|(idx, _)| CSV_HEADER[*idx] != "bp_eur_cz" && CSV_HEADER[*idx] != "pcs_pal")
            .map(|(_, v)| v.clone())
            .collect();
        wtr.write_record(&truncated)?;
    }

    wtr.flush()?;
    println!("✓ wrote 04_missing_columns.csv (3 rows, 18 columns)");
    Ok(())
}

fn generate_large_catalog() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/05_large_catalog.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    for i in 0..600 {
        wtr.write_record(&generate_catalog_row(i + 10000).to_row())?;
    }

    wtr.flush()?;
    println!("✓ wrote 05_large_catalog.csv (600 rows)");
    Ok(())
}
