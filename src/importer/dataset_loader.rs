// ==========================================
// Price list generator - dataset loader
// ==========================================
// Responsibility: CSV/Excel parsing + column validation + numeric
// coercion + group and attribute mapping. No filtering, no pricing.
// ==========================================

use crate::domain::catalog::{AttributeCatalog, GroupCatalog};
use crate::domain::record::{columns, ProductRecord, REQUIRED_COLUMNS};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

// ==========================================
// DatasetLoader - dataset ingestion engine
// ==========================================
/// Loads the product dataset from a CSV or Excel file and normalizes it
/// into typed records.
///
/// # Responsibilities
/// 1. Parse the file (format chosen by extension)
/// 2. Validate that every required column is present
/// 3. Coerce numeric columns (unparseable values become 0.0)
/// 4. Derive the display group from the nomenclature code
/// 5. Map panel colour/design codes to display names
pub struct DatasetLoader {
    groups: GroupCatalog,
    attributes: AttributeCatalog,
}

impl DatasetLoader {
    pub fn new(groups: GroupCatalog, attributes: AttributeCatalog) -> Self {
        Self { groups, attributes }
    }

    /// Loads product records from a dataset file (main entry).
    ///
    /// # Parameters
    /// - path: dataset file, .csv, .xlsx or .xls
    ///
    /// # Returns
    /// - Vec<ProductRecord>: one record per data row, in file order
    ///
    /// # Errors
    /// - FileNotFound / UnsupportedFormat for bad paths
    /// - MissingColumns when any required column is absent; the run
    ///   aborts rather than producing a partial price list
    pub fn load(&self, path: &Path) -> ImportResult<Vec<ProductRecord>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let records = match extension.as_str() {
            "csv" => self.load_csv(path)?,
            "xlsx" | "xls" => self.load_excel(path)?,
            _ => {
                return Err(ImportError::UnsupportedFormat(path.display().to_string()));
            }
        };

        info!(
            rows = records.len(),
            path = %path.display(),
            "dataset loaded"
        );
        Ok(records)
    }

    fn load_csv(&self, path: &Path) -> ImportResult<Vec<ProductRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
            return Err(ImportError::EmptyDataset(path.display().to_string()));
        }
        let positions = header_positions(&headers)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|c| c.to_string()).collect::<Vec<_>>());
        }

        Ok(self.build_records(&positions, rows))
    }

    fn load_excel(&self, path: &Path) -> ImportResult<Vec<ProductRecord>> {
        let mut workbook = open_workbook_auto(path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::SheetNotFound(path.display().to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut row_iter = range.rows();
        let headers: Vec<String> = match row_iter.next() {
            Some(header_row) => header_row
                .iter()
                .map(|c| cell_to_string(c).trim().to_string())
                .collect(),
            None => return Err(ImportError::EmptyDataset(path.display().to_string())),
        };
        let positions = header_positions(&headers)?;

        let rows: Vec<Vec<String>> = row_iter
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        Ok(self.build_records(&positions, rows))
    }

    /// Turns raw string rows into typed records with derived fields.
    fn build_records(
        &self,
        positions: &HashMap<String, usize>,
        rows: Vec<Vec<String>>,
    ) -> Vec<ProductRecord> {
        rows.iter()
            .map(|row| {
                let text = |column: &str| -> String {
                    positions
                        .get(column)
                        .and_then(|&idx| row.get(idx))
                        .map(|v| v.trim().to_string())
                        .unwrap_or_default()
                };
                let number = |column: &str| -> f64 { coerce_numeric(&text(column)) };

                let nomenclature_group = text(columns::NOMENCLATURE_GROUP);
                let group = self.groups.resolve(&nomenclature_group);

                ProductRecord {
                    product_name: text(columns::PRODUCT_NAME),
                    status: text(columns::STATUS),
                    bp_eur: number(columns::BP_EUR),
                    bp_eur_cz: number(columns::BP_EUR_CZ),
                    delivery_month: text(columns::DELIVERY_MONTH),
                    available: number(columns::AVAILABLE),
                    available_cz: number(columns::AVAILABLE_CZ),
                    released_rtd: number(columns::RELEASED_RTD),
                    brand: text(columns::BRAND),
                    panel_colour: self.attributes.panel_attribute(&text(columns::PANEL_COLOUR)),
                    panel_design: self.attributes.panel_attribute(&text(columns::PANEL_DESIGN)),
                    panel_power: number(columns::PANEL_POWER),
                    inverter_power: number(columns::INVERTER_POWER),
                    nomenclature_group,
                    group,
                    delivery_cw: text(columns::DELIVERY_CW),
                    length: number(columns::LENGTH),
                    height: number(columns::HEIGHT),
                    width: number(columns::WIDTH),
                    pcs_ctn: number(columns::PCS_CTN),
                    pcs_pal: number(columns::PCS_PAL),
                }
            })
            .collect()
    }
}

/// Maps column names to their index and rejects incomplete headers.
fn header_positions(headers: &[String]) -> ImportResult<HashMap<String, usize>> {
    let mut positions = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        positions.entry(header.clone()).or_insert(idx);
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !positions.contains_key(**c))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing.join(", ")));
    }

    Ok(positions)
}

/// Numeric coercion: unparseable or empty values become 0.0.
fn coerce_numeric(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}
