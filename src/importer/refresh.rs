// ==========================================
// Price list generator - dataset refresh
// ==========================================
// Responsibility: token-gated replacement of the dataset CSV from a
// JSON records payload. The rewrite is atomic: the new file is staged
// under a scratch name and renamed over the dataset only after it is
// fully written.
// ==========================================

use crate::domain::record::REQUIRED_COLUMNS;
use crate::importer::error::{ImportError, ImportResult};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

/// Environment variable holding the shared refresh secret.
pub const REFRESH_TOKEN_ENV_VAR: &str = "PRICELIST_REFRESH_TOKEN";

// ==========================================
// DatasetRefresher - inbound sync endpoint
// ==========================================
/// Replaces the on-disk dataset from an external push.
///
/// The payload is a JSON array of record objects, one per dataset row,
/// the records orientation the upstream system serialises its frame in.
/// Authentication is a shared-secret token compared before the payload
/// is even parsed; a mismatch has no side effects.
pub struct DatasetRefresher {
    expected_token: String,
    dataset_path: PathBuf,
}

impl DatasetRefresher {
    pub fn new(expected_token: String, dataset_path: PathBuf) -> Self {
        Self {
            expected_token,
            dataset_path,
        }
    }

    /// Validates the token and payload, then atomically rewrites the
    /// dataset CSV in canonical column order.
    ///
    /// # Returns
    /// - number of data rows written
    pub fn refresh(&self, token: &str, payload_json: &str) -> ImportResult<usize> {
        if token != self.expected_token {
            warn!("dataset refresh rejected: token mismatch");
            return Err(ImportError::TokenMismatch);
        }

        let records: Vec<Map<String, Value>> = serde_json::from_str(payload_json)?;
        validate_payload(&records)?;

        if let Some(parent) = self.dataset_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let scratch = self.scratch_path();

        if let Err(e) = write_csv(&scratch, &records) {
            let _ = std::fs::remove_file(&scratch);
            return Err(e);
        }
        if let Err(e) = std::fs::rename(&scratch, &self.dataset_path) {
            let _ = std::fs::remove_file(&scratch);
            return Err(e.into());
        }

        info!(
            rows = records.len(),
            path = %self.dataset_path.display(),
            "dataset refreshed"
        );
        Ok(records.len())
    }

    fn scratch_path(&self) -> PathBuf {
        let file_name = format!(".refresh-{}.csv", Uuid::new_v4());
        match self.dataset_path.parent() {
            Some(parent) => parent.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

/// Frame-level column check: every required column must appear in at
/// least one record. A key absent from an individual record is not an
/// error; that cell writes blank, the way the upstream frame fills
/// holes. An empty payload fails on the first required column.
fn validate_payload(records: &[Map<String, Value>]) -> ImportResult<()> {
    for column in REQUIRED_COLUMNS {
        if !records.iter().any(|record| record.contains_key(column)) {
            return Err(ImportError::MissingPayloadColumn(column.to_string()));
        }
    }
    Ok(())
}

fn write_csv(path: &std::path::Path, records: &[Map<String, Value>]) -> ImportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(REQUIRED_COLUMNS)?;
    for record in records {
        let row: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .map(|column| record.get(*column).map(value_to_cell).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
