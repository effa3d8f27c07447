//! Dataset ingest.
//!
//! Turns an uploaded sales CSV (or a JSON array of row objects) into a
//! [`Dataset`] of raw string cells. No interpretation of the cells happens
//! here; that belongs to the quality, inventory and series modules.
//!
//! Behavior:
//! - **Strict header**: blank or duplicated column names are rejected
//! - **Lenient rows**: short rows are padded with empty cells, unreadable
//!   records are skipped and reported with their line number
//! - **Deterministic**: same bytes in, same dataset (and `DatasetId`) out

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Dataset, Row};
use crate::error::{AppError, DatasetError};

/// A record-level problem encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: dataset + record-level errors.
#[derive(Debug, Clone)]
pub struct IngestedDataset {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Open and parse a CSV file.
pub fn load_csv_dataset(path: &Path) -> Result<IngestedDataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = read_csv_dataset(file, path.display().to_string())?;

    tracing::info!(
        dataset = %ingested.dataset.id,
        rows = ingested.dataset.len(),
        row_errors = ingested.row_errors.len(),
        "loaded CSV dataset"
    );
    Ok(ingested)
}

/// Parse CSV from any reader.
pub fn read_csv_dataset<R: Read>(reader: R, source: impl Into<String>) -> Result<IngestedDataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DatasetError::Header(e.to_string()))?
        .clone();
    let header = normalize_headers(&headers)?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start on the line after the header, lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        if record.len() > header.len() {
            row_errors.push(RowError {
                line,
                message: format!(
                    "Row has {} fields but the header has {}; extra fields ignored.",
                    record.len(),
                    header.len()
                ),
            });
        }
        rows.push(build_row(&header, &record));
    }

    for err in &row_errors {
        tracing::warn!(line = err.line, "{}", err.message);
    }

    Ok(IngestedDataset {
        dataset: Dataset::new(source, rows),
        row_errors,
        rows_read,
    })
}

/// Open and parse a JSON file holding an array of row objects.
pub fn load_json_dataset(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open JSON '{}': {e}", path.display())))?;
    let value: serde_json::Value =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid JSON dataset: {e}")))?;
    let dataset = Dataset::from_json(path.display().to_string(), &value)?;

    if dataset.skipped_rows > 0 {
        tracing::warn!(skipped = dataset.skipped_rows, "non-object entries skipped");
    }
    Ok(dataset)
}

/// Load a dataset, choosing the parser by file extension (`.json` or CSV).
pub fn load_dataset(path: &Path) -> Result<IngestedDataset, AppError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        return load_csv_dataset(path);
    }
    let dataset = load_json_dataset(path)?;
    let rows_read = dataset.len() + dataset.skipped_rows;
    Ok(IngestedDataset {
        dataset,
        row_errors: Vec::new(),
        rows_read,
    })
}

fn normalize_headers(headers: &StringRecord) -> Result<Vec<String>, DatasetError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(headers.len());
    for (idx, raw) in headers.iter().enumerate() {
        let name = normalize_header_name(raw);
        if name.is_empty() {
            return Err(DatasetError::InvalidHeader(format!("column {} has no name", idx + 1)));
        }
        if !seen.insert(name.clone()) {
            return Err(DatasetError::InvalidHeader(format!("duplicate column `{name}`")));
        }
        out.push(name);
    }
    Ok(out)
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    // Column names are otherwise kept as-is: upstream names are case-sensitive.
    name.trim_start_matches('\u{feff}').trim().to_string()
}

fn build_row(header: &[String], record: &StringRecord) -> Row {
    header
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), record.get(idx).unwrap_or("").to_string()))
        .collect()
}
