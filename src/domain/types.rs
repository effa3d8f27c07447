//! Shared domain types.
//!
//! Rows keep their raw string cells exactly as ingested. Interpretation of a
//! cell (number, date, id) belongs to the component consuming it, so the same
//! dataset can be profiled, grouped and exported without a lossy typed
//! intermediate.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DatasetError;

/// Column names dictated by the upstream sales export.
pub mod columns {
    pub const PRODUCT_ID: &str = "Product_ID";
    pub const UNITS_SOLD: &str = "Units_Sold";
    pub const INVENTORY_LEVEL: &str = "Inventory_Level";
    pub const DATE: &str = "Date";
}

/// Semantic type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Number,
    Date,
    String,
}

impl SemanticType {
    /// Tie-break precedence, highest first.
    pub const PRECEDENCE: [SemanticType; 3] = [SemanticType::Number, SemanticType::Date, SemanticType::String];

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticType::Number => "number",
            SemanticType::Date => "date",
            SemanticType::String => "string",
        }
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of raw cells, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell. Re-setting an existing column overwrites it in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// Identifies one dataset snapshot.
///
/// Every report names the snapshot it was computed from, so callers pass the
/// dataset explicitly instead of relying on a shared "latest upload" slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId {
    /// Where the rows came from (file path, upload name, ...).
    pub source: String,
    /// Content fingerprint: first 16 hex digits of the BLAKE3 digest of
    /// the cells. Stable across builds and platforms.
    pub version: String,
}

impl DatasetId {
    pub fn for_rows(source: impl Into<String>, rows: &[Row]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for row in rows {
            // Length prefixes keep cell boundaries unambiguous.
            hasher.update(&(row.len() as u64).to_le_bytes());
            for (column, value) in row.iter() {
                hasher.update(&(column.len() as u64).to_le_bytes());
                hasher.update(column.as_bytes());
                hasher.update(&(value.len() as u64).to_le_bytes());
                hasher.update(value.as_bytes());
            }
        }
        let mut version = hasher.finalize().to_hex().to_string();
        version.truncate(16);
        Self {
            source: source.into(),
            version,
        }
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.source, self.version)
    }
}

/// An ordered, identified sequence of rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub id: DatasetId,
    pub rows: Vec<Row>,
    /// Entries dropped because they were not row-shaped.
    pub skipped_rows: usize,
}

impl Dataset {
    pub fn new(source: impl Into<String>, rows: Vec<Row>) -> Self {
        let id = DatasetId::for_rows(source, &rows);
        Self {
            id,
            rows,
            skipped_rows: 0,
        }
    }

    /// Header as seen on the first row.
    pub fn headers(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.columns().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the given columns (in the given order) on every row.
    pub fn project(&self, columns: &[String]) -> Dataset {
        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .filter_map(|col| row.get(col).map(|v| (col.clone(), v.to_string())))
                    .collect()
            })
            .collect();
        Dataset {
            id: DatasetId::for_rows(self.id.source.clone(), &rows),
            rows,
            skipped_rows: self.skipped_rows,
        }
    }

    /// Build a dataset from a JSON array of row objects.
    ///
    /// Non-object entries are skipped and counted. Scalar cells are
    /// stringified; `null` becomes an empty cell. Anything other than an array
    /// is rejected as [`DatasetError::NotTabular`].
    pub fn from_json(source: impl Into<String>, value: &Value) -> Result<Dataset, DatasetError> {
        let Value::Array(items) = value else {
            return Err(DatasetError::NotTabular {
                found: json_kind(value),
            });
        };

        let mut rows = Vec::with_capacity(items.len());
        let mut skipped_rows = 0usize;
        for item in items {
            let Value::Object(map) = item else {
                skipped_rows += 1;
                continue;
            };
            rows.push(map.iter().map(|(k, v)| (k.clone(), json_cell(v))).collect());
        }

        let mut dataset = Dataset::new(source, rows);
        dataset.skipped_rows = skipped_rows;
        Ok(dataset)
    }
}

fn json_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
