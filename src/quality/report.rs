//! Aggregate quality report for an uploaded dataset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Dataset, DatasetId, SemanticType};
use crate::quality::infer::{ColumnProfile, profile_columns};

pub const EMPTY_DATASET_ERROR: &str = "Empty or invalid CSV structure";

/// Dataset-level quality summary.
///
/// Carries aggregate statistics only; no per-row detail leaves this module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub dataset: DatasetId,
    pub message: String,
    pub total_rows: usize,
    pub headers: Vec<String>,
    pub missing_values: usize,
    pub type_summary: BTreeMap<String, SemanticType>,
    pub columns: Vec<ColumnProfile>,
    pub errors: Vec<String>,
    /// Entries dropped before profiling because they were not row-shaped.
    pub skipped_rows: usize,
}

impl QualityReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Profile a dataset.
///
/// Never fails: an empty dataset yields a structural error entry and zero
/// counts rather than an `Err`.
pub fn build_quality_report(dataset: &Dataset) -> QualityReport {
    let headers = dataset.headers();
    let mut errors = Vec::new();

    if dataset.is_empty() {
        errors.push(EMPTY_DATASET_ERROR.to_string());
        return QualityReport {
            dataset: dataset.id.clone(),
            message: status_message(&errors),
            total_rows: 0,
            headers,
            missing_values: 0,
            type_summary: BTreeMap::new(),
            columns: Vec::new(),
            errors,
            skipped_rows: dataset.skipped_rows,
        };
    }

    let columns = profile_columns(&dataset.rows, &headers);
    let missing_values = columns.iter().map(|c| c.counts.nulls).sum();
    let type_summary = columns.iter().map(|c| (c.name.clone(), c.inferred)).collect();

    QualityReport {
        dataset: dataset.id.clone(),
        message: status_message(&errors),
        total_rows: dataset.len(),
        headers,
        missing_values,
        type_summary,
        columns,
        errors,
        skipped_rows: dataset.skipped_rows,
    }
}

fn status_message(errors: &[String]) -> String {
    if errors.is_empty() {
        "Validation successful".to_string()
    } else {
        "Validation failed".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Row;

    fn row(cells: &[(&str, &str)]) -> Row {
        cells.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn sales_fixture() -> Dataset {
        Dataset::new(
            "sales.csv",
            vec![
                row(&[("Date", "2024-01-01"), ("Product_ID", "P1"), ("Units_Sold", "10")]),
                row(&[("Date", "2024-01-02"), ("Product_ID", "P2"), ("Units_Sold", "")]),
                row(&[("Date", "n/a"), ("Product_ID", "P1"), ("Units_Sold", "7")]),
                row(&[("Date", "2024-01-04"), ("Product_ID", ""), ("Units_Sold", "oops")]),
            ],
        )
    }

    #[test]
    fn empty_dataset_reports_structural_error() {
        let report = build_quality_report(&Dataset::new("empty.csv", Vec::new()));
        assert_eq!(report.errors, vec![EMPTY_DATASET_ERROR.to_string()]);
        assert_eq!(report.message, "Validation failed");
        assert_eq!(report.total_rows, 0);
        assert_eq!(report.missing_values, 0);
        assert!(report.headers.is_empty());
        assert!(report.type_summary.is_empty());
        assert!(!report.is_valid());
    }

    #[test]
    fn report_infers_majority_types() {
        let report = build_quality_report(&sales_fixture());
        assert!(report.is_valid());
        assert_eq!(report.message, "Validation successful");
        assert_eq!(report.total_rows, 4);
        assert_eq!(report.headers, vec!["Date", "Product_ID", "Units_Sold"]);
        assert_eq!(report.type_summary["Date"], SemanticType::Date);
        assert_eq!(report.type_summary["Product_ID"], SemanticType::String);
        assert_eq!(report.type_summary["Units_Sold"], SemanticType::Number);
    }

    #[test]
    fn missing_values_equals_sum_of_column_nulls() {
        let report = build_quality_report(&sales_fixture());
        let sum: usize = report.columns.iter().map(|c| c.counts.nulls).sum();
        assert_eq!(report.missing_values, sum);
        assert_eq!(report.missing_values, 2);
    }

    #[test]
    fn headers_round_trip_as_column_filter() {
        let dataset = sales_fixture();
        let report = build_quality_report(&dataset);
        let projected = dataset.project(&report.headers);
        assert_eq!(projected.len(), report.total_rows);
        assert_eq!(build_quality_report(&projected).type_summary, report.type_summary);
    }

    #[test]
    fn report_serializes_with_dashboard_keys() {
        let report = build_quality_report(&sales_fixture());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalRows"], 4);
        assert_eq!(json["missingValues"], 2);
        assert_eq!(json["typeSummary"]["Units_Sold"], "number");
        assert!(json["errors"].as_array().unwrap().is_empty());
    }
}
