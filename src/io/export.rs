//! CSV exports.
//!
//! Files are meant to be opened in a spreadsheet: one header row, plain
//! numbers, and an empty cell wherever a series has no value.

use std::path::Path;

use serde::Serialize;

use crate::domain::Dataset;
use crate::error::AppError;
use crate::forecast::{ActualRecord, ForecastPoint};
use crate::inventory::ReorderReport;
use crate::series::AlignedSeries;

// Each header lists the fields of its row struct in declaration order.
const ALIGNED_HEADER: [&str; 3] = ["month", "actual", "forecast"];
const FORECAST_HEADER: [&str; 4] = ["Date", "Forecast_Units_Sold", "yhat_lower", "yhat_upper"];
const ACTUAL_HEADER: [&str; 2] = ["Date", "Actual"];
const REORDER_HEADER: [&str; 7] = [
    "product_id",
    "average_daily_demand",
    "safety_stock",
    "reorder_point",
    "inventory_level",
    "below_reorder_point",
    "observations",
];

#[derive(Debug, Serialize)]
struct AlignedRow {
    month: String,
    actual: Option<f64>,
    forecast: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ForecastRow<'a> {
    date: &'a str,
    forecast: Option<f64>,
    yhat_lower: Option<f64>,
    yhat_upper: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ActualRow<'a> {
    date: &'a str,
    actual: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ReorderRow<'a> {
    product_id: &'a str,
    average_daily_demand: f64,
    safety_stock: f64,
    reorder_point: f64,
    inventory_level: f64,
    below_reorder_point: bool,
    observations: usize,
}

/// Write the month-aligned actual/forecast series.
pub fn write_aligned_series_csv(path: &Path, series: &AlignedSeries) -> Result<usize, AppError> {
    write_rows(
        path,
        &ALIGNED_HEADER,
        series.rows().map(|(month, actual, forecast)| AlignedRow {
            month: month.to_string(),
            actual,
            forecast,
        }),
    )
}

/// Write raw forecast points (`Date,Forecast_Units_Sold,yhat_lower,yhat_upper`).
pub fn write_forecast_points_csv(path: &Path, points: &[ForecastPoint]) -> Result<usize, AppError> {
    write_rows(
        path,
        &FORECAST_HEADER,
        points.iter().map(|p| ForecastRow {
            date: p.ds.as_deref().unwrap_or(""),
            forecast: p.yhat,
            yhat_lower: p.yhat_lower,
            yhat_upper: p.yhat_upper,
        }),
    )
}

/// Write raw actual observations (`Date,Actual`).
pub fn write_actual_records_csv(path: &Path, records: &[ActualRecord]) -> Result<usize, AppError> {
    write_rows(
        path,
        &ACTUAL_HEADER,
        records.iter().map(|r| ActualRow {
            date: r.ds.as_deref().unwrap_or(""),
            actual: r.y,
        }),
    )
}

/// Write the per-product reorder table, sorted by product id.
pub fn write_reorder_csv(path: &Path, report: &ReorderReport) -> Result<usize, AppError> {
    write_rows(
        path,
        &REORDER_HEADER,
        report.reorder_points.iter().map(|(id, r)| ReorderRow {
            product_id: id,
            average_daily_demand: r.average_daily_demand.round(),
            safety_stock: r.safety_stock,
            reorder_point: r.reorder_point,
            inventory_level: r.inventory_level,
            below_reorder_point: r.below_reorder_point,
            observations: r.observations,
        }),
    )
}

/// Write a dataset back out as CSV, header taken from the first row.
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<usize, AppError> {
    let headers = dataset.headers();
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create CSV '{}': {e}", path.display())))?;
    writer
        .write_record(&headers)
        .map_err(|e| AppError::new(4, format!("Failed to write CSV header: {e}")))?;
    for row in &dataset.rows {
        writer
            .write_record(headers.iter().map(|h| row.get(h).unwrap_or("")))
            .map_err(|e| AppError::new(4, format!("Failed to write CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush CSV: {e}")))?;
    Ok(dataset.len())
}

/// The header is written up front so an export with no rows still has one.
fn write_rows<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> Result<usize, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    writer
        .write_record(header)
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    let mut written = 0usize;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
        written += 1;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = written, "exported CSV");
    Ok(written)
}
