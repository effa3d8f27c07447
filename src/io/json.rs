//! JSON report writing and forecast-response reading.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;
use crate::forecast::ForecastResponse;

/// Write any report as pretty-printed JSON.
pub fn write_json_report<T: Serialize>(path: &Path, report: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create JSON report '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(|e| AppError::new(4, format!("Failed to write JSON report: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush JSON report: {e}")))?;
    tracing::debug!(path = %path.display(), "wrote JSON report");
    Ok(())
}

/// Read a forecaster response saved as JSON.
pub fn read_forecast_response(path: &Path) -> Result<ForecastResponse, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open forecast response '{}': {e}", path.display()))
    })?;
    let response: ForecastResponse = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid forecast response JSON: {e}")))?;

    if !response.skipped.is_empty() {
        tracing::warn!(
            skipped = response.skipped.len(),
            "forecaster skipped some products"
        );
    }
    Ok(response)
}
