//! Shared pipeline logic behind each subcommand.
//!
//! Each `run_*` function loads its input, runs the analytics and returns the
//! computed outputs; `app` only decides what to print and export.

use std::path::Path;

use crate::domain::{Dataset, columns};
use crate::error::AppError;
use crate::forecast::{ForecastResponse, ProductForecastView, build_all_views, build_product_view, default_product};
use crate::inventory::{ReorderReport, calculate_reorder_points};
use crate::io::{IngestedDataset, load_dataset, read_forecast_response};
use crate::policy::ReorderPolicy;
use crate::quality::{QualityReport, build_quality_report};

/// Outputs of `demand validate`.
#[derive(Debug, Clone)]
pub struct ValidateOutput {
    pub ingest: IngestedDataset,
    pub report: QualityReport,
}

/// Outputs of `demand rop`.
#[derive(Debug, Clone)]
pub struct RopOutput {
    pub ingest: IngestedDataset,
    pub report: ReorderReport,
}

/// Which products a forecast run should summarise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSelection {
    /// One product; `None` picks the first forecasted id.
    One(Option<String>),
    All,
}

/// Outputs of `demand forecast`.
#[derive(Debug, Clone)]
pub struct ForecastOutput {
    pub response: ForecastResponse,
    pub views: Vec<ProductForecastView>,
}

pub fn run_validate(input: &Path) -> Result<ValidateOutput, AppError> {
    let ingest = load_dataset(input)?;
    let report = build_quality_report(&ingest.dataset);
    tracing::info!(
        dataset = %report.dataset,
        valid = report.is_valid(),
        missing = report.missing_values,
        "validated dataset"
    );
    Ok(ValidateOutput { ingest, report })
}

pub fn run_rop(input: &Path, policy: &ReorderPolicy) -> Result<RopOutput, AppError> {
    policy.validate()?;
    let ingest = load_dataset(input)?;
    require_columns(&ingest.dataset, &[columns::PRODUCT_ID, columns::UNITS_SOLD])?;

    let report = calculate_reorder_points(&ingest.dataset, policy);
    if report.reorder_points.is_empty() {
        tracing::warn!(dataset = %report.dataset, "no product has valid demand");
    }
    Ok(RopOutput { ingest, report })
}

pub fn run_forecast(response_path: &Path, selection: &ProductSelection) -> Result<ForecastOutput, AppError> {
    let response = read_forecast_response(response_path)?;
    let views = select_views(&response, selection)?;
    Ok(ForecastOutput { response, views })
}

/// Build the requested views from an already-loaded response.
pub fn select_views(
    response: &ForecastResponse,
    selection: &ProductSelection,
) -> Result<Vec<ProductForecastView>, AppError> {
    if response.per_product.is_empty() {
        return Err(AppError::new(3, "Forecast response contains no forecasted products."));
    }

    match selection {
        ProductSelection::All => Ok(build_all_views(response)),
        ProductSelection::One(requested) => {
            let product_id = match requested {
                Some(id) => id.as_str(),
                None => default_product(response)
                    .ok_or_else(|| AppError::new(3, "Forecast response contains no forecasted products."))?,
            };
            let view = build_product_view(response, product_id).ok_or_else(|| {
                let reason = response
                    .skipped
                    .get(product_id)
                    .map(|r| format!(" (skipped by forecaster: {r})"))
                    .unwrap_or_default();
                AppError::new(3, format!("No forecast for product '{product_id}'{reason}."))
            })?;
            Ok(vec![view])
        }
    }
}

/// An empty dataset passes; it simply yields an empty report.
fn require_columns(dataset: &Dataset, required: &[&str]) -> Result<(), AppError> {
    if dataset.is_empty() {
        return Ok(());
    }
    let headers = dataset.headers();
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|c| !headers.iter().any(|h| h == c))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::new(
        2,
        format!("Dataset '{}' is missing required column(s): {}", dataset.id, missing.join(", ")),
    ))
}
