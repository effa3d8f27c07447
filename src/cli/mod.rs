//! Command-line parsing for the demand desk.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! analytics code; `app` turns parsed arguments into pipeline calls.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "demand",
    version,
    about = "Sales dataset validation, reorder points and forecast summaries"
)]
pub struct Cli {
    /// Debug-level logging on stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Infer column types and count missing values in a sales dataset.
    Validate(ValidateArgs),
    /// Compute per-product reorder points and low-inventory alerts.
    Rop(RopArgs),
    /// Summarise a saved forecaster response per product.
    Forecast(ForecastArgs),
    /// Write a seeded synthetic sales CSV.
    Sample(SampleArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Sales dataset (`.csv`, or `.json` array of row objects).
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Also write the quality report as JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct RopArgs {
    /// Sales dataset with `Product_ID`, `Units_Sold` and `Inventory_Level` columns.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Lead time in demand periods (overrides `DEMAND_LEAD_TIME`).
    #[arg(long)]
    pub lead_time: Option<f64>,

    /// Safety stock as a fraction of average demand (overrides `DEMAND_SAFETY_FACTOR`).
    #[arg(long)]
    pub safety_factor: Option<f64>,

    /// Export the reorder table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Also write the reorder report as JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ForecastArgs {
    /// Forecaster response saved as JSON.
    #[arg(value_name = "JSON")]
    pub response: PathBuf,

    /// Product to summarise (defaults to the first forecasted product id).
    #[arg(short, long, conflicts_with = "all")]
    pub product: Option<String>,

    /// Summarise every forecasted product.
    #[arg(long)]
    pub all: bool,

    /// Export the month-aligned actual/forecast series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_series: Option<PathBuf>,

    /// Export the product's raw actual points to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_actual: Option<PathBuf>,

    /// Export the product's raw forecast points to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_forecast: Option<PathBuf>,

    /// Also write the view(s) as JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short, long, value_name = "CSV")]
    pub out: PathBuf,

    /// Number of products.
    #[arg(long, default_value_t = 5)]
    pub products: usize,

    /// Number of days per product.
    #[arg(long, default_value_t = 365)]
    pub days: usize,

    /// First date (YYYY-MM-DD).
    #[arg(long, default_value = "2024-01-01")]
    pub start: NaiveDate,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_rop_overrides() {
        let cli = Cli::parse_from(["demand", "-v", "rop", "sales.csv", "--lead-time", "3", "--safety-factor", "0.5"]);
        assert!(cli.verbose);
        let Command::Rop(args) = cli.command else {
            panic!("expected rop");
        };
        assert_eq!(args.lead_time, Some(3.0));
        assert_eq!(args.safety_factor, Some(0.5));
        assert!(args.export.is_none());
    }

    #[test]
    fn product_and_all_conflict() {
        let res = Cli::try_parse_from(["demand", "forecast", "resp.json", "--all", "--product", "P1"]);
        assert!(res.is_err());
    }

    #[test]
    fn sample_defaults() {
        let cli = Cli::parse_from(["demand", "sample", "--out", "s.csv"]);
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.days, 365);
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
