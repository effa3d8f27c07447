//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - resolves the reorder policy (defaults, `.env`/environment, flags)
//! - runs the pipeline for the chosen subcommand
//! - prints reports and writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ForecastArgs, RopArgs, SampleArgs, ValidateArgs};
use crate::error::AppError;
use crate::policy::ReorderPolicy;

pub mod pipeline;

use pipeline::ProductSelection;

/// Entry point for the `demand` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Command::Validate(args) => handle_validate(args),
        Command::Rop(args) => handle_rop(args),
        Command::Forecast(args) => handle_forecast(args),
        Command::Sample(args) => handle_sample(args),
    }
}

/// Logs go to stderr; stdout carries the report.
fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Keep an already-installed subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_validate(args: ValidateArgs) -> Result<(), AppError> {
    let out = pipeline::run_validate(&args.input)?;

    println!("{}", crate::report::format_quality_report(&out.report));
    for err in &out.ingest.row_errors {
        println!("line {}: {}", err.line, err.message);
    }

    if let Some(path) = &args.json {
        crate::io::write_json_report(path, &out.report)?;
    }
    Ok(())
}

fn handle_rop(args: RopArgs) -> Result<(), AppError> {
    let policy = ReorderPolicy::from_env()?.with_overrides(args.lead_time, args.safety_factor)?;
    let out = pipeline::run_rop(&args.input, &policy)?;

    println!("{}", crate::report::format_reorder_report(&out.report));

    if let Some(path) = &args.export {
        crate::io::write_reorder_csv(path, &out.report)?;
    }
    if let Some(path) = &args.json {
        crate::io::write_json_report(path, &out.report)?;
    }
    Ok(())
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let selection = if args.all {
        ProductSelection::All
    } else {
        ProductSelection::One(args.product.clone())
    };
    let out = pipeline::run_forecast(&args.response, &selection)?;

    for view in &out.views {
        println!("{}", crate::report::format_forecast_view(view));
    }
    let skipped = crate::report::format_skipped(&out.response.skipped);
    if !skipped.is_empty() {
        println!("{skipped}");
    }

    let wants_series_export =
        args.export_series.is_some() || args.export_actual.is_some() || args.export_forecast.is_some();
    if wants_series_export {
        let [view] = out.views.as_slice() else {
            return Err(AppError::new(
                2,
                "Series exports need a single product; use --product instead of --all.",
            ));
        };
        if let Some(path) = &args.export_series {
            crate::io::write_aligned_series_csv(path, &view.series)?;
        }
        if let Some(path) = &args.export_actual {
            crate::io::write_actual_records_csv(path, &view.actual)?;
        }
        if let Some(path) = &args.export_forecast {
            crate::io::write_forecast_points_csv(path, &view.forecast)?;
        }
    }

    if let Some(path) = &args.json {
        crate::io::write_json_report(path, &out.views)?;
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = crate::data::SampleConfig {
        products: args.products,
        days: args.days,
        start: args.start,
        seed: args.seed,
        ..crate::data::SampleConfig::default()
    };
    let dataset = crate::data::generate_sales(&config)?;
    let written = crate::io::write_dataset_csv(&args.out, &dataset)?;
    println!("Wrote {written} rows to {}", args.out.display());
    Ok(())
}
