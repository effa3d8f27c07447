//! Fixed-width text rendering of quality, reorder and forecast reports.

use crate::forecast::ProductForecastView;
use crate::inventory::ReorderReport;
use crate::quality::QualityReport;

/// Format the upload validation summary.
pub fn format_quality_report(report: &QualityReport) -> String {
    let mut out = String::new();

    out.push_str("=== Dataset quality ===\n");
    out.push_str(&format!("Dataset: {}\n", report.dataset));
    out.push_str(&format!("Status: {}\n", report.message));
    out.push_str(&format!(
        "Rows: {} | Columns: {} | Missing values: {}\n",
        report.total_rows,
        report.headers.len(),
        report.missing_values
    ));
    if report.skipped_rows > 0 {
        out.push_str(&format!("Skipped (not row-shaped): {}\n", report.skipped_rows));
    }
    for err in &report.errors {
        out.push_str(&format!("Error: {err}\n"));
    }

    if report.columns.is_empty() {
        return out;
    }

    out.push('\n');
    push_line(
        &mut out,
        format!(
            "{:<24} {:<8} {:>8} {:>8} {:>8} {:>8}",
            "column", "type", "number", "date", "string", "empty"
        ),
    );
    push_line(
        &mut out,
        format!("{:-<24} {:-<8} {:-<8} {:-<8} {:-<8} {:-<8}", "", "", "", "", "", ""),
    );
    for col in &report.columns {
        push_line(
            &mut out,
            format!(
                "{:<24} {:<8} {:>8} {:>8} {:>8} {:>8}",
                truncate(&col.name, 24),
                col.inferred.as_str(),
                col.counts.number,
                col.counts.date,
                col.counts.string,
                col.counts.nulls
            ),
        );
    }

    out
}

/// Format the reorder point table and alert list.
pub fn format_reorder_report(report: &ReorderReport) -> String {
    let mut out = String::new();

    out.push_str("=== Reorder points ===\n");
    out.push_str(&format!("Dataset: {}\n", report.dataset));
    out.push_str(&format!(
        "Policy: lead time {} periods | safety stock factor {}\n",
        report.policy.lead_time, report.policy.safety_stock_factor
    ));
    out.push_str(&format!("Status: {}\n\n", report.message));

    push_line(
        &mut out,
        format!(
            "{:<20} {:>10} {:>8} {:>8} {:>10} {:<5}",
            "product", "avg/day", "safety", "rop", "inventory", "alert"
        ),
    );
    push_line(
        &mut out,
        format!("{:-<20} {:-<10} {:-<8} {:-<8} {:-<10} {:-<5}", "", "", "", "", "", ""),
    );
    for (id, r) in &report.reorder_points {
        push_line(
            &mut out,
            format!(
                "{:<20} {:>10.2} {:>8.0} {:>8.0} {:>10.0} {:<5}",
                truncate(id, 20),
                r.average_daily_demand,
                r.safety_stock,
                r.reorder_point,
                r.inventory_level,
                if r.below_reorder_point { "LOW" } else { "" }
            ),
        );
    }

    if !report.omitted_products.is_empty() {
        out.push_str(&format!(
            "\nNo valid demand (omitted): {}\n",
            report.omitted_products.join(", ")
        ));
    }

    out
}

/// Format one product's forecast summary and aligned monthly table.
pub fn format_forecast_view(view: &ProductForecastView) -> String {
    let mut out = String::new();
    let m = &view.metrics;

    out.push_str(&format!("=== Forecast: {} ===\n", view.product_id));
    out.push_str(&format!(
        "Accuracy: {} | Trend: {} | Next period: {} | Confidence: {}\n\n",
        m.accuracy.map(|a| format!("{a:.1}%")).unwrap_or_else(|| "N/A".to_string()),
        m.trend.as_str(),
        m.next_period.map(|v| format!("{v:.0}")).unwrap_or_else(|| "N/A".to_string()),
        m.confidence.as_str()
    ));

    push_line(&mut out, format!("{:<8} {:>12} {:>12}", "month", "actual", "forecast"));
    push_line(&mut out, format!("{:-<8} {:-<12} {:-<12}", "", "", ""));
    for (month, actual, forecast) in view.series.rows() {
        push_line(
            &mut out,
            format!("{:<8} {:>12} {:>12}", month.to_string(), fmt_opt(actual), fmt_opt(forecast)),
        );
    }

    out
}

/// Format the list of products the forecaster declined.
pub fn format_skipped(skipped: &std::collections::BTreeMap<String, String>) -> String {
    let mut out = String::new();
    if skipped.is_empty() {
        return out;
    }
    out.push_str("Skipped by forecaster:\n");
    for (id, reason) in skipped {
        out.push_str(&format!("- {id}: {reason}\n"));
    }
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
