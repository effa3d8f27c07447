//! End-to-end runs over files in a temp directory.

use std::fs;

use demand_desk::app::pipeline::{ProductSelection, run_forecast, run_rop, run_validate};
use demand_desk::data::{SampleConfig, generate_sales};
use demand_desk::domain::SemanticType;
use demand_desk::forecast::{Confidence, Trend};
use demand_desk::io::{write_aligned_series_csv, write_dataset_csv, write_json_report};
use demand_desk::policy::ReorderPolicy;
use serde_json::json;

fn sample_csv(dir: &std::path::Path) -> std::path::PathBuf {
    let config = SampleConfig {
        products: 3,
        days: 60,
        ..SampleConfig::default()
    };
    let dataset = generate_sales(&config).unwrap();
    let path = dir.join("sales.csv");
    assert_eq!(write_dataset_csv(&path, &dataset).unwrap(), 180);
    path
}

#[test]
fn generated_sample_validates_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_csv(dir.path());

    let out = run_validate(&path).unwrap();
    assert!(out.ingest.row_errors.is_empty());
    assert_eq!(out.report.message, "Validation successful");
    assert_eq!(out.report.total_rows, 180);
    assert_eq!(out.report.missing_values, 0);
    assert_eq!(out.report.type_summary["Date"], SemanticType::Date);
    assert_eq!(out.report.type_summary["Inventory_Level"], SemanticType::Number);
    assert_eq!(out.report.type_summary["Product_ID"], SemanticType::String);
}

#[test]
fn reorder_points_cover_every_sample_product() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_csv(dir.path());
    let policy = ReorderPolicy {
        lead_time: 3.0,
        safety_stock_factor: 0.5,
    };

    let out = run_rop(&path, &policy).unwrap();
    let ids: Vec<&str> = out.report.reorder_points.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["P001", "P002", "P003"]);

    for (id, r) in &out.report.reorder_points {
        let expected_safety = (0.5 * r.average_daily_demand).round();
        assert_eq!(r.safety_stock, expected_safety, "{id}");
        assert_eq!(r.reorder_point, (r.average_daily_demand * 3.0 + expected_safety).round(), "{id}");
        assert_eq!(r.below_reorder_point, r.inventory_level < r.reorder_point, "{id}");
    }
    assert_eq!(
        out.report.low_inventory.len(),
        out.report.reorder_points.values().filter(|r| r.below_reorder_point).count()
    );
}

#[test]
fn reorder_run_on_hand_written_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.csv");
    fs::write(
        &path,
        "Date,Product_ID,Units_Sold,Inventory_Level\n\
         2024-01-01,P1,10,500\n\
         2024-01-02,P1,20,100\n\
         2024-01-01,P2,0,40\n\
         2024-01-01,P3,2,50\n\
         2024-01-02,P3,3,\n",
    )
    .unwrap();

    let out = run_rop(&path, &ReorderPolicy::default()).unwrap();
    let report = &out.report;

    let p1 = &report.reorder_points["P1"];
    assert_eq!(p1.average_daily_demand, 15.0);
    assert_eq!(p1.safety_stock, 3.0);
    assert_eq!(p1.reorder_point, 78.0);
    assert!(!p1.below_reorder_point);

    // Last row's inventory is blank, so it counts as zero.
    let p3 = &report.reorder_points["P3"];
    assert_eq!(p3.inventory_level, 0.0);
    assert!(p3.below_reorder_point);

    assert_eq!(report.omitted_products, vec!["P2".to_string()]);
    assert_eq!(report.message, "1 product(s) below ROP");

    let json_path = dir.path().join("rop.json");
    write_json_report(&json_path, report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["reorderPoints"]["P1"]["reorderPoint"], json!(78.0));
}

#[test]
fn forecast_response_summary_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("response.json");
    let response = json!({
        "summary": {"per_product": [{"Product_ID": "P1", "accuracy_pct": 91.5}]},
        "actual": [
            {"Product_ID": "P1", "ds": "2024-01-15", "y": 100.0},
            {"Product_ID": "P1", "ds": "2024-01-20", "y": 20.0},
            {"Product_ID": "P1", "ds": "2024-02-10", "y": 100.0},
            {"Product_ID": "P1", "ds": "2024-03-05", "y": 100.0},
            {"Product_ID": "P2", "ds": "2024-03-05", "y": 7.0}
        ],
        "per_product": {
            "P1": {
                "metrics": {"accuracy_pct": 91.5},
                "forecast": [
                    {"ds": "2024-04-30", "yhat": 130.0, "yhat_lower": 125.0, "yhat_upper": 135.0},
                    {"ds": "2024-05-31", "yhat": 140.0, "yhat_lower": 134.0, "yhat_upper": 146.0}
                ]
            }
        },
        "skipped": {"P2": "not enough history"}
    });
    fs::write(&path, response.to_string()).unwrap();

    let out = run_forecast(&path, &ProductSelection::One(None)).unwrap();
    assert_eq!(out.views.len(), 1);
    let view = &out.views[0];
    assert_eq!(view.product_id, "P1");
    assert_eq!(view.series.len(), 5);
    assert_eq!(view.series.actual[0], Some(120.0));
    assert_eq!(view.metrics.trend, Trend::Up);
    assert_eq!(view.metrics.confidence, Confidence::High);
    assert_eq!(view.metrics.accuracy, Some(91.5));
    assert_eq!(view.metrics.next_period, Some(130.0));
    assert_eq!(out.response.skipped["P2"], "not enough history");

    let csv_path = dir.path().join("series.csv");
    write_aligned_series_csv(&csv_path, &view.series).unwrap();
    let text = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "month,actual,forecast");
    assert_eq!(lines[1], "2024-01,120.0,");
    assert_eq!(lines[4], "2024-04,,130.0");

    let err = run_forecast(&path, &ProductSelection::One(Some("P2".into()))).unwrap_err();
    assert_eq!(err.exit_code(), 3);
}
