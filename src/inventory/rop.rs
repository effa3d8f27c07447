//! Reorder point (ROP) calculation.
//!
//! For each product:
//!
//! - `avg`      = mean of strictly positive `Units_Sold` observations
//! - `safety`   = round(safety_stock_factor × avg)
//! - `rop`      = round(avg × lead_time + safety)
//! - inventory  = `Inventory_Level` from the product's last row (0 if absent/invalid)
//!
//! Products without a single valid observation are omitted from the result
//! rather than reported with zeros.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{Dataset, DatasetId, Row, columns};
use crate::policy::ReorderPolicy;

/// Reorder statistics for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPointResult {
    /// Exact mean; reports (JSON, CSV) carry it rounded to whole units.
    #[serde(serialize_with = "serialize_rounded")]
    pub average_daily_demand: f64,
    pub safety_stock: f64,
    pub reorder_point: f64,
    pub inventory_level: f64,
    pub below_reorder_point: bool,
    /// Number of valid demand observations behind the average.
    pub observations: usize,
}

/// A product whose current inventory is below its reorder point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowInventoryAlert {
    pub product_id: String,
    pub inventory_level: f64,
    pub reorder_point: f64,
}

/// Full ROP run output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderReport {
    pub dataset: DatasetId,
    pub policy: ReorderPolicy,
    pub message: String,
    pub reorder_points: BTreeMap<String, ReorderPointResult>,
    pub low_inventory: Vec<LowInventoryAlert>,
    /// Products seen in the data but omitted for lack of valid demand.
    pub omitted_products: Vec<String>,
}

/// Demand observations and last inventory snapshot for one product.
#[derive(Debug, Clone, Default)]
struct DemandSeries {
    sales: Vec<f64>,
    inventory_level: f64,
}

/// Compute reorder points for every product in the dataset.
pub fn calculate_reorder_points(dataset: &Dataset, policy: &ReorderPolicy) -> ReorderReport {
    let (order, series) = group_demand(&dataset.rows);

    let mut reorder_points = BTreeMap::new();
    let mut low_inventory = Vec::new();
    let mut omitted_products = Vec::new();

    for product_id in order {
        let Some(demand) = series.get(&product_id) else {
            continue;
        };
        let Some(result) = reorder_point_for(demand, policy) else {
            tracing::debug!(product = %product_id, "no valid demand observations, omitting");
            omitted_products.push(product_id);
            continue;
        };

        if result.below_reorder_point {
            tracing::info!(
                product = %product_id,
                inventory = result.inventory_level,
                reorder_point = result.reorder_point,
                "inventory below reorder point"
            );
            low_inventory.push(LowInventoryAlert {
                product_id: product_id.clone(),
                inventory_level: result.inventory_level,
                reorder_point: result.reorder_point,
            });
        }
        reorder_points.insert(product_id, result);
    }

    ReorderReport {
        dataset: dataset.id.clone(),
        policy: *policy,
        message: summary_message(low_inventory.len()),
        reorder_points,
        low_inventory,
        omitted_products,
    }
}

/// Single forward pass: collect valid sales and keep the last-seen inventory
/// level per product. Returns products in order of first appearance.
fn group_demand(rows: &[Row]) -> (Vec<String>, HashMap<String, DemandSeries>) {
    let mut order = Vec::new();
    let mut series: HashMap<String, DemandSeries> = HashMap::new();

    for row in rows {
        let Some(product_id) = row
            .get(columns::PRODUCT_ID)
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            continue;
        };

        let entry = series.entry(product_id.to_string()).or_insert_with(|| {
            order.push(product_id.to_string());
            DemandSeries::default()
        });

        if let Some(units) = parse_number(row.get(columns::UNITS_SOLD)).filter(|v| *v > 0.0) {
            entry.sales.push(units);
        }
        entry.inventory_level = parse_number(row.get(columns::INVENTORY_LEVEL)).unwrap_or(0.0);
    }

    (order, series)
}

fn reorder_point_for(demand: &DemandSeries, policy: &ReorderPolicy) -> Option<ReorderPointResult> {
    if demand.sales.is_empty() {
        return None;
    }
    let average = demand.sales.iter().sum::<f64>() / demand.sales.len() as f64;
    let safety_stock = (policy.safety_stock_factor * average).round();
    let reorder_point = (average * policy.lead_time + safety_stock).round();

    Some(ReorderPointResult {
        average_daily_demand: average,
        safety_stock,
        reorder_point,
        inventory_level: demand.inventory_level,
        below_reorder_point: demand.inventory_level < reorder_point,
        observations: demand.sales.len(),
    })
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    let v = raw?.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn serialize_rounded<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.round())
}

fn summary_message(alerts: usize) -> String {
    if alerts == 0 {
        "All good".to_string()
    } else {
        format!("{alerts} product(s) below ROP")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(pid: &str, units: &str, inventory: &str) -> Row {
        [
            (columns::PRODUCT_ID, pid),
            (columns::UNITS_SOLD, units),
            (columns::INVENTORY_LEVEL, inventory),
        ]
        .into_iter()
        .collect()
    }

    fn dataset(rows: Vec<Row>) -> Dataset {
        Dataset::new("sales.csv", rows)
    }

    #[test]
    fn known_fixture_matches_formula() {
        let ds = dataset(vec![
            sale("P1", "10", "500"),
            sale("P1", "20", "400"),
            sale("P1", "30", "90"),
        ]);
        let report = calculate_reorder_points(&ds, &ReorderPolicy::default());
        let r = &report.reorder_points["P1"];
        assert!((r.average_daily_demand - 20.0).abs() < 1e-12);
        assert_eq!(r.safety_stock, 4.0);
        assert_eq!(r.reorder_point, 104.0);
        assert_eq!(r.inventory_level, 90.0);
        assert!(r.below_reorder_point);
        assert_eq!(report.low_inventory.len(), 1);
        assert_eq!(report.message, "1 product(s) below ROP");
    }

    #[test]
    fn reorder_point_uses_rounded_safety_stock() {
        // avg = 2.5, safety = round(0.5) = 1 (away from zero), rop = round(2.5 * 3 + 1) = round(8.5) = 9
        let ds = dataset(vec![sale("P1", "2", "100"), sale("P1", "3", "100")]);
        let policy = ReorderPolicy { lead_time: 3.0, safety_stock_factor: 0.2 };
        let report = calculate_reorder_points(&ds, &policy);
        let r = &report.reorder_points["P1"];
        let expected = (r.average_daily_demand * policy.lead_time
            + (policy.safety_stock_factor * r.average_daily_demand).round())
        .round();
        assert_eq!(r.reorder_point, expected);
        assert_eq!(r.reorder_point, 9.0);
    }

    #[test]
    fn serialized_average_is_whole_units() {
        let ds = dataset(vec![sale("P1", "2", "100"), sale("P1", "3", "100")]);
        let report = calculate_reorder_points(&ds, &ReorderPolicy::default());
        assert_eq!(report.reorder_points["P1"].average_daily_demand, 2.5);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["reorderPoints"]["P1"]["averageDailyDemand"], serde_json::json!(3.0));
        assert_eq!(value["reorderPoints"]["P1"]["reorderPoint"], serde_json::json!(14.0));
    }

    #[test]
    fn invalid_and_non_positive_sales_are_excluded() {
        let ds = dataset(vec![
            sale("P1", "abc", "0"),
            sale("P1", "-5", "0"),
            sale("P1", "0", "0"),
            sale("P1", "", "0"),
            sale("P1", "12", "100"),
        ]);
        let report = calculate_reorder_points(&ds, &ReorderPolicy::default());
        let r = &report.reorder_points["P1"];
        assert_eq!(r.observations, 1);
        assert_eq!(r.average_daily_demand, 12.0);
    }

    #[test]
    fn products_without_valid_demand_are_omitted() {
        let ds = dataset(vec![
            sale("P1", "0", "10"),
            sale("P1", "n/a", "10"),
            sale("P2", "4", "1"),
        ]);
        let report = calculate_reorder_points(&ds, &ReorderPolicy::default());
        assert!(!report.reorder_points.contains_key("P1"));
        assert_eq!(report.omitted_products, vec!["P1".to_string()]);
        assert!(report.low_inventory.iter().all(|a| a.product_id != "P1"));

        // Omission is stable across repeated runs.
        let again = calculate_reorder_points(&ds, &ReorderPolicy::default());
        assert_eq!(report, again);
    }

    #[test]
    fn inventory_uses_last_row_not_max() {
        let ds = dataset(vec![
            sale("P1", "10", "900"),
            sale("P2", "10", "5"),
            sale("P1", "10", "30"),
        ]);
        let report = calculate_reorder_points(&ds, &ReorderPolicy::default());
        assert_eq!(report.reorder_points["P1"].inventory_level, 30.0);
    }

    #[test]
    fn invalid_last_inventory_defaults_to_zero() {
        let ds = dataset(vec![sale("P1", "10", "900"), sale("P1", "10", "unknown")]);
        let report = calculate_reorder_points(&ds, &ReorderPolicy::default());
        let r = &report.reorder_points["P1"];
        assert_eq!(r.inventory_level, 0.0);
        assert!(r.below_reorder_point);
    }

    #[test]
    fn alerts_follow_first_appearance_and_all_good_message() {
        let ds = dataset(vec![
            sale("B", "10", "0"),
            sale("A", "10", "0"),
            sale("C", "1", "1000"),
        ]);
        let report = calculate_reorder_points(&ds, &ReorderPolicy::default());
        let ids: Vec<&str> = report.low_inventory.iter().map(|a| a.product_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);

        let healthy = dataset(vec![sale("C", "1", "1000")]);
        let report = calculate_reorder_points(&healthy, &ReorderPolicy::default());
        assert!(report.low_inventory.is_empty());
        assert_eq!(report.message, "All good");
    }

    #[test]
    fn rows_without_product_id_are_ignored() {
        let ds = dataset(vec![sale("", "10", "0"), sale("  ", "10", "0")]);
        let report = calculate_reorder_points(&ds, &ReorderPolicy::default());
        assert!(report.reorder_points.is_empty());
        assert!(report.omitted_products.is_empty());
    }
}
