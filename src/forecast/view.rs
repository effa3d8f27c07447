//! Per-product forecast views: aligned monthly series plus derived metrics.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::forecast::metrics::ForecastMetrics;
use crate::forecast::response::{ActualRecord, ForecastPoint, ForecastResponse};
use crate::series::{AlignedSeries, aggregate_and_align};

/// Everything needed to chart and summarise one product's forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForecastView {
    pub product_id: String,
    pub series: AlignedSeries,
    pub metrics: ForecastMetrics,
    /// Raw actual records for this product (for export).
    pub actual: Vec<ActualRecord>,
    /// Raw forecast points for this product (for export).
    pub forecast: Vec<ForecastPoint>,
}

/// Build the view for one product; `None` if the forecaster has no entry for it.
pub fn build_product_view(response: &ForecastResponse, product_id: &str) -> Option<ProductForecastView> {
    let product = response.per_product.get(product_id)?;
    let actual: Vec<ActualRecord> = response.actual_for(product_id).cloned().collect();

    let series = aggregate_and_align(&actual, &product.forecast);
    let metrics = ForecastMetrics::derive(&series, &product.forecast, product.metrics.accuracy_percent());

    tracing::debug!(
        product = product_id,
        months = series.len(),
        trend = metrics.trend.as_str(),
        confidence = metrics.confidence.as_str(),
        "built forecast view"
    );

    Some(ProductForecastView {
        product_id: product_id.to_string(),
        series,
        metrics,
        actual,
        forecast: product.forecast.clone(),
    })
}

/// Build views for every forecasted product, in sorted product order.
///
/// Products are independent, so views are computed in parallel.
pub fn build_all_views(response: &ForecastResponse) -> Vec<ProductForecastView> {
    let ids = response.product_ids();
    ids.par_iter()
        .filter_map(|id| build_product_view(response, id))
        .collect()
}

/// The product shown when none is requested explicitly.
pub fn default_product(response: &ForecastResponse) -> Option<&str> {
    response.product_ids().into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::metrics::{Confidence, Trend};
    use serde_json::json;

    fn response() -> ForecastResponse {
        serde_json::from_value(json!({
            "actual": [
                {"Product_ID": "P1", "ds": "2024-01-31", "y": 100.0},
                {"Product_ID": "P1", "ds": "2024-02-29", "y": 100.0},
                {"Product_ID": "P1", "ds": "2024-03-31", "y": 100.0},
                {"Product_ID": "P2", "ds": "2024-03-31", "y": 40.0}
            ],
            "per_product": {
                "P2": {
                    "metrics": {"accuracy_pct": 60.0},
                    "forecast": [
                        {"ds": "2024-04-30", "yhat": 30.0, "yhat_lower": 10.0, "yhat_upper": 50.0}
                    ]
                },
                "P1": {
                    "metrics": {"accuracy": 93.2},
                    "forecast": [
                        {"ds": "2024-04-30", "yhat": 110.4, "yhat_lower": 100.0, "yhat_upper": 105.0},
                        {"ds": "2024-05-31", "yhat": 112.0, "yhat_lower": 100.0, "yhat_upper": 108.0}
                    ]
                }
            },
            "skipped": {"P3": "Not enough points (2)"}
        }))
        .unwrap()
    }

    #[test]
    fn product_view_filters_actuals_and_aligns() {
        let view = build_product_view(&response(), "P1").unwrap();
        assert_eq!(view.actual.len(), 3);
        assert_eq!(view.series.len(), 5);
        assert_eq!(view.series.actual[3], None);
        assert_eq!(view.series.forecast[0], None);
        assert_eq!(view.metrics.trend, Trend::Up);
        assert_eq!(view.metrics.confidence, Confidence::High);
        assert_eq!(view.metrics.accuracy, Some(93.2));
        assert_eq!(view.metrics.next_period, Some(110.0));
    }

    #[test]
    fn unknown_or_skipped_products_have_no_view() {
        let r = response();
        assert!(build_product_view(&r, "P3").is_none());
        assert!(build_product_view(&r, "nope").is_none());
    }

    #[test]
    fn default_product_is_first_sorted_id() {
        assert_eq!(default_product(&response()), Some("P1"));
        assert_eq!(default_product(&ForecastResponse::default()), None);
    }

    #[test]
    fn parallel_views_match_sequential() {
        let r = response();
        let parallel = build_all_views(&r);
        let sequential: Vec<_> = r
            .product_ids()
            .iter()
            .filter_map(|id| build_product_view(&r, id))
            .collect();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.len(), 2);
        assert_eq!(parallel[1].product_id, "P2");
        assert_eq!(parallel[1].metrics.trend, Trend::Down);
    }
}
