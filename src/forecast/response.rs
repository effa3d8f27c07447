//! Wire types for the forecasting service response.
//!
//! The shape is owned by the forecaster; we only adapt to it. Every field
//! other than `actual` and `per_product` is optional on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::series::DatedValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub summary: ForecastSummary,
    pub actual: Vec<ActualRecord>,
    #[serde(default)]
    pub forecast_future: Vec<FutureRecord>,
    pub per_product: BTreeMap<String, ProductForecast>,
    /// Products the forecaster declined, with its reason.
    #[serde(default)]
    pub skipped: BTreeMap<String, String>,
}

impl ForecastResponse {
    /// Forecasted product ids in sorted order.
    pub fn product_ids(&self) -> Vec<&str> {
        self.per_product.keys().map(String::as_str).collect()
    }

    /// Actual observations for one product, in response order.
    pub fn actual_for<'a>(&'a self, product_id: &'a str) -> impl Iterator<Item = &'a ActualRecord> + 'a {
        self.actual.iter().filter(move |r| r.product_id == product_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    #[serde(default)]
    pub per_product: Vec<SummaryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    #[serde(rename = "Product_ID")]
    pub product_id: String,
    #[serde(default)]
    pub accuracy_pct: Option<f64>,
}

/// Monthly actual total as reported back by the forecaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualRecord {
    #[serde(rename = "Product_ID")]
    pub product_id: String,
    #[serde(default)]
    pub ds: Option<String>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// Flattened future forecast row (all products).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureRecord {
    #[serde(rename = "Product_ID")]
    pub product_id: String,
    #[serde(flatten)]
    pub point: ForecastPoint,
}

/// One forecast period with its prediction interval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(default)]
    pub ds: Option<String>,
    #[serde(default)]
    pub yhat: Option<f64>,
    #[serde(default)]
    pub yhat_lower: Option<f64>,
    #[serde(default)]
    pub yhat_upper: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductForecast {
    #[serde(default)]
    pub forecast: Vec<ForecastPoint>,
    #[serde(default)]
    pub metrics: AccuracyMetrics,
}

/// Back-test metrics computed by the forecaster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub accuracy_pct: Option<f64>,
    #[serde(default)]
    pub mape: Option<f64>,
    #[serde(default)]
    pub rmse: Option<f64>,
    #[serde(default)]
    pub train_points: Option<u64>,
    #[serde(default)]
    pub test_points: Option<u64>,
}

impl AccuracyMetrics {
    /// Accuracy percentage, preferring `accuracy` over `accuracy_pct`.
    pub fn accuracy_percent(&self) -> Option<f64> {
        self.accuracy.or(self.accuracy_pct)
    }
}

impl DatedValue for ActualRecord {
    fn date(&self) -> Option<&str> {
        self.ds.as_deref()
    }

    fn value(&self) -> Option<f64> {
        self.y
    }
}

impl DatedValue for ForecastPoint {
    fn date(&self) -> Option<&str> {
        self.ds.as_deref()
    }

    fn value(&self) -> Option<f64> {
        self.yhat
    }
}
