//! Derived forecast metrics: trend, confidence, next-period estimate.
//!
//! All functions here are pure and deterministic over their inputs.

use serde::{Deserialize, Serialize};

use crate::forecast::response::ForecastPoint;
use crate::policy::{CONFIDENCE_HIGH_RATIO, CONFIDENCE_MEDIUM_RATIO, TREND_THRESHOLD_PCT, TREND_WINDOW};
use crate::series::AlignedSeries;

/// Direction of near-term forecast demand relative to recent actuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Flat => "flat",
        }
    }
}

/// Heuristic reliability of a forecast, from prediction-interval width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastMetrics {
    pub trend: Trend,
    pub confidence: Confidence,
    /// Back-test accuracy reported by the forecaster (percent).
    pub accuracy: Option<f64>,
    /// First forecast period, rounded.
    pub next_period: Option<f64>,
}

impl ForecastMetrics {
    /// Derive all metrics for one product.
    pub fn derive(aligned: &AlignedSeries, raw_forecast: &[ForecastPoint], accuracy: Option<f64>) -> Self {
        let actual = aligned.actual_values();
        let forecast = aligned.forecast_values();
        Self {
            trend: compute_trend(&actual, &forecast),
            confidence: compute_confidence(raw_forecast),
            accuracy,
            next_period: next_period_estimate(&forecast),
        }
    }
}

/// Compare the mean of the last actual window with the first forecast window.
pub fn compute_trend(actual: &[f64], forecast: &[f64]) -> Trend {
    let recent = &actual[actual.len().saturating_sub(TREND_WINDOW)..];
    let upcoming = &forecast[..forecast.len().min(TREND_WINDOW)];

    let (Some(base), Some(next)) = (mean(recent), mean(upcoming)) else {
        return Trend::Flat;
    };
    if base == 0.0 {
        return Trend::Flat;
    }

    let change_pct = (next - base) / base * 100.0;
    if change_pct > TREND_THRESHOLD_PCT {
        Trend::Up
    } else if change_pct < -TREND_THRESHOLD_PCT {
        Trend::Down
    } else {
        Trend::Flat
    }
}

/// Classify by the mean `lower / upper` ratio over points with a positive upper bound.
pub fn compute_confidence(points: &[ForecastPoint]) -> Confidence {
    let ratios: Vec<f64> = points
        .iter()
        .filter_map(|p| {
            let upper = p.yhat_upper.filter(|u| u.is_finite() && *u > 0.0)?;
            let lower = p.yhat_lower.filter(|l| l.is_finite()).unwrap_or(0.0);
            Some(lower / upper)
        })
        .collect();

    match mean(&ratios) {
        Some(r) if r > CONFIDENCE_HIGH_RATIO => Confidence::High,
        Some(r) if r > CONFIDENCE_MEDIUM_RATIO => Confidence::Medium,
        _ => Confidence::Low,
    }
}

/// First forecast value, rounded; `None` when there is no forecast.
pub fn next_period_estimate(forecast: &[f64]) -> Option<f64> {
    forecast.first().map(|v| v.round())
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
