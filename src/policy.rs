//! Inventory and forecast policy constants.
//!
//! The trend and confidence thresholds are fixed: changing them changes how
//! every forecast view is classified, so they are not runtime-tunable. The
//! reorder policy (lead time, safety-stock factor) is per-deployment and can
//! be overridden from the environment or the command line.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default lead time, in demand periods.
pub const DEFAULT_LEAD_TIME: f64 = 5.0;

/// Default safety stock as a fraction of average demand.
pub const DEFAULT_SAFETY_STOCK_FACTOR: f64 = 0.2;

/// Percentage change above which the trend is `up` (and below whose negation it is `down`).
pub const TREND_THRESHOLD_PCT: f64 = 5.0;

/// Number of trailing actual / leading forecast periods compared for the trend.
pub const TREND_WINDOW: usize = 3;

/// Mean lower/upper ratio above which confidence is `High`.
pub const CONFIDENCE_HIGH_RATIO: f64 = 0.90;

/// Mean lower/upper ratio above which confidence is `Medium`.
pub const CONFIDENCE_MEDIUM_RATIO: f64 = 0.75;

pub const ENV_LEAD_TIME: &str = "DEMAND_LEAD_TIME";
pub const ENV_SAFETY_STOCK_FACTOR: &str = "DEMAND_SAFETY_FACTOR";

/// Reorder-point policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPolicy {
    /// Number of demand periods between placing and receiving an order.
    pub lead_time: f64,
    /// Safety stock as a fraction of average demand.
    pub safety_stock_factor: f64,
}

impl Default for ReorderPolicy {
    fn default() -> Self {
        Self {
            lead_time: DEFAULT_LEAD_TIME,
            safety_stock_factor: DEFAULT_SAFETY_STOCK_FACTOR,
        }
    }
}

impl ReorderPolicy {
    /// Load the policy from `.env` / the process environment.
    ///
    /// Missing variables keep their defaults; present-but-invalid ones are an error.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the policy through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut policy = Self::default();
        if let Some(raw) = lookup(ENV_LEAD_TIME) {
            policy.lead_time = parse_setting(ENV_LEAD_TIME, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SAFETY_STOCK_FACTOR) {
            policy.safety_stock_factor = parse_setting(ENV_SAFETY_STOCK_FACTOR, &raw)?;
        }
        policy.validate()?;
        Ok(policy)
    }

    /// Apply explicit overrides (e.g. from CLI flags).
    pub fn with_overrides(mut self, lead_time: Option<f64>, safety_stock_factor: Option<f64>) -> Result<Self, AppError> {
        if let Some(v) = lead_time {
            self.lead_time = v;
        }
        if let Some(v) = safety_stock_factor {
            self.safety_stock_factor = v;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.lead_time.is_finite() && self.lead_time >= 0.0) {
            return Err(AppError::new(
                2,
                format!("Invalid lead time {} (must be finite and >= 0).", self.lead_time),
            ));
        }
        if !(self.safety_stock_factor.is_finite() && self.safety_stock_factor >= 0.0) {
            return Err(AppError::new(
                2,
                format!(
                    "Invalid safety stock factor {} (must be finite and >= 0).",
                    self.safety_stock_factor
                ),
            ));
        }
        Ok(())
    }
}

fn parse_setting(key: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| AppError::new(2, format!("Invalid `{key}` value '{raw}': {e}")))
}
