//! Seeded synthetic sales generator.
//!
//! Produces a daily `Date,Product_ID,Units_Sold,Inventory_Level` table in the
//! same shape as the upstream sales export. Demand per product is drawn from
//! a normal distribution around a product-specific mean, rounded and clamped
//! at zero. Inventory walks down with sales and is topped up by a fixed order
//! quantity whenever it drops below the replenishment trigger.

use chrono::{Days, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Dataset, Row, columns};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub products: usize,
    pub days: usize,
    pub start: NaiveDate,
    pub seed: u64,
    /// Mean daily units across products (each product scales this by 0.5–1.5).
    pub mean_demand: f64,
    /// Standard deviation as a fraction of the product mean.
    pub demand_cv: f64,
    pub initial_inventory: f64,
    /// Inventory level that triggers a replenishment.
    pub replenish_below: f64,
    pub order_quantity: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            products: 5,
            days: 365,
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            seed: 42,
            mean_demand: 20.0,
            demand_cv: 0.3,
            initial_inventory: 300.0,
            replenish_below: 80.0,
            order_quantity: 250.0,
        }
    }
}

/// Generate a synthetic sales dataset.
pub fn generate_sales(config: &SampleConfig) -> Result<Dataset, AppError> {
    if config.products == 0 || config.days == 0 {
        return Err(AppError::new(2, "Sample needs at least one product and one day."));
    }
    if !(config.mean_demand.is_finite() && config.mean_demand > 0.0) {
        return Err(AppError::new(2, "Sample mean demand must be finite and > 0."));
    }
    if !(config.demand_cv.is_finite() && config.demand_cv >= 0.0) {
        return Err(AppError::new(2, "Sample demand CV must be finite and >= 0."));
    }

    let dates = sample_dates(config.start, config.days)?;
    let capacity = config
        .products
        .checked_mul(config.days)
        .ok_or_else(|| AppError::new(2, "Sample size (products x days) is too large."))?;

    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut products = Vec::with_capacity(config.products);
    for i in 0..config.products {
        let mean = config.mean_demand * rng.gen_range(0.5..1.5);
        let noise = Normal::new(mean, mean * config.demand_cv)
            .map_err(|e| AppError::new(2, format!("Demand distribution error: {e}")))?;
        products.push(ProductState {
            id: format!("P{:03}", i + 1),
            noise,
            inventory: config.initial_inventory,
        });
    }

    let mut rows = Vec::with_capacity(capacity);
    for date in dates {
        for product in products.iter_mut() {
            let draw = product.noise.sample(&mut rng).round();
            let units = if draw > 0.0 { draw } else { 0.0 };
            product.inventory = (product.inventory - units).max(0.0);
            if product.inventory < config.replenish_below {
                product.inventory += config.order_quantity;
            }

            let mut row = Row::new();
            row.insert(columns::DATE, date.format("%Y-%m-%d").to_string());
            row.insert(columns::PRODUCT_ID, product.id.clone());
            row.insert(columns::UNITS_SOLD, format!("{units}"));
            row.insert(columns::INVENTORY_LEVEL, format!("{}", product.inventory));
            rows.push(row);
        }
    }

    tracing::debug!(
        products = config.products,
        days = config.days,
        seed = config.seed,
        "generated synthetic sales"
    );
    Ok(Dataset::new(format!("sample:seed={}", config.seed), rows))
}

/// Consecutive dates from `start`; errors if the range leaves the calendar.
fn sample_dates(start: NaiveDate, days: usize) -> Result<Vec<NaiveDate>, AppError> {
    (0..days as u64)
        .map(|offset| {
            start.checked_add_days(Days::new(offset)).ok_or_else(|| {
                AppError::new(
                    2,
                    format!("Sample of {days} days starting {start} runs past the last supported date."),
                )
            })
        })
        .collect()
}

struct ProductState {
    id: String,
    noise: Normal<f64>,
    inventory: f64,
}
