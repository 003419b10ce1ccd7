//! # Low-Rotation Detection
//!
//! Finds stock that is not moving: products whose sales over the lookback
//! window amount to less than 10% of their shelf stock. Ranked by the
//! capital tied up in them, most expensive shelf-warmer first.

use serde::{Deserialize, Serialize};

use crate::engine::{quantity_by_product, AnalyticsEngine};
use mercato_db::DbResult;

/// Rotation below this percentage flags a product as low-rotation.
pub const LOW_ROTATION_THRESHOLD_PCT: f64 = 10.0;

/// One slow-moving product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationEntry {
    pub product_id: i64,
    pub name: String,
    pub stock: i64,
    /// Units sold inside the window.
    pub quantity_sold: i64,
    /// `quantity_sold * 100 / stock`.
    pub rotation_pct: f64,
    /// Capital tied up: `cost_price * stock`.
    pub idle_value: f64,
    /// The lookback window this entry was computed over.
    pub window_days: i64,
}

impl AnalyticsEngine {
    /// Products with rotation strictly below 10% over the window.
    ///
    /// Only products with stock on hand participate; a product with zero
    /// stock cannot be "parked". Zero sales in the window count as 0%
    /// rotation. Sorted by idle value descending.
    pub async fn low_rotation(&self, window_days: i64) -> DbResult<Vec<RotationEntry>> {
        let sales = self.sales_since(window_days).await?;
        let sold = quantity_by_product(&sales);

        let mut parked = Vec::new();
        for product in self.db().products().list(true).await? {
            if product.stock <= 0 {
                continue;
            }
            let quantity_sold = sold.get(&product.id).copied().unwrap_or(0);
            let rotation_pct = quantity_sold as f64 * 100.0 / product.stock as f64;

            if rotation_pct < LOW_ROTATION_THRESHOLD_PCT {
                parked.push(RotationEntry {
                    product_id: product.id,
                    name: product.name.clone(),
                    stock: product.stock,
                    quantity_sold,
                    rotation_pct,
                    idle_value: product.stock_value(),
                    window_days,
                });
            }
        }

        parked.sort_by(|a, b| b.idle_value.total_cmp(&a.idle_value));
        Ok(parked)
    }
}
