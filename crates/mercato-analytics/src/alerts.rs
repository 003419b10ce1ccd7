//! # Alert Generation
//!
//! Rule-based advisories over stock, demand and margins. Four independent
//! rules, evaluated in a fixed order, then stable-sorted by priority so
//! equal-priority alerts keep their rule order.
//!
//! ## Rules
//! ```text
//! HIGH DEMAND       sold(30d) > 2 × stock          → HIGH
//! IDLE PRODUCT      sold(30d) == 0 AND stock > 10  → MEDIUM
//! STOCK RUNNING OUT top-5 of 30-day replenishment
//!                   forecast with HIGH urgency     → HIGH
//! LOW MARGIN        cost-based margin < 15%        → MEDIUM
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{quantity_by_product, AnalyticsEngine};
use crate::replenishment::Urgency;
use mercato_db::DbResult;

/// Margin below this percentage triggers the low-margin rule.
pub const LOW_MARGIN_THRESHOLD_PCT: f64 = 15.0;

/// Stock above this level makes a zero-sale product "idle".
pub const IDLE_STOCK_THRESHOLD: i64 = 10;

/// Stock-out candidates considered by the running-out rule.
pub const STOCKOUT_CANDIDATES: usize = 5;

/// What an alert is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    HighDemand,
    IdleProduct,
    StockRunningOut,
    LowMargin,
}

/// How soon the shopkeeper should act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank, most urgent first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// One actionable advisory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub priority: Priority,
    pub product_id: i64,
    pub title: String,
    pub message: String,
    /// Suggested next step, phrased for the shopkeeper.
    pub action: String,
}

impl AnalyticsEngine {
    /// All current alerts, most urgent first.
    pub async fn alerts(&self) -> DbResult<Vec<Alert>> {
        let mut alerts = Vec::new();

        let sold = quantity_by_product(&self.sales_since(30).await?);
        let products = self.db().products().list(true).await?;

        // Demand vs stock, one rule firing per product
        for product in &products {
            let quantity_sold = sold.get(&product.id).copied().unwrap_or(0);

            if quantity_sold > product.stock * 2 {
                alerts.push(Alert {
                    kind: AlertKind::HighDemand,
                    priority: Priority::High,
                    product_id: product.id,
                    title: format!("High demand: {}", product.name),
                    message: format!(
                        "Sold {} units in 30 days. Current stock: {}",
                        quantity_sold, product.stock
                    ),
                    action: "Consider increasing stock".to_string(),
                });
            } else if quantity_sold == 0 && product.stock > IDLE_STOCK_THRESHOLD {
                alerts.push(Alert {
                    kind: AlertKind::IdleProduct,
                    priority: Priority::Medium,
                    product_id: product.id,
                    title: format!("Idle product: {}", product.name),
                    message: format!(
                        "No sales in 30 days. Stock: {}",
                        product.stock
                    ),
                    action: "Consider a promotion or price reduction".to_string(),
                });
            }
        }

        // Imminent stock-outs from the short-window forecast
        let forecast = self.replenishment_forecast(30).await?;
        for entry in forecast.iter().take(STOCKOUT_CANDIDATES) {
            if entry.urgency == Urgency::High {
                alerts.push(Alert {
                    kind: AlertKind::StockRunningOut,
                    priority: Priority::High,
                    product_id: entry.product_id,
                    title: format!("Restock: {}", entry.name),
                    message: format!(
                        "Stock runs out in {} days",
                        entry.days_remaining as i64
                    ),
                    action: format!("Buy {} units", entry.suggested_quantity),
                });
            }
        }

        // Margins that leave nothing on the table
        for product in &products {
            let margin = product.margin_pct();
            if margin < LOW_MARGIN_THRESHOLD_PCT {
                alerts.push(Alert {
                    kind: AlertKind::LowMargin,
                    priority: Priority::Medium,
                    product_id: product.id,
                    title: format!("Low margin: {}", product.name),
                    message: format!("Current margin: {:.1}%", margin),
                    action: "Review sale price".to_string(),
                });
            }
        }

        debug!(count = alerts.len(), "Generated alerts");

        // sort_by_key is stable: equal priorities keep rule order
        alerts.sort_by_key(|a| a.priority.rank());
        Ok(alerts)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
