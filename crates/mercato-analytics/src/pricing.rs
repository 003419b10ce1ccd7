//! # Price Suggestion
//!
//! Per-product pricing advice from the price-history trail and recent sales
//! velocity.
//!
//! ## Two Regimes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  no price history            │  with price history (last 10 changes)    │
//! │  ──────────────────          │  ─────────────────────────────────────   │
//! │  up/down: margin ± 5 points  │  up/down: current price ± 10%            │
//! │  competitive: 30% margin     │  competitive: 25% margin                 │
//! │  always "maintain"           │  < 5 sales/30d  → reduce                 │
//! │                              │  > 20 sales/30d → increase               │
//! │                              │  otherwise      → maintain               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All margins are cost-based ([`mercato_core::margin`]).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::AnalyticsEngine;
use mercato_core::margin::{margin_pct, price_for_margin};
use mercato_core::stats::mean;
use mercato_db::DbResult;

/// Price-history entries considered per suggestion.
pub const PRICE_HISTORY_SAMPLE: i64 = 10;

/// Trailing window for the sales-velocity signal, in days.
pub const RECENT_SALES_WINDOW_DAYS: i64 = 30;

/// Fewer sales than this in the trailing window suggests the price is high.
pub const FEW_SALES_THRESHOLD: usize = 5;

/// More sales than this in the trailing window leaves pricing headroom.
pub const MANY_SALES_THRESHOLD: usize = 20;

/// What to do with the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Maintain,
    Reduce,
    Increase,
}

/// Pricing advice for one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSuggestion {
    pub product_id: i64,
    pub current_price: f64,
    /// Cost-based margin of the current price, in percent.
    pub current_margin_pct: f64,
    /// Mean of the last recorded sale prices. `None` without history.
    pub historical_mean_price: Option<f64>,
    /// Sale transactions in the trailing window. `None` without history.
    pub recent_sale_count: Option<usize>,
    pub suggestion_increase: f64,
    pub suggestion_reduce: f64,
    pub suggestion_competitive: f64,
    pub recommendation: Recommendation,
}

/// Maps trailing sales velocity to a recommendation.
fn recommendation_for(recent_sale_count: usize) -> Recommendation {
    if recent_sale_count < FEW_SALES_THRESHOLD {
        Recommendation::Reduce
    } else if recent_sale_count > MANY_SALES_THRESHOLD {
        Recommendation::Increase
    } else {
        Recommendation::Maintain
    }
}

impl AnalyticsEngine {
    /// Pricing advice for a product. `Ok(None)` when the product is unknown.
    pub async fn price_suggestion(&self, product_id: i64) -> DbResult<Option<PriceSuggestion>> {
        let Some(product) = self.db().products().get_by_id(product_id).await? else {
            return Ok(None);
        };

        let current_price = product.sale_price;
        let current_margin = margin_pct(current_price, product.cost_price);

        let history = self
            .db()
            .price_history()
            .recent(product_id, PRICE_HISTORY_SAMPLE)
            .await?;
        let recorded_prices: Vec<f64> =
            history.iter().filter_map(|h| h.price_after).collect();

        if recorded_prices.is_empty() {
            // No history to learn from: nudge the margin instead of the price
            debug!(product_id, "Price suggestion without history");
            return Ok(Some(PriceSuggestion {
                product_id,
                current_price,
                current_margin_pct: current_margin,
                historical_mean_price: None,
                recent_sale_count: None,
                suggestion_increase: price_for_margin(product.cost_price, current_margin + 5.0),
                suggestion_reduce: price_for_margin(product.cost_price, current_margin - 5.0),
                suggestion_competitive: price_for_margin(product.cost_price, 30.0),
                recommendation: Recommendation::Maintain,
            }));
        }

        let recent_sale_count = self
            .sales_since(RECENT_SALES_WINDOW_DAYS)
            .await?
            .iter()
            .filter(|s| s.product_id == product_id)
            .count();

        Ok(Some(PriceSuggestion {
            product_id,
            current_price,
            current_margin_pct: current_margin,
            historical_mean_price: Some(mean(&recorded_prices)),
            recent_sale_count: Some(recent_sale_count),
            suggestion_increase: current_price * 1.10,
            suggestion_reduce: current_price * 0.90,
            suggestion_competitive: price_for_margin(product.cost_price, 25.0),
            recommendation: recommendation_for(recent_sale_count),
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
