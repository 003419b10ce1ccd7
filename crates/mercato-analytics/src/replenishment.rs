//! # Replenishment Forecast
//!
//! Projects when each product runs out of stock from its sales velocity.
//!
//! ## Known Quirk, Kept On Purpose
//! The daily average divides total units sold by the **full window length**,
//! not by the number of days the product actually sold. A product introduced
//! mid-window therefore looks slower than it is and its stock-out date lands
//! further out than reality. Downstream consumers (the stock-out alert rule)
//! rely on this exact behavior; changing the divisor changes which products
//! alert.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{quantity_by_product, AnalyticsEngine};
use mercato_db::DbResult;

/// Days of stock left below which replenishment is urgent.
pub const URGENCY_HIGH_DAYS: f64 = 7.0;

/// Days of stock left below which replenishment should be planned.
pub const URGENCY_MEDIUM_DAYS: f64 = 15.0;

/// Days of demand the suggested order quantity covers.
pub const SUGGESTED_COVER_DAYS: f64 = 30.0;

/// How soon a product needs restocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    /// Runs out in under a week.
    High,
    /// Runs out in under two weeks.
    Medium,
    Low,
}

/// One product's projected stock-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplenishmentEntry {
    pub product_id: i64,
    pub name: String,
    pub stock: i64,
    /// Units per day over the full lookback window.
    pub daily_average: f64,
    /// `stock / daily_average`.
    pub days_remaining: f64,
    /// Projected stock-out date.
    pub restock_date: NaiveDate,
    /// Units to order to cover [`SUGGESTED_COVER_DAYS`] of demand.
    pub suggested_quantity: i64,
    pub urgency: Urgency,
}

/// Urgency band for a number of days of stock remaining.
fn urgency_for(days_remaining: f64) -> Urgency {
    if days_remaining < URGENCY_HIGH_DAYS {
        Urgency::High
    } else if days_remaining < URGENCY_MEDIUM_DAYS {
        Urgency::Medium
    } else {
        Urgency::Low
    }
}

impl AnalyticsEngine {
    /// Replenishment forecast over the given lookback window.
    ///
    /// Products without any sale in the window are omitted: no velocity, no
    /// projection. Sorted ascending by days remaining, most urgent first.
    pub async fn replenishment_forecast(
        &self,
        window_days: i64,
    ) -> DbResult<Vec<ReplenishmentEntry>> {
        let sales = self.sales_since(window_days).await?;
        let sold = quantity_by_product(&sales);
        let today = Utc::now().date_naive();

        let mut forecast = Vec::new();
        for product in self.db().products().list(true).await? {
            let Some(&quantity_sold) = sold.get(&product.id) else {
                continue;
            };
            let daily_average = quantity_sold as f64 / window_days as f64;
            if daily_average <= 0.0 {
                continue;
            }

            let days_remaining = product.stock as f64 / daily_average;
            forecast.push(ReplenishmentEntry {
                product_id: product.id,
                name: product.name.clone(),
                stock: product.stock,
                daily_average,
                days_remaining,
                restock_date: today + Duration::days(days_remaining as i64),
                suggested_quantity: (daily_average * SUGGESTED_COVER_DAYS).floor() as i64,
                urgency: urgency_for(days_remaining),
            });
        }

        forecast.sort_by(|a, b| a.days_remaining.total_cmp(&b.days_remaining));
        Ok(forecast)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_bands() {
        assert_eq!(urgency_for(0.0), Urgency::High);
        assert_eq!(urgency_for(6.99), Urgency::High);
        // Boundaries are exclusive: exactly 7 days is not yet urgent
        assert_eq!(urgency_for(7.0), Urgency::Medium);
        assert_eq!(urgency_for(14.99), Urgency::Medium);
        assert_eq!(urgency_for(15.0), Urgency::Low);
        assert_eq!(urgency_for(120.0), Urgency::Low);
    }
}
