//! # Sales Forecast
//!
//! Simple moving-average projection of revenue and profit, with a trend
//! label and a variability-based confidence score.
//!
//! ## Method
//! ```text
//! last 90 days of sales
//!   └─ bucket by calendar day ──► [r₁, r₂, ..., rₙ]   (days WITH sales only)
//!        ├─ mean × horizon            ──► projected revenue / profit
//!        ├─ first half vs second half ──► trend (±10% bands)
//!        └─ 100 − CV, clamped to [0,100] ──► confidence
//! ```
//!
//! Days without any sale do not enter the series, so the mean is "revenue
//! per trading day", not per calendar day. The trend split runs over the
//! chronologically ordered series.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{AnalyticsEngine, FORECAST_LOOKBACK_DAYS};
use mercato_core::stats::{coefficient_of_variation, confidence_from_cv, mean};
use mercato_db::DbResult;

/// Direction of the revenue series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    /// Second half of the window runs more than 10% above the first.
    Growth,
    /// Second half runs more than 10% below the first.
    Decline,
    Stable,
    /// No sales in the lookback window.
    NoData,
}

/// Projected revenue and profit over a horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesForecast {
    pub projected_revenue: f64,
    pub projected_profit: f64,
    /// Mean revenue over the days that had sales.
    pub daily_average_revenue: f64,
    /// `clamp(100 - CV, 0, 100)`; 0 for an empty or degenerate series.
    pub confidence_pct: f64,
    pub trend: Trend,
    /// Distinct calendar days with at least one sale in the window.
    pub days_analyzed: usize,
    pub horizon_days: i64,
}

impl SalesForecast {
    /// The all-zero forecast returned when the window holds no sales.
    fn no_data(horizon_days: i64) -> Self {
        SalesForecast {
            projected_revenue: 0.0,
            projected_profit: 0.0,
            daily_average_revenue: 0.0,
            confidence_pct: 0.0,
            trend: Trend::NoData,
            days_analyzed: 0,
            horizon_days,
        }
    }
}

/// Trend of a chronologically ordered revenue series.
///
/// Splits at the midpoint and compares half means. A single-day series has
/// an empty first half and reads as stable.
fn trend_for(daily_revenues: &[f64]) -> Trend {
    if daily_revenues.is_empty() {
        return Trend::NoData;
    }
    let (first, second) = daily_revenues.split_at(daily_revenues.len() / 2);
    if first.is_empty() || second.is_empty() {
        return Trend::Stable;
    }

    let first_mean = mean(first);
    let second_mean = mean(second);
    if second_mean > first_mean * 1.1 {
        Trend::Growth
    } else if second_mean < first_mean * 0.9 {
        Trend::Decline
    } else {
        Trend::Stable
    }
}

impl AnalyticsEngine {
    /// Revenue and profit projection for the next `horizon_days` days.
    ///
    /// Profit per sale is `(unit_price - cost_price) * quantity` against the
    /// product's **current** cost price; sales of since-deleted products
    /// still contribute revenue but no profit signal.
    pub async fn sales_forecast(&self, horizon_days: i64) -> DbResult<SalesForecast> {
        let sales = self.sales_since(FORECAST_LOOKBACK_DAYS).await?;
        if sales.is_empty() {
            debug!("Sales forecast requested with no sales in window");
            return Ok(SalesForecast::no_data(horizon_days));
        }

        let cost_by_id: HashMap<i64, f64> = self
            .db()
            .products()
            .list(false)
            .await?
            .into_iter()
            .map(|p| (p.id, p.cost_price))
            .collect();

        // BTreeMap keys sort lexicographically; day keys are YYYY-MM-DD so
        // that IS chronological order.
        let mut by_day: BTreeMap<String, (f64, f64)> = BTreeMap::new();
        for sale in &sales {
            let bucket = by_day.entry(sale.day_key().to_string()).or_insert((0.0, 0.0));
            bucket.0 += sale.total;
            if let Some(&cost) = cost_by_id.get(&sale.product_id) {
                bucket.1 += (sale.unit_price - cost) * sale.quantity as f64;
            }
        }

        let revenues: Vec<f64> = by_day.values().map(|&(r, _)| r).collect();
        let profits: Vec<f64> = by_day.values().map(|&(_, p)| p).collect();

        let daily_average_revenue = mean(&revenues);
        let cv = coefficient_of_variation(&revenues);

        Ok(SalesForecast {
            projected_revenue: daily_average_revenue * horizon_days as f64,
            projected_profit: mean(&profits) * horizon_days as f64,
            daily_average_revenue,
            confidence_pct: confidence_from_cv(cv),
            trend: trend_for(&revenues),
            days_analyzed: by_day.len(),
            horizon_days,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
