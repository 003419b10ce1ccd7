//! # ABC Classification
//!
//! Pareto classification of the catalog by revenue contribution.
//!
//! ## Band Boundaries
//! ```text
//! cumulative revenue share:   0% ──────── 80% ──────── 95% ─────── 100%
//! class:                      │     A      │      B     │     C     │
//!
//! products with zero recorded sales land in a separate "no sales" bucket.
//! ```
//!
//! Cumulative share is computed as `running_revenue * 100 / total_revenue`
//! (not by summing per-product shares), so clean inputs land exactly on the
//! band boundaries and both thresholds are inclusive.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::AnalyticsEngine;
use mercato_core::Product;
use mercato_db::DbResult;

/// Revenue band of one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbcClass {
    /// Top sellers covering the first 80% of revenue.
    A,
    /// Mid band, up to 95% cumulative revenue.
    B,
    /// The long tail above 95%.
    C,
}

/// One classified product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbcEntry {
    pub product_id: i64,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue_total: f64,
    /// This product's share of total revenue, in percent.
    pub share_pct: f64,
    /// Cumulative share up to and including this product, in percent.
    pub cumulative_pct: f64,
    pub class: AbcClass,
}

/// The full ABC report: one bucket per class plus the unsold catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbcReport {
    pub a: Vec<AbcEntry>,
    pub b: Vec<AbcEntry>,
    pub c: Vec<AbcEntry>,
    /// Active products with no recorded sales at all.
    pub no_sales: Vec<Product>,
}

impl AbcReport {
    /// Total number of classified entries (excluding the no-sales bucket).
    pub fn classified_count(&self) -> usize {
        self.a.len() + self.b.len() + self.c.len()
    }
}

/// Classifies a cumulative revenue share into a band.
fn classify(cumulative_pct: f64) -> AbcClass {
    if cumulative_pct <= 80.0 {
        AbcClass::A
    } else if cumulative_pct <= 95.0 {
        AbcClass::B
    } else {
        AbcClass::C
    }
}

impl AnalyticsEngine {
    /// ABC classification of the catalog by revenue.
    ///
    /// Products are ranked by total revenue descending; each is assigned the
    /// band its cumulative share falls into. Active products that never sold
    /// go to [`AbcReport::no_sales`]. An empty sales history yields four
    /// empty buckets.
    pub async fn abc_classification(&self) -> DbResult<AbcReport> {
        let mut ranked = self.db().sales().top_selling(1000).await?;
        if ranked.is_empty() {
            debug!("ABC classification requested with no sales history");
            return Ok(AbcReport::default());
        }

        // top_selling orders by quantity; revenue is what matters here
        ranked.sort_by(|a, b| b.revenue_total.total_cmp(&a.revenue_total));

        let total_revenue: f64 = ranked.iter().map(|p| p.revenue_total).sum();

        let mut report = AbcReport::default();
        let mut running_revenue = 0.0;
        let mut sold_ids = HashSet::new();

        for product in ranked {
            running_revenue += product.revenue_total;
            let share_pct = product.revenue_total * 100.0 / total_revenue;
            let cumulative_pct = running_revenue * 100.0 / total_revenue;
            let class = classify(cumulative_pct);

            sold_ids.insert(product.product_id);
            let entry = AbcEntry {
                product_id: product.product_id,
                name: product.name,
                quantity_sold: product.quantity_sold,
                revenue_total: product.revenue_total,
                share_pct,
                cumulative_pct,
                class,
            };
            match class {
                AbcClass::A => report.a.push(entry),
                AbcClass::B => report.b.push(entry),
                AbcClass::C => report.c.push(entry),
            }
        }

        for product in self.db().products().list(true).await? {
            if !sold_ids.contains(&product.id) {
                report.no_sales.push(product);
            }
        }

        Ok(report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
