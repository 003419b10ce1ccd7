//! # Analytics Engine
//!
//! The engine struct and the small shared helpers the report modules build
//! on. The engine owns a [`Database`] handle passed in at construction; it
//! never reaches for global state, so tests can point it at an in-memory
//! store and the GUI at the real file.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc};

use mercato_core::Sale;
use mercato_db::{Database, DbResult};

/// Default lookback for the low-rotation report, in days.
pub const DEFAULT_ROTATION_WINDOW_DAYS: i64 = 30;

/// Default lookback for the replenishment forecast, in days.
pub const DEFAULT_REPLENISHMENT_WINDOW_DAYS: i64 = 90;

/// Lookback used by the sales forecast, in days.
pub const FORECAST_LOOKBACK_DAYS: i64 = 90;

/// Default projection horizon for the sales forecast, in days.
pub const DEFAULT_FORECAST_HORIZON_DAYS: i64 = 30;

/// Read-only analytics over the Mercato store.
///
/// Cheap to clone; repositories share the underlying pool.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    db: Database,
}

impl AnalyticsEngine {
    /// Creates an engine over the given database handle.
    pub fn new(db: Database) -> Self {
        AnalyticsEngine { db }
    }

    /// The underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The calendar date `days` days before now.
    pub(crate) fn window_start(days: i64) -> NaiveDate {
        (Utc::now() - Duration::days(days)).date_naive()
    }

    /// All sales whose sale date falls within the last `days` days.
    pub(crate) async fn sales_since(&self, days: i64) -> DbResult<Vec<Sale>> {
        self.db.sales().list(Some(Self::window_start(days)), None).await
    }
}

/// Units sold per product id over a batch of sales.
pub(crate) fn quantity_by_product(sales: &[Sale]) -> HashMap<i64, i64> {
    let mut sold: HashMap<i64, i64> = HashMap::new();
    for sale in sales {
        *sold.entry(sale.product_id).or_insert(0) += sale.quantity;
    }
    sold
}

// =============================================================================
// Unit Tests
// =============================================================================
