//! # Price History Repository
//!
//! The append-only price audit trail. Rows are written by the product
//! repository's patch branch (and by anything else that changes prices);
//! nothing ever mutates or deletes them.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use mercato_core::PriceHistoryEntry;

/// Repository for the price-history audit trail.
#[derive(Debug, Clone)]
pub struct PriceHistoryRepository {
    pool: SqlitePool,
}

impl PriceHistoryRepository {
    /// Creates a new PriceHistoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PriceHistoryRepository { pool }
    }

    /// Appends an audit entry.
    ///
    /// Normally invoked through the product patch path; exposed for
    /// imports/migrations that carry historical price data.
    pub async fn append(
        &self,
        product_id: i64,
        cost_before: Option<f64>,
        cost_after: Option<f64>,
        price_before: Option<f64>,
        price_after: Option<f64>,
        reason: Option<&str>,
    ) -> DbResult<()> {
        debug!(product_id, "Appending price history entry");

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO price_history (
                product_id, cost_before, cost_after,
                price_before, price_after, changed_at, reason
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(product_id)
        .bind(cost_before)
        .bind(cost_after)
        .bind(price_before)
        .bind(price_after)
        .bind(now)
        .bind(reason)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent entries for a product, newest first.
    pub async fn recent(&self, product_id: i64, limit: i64) -> DbResult<Vec<PriceHistoryEntry>> {
        let entries = sqlx::query_as::<_, PriceHistoryEntry>(
            r#"
            SELECT id, product_id, cost_before, cost_after,
                   price_before, price_after, changed_at, reason
            FROM price_history
            WHERE product_id = ?1
            ORDER BY changed_at DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(product_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
