//! # Sale Repository
//!
//! Sale registration, deletion and the sales aggregations the reports
//! are built on.
//!
//! ## Sale ↔ Stock Consistency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     record(NewSale) - one transaction                   │
//! │                                                                         │
//! │  1. Load product (current sale price + stock)                           │
//! │  2. stock < quantity?  → InsufficientStock, nothing written             │
//! │  3. INSERT sale with total = quantity * unit_price                      │
//! │  4. UPDATE products SET stock = stock - quantity                        │
//! │  5. COMMIT                                                              │
//! │                                                                         │
//! │                     delete(id) - one transaction                        │
//! │                                                                         │
//! │  1. Load sale (product_id + quantity)                                   │
//! │  2. UPDATE products SET stock = stock + quantity   ← reversal           │
//! │  3. DELETE sale                                                         │
//! │  4. COMMIT                                                              │
//! │                                                                         │
//! │  Stock never drifts from the sale ledger: both sides of each pair       │
//! │  commit atomically or not at all.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use mercato_core::validation::validate_new_sale;
use mercato_core::{
    CoreError, NewSale, ProfitSummary, Sale, SalesSummary, TopProduct, SALE_TIMESTAMP_FORMAT,
};

/// Columns selected for every sale read, with the product name resolved.
const SALE_COLUMNS: &str = r#"
    v.id, v.product_id, p.name AS product_name, v.quantity,
    v.unit_price, v.total, v.customer, v.sold_at, v.notes
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Registers a sale at the product's current sale price and decrements
    /// stock, atomically.
    ///
    /// ## Invariants Enforced
    /// - quantity > 0 (validated up front)
    /// - stock sufficiency: committed stock never goes negative
    /// - `total = quantity * unit_price`, computed exactly once, here
    ///
    /// ## Returns
    /// The recorded sale.
    pub async fn record(&self, sale: &NewSale) -> DbResult<Sale> {
        validate_new_sale(sale)?;

        debug!(product_id = sale.product_id, quantity = sale.quantity, "Recording sale");

        let mut tx = self.pool.begin().await?;

        let row: Option<(f64, i64)> =
            sqlx::query_as("SELECT sale_price, stock FROM products WHERE id = ?1")
                .bind(sale.product_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (unit_price, stock) = match row {
            Some(r) => r,
            None => return Err(CoreError::ProductNotFound(sale.product_id).into()),
        };

        if stock < sale.quantity {
            return Err(CoreError::InsufficientStock {
                product_id: sale.product_id,
                available: stock,
                requested: sale.quantity,
            }
            .into());
        }

        let total = sale.quantity as f64 * unit_price;
        let now = Utc::now();
        let sold_at = now.format(SALE_TIMESTAMP_FORMAT).to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO sales (product_id, quantity, unit_price, total, customer, sold_at, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(sale.product_id)
        .bind(sale.quantity)
        .bind(unit_price)
        .bind(total)
        .bind(&sale.customer)
        .bind(&sold_at)
        .bind(&sale.notes)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET stock = stock - ?2, updated_at = ?3 WHERE id = ?1")
            .bind(sale.product_id)
            .bind(sale.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales v
            JOIN products p ON p.id = v.product_id
            WHERE v.id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Deletes a sale and restores the product's stock by the sale's
    /// quantity, atomically.
    ///
    /// ## Returns
    /// * `Ok(true)` - sale deleted, stock restored
    /// * `Ok(false)` - no such sale (not an error: deletion is idempotent)
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deleting sale");

        let mut tx = self.pool.begin().await?;

        let row: Option<(i64, i64)> =
            sqlx::query_as("SELECT product_id, quantity FROM sales WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let (product_id, quantity) = match row {
            Some(r) => r,
            None => return Ok(false),
        };

        let now = Utc::now();
        sqlx::query("UPDATE products SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1")
            .bind(product_id)
            .bind(quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(id, product_id, quantity, "Sale deleted, stock restored");
        Ok(true)
    }

    /// Lists sales, most recent first, optionally filtered by sale date.
    ///
    /// Both bounds are inclusive and filter on the calendar date of
    /// `sold_at` only.
    pub async fn list(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales v
            JOIN products p ON p.id = v.product_id
            WHERE (?1 IS NULL OR DATE(v.sold_at) >= ?1)
              AND (?2 IS NULL OR DATE(v.sold_at) <= ?2)
            ORDER BY v.sold_at DESC
            "#
        ))
        .bind(date_from)
        .bind(date_to)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Revenue summary over an optional date range.
    ///
    /// Empty range ⇒ all-zero summary, never an error.
    pub async fn summary(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> DbResult<SalesSummary> {
        let (revenue_total, sale_count, average_ticket): (f64, i64, f64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total), 0.0), COUNT(*), COALESCE(AVG(total), 0.0)
            FROM sales
            WHERE (?1 IS NULL OR DATE(sold_at) >= ?1)
              AND (?2 IS NULL OR DATE(sold_at) <= ?2)
            "#,
        )
        .bind(date_from)
        .bind(date_to)
        .fetch_one(&self.pool)
        .await?;

        Ok(SalesSummary {
            revenue_total,
            sale_count,
            average_ticket,
        })
    }

    /// Profit summary over an optional date range: gross sale profit
    /// (Σ `(unit_price - cost_price) * quantity`) minus expenses in range.
    pub async fn profit(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> DbResult<ProfitSummary> {
        let gross_profit: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM((v.unit_price - p.cost_price) * v.quantity), 0.0)
            FROM sales v
            JOIN products p ON p.id = v.product_id
            WHERE (?1 IS NULL OR DATE(v.sold_at) >= ?1)
              AND (?2 IS NULL OR DATE(v.sold_at) <= ?2)
            "#,
        )
        .bind(date_from)
        .bind(date_to)
        .fetch_one(&self.pool)
        .await?;

        let expenses: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0.0)
            FROM expenses
            WHERE (?1 IS NULL OR expense_date >= ?1)
              AND (?2 IS NULL OR expense_date <= ?2)
            "#,
        )
        .bind(date_from)
        .bind(date_to)
        .fetch_one(&self.pool)
        .await?;

        Ok(ProfitSummary {
            gross_profit,
            expenses,
            net_profit: gross_profit - expenses,
        })
    }

    /// Top selling products over all history, grouped per product and
    /// ordered by quantity sold descending.
    ///
    /// Rows carry the GROUP BY key (`product_id`) so consumers can match
    /// catalog products by id.
    pub async fn top_selling(&self, limit: i64) -> DbResult<Vec<TopProduct>> {
        let rows = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT
                v.product_id AS product_id,
                p.name AS name,
                SUM(v.quantity) AS quantity_sold,
                SUM(v.total) AS revenue_total
            FROM sales v
            JOIN products p ON p.id = v.product_id
            GROUP BY v.product_id
            ORDER BY quantity_sold DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use mercato_core::NewProduct;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, cost: f64, price: f64, stock: i64) -> i64 {
        db.products()
            .insert(&NewProduct {
                name: name.to_string(),
                description: None,
                category_id: None,
                cost_price: cost,
                sale_price: price,
                stock,
                min_stock: 10,
                image_path: None,
            })
            .await
            .unwrap()
            .id
    }

    fn new_sale(product_id: i64, quantity: i64) -> NewSale {
        NewSale {
            product_id,
            quantity,
            customer: None,
            notes: None,
        }
    }

    /// Inserts a sale row with an explicit timestamp, bypassing `record`.
    /// Lets tests place sales on specific days.
    async fn insert_sale_at(
        db: &Database,
        product_id: i64,
        quantity: i64,
        unit_price: f64,
        sold_at: &str,
    ) {
        sqlx::query(
            r#"
            INSERT INTO sales (product_id, quantity, unit_price, total, sold_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(quantity as f64 * unit_price)
        .bind(sold_at)
        .execute(db.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_record_sale_total_invariant_and_stock_decrement() {
        let db = test_db().await;
        let pid = seed_product(&db, "Beans", 10.0, 19.9, 50).await;

        let sale = db.sales().record(&new_sale(pid, 3)).await.unwrap();

        assert_eq!(sale.quantity, 3);
        assert_eq!(sale.unit_price, 19.9);
        assert!((sale.total - sale.quantity as f64 * sale.unit_price).abs() < 1e-9);
        assert_eq!(sale.product_name, "Beans");

        let p = db.products().get_by_id(pid).await.unwrap().unwrap();
        assert_eq!(p.stock, 47);
    }

    #[tokio::test]
    async fn test_record_sale_rejects_insufficient_stock() {
        let db = test_db().await;
        let pid = seed_product(&db, "Beans", 10.0, 19.9, 2).await;

        let err = db.sales().record(&new_sale(pid, 3)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InsufficientStock { available: 2, requested: 3, .. })
        ));

        // Nothing written: stock untouched, ledger empty
        let p = db.products().get_by_id(pid).await.unwrap().unwrap();
        assert_eq!(p.stock, 2);
        assert!(db.sales().list(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_sale_rejects_nonpositive_quantity() {
        let db = test_db().await;
        let pid = seed_product(&db, "Beans", 10.0, 19.9, 5).await;
        assert!(db.sales().record(&new_sale(pid, 0)).await.is_err());
        assert!(db.sales().record(&new_sale(pid, -1)).await.is_err());
    }

    #[tokio::test]
    async fn test_record_sale_unknown_product() {
        let db = test_db().await;
        let err = db.sales().record(&new_sale(404, 1)).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::ProductNotFound(404))));
    }

    #[tokio::test]
    async fn test_delete_restores_stock_exactly() {
        let db = test_db().await;
        let pid = seed_product(&db, "Beans", 10.0, 19.9, 50).await;

        let sale = db.sales().record(&new_sale(pid, 7)).await.unwrap();
        assert_eq!(
            db.products().get_by_id(pid).await.unwrap().unwrap().stock,
            43
        );

        assert!(db.sales().delete(sale.id).await.unwrap());
        assert_eq!(
            db.products().get_by_id(pid).await.unwrap().unwrap().stock,
            50
        );
        assert!(db.sales().list(None, None).await.unwrap().is_empty());

        // Deleting again is a no-op, not an error
        assert!(!db.sales().delete(sale.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_date_bounds_are_inclusive() {
        let db = test_db().await;
        let pid = seed_product(&db, "Beans", 10.0, 20.0, 100).await;

        insert_sale_at(&db, pid, 1, 20.0, "2026-03-01 09:00:00").await;
        insert_sale_at(&db, pid, 1, 20.0, "2026-03-15 12:00:00").await;
        insert_sale_at(&db, pid, 1, 20.0, "2026-03-31 23:59:59").await;

        let from = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();

        assert_eq!(db.sales().list(Some(from), Some(to)).await.unwrap().len(), 3);
        assert_eq!(
            db.sales()
                .list(Some(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()), None)
                .await
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            db.sales()
                .list(None, Some(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()))
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_summary_and_profit() {
        let db = test_db().await;
        let pid = seed_product(&db, "Beans", 10.0, 20.0, 100).await;

        insert_sale_at(&db, pid, 2, 20.0, "2026-03-01 09:00:00").await; // total 40, profit 20
        insert_sale_at(&db, pid, 1, 20.0, "2026-03-02 09:00:00").await; // total 20, profit 10

        let summary = db.sales().summary(None, None).await.unwrap();
        assert_eq!(summary.sale_count, 2);
        assert!((summary.revenue_total - 60.0).abs() < 1e-9);
        assert!((summary.average_ticket - 30.0).abs() < 1e-9);

        db.expenses()
            .insert(&mercato_core::NewExpense {
                description: "Rent".to_string(),
                amount: 12.5,
                category: None,
                expense_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                notes: None,
            })
            .await
            .unwrap();

        let profit = db.sales().profit(None, None).await.unwrap();
        assert!((profit.gross_profit - 30.0).abs() < 1e-9);
        assert!((profit.expenses - 12.5).abs() < 1e-9);
        assert!((profit.net_profit - 17.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_summary_of_empty_range_is_zeroed() {
        let db = test_db().await;
        let summary = db.sales().summary(None, None).await.unwrap();
        assert_eq!(summary.sale_count, 0);
        assert_eq!(summary.revenue_total, 0.0);
        assert_eq!(summary.average_ticket, 0.0);
    }

    #[tokio::test]
    async fn test_top_selling_orders_by_quantity() {
        let db = test_db().await;
        let a = seed_product(&db, "A", 1.0, 2.0, 100).await;
        let b = seed_product(&db, "B", 1.0, 50.0, 100).await;

        // A sells more units, B earns more revenue
        insert_sale_at(&db, a, 10, 2.0, "2026-03-01 10:00:00").await;
        insert_sale_at(&db, b, 2, 50.0, "2026-03-01 11:00:00").await;

        let top = db.sales().top_selling(10).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].product_id, a);
        assert_eq!(top[0].quantity_sold, 10);
        assert!((top[1].revenue_total - 100.0).abs() < 1e-9);
    }
}
