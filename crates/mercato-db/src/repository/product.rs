//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Price History Side Effect
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  update(id, patch) - one transaction                    │
//! │                                                                         │
//! │  1. Load current product row                                            │
//! │  2. Apply the typed patch in memory                                     │
//! │       │                                                                 │
//! │       ├── cost_price or sale_price changed?                             │
//! │       │        └── YES → INSERT price_history (before/after + reason)   │
//! │       │                                                                 │
//! │  3. UPDATE products with the merged values                              │
//! │  4. COMMIT                                                              │
//! │                                                                         │
//! │  The audit row and the price change land atomically or not at all.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use mercato_core::validation::{validate_new_product, validate_stock};
use mercato_core::{CoreError, NewProduct, Product, ProductPatch};

/// Columns selected for every product read, with the category name resolved.
const PRODUCT_COLUMNS: &str = r#"
    p.id, p.name, p.description, p.category_id, c.name AS category_name,
    p.cost_price, p.sale_price, p.stock, p.min_stock, p.image_path,
    p.active, p.created_at, p.updated_at
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let catalog = repo.list(true).await?;
/// let product = repo.get_by_id(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product and returns it with its generated id.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        validate_new_product(product)?;

        debug!(name = %product.name, "Inserting product");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, description, category_id,
                cost_price, sale_price, stock, min_stock,
                image_path, active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?9)
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category_id)
        .bind(product.cost_price)
        .bind(product.sale_price)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(&product.image_path)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found (active or not)
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products ordered by name.
    ///
    /// ## Arguments
    /// * `active_only` - when true, soft-deleted products are excluded
    pub async fn list(&self, active_only: bool) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE (?1 = 0 OR p.active = 1)
            ORDER BY p.name
            "#
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Applies a typed patch to a product.
    ///
    /// When the patch changes `cost_price` or `sale_price`, one price-history
    /// row is appended in the same transaction (before/after values plus the
    /// patch's `price_change_reason`).
    ///
    /// ## Returns
    /// The updated product.
    pub async fn update(&self, id: i64, patch: &ProductPatch) -> DbResult<Product> {
        debug!(id, "Updating product");

        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))?;

        // Merge the patch over the current row
        let name = patch.name.clone().unwrap_or_else(|| current.name.clone());
        let description = patch
            .description
            .clone()
            .unwrap_or_else(|| current.description.clone());
        let category_id = patch.category_id.unwrap_or(current.category_id);
        let cost_price = patch.cost_price.unwrap_or(current.cost_price);
        let sale_price = patch.sale_price.unwrap_or(current.sale_price);
        let stock = patch.stock.unwrap_or(current.stock);
        let min_stock = patch.min_stock.unwrap_or(current.min_stock);
        let image_path = patch
            .image_path
            .clone()
            .unwrap_or_else(|| current.image_path.clone());
        let active = patch.active.unwrap_or(current.active);

        validate_stock("stock", stock)?;

        let now = Utc::now();

        // Explicit branch: a price change appends one immutable audit row
        if patch.changes_prices(&current) {
            debug!(
                id,
                cost_before = current.cost_price,
                cost_after = cost_price,
                price_before = current.sale_price,
                price_after = sale_price,
                "Price change, appending price history"
            );

            sqlx::query(
                r#"
                INSERT INTO price_history (
                    product_id, cost_before, cost_after,
                    price_before, price_after, changed_at, reason
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(id)
            .bind(current.cost_price)
            .bind(cost_price)
            .bind(current.sale_price)
            .bind(sale_price)
            .bind(now)
            .bind(&patch.price_change_reason)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                category_id = ?4,
                cost_price = ?5,
                sale_price = ?6,
                stock = ?7,
                min_stock = ?8,
                image_path = ?9,
                active = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&name)
        .bind(&description)
        .bind(category_id)
        .bind(cost_price)
        .bind(sale_price)
        .bind(stock)
        .bind(min_stock)
        .bind(&image_path)
        .bind(active)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Adjusts product stock by a delta (negative for corrections down,
    /// positive for restocking).
    ///
    /// Rejects adjustments that would make the committed stock negative.
    pub async fn adjust_stock(&self, id: i64, delta: i64) -> DbResult<()> {
        debug!(id, delta, "Adjusting stock");

        let mut tx = self.pool.begin().await?;

        let stock: i64 = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        if stock + delta < 0 {
            return Err(CoreError::InsufficientStock {
                product_id: id,
                available: stock,
                requested: -delta,
            }
            .into());
        }

        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Soft-deletes a product by setting active = false.
    ///
    /// Historical sales still reference the product, so rows are never
    /// physically removed.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Soft-deleting product");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE products
            SET active = 0, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Active products at or below their minimum-stock threshold,
    /// most depleted first.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.active = 1 AND p.stock <= p.min_stock
            ORDER BY p.stock ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Total capital tied up in active-product stock (Σ cost_price * stock).
    pub async fn stock_value(&self) -> DbResult<f64> {
        let value: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(cost_price * stock), 0.0) FROM products WHERE active = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
