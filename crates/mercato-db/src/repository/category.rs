//! # Category Repository
//!
//! Category management. Names are unique; products reference categories by
//! id and carry the resolved name in list queries.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use mercato_core::validation::validate_name;
use mercato_core::Category;

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a category.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the name already exists.
    pub async fn insert(&self, name: &str, description: Option<&str>) -> DbResult<Category> {
        validate_name("name", name)?;

        debug!(name, "Inserting category");

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO categories (name, description, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(name)
        .bind(description)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Gets a category by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Lists all categories ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_unique_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let c = db.categories().insert("Drinks", Some("Cold and hot")).await.unwrap();
        assert!(c.id > 0);

        let err = db.categories().insert("Drinks", None).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        db.categories().insert("Bakery", None).await.unwrap();
        let all = db.categories().list().await.unwrap();
        assert_eq!(all.len(), 2);
        // Ordered by name
        assert_eq!(all[0].name, "Bakery");
    }

    #[tokio::test]
    async fn test_product_carries_category_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let c = db.categories().insert("Drinks", None).await.unwrap();

        let p = db
            .products()
            .insert(&mercato_core::NewProduct {
                name: "Cola".to_string(),
                description: None,
                category_id: Some(c.id),
                cost_price: 1.0,
                sale_price: 2.0,
                stock: 10,
                min_stock: 5,
                image_path: None,
            })
            .await
            .unwrap();

        assert_eq!(p.category_name.as_deref(), Some("Drinks"));
    }
}
