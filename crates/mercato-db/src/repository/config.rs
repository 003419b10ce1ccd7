//! # Config Repository
//!
//! Persisted key/value application settings (store name, currency symbol,
//! report defaults). Upsert semantics: `set` overwrites silently.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for the key/value config table.
#[derive(Debug, Clone)]
pub struct ConfigRepository {
    pool: SqlitePool,
}

impl ConfigRepository {
    /// Creates a new ConfigRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ConfigRepository { pool }
    }

    /// Gets a config value. `None` when the key was never set.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM config WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Sets a config value, inserting or overwriting.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key, "Setting config value");

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO config (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_get_set_upsert() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = db.config();

        assert!(config.get("store_name").await.unwrap().is_none());

        config.set("store_name", "Corner Shop").await.unwrap();
        assert_eq!(
            config.get("store_name").await.unwrap().as_deref(),
            Some("Corner Shop")
        );

        config.set("store_name", "Corner Shop 2").await.unwrap();
        assert_eq!(
            config.get("store_name").await.unwrap().as_deref(),
            Some("Corner Shop 2")
        );
    }
}
