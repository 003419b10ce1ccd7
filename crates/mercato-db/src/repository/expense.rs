//! # Expense Repository
//!
//! Database operations for business expenses. Expenses are independent of
//! products; they only meet sales in the profit summary.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use mercato_core::validation::validate_new_expense;
use mercato_core::{Expense, NewExpense};

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Records a new expense and returns it with its generated id.
    pub async fn insert(&self, expense: &NewExpense) -> DbResult<Expense> {
        validate_new_expense(expense)?;

        debug!(description = %expense.description, amount = expense.amount, "Recording expense");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO expenses (description, amount, category, expense_date, registered_at, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(&expense.category)
        .bind(expense.expense_date)
        .bind(now)
        .bind(&expense.notes)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Expense", id))
    }

    /// Gets an expense by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, description, amount, category, expense_date, registered_at, notes
            FROM expenses
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Lists expenses, most recent expense date first, optionally filtered
    /// by expense date. Both bounds are inclusive.
    pub async fn list(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, description, amount, category, expense_date, registered_at, notes
            FROM expenses
            WHERE (?1 IS NULL OR expense_date >= ?1)
              AND (?2 IS NULL OR expense_date <= ?2)
            ORDER BY expense_date DESC, id DESC
            "#,
        )
        .bind(date_from)
        .bind(date_to)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Deletes an expense.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting expense");

        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
