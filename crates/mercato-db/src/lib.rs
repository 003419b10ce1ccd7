//! # mercato-db: Database Layer for Mercato
//!
//! This crate provides database access for the Mercato suite.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercato Data Flow                                │
//! │                                                                         │
//! │  Analytics engine / UI event handler                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     mercato-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ product, sale │    │  (embedded)  │  │   │
//! │  │   │               │    │ expense, ...  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ price_history │    │ 001_init.sql │  │   │
//! │  │   │ WAL, FK on    │    │ category, cfg │    │ 002_idx.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (single writer, WAL readers)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations per entity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mercato_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/mercato.db")).await?;
//! let products = db.products().list(true).await?;
//! let sales = db.sales().list(Some(from), None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::config::ConfigRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::price_history::PriceHistoryRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
