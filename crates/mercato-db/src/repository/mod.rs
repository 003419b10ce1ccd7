//! # Repository Module
//!
//! Database repository implementations for Mercato.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Caller (analytics engine, UI handler)                                  │
//! │       │                                                                 │
//! │       │  db.sales().list(Some(from), None)                              │
//! │       ▼                                                                 │
//! │  SaleRepository                                                         │
//! │  ├── record(&self, NewSale)      ← enforces stock, computes total       │
//! │  ├── delete(&self, id)           ← restores stock in same txn           │
//! │  ├── list(&self, from, to)                                              │
//! │  └── top_selling(&self, limit)                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                         │
//! │  • Cross-table invariants (sale ↔ stock) live in one transaction        │
//! │  • The analytics engine consumes plain records, never raw rows          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD, stock adjustments, low-stock report
//! - [`sale::SaleRepository`] - Sale registration/deletion and sales aggregations
//! - [`expense::ExpenseRepository`] - Expense CRUD
//! - [`price_history::PriceHistoryRepository`] - Append-only price audit trail
//! - [`category::CategoryRepository`] - Category management
//! - [`config::ConfigRepository`] - Key/value application settings

pub mod category;
pub mod config;
pub mod expense;
pub mod price_history;
pub mod product;
pub mod sale;
