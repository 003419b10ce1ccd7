//! # mercato-core: Pure Domain Logic for Mercato
//!
//! This crate is the **heart** of Mercato. It contains the domain types and
//! the arithmetic the analytics engine is built on, as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercato Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Presentation (GUI / web dashboard / export)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain data structures                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    mercato-analytics                            │   │
//! │  │    ABC, rotation, replenishment, pricing, forecast, alerts      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mercato-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  margin   │  │   stats   │  │ validation│  │   │
//! │  │   │  Product  │  │ cost-based│  │ mean/stdev│  │   rules   │  │   │
//! │  │   │   Sale    │  │  pricing  │  │    CV     │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    mercato-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Expense, PriceHistoryEntry, ...)
//! - [`margin`] - Cost-based margin arithmetic
//! - [`stats`] - Descriptive statistics (mean, sample stdev, CV)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Cost-based margin**: margin is always profit as a percentage of cost
//!    price; there is exactly one implementation of it ([`margin::margin_pct`])
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod margin;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Timestamp format used for the `sold_at` column.
///
/// Sale timestamps are persisted as plain text in this format; the
/// seasonality aggregation parses them back and skips records that do not
/// conform. Keeping the format in one place keeps writer and parser honest.
pub const SALE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default minimum-stock threshold applied when a product is created
/// without one.
pub const DEFAULT_MIN_STOCK: i64 = 10;
