//! # Domain Types
//!
//! Core domain types used throughout Mercato.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Expense      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  cost_price     │   │  product_id     │   │  amount         │       │
//! │  │  sale_price     │   │  qty/unit/total │   │  category       │       │
//! │  │  stock/min      │   │  sold_at (text) │   │  expense_date   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌────────────────┐       │
//! │  │    Category     │   │ PriceHistoryEntry│   │  ProductPatch  │       │
//! │  │  unique name    │   │ append-only audit│   │  typed update  │       │
//! │  └─────────────────┘   └──────────────────┘   └────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Money Representation
//! Prices and amounts are `f64`, matching the `REAL` schema columns of the
//! store. All derived percentages (margin, rotation, shares) are computed as
//! `numerator * 100.0 / denominator` so that clean inputs land exactly on
//! band boundaries.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SALE_TIMESTAMP_FORMAT;

// =============================================================================
// Category
// =============================================================================

/// A product category. Names are unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// ## Lifecycle
/// Created via catalog management, mutated through [`ProductPatch`] (price
/// changes append an immutable price-history record), logically deleted via
/// the `active` flag — never physically removed while sales reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    /// Category name resolved by LEFT JOIN in list/get queries.
    pub category_name: Option<String>,
    /// Purchase cost per unit. Non-negative.
    pub cost_price: f64,
    /// Sale price per unit. Non-negative.
    pub sale_price: f64,
    /// Units on hand. Non-negative once committed.
    pub stock: i64,
    /// Restock threshold for the low-stock report.
    pub min_stock: i64,
    pub image_path: Option<String>,
    /// Soft-delete flag.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Cost-based profit margin of the current prices, in percent.
    #[inline]
    pub fn margin_pct(&self) -> f64 {
        crate::margin::margin_pct(self.sale_price, self.cost_price)
    }

    /// Capital tied up in the shelf stock of this product.
    #[inline]
    pub fn stock_value(&self) -> f64 {
        self.cost_price * self.stock as f64
    }

    /// True when stock has fallen to or below the restock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub cost_price: f64,
    pub sale_price: f64,
    pub stock: i64,
    pub min_stock: i64,
    pub image_path: Option<String>,
}

/// Typed partial update for a product.
///
/// ## Why a patch struct?
/// Product edits arrive from forms that touch only some fields. Enumerating
/// the mutable fields keeps the update compile-time checked, and makes the
/// price-history side effect an explicit branch: applying a patch whose
/// `cost_price` or `sale_price` differs from the stored values appends one
/// [`PriceHistoryEntry`] in the same transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<i64>>,
    pub cost_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub stock: Option<i64>,
    pub min_stock: Option<i64>,
    pub image_path: Option<Option<String>>,
    pub active: Option<bool>,
    /// Reason recorded on the price-history row when prices change.
    pub price_change_reason: Option<String>,
}

impl ProductPatch {
    /// True when the patch sets no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.cost_price.is_none()
            && self.sale_price.is_none()
            && self.stock.is_none()
            && self.min_stock.is_none()
            && self.image_path.is_none()
            && self.active.is_none()
    }

    /// True when applying this patch to `current` would change either price.
    pub fn changes_prices(&self, current: &Product) -> bool {
        let cost_changed = self
            .cost_price
            .map(|c| c != current.cost_price)
            .unwrap_or(false);
        let sale_changed = self
            .sale_price
            .map(|p| p != current.sale_price)
            .unwrap_or(false);
        cost_changed || sale_changed
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Immutable once created except for deletion, which must
/// reverse its stock effect.
///
/// ## Invariant
/// `total == quantity as f64 * unit_price` exactly (the store computes the
/// product once, at registration time).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    /// Product name resolved by JOIN, frozen per query (not per sale).
    pub product_name: String,
    pub quantity: i64,
    /// Unit price at time of sale.
    pub unit_price: f64,
    /// `quantity * unit_price`, computed at registration.
    pub total: f64,
    pub customer: Option<String>,
    /// Raw timestamp text in [`SALE_TIMESTAMP_FORMAT`].
    ///
    /// Kept as text so per-record parse failures are a real, testable path
    /// in the seasonality aggregation rather than a deserialization abort.
    pub sold_at: String,
    pub notes: Option<String>,
}

impl Sale {
    /// Parses the sale timestamp. `None` when the stored text is malformed.
    pub fn sold_at_parsed(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.sold_at, SALE_TIMESTAMP_FORMAT).ok()
    }

    /// The calendar-day key of this sale (first 10 chars, `YYYY-MM-DD`).
    ///
    /// Works even for timestamps the full parser rejects, mirroring how the
    /// forecast buckets by day while seasonality needs the full timestamp.
    pub fn day_key(&self) -> &str {
        self.sold_at.get(..10).unwrap_or(&self.sold_at)
    }
}

/// Input for registering a sale. Unit price and total are derived by the
/// store from the product's current sale price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub product_id: i64,
    pub quantity: i64,
    pub customer: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Expense
// =============================================================================

/// A business expense. Independent of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: i64,
    pub description: String,
    /// Strictly positive.
    pub amount: f64,
    pub category: Option<String>,
    pub expense_date: NaiveDate,
    pub registered_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Input for recording an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: Option<String>,
    pub expense_date: NaiveDate,
    pub notes: Option<String>,
}

// =============================================================================
// Price History
// =============================================================================

/// One immutable entry of the price audit trail.
///
/// Appended whenever a product's cost or sale price changes; never mutated
/// or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PriceHistoryEntry {
    pub id: i64,
    pub product_id: i64,
    pub cost_before: Option<f64>,
    pub cost_after: Option<f64>,
    pub price_before: Option<f64>,
    pub price_after: Option<f64>,
    pub changed_at: DateTime<Utc>,
    pub reason: Option<String>,
}

// =============================================================================
// Aggregate Report Rows
// =============================================================================

/// One row of the top-selling-products aggregation.
///
/// Grouped per product; `product_id` is the GROUP BY key so downstream
/// consumers (ABC classification) can match catalog products by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TopProduct {
    pub product_id: i64,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue_total: f64,
}

/// Revenue summary over a date range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesSummary {
    pub revenue_total: f64,
    pub sale_count: i64,
    pub average_ticket: f64,
}

/// Profit summary over a date range.
///
/// `gross_profit` is Σ `(unit_price - cost_price) * quantity` over the sales
/// in range; `net_profit = gross_profit - expenses`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub gross_profit: f64,
    pub expenses: f64,
    pub net_profit: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================
