//! # Margin Module
//!
//! Cost-based margin arithmetic, used by pricing suggestions, alerts and
//! the catalog reports.
//!
//! ## One Definition of Margin
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  margin = (sale_price - cost_price) / cost_price * 100                  │
//! │                                                                         │
//! │  cost 10.00, price 20.00  →  margin 100%                                │
//! │  cost 10.00, price 11.50  →  margin  15%                                │
//! │  cost  0.00, price  5.00  →  margin   0%  (guarded divisor)             │
//! │                                                                         │
//! │  This is COST-based margin (markup), not sale-price-based margin.       │
//! │  Every margin the system reports goes through this module so the two    │
//! │  definitions can never drift apart between reports.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

/// Cost-based profit margin in percent.
///
/// Returns 0 when `cost_price` is zero — a zero-cost product has no
/// meaningful markup and must not divide by zero.
///
/// ## Example
/// ```rust
/// use mercato_core::margin::margin_pct;
///
/// assert_eq!(margin_pct(20.0, 10.0), 100.0);
/// assert_eq!(margin_pct(5.0, 0.0), 0.0);
/// ```
#[inline]
pub fn margin_pct(sale_price: f64, cost_price: f64) -> f64 {
    if cost_price == 0.0 {
        return 0.0;
    }
    (sale_price - cost_price) * 100.0 / cost_price
}

/// Sale price that yields the desired cost-based margin.
///
/// ## Example
/// ```rust
/// use mercato_core::margin::price_for_margin;
///
/// // 30% margin over a 10.00 cost
/// assert_eq!(price_for_margin(10.0, 30.0), 13.0);
/// ```
#[inline]
pub fn price_for_margin(cost_price: f64, margin_pct: f64) -> f64 {
    cost_price * (1.0 + margin_pct / 100.0)
}

// =============================================================================
// Unit Tests
// =============================================================================
