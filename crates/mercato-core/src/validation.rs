//! # Validation Module
//!
//! Input validation for the write paths (catalog edits, sale registration,
//! expenses). The analytics engine never validates — presentation layers are
//! responsible for sane report parameters.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (forms)                                          │
//! │  └── Basic format checks, immediate user feedback                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / UNIQUE constraints                                      │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{NewExpense, NewProduct, NewSale};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a display name (product, category).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price. Zero is allowed (free or not-yet-priced items);
/// negative is not.
pub fn validate_price(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a sale quantity. Must be strictly positive.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock level. Transient negative stock must never be persisted.
pub fn validate_stock(field: &str, stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a product before insertion.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_name("name", &product.name)?;
    validate_price("cost_price", product.cost_price)?;
    validate_price("sale_price", product.sale_price)?;
    validate_stock("stock", product.stock)?;
    validate_stock("min_stock", product.min_stock)?;
    Ok(())
}

/// Validates a sale before registration. Stock sufficiency is checked by the
/// store inside the transaction; this only rejects malformed input early.
pub fn validate_new_sale(sale: &NewSale) -> ValidationResult<()> {
    validate_quantity(sale.quantity)
}

/// Validates an expense before insertion. Amount must be strictly positive.
pub fn validate_new_expense(expense: &NewExpense) -> ValidationResult<()> {
    validate_name("description", &expense.description)?;
    if !expense.amount.is_finite() || expense.amount <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
