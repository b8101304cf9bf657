//! # Validation Module
//!
//! Input validation utilities for KOT Station.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Station command (console / frontend)                         │
//! │  ├── Parses ids and names typed by the operator                        │
//! │  └── Immediate feedback                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Menu entries at process start                                     │
//! │  ├── Table / waiter metadata                                           │
//! │  └── Order invariants right before rendering                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kot_core::validation::{validate_table_no, validate_waiter};
//!
//! assert!(validate_table_no("12").is_ok());
//! assert!(validate_waiter("").is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::order::OrderLine;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest menu item name accepted.
pub const MAX_ITEM_NAME_LEN: usize = 100;

/// Longest category label accepted.
pub const MAX_CATEGORY_LEN: usize = 50;

/// Longest table number or waiter name accepted.
pub const MAX_STAFF_FIELD_LEN: usize = 32;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a menu item name.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_ITEM_NAME_LEN)
}

/// Validates a menu category label.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_text("category", category, MAX_CATEGORY_LEN)
}

/// Validates the serving table identifier.
pub fn validate_table_no(table_no: &str) -> ValidationResult<()> {
    validate_text("table", table_no, MAX_STAFF_FIELD_LEN)
}

/// Validates the serving waiter's name.
pub fn validate_waiter(waiter: &str) -> ValidationResult<()> {
    validate_text("waiter", waiter, MAX_STAFF_FIELD_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a menu item id.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_item_id(id: u32) -> ValidationResult<()> {
    if id == 0 {
        return Err(ValidationError::MustBePositive {
            field: "id".to_string(),
        });
    }

    Ok(())
}

/// Validates a menu price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (complimentary items)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Order Validators
// =============================================================================

/// Validates the order invariants the renderer relies on.
///
/// ## Rules
/// - At most one line per menu item id
/// - Every quantity is at least 1
pub fn validate_order_lines(lines: &[OrderLine]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(lines.len());

    for line in lines {
        if line.quantity == 0 {
            return Err(ValidationError::MustBePositive {
                field: format!("quantity of {}", line.name),
            });
        }

        if !seen.insert(line.id) {
            return Err(ValidationError::Duplicate {
                field: "order line".to_string(),
                value: line.id.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
