//! # Error Types
//!
//! Domain-specific error types for kot-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kot-core errors (this file)                                           │
//! │  ├── CoreError        - Order / ticket domain errors                   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kot-service errors (separate crate)                                   │
//! │  ├── PipelineError    - Render-to-file / persist failures              │
//! │  ├── PrintError       - Print capability failures                      │
//! │  ├── ShareError       - Share capability failures                      │
//! │  └── LifecycleError   - Everything a preview/print cycle can hit       │
//! │                                                                         │
//! │  Station errors (in app)                                               │
//! │  └── ApiError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LifecycleError → ApiError         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A ticket was requested for an order without any lines.
    ///
    /// ## User Workflow
    /// ```text
    /// Tap "Print KOT" with nothing ordered
    ///      │
    ///      ▼
    /// render(order) → EmptyOrder
    ///      │
    ///      ▼
    /// UI shows: "Please add items to the order first"
    /// ```
    #[error("Order has no items")]
    EmptyOrder,

    /// The requested menu item is not on the menu.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(u32),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Also raised by the renderer when an order breaks the aggregator's
/// invariants (duplicate line ids, zero quantities).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Duplicate value (e.g., two menu items sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(CoreError::EmptyOrder.to_string(), "Order has no items");
        assert_eq!(
            CoreError::MenuItemNotFound(42).to_string(),
            "Menu item not found: 42"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "waiter".to_string(),
        };
        assert_eq!(err.to_string(), "waiter is required");

        let err = ValidationError::Duplicate {
            field: "menu item id".to_string(),
            value: "3".to_string(),
        };
        assert_eq!(err.to_string(), "menu item id '3' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "table".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
