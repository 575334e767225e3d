//! # Error Types
//!
//! Domain-specific error types for platter-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  platter-core errors (this file)                                       │
//! │  ├── CoreError        - Cart / checkout / stats rule violations        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  platter-db errors                                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  platter-engine errors                                                 │
//! │  └── EngineError      - What callers see (kind + message)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → HTTP envelope       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced product does not exist (never existed or was deleted).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The cart has no line for the given product.
    #[error("Product {0} is not in the cart")]
    LineNotFound(String),

    /// The cart already holds products from another restaurant.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: [Shawarma (Restaurant A)]
    ///      │
    ///      ▼
    /// add_item(Pizza (Restaurant B))
    ///      │
    ///      ▼
    /// CrossRestaurantConflict → UI asks the customer to clear the cart first
    /// ```
    #[error("Cart already holds items from restaurant {cart_restaurant}; clear it before ordering from {requested_restaurant}")]
    CrossRestaurantConflict {
        cart_restaurant: String,
        requested_restaurant: String,
    },

    /// Checkout attempted with nothing valid to order.
    #[error("Cart is empty: {0}")]
    EmptyCart(String),

    /// Dashboard aggregation could not join its inputs.
    #[error("Aggregation failed: {0}")]
    Aggregation(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
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

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// The referenced entity exists but cannot be used right now.
    #[error("{what} is not available")]
    Unavailable { what: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
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
        let err = CoreError::CrossRestaurantConflict {
            cart_restaurant: "r-1".to_string(),
            requested_restaurant: "r-2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cart already holds items from restaurant r-1; clear it before ordering from r-2"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("customerName").to_string(),
            "customerName is required"
        );

        let err = ValidationError::TooLong {
            field: "note".to_string(),
            max: 500,
        };
        assert_eq!(err.to_string(), "note must be at most 500 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("region").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
