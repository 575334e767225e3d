//! # Engine Error Type
//!
//! The single error type callers of the engines see: a machine-readable
//! [`ErrorKind`] plus a human-readable message.
//!
//! ## Error Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CoreError::ProductNotFound / LineNotFound ──► NotFound                 │
//! │  CoreError::Validation ──────────────────────► ValidationError          │
//! │  CoreError::CrossRestaurantConflict ─────────► CrossRestaurantConflict  │
//! │  CoreError::EmptyCart ───────────────────────► EmptyCart                │
//! │  CoreError::Aggregation ─────────────────────► AggregationError         │
//! │                                                                         │
//! │  DbError::NotFound ──────────────────────────► NotFound                 │
//! │  DbError::Conflict / Unique / ForeignKey ────► Conflict                 │
//! │  DbError::CheckViolation ────────────────────► ValidationError          │
//! │  anything else (logged with error!) ─────────► StoreUnavailable         │
//! │                                                                         │
//! │  Non-admin asking for the dashboard ─────────► Forbidden                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store failures never leak driver text to the caller; the cause goes to
//! the log and the caller gets a generic message.

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use platter_core::CoreError;
use platter_db::DbError;

/// Error categories, serialized as `SCREAMING_SNAKE_CASE` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Referenced product or cart line is absent.
    NotFound,

    /// Missing or malformed input.
    ValidationError,

    /// The cart holds another restaurant's products.
    CrossRestaurantConflict,

    /// Checkout with nothing valid to order.
    EmptyCart,

    /// The requester's role does not allow the operation.
    Forbidden,

    /// Dashboard inputs could not be joined.
    AggregationError,

    /// The backing store failed.
    StoreUnavailable,

    /// A catalog write was refused because other rows depend on it.
    Conflict,
}

impl ErrorKind {
    /// The wire code, e.g. `"EMPTY_CART"`.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::CrossRestaurantConflict => "CROSS_RESTAURANT_CONFLICT",
            ErrorKind::EmptyCart => "EMPTY_CART",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::AggregationError => "AGGREGATION_ERROR",
            ErrorKind::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorKind::Conflict => "CONFLICT",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned by every engine operation.
#[derive(Debug, Clone, Error)]
#[error("[{kind}] {message}")]
pub struct EngineError {
    kind: ErrorKind,
    message: String,
}

impl EngineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        EngineError {
            kind,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        EngineError::new(ErrorKind::Forbidden, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Conversions
// =============================================================================

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        let kind = match &err {
            CoreError::ProductNotFound(_) | CoreError::LineNotFound(_) => ErrorKind::NotFound,
            CoreError::CrossRestaurantConflict { .. } => ErrorKind::CrossRestaurantConflict,
            CoreError::EmptyCart(_) => ErrorKind::EmptyCart,
            CoreError::Aggregation(_) => ErrorKind::AggregationError,
            CoreError::Validation(_) => ErrorKind::ValidationError,
        };

        match err {
            // The wrapper adds a "Validation error: " prefix; callers only
            // need the field message.
            CoreError::Validation(inner) => EngineError::new(kind, inner.to_string()),
            other => EngineError::new(kind, other.to_string()),
        }
    }
}

impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => EngineError::new(ErrorKind::NotFound, err.to_string()),
            DbError::Conflict { .. }
            | DbError::UniqueViolation { .. }
            | DbError::ForeignKeyViolation { .. } => {
                EngineError::new(ErrorKind::Conflict, err.to_string())
            }
            DbError::CheckViolation { .. } => {
                EngineError::new(ErrorKind::ValidationError, err.to_string())
            }
            other => {
                error!(error = %other, "Store operation failed");
                EngineError::new(
                    ErrorKind::StoreUnavailable,
                    "The store is temporarily unavailable",
                )
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use platter_core::ValidationError;

    #[test]
    fn test_core_error_kinds() {
        let err: EngineError = CoreError::ProductNotFound("p1".into()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: EngineError = CoreError::LineNotFound("p1".into()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: EngineError = CoreError::CrossRestaurantConflict {
            cart_restaurant: "r1".into(),
            requested_restaurant: "r2".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::CrossRestaurantConflict);

        let err: EngineError = CoreError::EmptyCart("nothing".into()).into();
        assert_eq!(err.kind(), ErrorKind::EmptyCart);

        let err: EngineError = CoreError::Aggregation("broken join".into()).into();
        assert_eq!(err.kind(), ErrorKind::AggregationError);
    }

    #[test]
    fn test_validation_message_is_unwrapped() {
        let err: EngineError = CoreError::from(ValidationError::required("customerName")).into();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert_eq!(err.message(), "customerName is required");
    }

    #[test]
    fn test_store_failures_are_opaque() {
        let err: EngineError = DbError::QueryFailed("disk I/O error".into()).into();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert!(!err.message().contains("disk"));

        let err: EngineError = DbError::PoolExhausted.into();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }

    #[test]
    fn test_db_rejections_keep_their_meaning() {
        let err: EngineError = DbError::conflict("Product", "p1", "ordered").into();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err: EngineError = DbError::not_found("Restaurant", "r9").into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: EngineError = DbError::CheckViolation {
            message: "CHECK constraint failed: price_cents >= 0".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[test]
    fn test_kind_codes_match_serde() {
        for kind in [
            ErrorKind::NotFound,
            ErrorKind::ValidationError,
            ErrorKind::CrossRestaurantConflict,
            ErrorKind::EmptyCart,
            ErrorKind::Forbidden,
            ErrorKind::AggregationError,
            ErrorKind::StoreUnavailable,
            ErrorKind::Conflict,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.code()));
        }
    }
}
