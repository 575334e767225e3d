//! # Validation Module
//!
//! Input validation utilities for Platter.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web client                                                   │
//! │  ├── Phone digit count, region picker                                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP boundary (platter-api)                                  │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engines + THIS MODULE                                        │
//! │  └── The caller is never trusted: every field is rechecked here        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite CHECK / NOT NULL constraints)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use platter_core::validation::{validate_quantity, validate_required};
//!
//! validate_quantity(2).unwrap();
//! assert_eq!(validate_required("customerName", "  Lina ").unwrap(), "Lina");
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY, MAX_NOTE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of the customer name on an order.
pub const MAX_NAME_LEN: usize = 100;
/// Maximum length of the customer phone on an order.
pub const MAX_PHONE_LEN: usize = 30;
/// Maximum length of a delivery region.
pub const MAX_REGION_LEN: usize = 100;
/// Maximum length of a delivery address.
pub const MAX_ADDRESS_LEN: usize = 300;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field.
///
/// ## Rules
/// - Must not be blank after trimming
/// - Must be at most `max` characters
///
/// ## Returns
/// The trimmed value.
pub fn validate_bounded(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates that a field is present and non-blank.
///
/// ## Example
/// ```rust
/// use platter_core::validation::validate_required;
///
/// assert!(validate_required("region", "Amman").is_ok());
/// assert!(validate_required("region", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(value.to_string())
}

/// Validates the customer name on a checkout request.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    validate_bounded("customerName", name, MAX_NAME_LEN)
}

/// Validates the customer phone on a checkout request.
///
/// ## Rules
/// - Must not be blank
/// - At most 30 characters
///
/// Digit-count rules are a client concern and are not enforced here.
pub fn validate_customer_phone(phone: &str) -> ValidationResult<String> {
    validate_bounded("customerPhone", phone, MAX_PHONE_LEN)
}

/// Validates a delivery region.
pub fn validate_region(region: &str) -> ValidationResult<String> {
    validate_bounded("region", region, MAX_REGION_LEN)
}

/// Validates a delivery address.
pub fn validate_delivery_address(address: &str) -> ValidationResult<String> {
    validate_bounded("deliveryAddress", address, MAX_ADDRESS_LEN)
}

/// Validates an optional note (line note or order note).
///
/// ## Rules
/// - Blank is fine (normalized to an empty string)
/// - Maximum 500 characters
pub fn validate_note(field: &str, note: &str) -> ValidationResult<String> {
    let note = note.trim();

    if note.chars().count() > MAX_NOTE_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NOTE_LEN,
        });
    }

    Ok(note.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value for add / set requests.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// `set_quantity` treats values below 1 as a removal before calling this.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Example
/// ```rust
/// use platter_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more distinct line fits in the cart.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
