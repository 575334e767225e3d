//! # Checkout
//!
//! Validation of checkout input and construction of the immutable
//! [`Order`] snapshot from a cart.
//!
//! ## Checkout Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart (stored)                                                          │
//! │     │  empty? ─────────────────────────────► EmptyCart                  │
//! │     ▼                                                                   │
//! │  reconcile(catalog)                                                     │
//! │     │  nothing left? ──────────────────────► EmptyCart                  │
//! │     ▼                                                                   │
//! │  CheckoutRequest::validate()                                            │
//! │     │  blank name / phone / bad fulfillment ► ValidationError           │
//! │     ▼                                                                   │
//! │  build_order()  total = Σ(price × qty), status = completed              │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Order (persisted by the engine together with the cart deletion)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::catalog::CatalogSnapshot;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Fulfillment, FulfillmentMode, Order, OrderLine, OrderStatus, PickupType};
use crate::validation::{
    validate_customer_name, validate_customer_phone, validate_delivery_address, validate_note,
    validate_region, ValidationResult,
};

// =============================================================================
// Checkout Request
// =============================================================================

/// Raw checkout input as submitted by the customer.
///
/// Every field is untrusted; [`CheckoutRequest::validate`] turns it into a
/// [`ValidatedCheckout`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_phone: String,
    /// `pickup` or `delivery`.
    pub fulfillment: String,
    /// `dine-in` or `takeaway`; pickup only.
    pub pickup_type: Option<String>,
    /// Delivery only.
    pub region: Option<String>,
    /// Delivery only.
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

/// Checkout input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCheckout {
    pub customer_name: String,
    pub customer_phone: String,
    pub fulfillment: Fulfillment,
    pub notes: String,
}

impl CheckoutRequest {
    /// Validates customer details and fulfillment.
    ///
    /// ## Rules
    /// - `customerName` and `customerPhone` must be non-blank
    /// - `delivery` requires non-blank `region` and `deliveryAddress`
    /// - `pickup` requires `pickupType` of `dine-in` or `takeaway`
    /// - Details belonging to the other mode are ignored
    pub fn validate(&self) -> ValidationResult<ValidatedCheckout> {
        let customer_name = validate_customer_name(&self.customer_name)?;
        let customer_phone = validate_customer_phone(&self.customer_phone)?;

        if self.fulfillment.trim().is_empty() {
            return Err(ValidationError::required("fulfillment"));
        }
        let mode: FulfillmentMode = self.fulfillment.parse()?;

        let fulfillment = match mode {
            FulfillmentMode::Pickup => {
                let raw = self
                    .pickup_type
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| ValidationError::required("pickupType"))?;
                let pickup_type: PickupType = raw.parse()?;
                Fulfillment::Pickup { pickup_type }
            }
            FulfillmentMode::Delivery => Fulfillment::Delivery {
                region: validate_region(self.region.as_deref().unwrap_or_default())?,
                delivery_address: validate_delivery_address(
                    self.delivery_address.as_deref().unwrap_or_default(),
                )?,
            },
        };

        let notes = validate_note("notes", self.notes.as_deref().unwrap_or_default())?;

        Ok(ValidatedCheckout {
            customer_name,
            customer_phone,
            fulfillment,
            notes,
        })
    }
}

// =============================================================================
// Order Construction
// =============================================================================

/// Builds the order snapshot for a cart.
///
/// Lines whose product does not resolve are skipped. The resulting total
/// equals `cart.total(catalog)` and is frozen on the order; each line also
/// keeps the unit price it was charged at.
///
/// ## Errors
/// - `EmptyCart` if the cart has no lines, or none of them resolve
/// - `Validation` if the request is invalid
pub fn build_order(
    cart: &Cart,
    catalog: &CatalogSnapshot,
    request: &CheckoutRequest,
) -> CoreResult<Order> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart("the cart has no items".to_string()));
    }

    let lines: Vec<OrderLine> = cart
        .lines
        .iter()
        .filter_map(|line| {
            catalog.product(&line.product_id).map(|product| OrderLine {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                note: line.note.clone(),
                unit_price_cents: product.price_cents,
            })
        })
        .collect();

    if lines.is_empty() {
        return Err(CoreError::EmptyCart(
            "none of the products in the cart are still on the menu".to_string(),
        ));
    }

    let checkout = request.validate()?;
    let total: Money = lines.iter().map(OrderLine::line_total).sum();
    let now = Utc::now();

    Ok(Order {
        id: Uuid::new_v4().to_string(),
        user_id: cart.user_id.clone(),
        customer_name: checkout.customer_name,
        customer_phone: checkout.customer_phone,
        fulfillment: checkout.fulfillment,
        notes: checkout.notes,
        lines,
        total_cents: total.cents(),
        status: OrderStatus::Completed,
        created_at: now,
        updated_at: now,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
