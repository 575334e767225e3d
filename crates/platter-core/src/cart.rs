//! # Cart Aggregate
//!
//! The per-user shopping cart and the rules that keep it consistent.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Customer Action          Engine Call             Cart Change           │
//! │  ───────────────          ───────────             ───────────           │
//! │                                                                         │
//! │  Add dish ──────────────► add_item() ───────────► qty += n | push line  │
//! │                                                                         │
//! │  Change quantity ───────► set_quantity() ───────► qty = n | remove      │
//! │                                                                         │
//! │  Type a note ───────────► set_note() ───────────► line.note = text      │
//! │                                                                         │
//! │  Click remove ──────────► remove_item() ────────► retain(!= id)         │
//! │                                                                         │
//! │  Any read / checkout ───► reconcile() ──────────► drop vanished lines   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product (adding again increases quantity)
//! - Every line has `quantity >= 1`
//! - All resolvable lines belong to the same restaurant (checked at add time)
//! - The total is never stored; it is recomputed from live catalog prices
//!
//! The cart stores product ids only. Display detail is produced by
//! [`crate::views`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::CatalogSnapshot;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_cart_size, validate_note, validate_quantity};

// =============================================================================
// Cart Line
// =============================================================================

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub product_id: String,
    /// Always >= 1.
    pub quantity: i64,
    /// Free text for the kitchen; empty when unset.
    pub note: String,
}

impl CartLine {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        CartLine {
            product_id: product_id.into(),
            quantity,
            note: String::new(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A user's cart. Exactly one per user; created lazily on first add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    pub user_id: String,
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Cart {
            user_id: user_id.into(),
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds a product to the cart or increases its quantity.
    ///
    /// ## Errors
    /// - `ProductNotFound` if the product does not resolve in `catalog`
    /// - `Validation` if the quantity is out of range, the product is
    ///   unavailable, or the cart is full
    /// - `CrossRestaurantConflict` if the cart holds another restaurant's food
    ///
    /// On error the cart is left unchanged.
    pub fn add_item(
        &mut self,
        product_id: &str,
        quantity: i64,
        catalog: &CatalogSnapshot,
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let product = catalog
            .product(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        if !product.available {
            return Err(ValidationError::Unavailable {
                what: format!("Product {}", product.name),
            }
            .into());
        }

        if let Some(current) = self.restaurant_id(catalog) {
            if current != product.restaurant_id {
                return Err(CoreError::CrossRestaurantConflict {
                    cart_restaurant: current.to_string(),
                    requested_restaurant: product.restaurant_id.clone(),
                });
            }
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            let merged = line.quantity.saturating_add(quantity);
            validate_quantity(merged)?;
            line.quantity = merged;
        } else {
            validate_cart_size(self.lines.len())?;
            self.lines.push(CartLine::new(product_id, quantity));
        }

        self.touch();
        Ok(())
    }

    /// Sets the absolute quantity of a line.
    ///
    /// A quantity below 1 removes the line, exactly like [`Cart::remove_item`],
    /// and never fails.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            self.remove_item(product_id);
            return Ok(());
        }

        validate_quantity(quantity)?;

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;
        line.quantity = quantity;

        self.touch();
        Ok(())
    }

    /// Attaches or replaces the note of a line.
    pub fn set_note(&mut self, product_id: &str, note: &str) -> CoreResult<()> {
        let note = validate_note("note", note)?;

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;
        line.note = note;

        self.touch();
        Ok(())
    }

    /// Removes a line if present. Returns whether anything was removed.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        let removed = self.lines.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.touch();
    }

    /// Drops lines whose product no longer resolves.
    ///
    /// Runs before every read and before any total is computed, so a
    /// product deleted out-of-band never surfaces in a cart or an order.
    ///
    /// ## Returns
    /// The product ids of the dropped lines.
    pub fn reconcile(&mut self, catalog: &CatalogSnapshot) -> Vec<String> {
        let mut dropped = Vec::new();
        self.lines.retain(|line| {
            let keep = catalog.resolves(&line.product_id);
            if !keep {
                dropped.push(line.product_id.clone());
            }
            keep
        });
        dropped
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The restaurant of the first resolvable line, if any.
    pub fn restaurant_id<'a>(&self, catalog: &'a CatalogSnapshot) -> Option<&'a str> {
        self.lines
            .iter()
            .find_map(|l| catalog.product(&l.product_id))
            .map(|p| p.restaurant_id.as_str())
    }

    /// Σ(price × quantity) over resolvable lines, using current prices.
    pub fn total(&self, catalog: &CatalogSnapshot) -> Money {
        self.lines
            .iter()
            .filter_map(|l| {
                catalog
                    .product(&l.product_id)
                    .map(|p| p.price().multiply_quantity(l.quantity))
            })
            .sum()
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
