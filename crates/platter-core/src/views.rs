//! # Read-Side Projections
//!
//! Pure functions turning stored aggregates (which hold ids only) into the
//! hydrated shapes returned to callers.
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌────────────────────┐
//! │ Cart / Order    │     │ CatalogSnapshot  │     │ UserProfile        │
//! │ (ids only)      │     │ products, cats,  │     │ (order owner)      │
//! └────────┬────────┘     │ restaurants      │     └─────────┬──────────┘
//!          │              └────────┬─────────┘               │
//!          └───────────────────────┼─────────────────────────┘
//!                                  ▼
//!                     cart_view() / order_view()
//!                                  │
//!                                  ▼
//!                     CartView / OrderView (JSON)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::catalog::CatalogSnapshot;
use crate::types::{
    Category, Fulfillment, Order, OrderStatus, Product, Restaurant, Role, UserProfile,
};

// =============================================================================
// View Types
// =============================================================================

/// A product with its category and restaurant populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image: String,
    pub available: bool,
    pub category: Option<Category>,
    pub restaurant: Option<Restaurant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineView {
    pub product: ProductView,
    pub quantity: i64,
    pub note: String,
    pub line_total_cents: i64,
}

/// The cart as shown to its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartView {
    pub user_id: String,
    pub items: Vec<CartLineView>,
    pub item_count: usize,
    pub total_quantity: i64,
    /// Recomputed on every read from current prices.
    pub total_cents: i64,
}

/// Public identity of a user. Never carries secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&UserProfile> for UserSummary {
    fn from(user: &UserProfile) -> Self {
        UserSummary {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLineView {
    pub product_id: String,
    /// `None` once the product has been removed from the catalog.
    pub product: Option<ProductView>,
    pub quantity: i64,
    pub note: String,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderView {
    pub id: String,
    pub user_id: String,
    /// `None` if the owning account no longer exists.
    pub user: Option<UserSummary>,
    pub customer_name: String,
    pub customer_phone: String,
    pub fulfillment: Fulfillment,
    pub notes: String,
    pub items: Vec<OrderLineView>,
    pub total_cents: i64,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Projections
// =============================================================================

pub fn product_view(product: &Product, catalog: &CatalogSnapshot) -> ProductView {
    ProductView {
        id: product.id.clone(),
        name: product.name.clone(),
        description: product.description.clone(),
        price_cents: product.price_cents,
        image: product.image.clone(),
        available: product.available,
        category: catalog.category(&product.category_id).cloned(),
        restaurant: catalog.restaurant(&product.restaurant_id).cloned(),
    }
}

/// Projects a cart. Lines whose product does not resolve are left out.
pub fn cart_view(cart: &Cart, catalog: &CatalogSnapshot) -> CartView {
    let items: Vec<CartLineView> = cart
        .lines
        .iter()
        .filter_map(|line| {
            catalog.product(&line.product_id).map(|product| CartLineView {
                product: product_view(product, catalog),
                quantity: line.quantity,
                note: line.note.clone(),
                line_total_cents: product.price().multiply_quantity(line.quantity).cents(),
            })
        })
        .collect();

    CartView {
        user_id: cart.user_id.clone(),
        item_count: items.len(),
        total_quantity: items.iter().map(|i| i.quantity).sum(),
        total_cents: cart.total(catalog).cents(),
        items,
    }
}

/// Projects an order with product detail per line and the owner's identity.
///
/// Prices and the total come from the order snapshot, not the catalog.
pub fn order_view(
    order: &Order,
    catalog: &CatalogSnapshot,
    owner: Option<&UserProfile>,
) -> OrderView {
    let items = order
        .lines
        .iter()
        .map(|line| OrderLineView {
            product_id: line.product_id.clone(),
            product: catalog
                .product(&line.product_id)
                .map(|p| product_view(p, catalog)),
            quantity: line.quantity,
            note: line.note.clone(),
            unit_price_cents: line.unit_price_cents,
            line_total_cents: line.line_total().cents(),
        })
        .collect();

    OrderView {
        id: order.id.clone(),
        user_id: order.user_id.clone(),
        user: owner.map(UserSummary::from),
        customer_name: order.customer_name.clone(),
        customer_phone: order.customer_phone.clone(),
        fulfillment: order.fulfillment.clone(),
        notes: order.notes.clone(),
        items,
        total_cents: order.total_cents,
        status: order.status,
        created_at: order.created_at,
        updated_at: order.updated_at,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
