//! # Order Engine
//!
//! Turns a user's cart into an immutable order and serves order history.
//!
//! ## Checkout
//! ```text
//! lock(user)
//!   │
//!   ├─ load cart ──────────────── absent / empty ───────► EmptyCart
//!   ├─ snapshot + reconcile ───── nothing resolves ─────► EmptyCart
//!   ├─ validate request ───────── blank name, bad mode ─► ValidationError
//!   ├─ total = Σ price × qty (frozen on the order)
//!   ├─ load owner ─────────────── store failure ────────► StoreUnavailable
//!   │
//!   └─ one transaction: INSERT order + lines, DELETE cart
//!        ├─ commit ──► order returned, cart gone
//!        └─ failure ─► nothing written, cart untouched
//! ```

use std::collections::BTreeSet;

use tracing::{debug, info};

use platter_core::views::order_view;
use platter_core::{build_order, Cart, CheckoutRequest, Order, OrderView, Requester};
use platter_db::Database;

use crate::cart::reconcile;
use crate::error::EngineResult;
use crate::locks::CartLocks;

/// Checkout and order history.
#[derive(Debug, Clone)]
pub struct OrderEngine {
    db: Database,
    locks: CartLocks,
}

impl OrderEngine {
    pub fn new(db: Database, locks: CartLocks) -> Self {
        OrderEngine { db, locks }
    }

    /// Places an order from the user's cart and deletes the cart.
    ///
    /// ## Errors
    /// - `EmptyCart` if there is no cart, or none of its products remain
    /// - `ValidationError` if customer or fulfillment details are invalid
    /// - `StoreUnavailable` if a read or the write fails (the cart is left
    ///   as it was and no order exists)
    pub async fn place_order(
        &self,
        user_id: &str,
        request: &CheckoutRequest,
    ) -> EngineResult<OrderView> {
        debug!(user_id = %user_id, fulfillment = %request.fulfillment, "place_order");
        let _guard = self.locks.lock(user_id).await;

        let mut cart = self
            .db
            .carts()
            .load(user_id)
            .await?
            .unwrap_or_else(|| Cart::new(user_id));

        let catalog = self
            .db
            .catalog()
            .snapshot_for(cart.lines.iter().map(|l| l.product_id.clone()))
            .await?;
        reconcile(&mut cart, &catalog);

        let order = build_order(&cart, &catalog, request)?;
        // Nothing may fail once the order is committed.
        let owner = self.db.users().get(user_id).await?;
        self.db.orders().place(&order).await?;

        info!(
            order_id = %order.id,
            user_id = %user_id,
            lines = order.lines.len(),
            total = %order.total(),
            "Order placed"
        );

        Ok(order_view(&order, &catalog, owner.as_ref()))
    }

    /// Lists orders newest first: every order for admins, otherwise only
    /// the requester's own.
    pub async fn get_orders(&self, requester: &Requester) -> EngineResult<Vec<OrderView>> {
        debug!(user_id = %requester.id, role = %requester.role, "get_orders");

        let orders = if requester.is_admin() {
            self.db.orders().list_all().await?
        } else {
            self.db.orders().list_for_user(&requester.id).await?
        };

        self.hydrate(&orders).await
    }

    async fn hydrate(&self, orders: &[Order]) -> EngineResult<Vec<OrderView>> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: BTreeSet<String> = orders
            .iter()
            .flat_map(|o| o.lines.iter().map(|l| l.product_id.clone()))
            .collect();
        let owner_ids: BTreeSet<String> = orders.iter().map(|o| o.user_id.clone()).collect();

        let catalog = self.db.catalog().snapshot_for(product_ids).await?;
        let owners = self.db.users().get_many(owner_ids).await?;

        Ok(orders
            .iter()
            .map(|order| {
                let owner = owners.iter().find(|u| u.id == order.user_id);
                order_view(order, &catalog, owner)
            })
            .collect())
    }
}
