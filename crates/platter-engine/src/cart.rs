//! # Cart Engine
//!
//! Per-user cart operations. Each mutation follows the same path:
//!
//! ```text
//! lock(user) ─► load cart ─► catalog snapshot ─► reconcile ─► mutate ─► save ─► view
//!                  │              (lines + requested product)      │
//!                  └── absent: start from an empty cart            └── Err: nothing saved
//! ```
//!
//! A failed mutation returns before `save`, so the stored cart keeps its
//! last-good state. Reads (`get_cart`) reconcile in memory without writing.

use tracing::{debug, warn};

use platter_core::views::cart_view;
use platter_core::{Cart, CartView, CatalogSnapshot, CoreResult};
use platter_db::Database;

use crate::error::EngineResult;
use crate::locks::CartLocks;

/// Cart operations for the storefront.
#[derive(Debug, Clone)]
pub struct CartEngine {
    db: Database,
    locks: CartLocks,
}

impl CartEngine {
    pub fn new(db: Database, locks: CartLocks) -> Self {
        CartEngine { db, locks }
    }

    /// Adds `quantity` of a product, merging with an existing line.
    ///
    /// ## Errors
    /// - `NotFound` if the product does not exist
    /// - `CrossRestaurantConflict` if the cart holds another restaurant's food
    /// - `ValidationError` for a bad quantity, an unavailable product or a
    ///   full cart
    pub async fn add_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> EngineResult<CartView> {
        debug!(user_id = %user_id, product_id = %product_id, quantity, "add_item");
        self.mutate(user_id, Some(product_id), |cart, catalog| {
            cart.add_item(product_id, quantity, catalog)
        })
        .await
    }

    /// Sets a line's quantity. Below 1 removes the line.
    ///
    /// ## Errors
    /// - `NotFound` if there is no line for the product (quantity ≥ 1 only)
    pub async fn set_quantity(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> EngineResult<CartView> {
        debug!(user_id = %user_id, product_id = %product_id, quantity, "set_quantity");
        self.mutate(user_id, None, |cart, _| cart.set_quantity(product_id, quantity))
            .await
    }

    /// Attaches a free-text note to a line.
    pub async fn set_note(
        &self,
        user_id: &str,
        product_id: &str,
        note: &str,
    ) -> EngineResult<CartView> {
        debug!(user_id = %user_id, product_id = %product_id, "set_note");
        self.mutate(user_id, None, |cart, _| cart.set_note(product_id, note))
            .await
    }

    /// Removes a line. Removing an absent line is not an error.
    pub async fn remove_item(&self, user_id: &str, product_id: &str) -> EngineResult<CartView> {
        debug!(user_id = %user_id, product_id = %product_id, "remove_item");
        self.mutate(user_id, None, |cart, _| {
            cart.remove_item(product_id);
            Ok(())
        })
        .await
    }

    /// Deletes the whole cart.
    pub async fn clear(&self, user_id: &str) -> EngineResult<CartView> {
        debug!(user_id = %user_id, "clear");
        let _guard = self.locks.lock(user_id).await;

        self.db.carts().delete(user_id).await?;
        Ok(cart_view(&Cart::new(user_id), &CatalogSnapshot::default()))
    }

    /// Returns the cart with vanished products filtered out.
    ///
    /// A user without a cart gets an empty one.
    pub async fn get_cart(&self, user_id: &str) -> EngineResult<CartView> {
        debug!(user_id = %user_id, "get_cart");

        let mut cart = self
            .db
            .carts()
            .load(user_id)
            .await?
            .unwrap_or_else(|| Cart::new(user_id));
        let catalog = self.snapshot(&cart, None).await?;
        reconcile(&mut cart, &catalog);

        Ok(cart_view(&cart, &catalog))
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    async fn mutate<F>(
        &self,
        user_id: &str,
        extra_product: Option<&str>,
        apply: F,
    ) -> EngineResult<CartView>
    where
        F: FnOnce(&mut Cart, &CatalogSnapshot) -> CoreResult<()>,
    {
        let _guard = self.locks.lock(user_id).await;

        let stored = self.db.carts().load(user_id).await?;
        let existed = stored.is_some();
        let mut cart = stored.unwrap_or_else(|| Cart::new(user_id));

        let catalog = self.snapshot(&cart, extra_product).await?;
        reconcile(&mut cart, &catalog);

        apply(&mut cart, &catalog)?;

        // Removing from a cart that never existed should not create one.
        if existed || !cart.is_empty() {
            self.db.carts().save(&cart).await?;
        }

        Ok(cart_view(&cart, &catalog))
    }

    async fn snapshot(
        &self,
        cart: &Cart,
        extra_product: Option<&str>,
    ) -> EngineResult<CatalogSnapshot> {
        let ids = cart
            .lines
            .iter()
            .map(|line| line.product_id.clone())
            .chain(extra_product.map(str::to_string));
        Ok(self.db.catalog().snapshot_for(ids).await?)
    }
}

pub(crate) fn reconcile(cart: &mut Cart, catalog: &CatalogSnapshot) {
    let dropped = cart.reconcile(catalog);
    if !dropped.is_empty() {
        warn!(
            user_id = %cart.user_id,
            dropped = ?dropped,
            "Dropped cart lines for products no longer on the menu"
        );
    }
}
