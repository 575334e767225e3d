//! # Cart Repository
//!
//! Whole-cart persistence. The engine loads a cart, mutates the aggregate
//! in memory and writes it back with [`CartRepository::save`], which
//! replaces every line in one transaction.
//!
//! ## Storage Layout
//! ```text
//! carts       (user_id PK, created_at, updated_at)
//!   └── cart_items (user_id, product_id) PK, quantity, note, position
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use platter_core::{Cart, CartLine};

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    product_id: String,
    quantity: i64,
    note: String,
}

impl From<CartItemRow> for CartLine {
    fn from(row: CartItemRow) -> Self {
        CartLine {
            product_id: row.product_id,
            quantity: row.quantity,
            note: row.note,
        }
    }
}

/// Repository for cart persistence.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Loads a user's cart with its lines in insertion order.
    ///
    /// ## Returns
    /// `None` if the user has no cart.
    pub async fn load(&self, user_id: &str) -> DbResult<Option<Cart>> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT user_id, created_at, updated_at FROM carts WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, CartItemRow>(
            r#"
            SELECT product_id, quantity, note
            FROM cart_items
            WHERE user_id = ?1
            ORDER BY position
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Cart {
            user_id: row.user_id,
            lines: items.into_iter().map(CartLine::from).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }

    /// Writes the whole cart, replacing any stored lines.
    ///
    /// Runs in one transaction: readers see either the old cart or the new
    /// one, never a mix.
    pub async fn save(&self, cart: &Cart) -> DbResult<()> {
        debug!(user_id = %cart.user_id, lines = cart.lines.len(), "Saving cart");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO carts (user_id, created_at, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET updated_at = excluded.updated_at
            "#,
        )
        .bind(&cart.user_id)
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(&cart.user_id)
            .execute(&mut *tx)
            .await?;

        for (position, line) in cart.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cart_items (user_id, product_id, quantity, note, position)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&cart.user_id)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(&line.note)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Deletes a user's cart.
    ///
    /// ## Returns
    /// Whether a cart existed. Deleting an absent cart is not an error.
    pub async fn delete(&self, user_id: &str) -> DbResult<bool> {
        debug!(user_id = %user_id, "Deleting cart");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM carts WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
