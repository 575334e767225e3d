//! # Order Repository
//!
//! Database operations for placed orders.
//!
//! ## Placement Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    INSERT INTO orders ...                                               │
//! │    INSERT INTO order_items ... (one per line, with unit price)          │
//! │    DELETE FROM cart_items WHERE user_id = owner                         │
//! │    DELETE FROM carts      WHERE user_id = owner                         │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure rolls everything back: the cart is deleted iff the order   │
//! │  exists.                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use platter_core::{Fulfillment, FulfillmentMode, Order, OrderLine, OrderStatus, PickupType};

const ORDER_COLUMNS: &str = "SELECT id, user_id, customer_name, customer_phone, fulfillment, \
     pickup_type, region, delivery_address, notes, total_cents, status, created_at, updated_at \
     FROM orders";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    customer_name: String,
    customer_phone: String,
    fulfillment: FulfillmentMode,
    pickup_type: Option<PickupType>,
    region: Option<String>,
    delivery_address: Option<String>,
    notes: String,
    total_cents: i64,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: String,
    product_id: String,
    quantity: i64,
    note: String,
    unit_price_cents: i64,
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> DbResult<Order> {
        let fulfillment = match (self.fulfillment, self.pickup_type, self.region, self.delivery_address) {
            (FulfillmentMode::Pickup, Some(pickup_type), _, _) => Fulfillment::Pickup { pickup_type },
            (FulfillmentMode::Delivery, _, Some(region), Some(delivery_address)) => {
                Fulfillment::Delivery {
                    region,
                    delivery_address,
                }
            }
            (mode, ..) => {
                return Err(DbError::CorruptRow {
                    entity: "order".to_string(),
                    id: self.id,
                    reason: format!("incomplete {mode:?} details"),
                })
            }
        };

        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            fulfillment,
            notes: self.notes,
            lines,
            total_cents: self.total_cents,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists an order and deletes its owner's cart atomically.
    ///
    /// ## Returns
    /// * `Ok(())` - Order committed, cart gone
    /// * `Err(_)` - Nothing was written; the cart is untouched
    pub async fn place(&self, order: &Order) -> DbResult<()> {
        debug!(
            id = %order.id,
            user_id = %order.user_id,
            total_cents = order.total_cents,
            "Placing order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, customer_name, customer_phone,
                fulfillment, pickup_type, region, delivery_address,
                notes, total_cents, status, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12, ?13
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(order.fulfillment.mode())
        .bind(order.fulfillment.pickup_type())
        .bind(order.fulfillment.region())
        .bind(order.fulfillment.delivery_address())
        .bind(&order.notes)
        .bind(order.total_cents)
        .bind(order.status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, line) in order.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id, quantity, note, unit_price_cents, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(generate_order_item_id())
            .bind(&order.id)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(&line.note)
            .bind(line.unit_price_cents)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
            .bind(&order.user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM carts WHERE user_id = ?1")
            .bind(&order.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("{ORDER_COLUMNS} WHERE id = ?1");
        let Some(row) = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT order_id, product_id, quantity, note, unit_price_cents
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let lines = items.into_iter().map(line_from_row).collect();
        row.into_order(lines).map(Some)
    }

    /// All orders, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let sql = format!("{ORDER_COLUMNS} ORDER BY created_at DESC, rowid DESC");
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT order_id, product_id, quantity, note, unit_price_cents
            FROM order_items
            ORDER BY order_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        assemble(rows, items)
    }

    /// A user's orders, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!("{ORDER_COLUMNS} WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC");
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT oi.order_id, oi.product_id, oi.quantity, oi.note, oi.unit_price_cents
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE o.user_id = ?1
            ORDER BY oi.order_id, oi.position
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        assemble(rows, items)
    }

    /// Counts placed orders (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn line_from_row(row: OrderItemRow) -> OrderLine {
    OrderLine {
        product_id: row.product_id,
        quantity: row.quantity,
        note: row.note,
        unit_price_cents: row.unit_price_cents,
    }
}

/// Attaches item rows to their orders, keeping the orders' sequence.
fn assemble(rows: Vec<OrderRow>, items: Vec<OrderItemRow>) -> DbResult<Vec<Order>> {
    let mut lines_by_order: HashMap<String, Vec<OrderLine>> = HashMap::new();
    for item in items {
        lines_by_order
            .entry(item.order_id.clone())
            .or_default()
            .push(line_from_row(item));
    }

    rows.into_iter()
        .map(|row| {
            let lines = lines_by_order.remove(&row.id).unwrap_or_default();
            row.into_order(lines)
        })
        .collect()
}

/// Helper to generate a new order line ID.
pub fn generate_order_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
