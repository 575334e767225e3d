//! # Repository Module
//!
//! Database repository implementations for Platter.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Engine                                                                 │
//! │       │  db.carts().load(user_id)                                       │
//! │       ▼                                                                 │
//! │  CartRepository                                                         │
//! │  ├── load(&self, user_id)                                               │
//! │  ├── save(&self, cart)        (one transaction)                        │
//! │  └── delete(&self, user_id)                                             │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Restaurants, categories, products, snapshots
//! - [`UserRepository`](user::UserRepository) - Public user profiles and online time
//! - [`CartRepository`](cart::CartRepository) - Whole-cart load / save / delete
//! - [`OrderRepository`](order::OrderRepository) - Order placement and retrieval

pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;

use std::collections::BTreeSet;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::error::DbResult;

/// Runs `select` restricted to `WHERE id IN (ids)`.
///
/// Duplicate ids are collapsed; an empty id list short-circuits to an
/// empty result without touching the database.
pub(crate) async fn fetch_by_ids<T>(
    pool: &SqlitePool,
    select: &str,
    ids: impl IntoIterator<Item = String>,
) -> DbResult<Vec<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let ids: BTreeSet<String> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(select);
    qb.push(" WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    Ok(qb.build_query_as::<T>().fetch_all(pool).await?)
}
