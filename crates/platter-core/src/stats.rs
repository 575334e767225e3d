//! # Dashboard Statistics
//!
//! Pure folds that turn committed orders, the catalog and the user list into
//! the admin dashboard. Nothing here is cached; the aggregator recomputes
//! the whole object per request.
//!
//! ## Restaurant Attribution
//! ```text
//! Order #1  total $10  lines: [P1 (R), P2 (R)]   ─┐
//! Order #2  total $15  lines: [P1 (R)]            ├─► R: orders 2, sales $25
//!                                                 │
//! Order #3  total $20  lines: [P1 (R), P3 (S)]   ─┴─► R +1 / +$20, S +1 / +$20
//! ```
//! An order counts once per restaurant it touches, and the **whole** order
//! total is attributed to each of them. Carts are single-restaurant, so
//! multi-restaurant orders only appear through out-of-band data; they are
//! tolerated rather than split.
//!
//! ## Broken Joins
//! - A line whose product no longer exists is skipped.
//! - A line whose product exists but whose restaurant does not is an error.
//! - An order whose owner does not exist is an error.
//!
//! Any error fails the whole dashboard; there is no partial result.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::CatalogSnapshot;
use crate::error::{CoreError, CoreResult};
use crate::types::{Order, Role, UserProfile};

// =============================================================================
// Result Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RestaurantSales {
    pub restaurant_id: String,
    pub restaurant_name: String,
    /// Distinct orders touching the restaurant.
    pub total_orders: i64,
    /// Sum of those orders' totals, in cents.
    pub total_sales_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RoleCount {
    pub role: Role,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserOrderCount {
    pub user_id: String,
    pub username: String,
    pub order_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserOnlineStat {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    pub total_online_secs: i64,
    pub is_online: bool,
}

/// Everything the admin dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub restaurants_count: i64,
    pub orders_by_restaurant: Vec<RestaurantSales>,
    pub users_count: i64,
    pub roles: Vec<RoleCount>,
    pub orders_by_user: Vec<UserOrderCount>,
    pub users_online_stats: Vec<UserOnlineStat>,
}

impl DashboardStats {
    /// Computes every section of the dashboard.
    pub fn compute(
        catalog: &CatalogSnapshot,
        users: &[UserProfile],
        orders: &[Order],
    ) -> CoreResult<Self> {
        Ok(DashboardStats {
            restaurants_count: catalog.restaurant_count() as i64,
            orders_by_restaurant: orders_by_restaurant(orders, catalog)?,
            users_count: users.len() as i64,
            roles: role_counts(users),
            orders_by_user: orders_by_user(orders, users)?,
            users_online_stats: online_stats(users),
        })
    }
}

// =============================================================================
// Folds
// =============================================================================

/// Orders and sales per restaurant, by sales desc then name.
pub fn orders_by_restaurant(
    orders: &[Order],
    catalog: &CatalogSnapshot,
) -> CoreResult<Vec<RestaurantSales>> {
    let mut acc: HashMap<&str, (i64, i64)> = HashMap::new();

    for order in orders {
        let mut touched = BTreeSet::new();
        for line in &order.lines {
            let Some(product) = catalog.product(&line.product_id) else {
                continue;
            };
            if catalog.restaurant(&product.restaurant_id).is_none() {
                return Err(CoreError::Aggregation(format!(
                    "product {} of order {} references missing restaurant {}",
                    product.id, order.id, product.restaurant_id
                )));
            }
            touched.insert(product.restaurant_id.as_str());
        }

        for restaurant_id in touched {
            let entry = acc.entry(restaurant_id).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += order.total_cents;
        }
    }

    let mut rows: Vec<RestaurantSales> = acc
        .into_iter()
        .filter_map(|(id, (count, sales))| {
            catalog.restaurant(id).map(|r| RestaurantSales {
                restaurant_id: r.id.clone(),
                restaurant_name: r.name.clone(),
                total_orders: count,
                total_sales_cents: sales,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_sales_cents
            .cmp(&a.total_sales_cents)
            .then_with(|| a.restaurant_name.cmp(&b.restaurant_name))
    });
    Ok(rows)
}

/// Placed orders per user, by count desc then username.
///
/// Users without orders are not listed.
pub fn orders_by_user(orders: &[Order], users: &[UserProfile]) -> CoreResult<Vec<UserOrderCount>> {
    let by_id: HashMap<&str, &UserProfile> = users.iter().map(|u| (u.id.as_str(), u)).collect();
    let mut counts: HashMap<&str, i64> = HashMap::new();

    for order in orders {
        if !by_id.contains_key(order.user_id.as_str()) {
            return Err(CoreError::Aggregation(format!(
                "order {} references missing user {}",
                order.id, order.user_id
            )));
        }
        *counts.entry(order.user_id.as_str()).or_default() += 1;
    }

    let mut rows: Vec<UserOrderCount> = counts
        .into_iter()
        .filter_map(|(id, count)| {
            by_id.get(id).map(|u| UserOrderCount {
                user_id: u.id.clone(),
                username: u.username.clone(),
                order_count: count,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.order_count
            .cmp(&a.order_count)
            .then_with(|| a.username.cmp(&b.username))
    });
    Ok(rows)
}

/// Users per role, by role name.
pub fn role_counts(users: &[UserProfile]) -> Vec<RoleCount> {
    let mut counts: BTreeMap<&'static str, (Role, i64)> = BTreeMap::new();
    for user in users {
        counts.entry(user.role.as_str()).or_insert((user.role, 0)).1 += 1;
    }
    counts
        .into_values()
        .map(|(role, count)| RoleCount { role, count })
        .collect()
}

/// Online-time statistics for every user, by username.
pub fn online_stats(users: &[UserProfile]) -> Vec<UserOnlineStat> {
    let mut rows: Vec<UserOnlineStat> = users
        .iter()
        .map(|u| UserOnlineStat {
            user_id: u.id.clone(),
            username: u.username.clone(),
            role: u.role,
            total_online_secs: u.total_online_secs,
            is_online: u.is_online,
        })
        .collect();
    rows.sort_by(|a, b| a.username.cmp(&b.username));
    rows
}

// =============================================================================
// Unit Tests
// =============================================================================
