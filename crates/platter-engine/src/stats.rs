//! # Stats Aggregator
//!
//! Admin dashboard, recomputed on every request from committed orders, the
//! full catalog and all users. No caching.
//!
//! Any broken join fails the whole request with `AggregationError`; a
//! partial dashboard is never returned.

use tracing::debug;

use platter_core::{DashboardStats, Requester};
use platter_db::Database;

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct StatsAggregator {
    db: Database,
}

impl StatsAggregator {
    pub fn new(db: Database) -> Self {
        StatsAggregator { db }
    }

    /// Builds the dashboard.
    ///
    /// ## Errors
    /// - `Forbidden` unless the requester is an admin
    /// - `AggregationError` if an order references a product whose
    ///   restaurant, or an owner, no longer exists
    pub async fn dashboard(&self, requester: &Requester) -> EngineResult<DashboardStats> {
        debug!(user_id = %requester.id, role = %requester.role, "dashboard");

        if !requester.is_admin() {
            return Err(EngineError::forbidden(
                "Dashboard statistics are only available to admins",
            ));
        }

        let catalog = self.db.catalog().snapshot().await?;
        let users = self.db.users().list().await?;
        let orders = self.db.orders().list_all().await?;

        let stats = DashboardStats::compute(&catalog, &users, &orders)?;

        debug!(
            restaurants = stats.restaurants_count,
            users = stats.users_count,
            orders = orders.len(),
            "Dashboard computed"
        );
        Ok(stats)
    }
}
