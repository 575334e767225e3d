//! # platter-engine: Cart, Order and Stats Engines
//!
//! The operations the storefront and the admin dashboard call. Each one
//! completes within the request that triggered it; nothing runs in the
//! background.
//!
//! ## Module Organization
//!
//! - [`cart`] - [`CartEngine`]: add / set quantity / note / remove / clear / get
//! - [`order`] - [`OrderEngine`]: checkout and order history
//! - [`stats`] - [`StatsAggregator`]: admin dashboard
//! - [`locks`] - [`CartLocks`]: per-user critical section
//! - [`error`] - [`EngineError`] and its [`ErrorKind`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use platter_db::{Database, DbConfig};
//! use platter_engine::Platter;
//!
//! let platter = Platter::new(Database::new(DbConfig::new("./platter.db")).await?);
//!
//! platter.carts().add_item("user-1", "product-1", 2).await?;
//! let order = platter.orders().place_order("user-1", &request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod locks;
pub mod order;
pub mod stats;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart::CartEngine;
pub use error::{EngineError, EngineResult, ErrorKind};
pub use locks::CartLocks;
pub use order::OrderEngine;
pub use stats::StatsAggregator;

use platter_db::Database;

/// Hands out the engines over one database and one set of cart locks.
///
/// Cart and order engines obtained from the same `Platter` share the locks,
/// so checkout and cart edits for a user never interleave.
#[derive(Debug, Clone)]
pub struct Platter {
    db: Database,
    locks: CartLocks,
}

impl Platter {
    pub fn new(db: Database) -> Self {
        Platter {
            db,
            locks: CartLocks::new(),
        }
    }

    pub fn carts(&self) -> CartEngine {
        CartEngine::new(self.db.clone(), self.locks.clone())
    }

    pub fn orders(&self) -> OrderEngine {
        OrderEngine::new(self.db.clone(), self.locks.clone())
    }

    pub fn stats(&self) -> StatsAggregator {
        StatsAggregator::new(self.db.clone())
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}
