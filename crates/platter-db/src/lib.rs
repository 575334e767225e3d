//! # platter-db: Database Layer for Platter
//!
//! This crate provides database access for Platter.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Platter Data Flow                                │
//! │                                                                         │
//! │  platter-engine (CartEngine / OrderEngine / StatsAggregator)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     platter-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ CatalogRepo    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ UserRepo       │    │ 001_initial  │  │   │
//! │  │   │               │    │ CartRepo       │    │  _schema.sql │  │   │
//! │  │   │               │    │ OrderRepo      │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (platter.db)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (catalog, user, cart, order)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use platter_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./platter.db")).await?;
//!
//! let cart = db.carts().load("user-id").await?;
//! let orders = db.orders().list_for_user("user-id").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cart::CartRepository;
pub use repository::catalog::CatalogRepository;
pub use repository::order::OrderRepository;
pub use repository::user::UserRepository;
