//! # platter-core: Pure Business Logic for Platter
//!
//! This crate holds the ordering rules of the platform as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Platter Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Client                                   │   │
//! │  │    Menu ──► Cart ──► Checkout ──► Orders ──► Admin Dashboard    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (platter-api)                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    platter-engine                               │   │
//! │  │    CartEngine, OrderEngine, StatsAggregator (locks, tx)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ platter-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  cart   │ │ checkout │ │  views  │ │ stats  │  │   │
//! │  │   │ Product │ │  Cart   │ │ Request  │ │CartView │ │Dashbrd │  │   │
//! │  │   │  Order  │ │reconcile│ │build_ord │ │OrderView│ │ folds  │  │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └─────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    platter-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Restaurant, Order, Requester, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Point-in-time view of the catalog used to resolve references
//! - [`cart`] - The per-user Cart aggregate and `reconcile`
//! - [`checkout`] - Checkout validation and order construction
//! - [`views`] - Read-side projections (hydrated DTOs)
//! - [`stats`] - Dashboard aggregation over committed orders
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation
//!
//! ## Example Usage
//!
//! ```rust
//! use platter_core::money::Money;
//!
//! let price = Money::from_cents(500); // $5.00
//! let line_total = price.multiply_quantity(2);
//! assert_eq!(line_total.to_string(), "$10.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod stats;
pub mod types;
pub mod validation;
pub mod views;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use catalog::CatalogSnapshot;
pub use checkout::{build_order, CheckoutRequest, ValidatedCheckout};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use stats::DashboardStats;
pub use types::*;
pub use views::{CartView, OrderView, UserSummary};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity accepted by a single add / set request.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum length of a line note or an order note.
pub const MAX_NOTE_LEN: usize = 500;
