//! # Domain Types
//!
//! Core domain types used throughout Platter.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog (admin CRUD, read here)       Orders (written by OrderEngine)  │
//! │  ┌─────────────┐  ┌─────────────┐      ┌─────────────────────────────┐ │
//! │  │ Restaurant  │◄─│  Product    │◄─────│ OrderLine (snapshot)        │ │
//! │  └─────────────┘  │ price_cents │      │ product_id, qty, note,      │ │
//! │  ┌─────────────┐  │ available   │      │ unit_price_cents            │ │
//! │  │  Category   │◄─│             │      └──────────────┬──────────────┘ │
//! │  └─────────────┘  └─────────────┘                     │                │
//! │                                        ┌──────────────▼──────────────┐ │
//! │  Identity (external collaborator)      │ Order                       │ │
//! │  ┌─────────────┐                       │ fulfillment, total, status  │ │
//! │  │ UserProfile │◄──────────────────────│ user_id                     │ │
//! │  │ role        │                       └─────────────────────────────┘ │
//! │  └─────────────┘                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entity is identified by a UUID v4 string. References between
//! entities are ids only; hydrated shapes live in [`crate::views`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Identity
// =============================================================================

/// Role of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Wire / storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["user".to_string(), "admin".to_string()],
            }),
        }
    }
}

/// A verified caller identity, produced by the authentication boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: String,
    pub role: Role,
}

impl Requester {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Requester {
            id: id.into(),
            role,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Public profile of a registered user.
///
/// Owned by the identity service; this system never stores or returns
/// passwords or other secrets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    /// Whether the user currently has an active session.
    pub is_online: bool,
    /// Cumulative time spent online, in seconds.
    pub total_online_secs: i64,
    #[ts(as = "Option<String>")]
    pub last_login: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Catalog
// =============================================================================

/// A restaurant listed on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub description: String,
    pub image: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A menu category (e.g. "Grills", "Desserts").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A product on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in cents (never negative).
    pub price_cents: i64,
    pub category_id: String,
    pub restaurant_id: String,
    /// Image reference (path or URL); upload handling lives elsewhere.
    pub image: String,
    /// Whether the product can currently be added to carts.
    pub available: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// Orders are placed and fulfilled synchronously, so the order engine
/// always writes `Completed`. The other states exist for manual handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Fulfillment
// =============================================================================

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum FulfillmentMode {
    Pickup,
    Delivery,
}

impl FromStr for FulfillmentMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pickup" => Ok(FulfillmentMode::Pickup),
            "delivery" => Ok(FulfillmentMode::Delivery),
            _ => Err(ValidationError::NotAllowed {
                field: "fulfillment".to_string(),
                allowed: vec!["pickup".to_string(), "delivery".to_string()],
            }),
        }
    }
}

/// Sub-type of a pickup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum PickupType {
    DineIn,
    Takeaway,
}

impl FromStr for PickupType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dine-in" => Ok(PickupType::DineIn),
            "takeaway" => Ok(PickupType::Takeaway),
            _ => Err(ValidationError::NotAllowed {
                field: "pickupType".to_string(),
                allowed: vec!["dine-in".to_string(), "takeaway".to_string()],
            }),
        }
    }
}

/// Validated fulfillment details of an order.
///
/// A pickup order never carries a region or address, and a delivery order
/// never carries a pickup type; the enum makes the mixed states
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "mode", rename_all = "lowercase")]
#[ts(export)]
pub enum Fulfillment {
    Pickup {
        #[serde(rename = "pickupType")]
        pickup_type: PickupType,
    },
    Delivery {
        region: String,
        #[serde(rename = "deliveryAddress")]
        delivery_address: String,
    },
}

impl Fulfillment {
    pub fn mode(&self) -> FulfillmentMode {
        match self {
            Fulfillment::Pickup { .. } => FulfillmentMode::Pickup,
            Fulfillment::Delivery { .. } => FulfillmentMode::Delivery,
        }
    }

    pub fn pickup_type(&self) -> Option<PickupType> {
        match self {
            Fulfillment::Pickup { pickup_type } => Some(*pickup_type),
            Fulfillment::Delivery { .. } => None,
        }
    }

    pub fn region(&self) -> Option<&str> {
        match self {
            Fulfillment::Delivery { region, .. } => Some(region),
            Fulfillment::Pickup { .. } => None,
        }
    }

    pub fn delivery_address(&self) -> Option<&str> {
        match self {
            Fulfillment::Delivery {
                delivery_address, ..
            } => Some(delivery_address),
            Fulfillment::Pickup { .. } => None,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A line of a placed order.
/// Uses snapshot pattern: copied from the cart at placement time, never a
/// live reference to cart state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i64,
    pub note: String,
    /// Unit price in cents at time of order (frozen).
    pub unit_price_cents: i64,
}

impl OrderLine {
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

/// An immutable order record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub fulfillment: Fulfillment,
    pub notes: String,
    pub lines: Vec<OrderLine>,
    /// Fixed at creation from the validated cart snapshot.
    pub total_cents: i64,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_default() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" User ".parse::<Role>().unwrap(), Role::User);
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_pickup_type_wire_names() {
        assert_eq!("dine-in".parse::<PickupType>().unwrap(), PickupType::DineIn);
        assert_eq!(
            serde_json::to_string(&PickupType::DineIn).unwrap(),
            "\"dine-in\""
        );
        assert!("drive-thru".parse::<PickupType>().is_err());
    }

    #[test]
    fn test_fulfillment_serialization() {
        let delivery = Fulfillment::Delivery {
            region: "Amman".to_string(),
            delivery_address: "Street 1".to_string(),
        };
        let json = serde_json::to_value(&delivery).unwrap();
        assert_eq!(json["mode"], "delivery");
        assert_eq!(json["deliveryAddress"], "Street 1");
        assert_eq!(delivery.pickup_type(), None);
        assert_eq!(delivery.region(), Some("Amman"));
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
