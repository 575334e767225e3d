//! Shared fixtures for the engine integration tests.
//!
//! ```text
//! Falafel House (r-a)          Pizza Corner (r-b)
//!   p-x  $5.00                   p-z  $7.00
//!   p-y  $3.50
//!   p-off $2.00 (unavailable)
//!
//! users: alice (user), bob (user), admin (admin)
//! ```

#![allow(dead_code)]

use chrono::Utc;

use platter_core::{Category, CheckoutRequest, Product, Requester, Restaurant, Role, UserProfile};
use platter_db::{Database, DbConfig};
use platter_engine::Platter;

pub async fn setup() -> Platter {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    seed(&db).await;
    Platter::new(db)
}

async fn seed(db: &Database) {
    let catalog = db.catalog();
    catalog
        .insert_restaurant(&restaurant("r-a", "Falafel House"))
        .await
        .unwrap();
    catalog
        .insert_restaurant(&restaurant("r-b", "Pizza Corner"))
        .await
        .unwrap();
    catalog.insert_category(&category("c-1")).await.unwrap();

    for (id, restaurant_id, price_cents, available) in [
        ("p-x", "r-a", 500, true),
        ("p-y", "r-a", 350, true),
        ("p-off", "r-a", 200, false),
        ("p-z", "r-b", 700, true),
    ] {
        let mut p = product(id, restaurant_id, price_cents);
        p.available = available;
        catalog.insert_product(&p).await.unwrap();
    }

    for (id, role) in [("alice", Role::User), ("bob", Role::User), ("admin", Role::Admin)] {
        db.users().insert(&user(id, role)).await.unwrap();
    }
}

pub fn restaurant(id: &str, name: &str) -> Restaurant {
    let now = Utc::now();
    Restaurant {
        id: id.to_string(),
        name: name.to_string(),
        address: "Rainbow St, Amman".to_string(),
        phone_number: "0791111111".to_string(),
        description: format!("{name} kitchen"),
        image: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn category(id: &str) -> Category {
    Category {
        id: id.to_string(),
        name: format!("Category {id}"),
        description: None,
        created_at: Utc::now(),
    }
}

pub fn product(id: &str, restaurant_id: &str, price_cents: i64) -> Product {
    let now = Utc::now();
    Product {
        id: id.to_string(),
        name: format!("Dish {id}"),
        description: None,
        price_cents,
        category_id: "c-1".to_string(),
        restaurant_id: restaurant_id.to_string(),
        image: format!("/uploads/{id}.jpg"),
        available: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn user(id: &str, role: Role) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        username: id.to_string(),
        email: format!("{id}@example.com"),
        full_name: None,
        phone_number: None,
        address: None,
        role,
        is_online: false,
        total_online_secs: 0,
        last_login: None,
        created_at: Utc::now(),
    }
}

pub fn customer(id: &str) -> Requester {
    Requester::new(id, Role::User)
}

pub fn admin() -> Requester {
    Requester::new("admin", Role::Admin)
}

pub fn pickup() -> CheckoutRequest {
    CheckoutRequest {
        customer_name: "Lina".to_string(),
        customer_phone: "0791234567".to_string(),
        fulfillment: "pickup".to_string(),
        pickup_type: Some("dine-in".to_string()),
        ..Default::default()
    }
}

pub fn delivery(region: &str, address: &str) -> CheckoutRequest {
    CheckoutRequest {
        customer_name: "Lina".to_string(),
        customer_phone: "0791234567".to_string(),
        fulfillment: "delivery".to_string(),
        region: Some(region.to_string()),
        delivery_address: Some(address.to_string()),
        ..Default::default()
    }
}
