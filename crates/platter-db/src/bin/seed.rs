//! # Seed Data Generator
//!
//! Populates the database with a small development catalog and two users.
//!
//! ## Usage
//! ```bash
//! # Seed ./platter_dev.db
//! cargo run -p platter-db --bin seed
//!
//! # Specify database path
//! cargo run -p platter-db --bin seed -- --db ./data/platter.db
//! ```
//!
//! ## Generated Data
//! - One restaurant per entry in `MENUS`, each with its dishes
//! - Categories shared across restaurants
//! - An `admin` account and a regular `customer` account

use chrono::Utc;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use platter_core::{Category, Product, Restaurant, Role, UserProfile};
use platter_db::repository::catalog::generate_catalog_id;
use platter_db::{Database, DbConfig};

/// (restaurant, address, [(dish, category, price_cents)])
const MENUS: &[(&str, &str, &[(&str, &str, i64)])] = &[
    (
        "Hashem",
        "Downtown, Amman",
        &[
            ("Falafel Sandwich", "Sandwiches", 75),
            ("Hummus Plate", "Appetizers", 150),
            ("Foul Medames", "Appetizers", 150),
            ("Fresh Mint Tea", "Drinks", 50),
        ],
    ),
    (
        "Reem Shawarma",
        "7th Circle, Amman",
        &[
            ("Chicken Shawarma", "Sandwiches", 250),
            ("Beef Shawarma", "Sandwiches", 300),
            ("Garlic Fries", "Appetizers", 175),
            ("Ayran", "Drinks", 80),
        ],
    ),
    (
        "Habibah Sweets",
        "King Faisal St, Amman",
        &[
            ("Knafeh Nabulsieh", "Desserts", 350),
            ("Baklava Box", "Desserts", 900),
            ("Arabic Coffee", "Drinks", 100),
        ],
    ),
];

const CATEGORIES: &[&str] = &["Appetizers", "Sandwiches", "Desserts", "Drinks"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,platter=debug,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./platter_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Platter Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./platter_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(db = %db_path, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let catalog = db.catalog();

    let existing = catalog.count_products().await?;
    if existing > 0 {
        warn!(
            products = existing,
            "Database already has products; skipping seed (delete the file to regenerate)"
        );
        return Ok(());
    }

    let now = Utc::now();

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        let category = Category {
            id: generate_catalog_id(),
            name: name.to_string(),
            description: None,
            created_at: now,
        };
        catalog.insert_category(&category).await?;
        category_ids.push((*name, category.id));
    }

    let mut products = 0;
    for (name, address, dishes) in MENUS {
        let restaurant = Restaurant {
            id: generate_catalog_id(),
            name: name.to_string(),
            address: address.to_string(),
            phone_number: "0790000000".to_string(),
            description: format!("{name} in {address}"),
            image: None,
            created_at: now,
            updated_at: now,
        };
        catalog.insert_restaurant(&restaurant).await?;

        for (dish, category, price_cents) in dishes.iter() {
            let category_id = category_ids
                .iter()
                .find(|(n, _)| n == category)
                .map(|(_, id)| id.clone())
                .ok_or_else(|| format!("unknown category {category}"))?;

            let product = Product {
                id: generate_catalog_id(),
                name: dish.to_string(),
                description: None,
                price_cents: *price_cents,
                category_id,
                restaurant_id: restaurant.id.clone(),
                image: format!("/uploads/{}.jpg", dish.to_lowercase().replace(' ', "-")),
                available: true,
                created_at: now,
                updated_at: now,
            };
            catalog.insert_product(&product).await?;
            products += 1;
        }
    }

    for (username, role) in [("admin", Role::Admin), ("customer", Role::User)] {
        db.users()
            .insert(&UserProfile {
                id: generate_catalog_id(),
                username: username.to_string(),
                email: format!("{username}@platter.local"),
                full_name: None,
                phone_number: None,
                address: None,
                role,
                is_online: false,
                total_online_secs: 0,
                last_login: None,
                created_at: now,
            })
            .await?;
    }

    info!(
        restaurants = MENUS.len(),
        categories = CATEGORIES.len(),
        products = products,
        "Seed complete"
    );

    Ok(())
}
