//! # Catalog Repository
//!
//! Database operations for restaurants, categories and products, plus the
//! [`CatalogSnapshot`] loads the engines resolve references against.
//!
//! ## Delete Guards
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  delete_product(id)                                                     │
//! │     └── any order_items.product_id = id ? ──► DbError::Conflict         │
//! │                                                                         │
//! │  delete_restaurant(id)                                                  │
//! │     └── any products.restaurant_id = id ? ──► DbError::Conflict         │
//! │                                                                         │
//! │  Cart lines are NOT guarded: carts reconcile vanished products away.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::fetch_by_ids;
use platter_core::{CatalogSnapshot, Category, Product, Restaurant};

const PRODUCT_COLUMNS: &str = "SELECT id, name, description, price_cents, category_id, \
     restaurant_id, image, available, created_at, updated_at FROM products";

const RESTAURANT_COLUMNS: &str = "SELECT id, name, address, phone_number, description, image, \
     created_at, updated_at FROM restaurants";

const CATEGORY_COLUMNS: &str = "SELECT id, name, description, created_at FROM categories";

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let catalog = db.catalog();
///
/// let snapshot = catalog.snapshot_for(["product-id".to_string()]).await?;
/// let product = catalog.get_product("product-id").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Loads the given products together with their categories and
    /// restaurants.
    ///
    /// Ids that do not exist are simply absent from the snapshot.
    pub async fn snapshot_for(
        &self,
        product_ids: impl IntoIterator<Item = String>,
    ) -> DbResult<CatalogSnapshot> {
        let products: Vec<Product> =
            fetch_by_ids(&self.pool, PRODUCT_COLUMNS, product_ids).await?;

        let category_ids: BTreeSet<String> =
            products.iter().map(|p| p.category_id.clone()).collect();
        let restaurant_ids: BTreeSet<String> =
            products.iter().map(|p| p.restaurant_id.clone()).collect();

        let categories: Vec<Category> =
            fetch_by_ids(&self.pool, CATEGORY_COLUMNS, category_ids).await?;
        let restaurants: Vec<Restaurant> =
            fetch_by_ids(&self.pool, RESTAURANT_COLUMNS, restaurant_ids).await?;

        debug!(
            products = products.len(),
            restaurants = restaurants.len(),
            "Loaded catalog snapshot"
        );

        Ok(CatalogSnapshot::new(products, categories, restaurants))
    }

    /// Loads the whole catalog.
    pub async fn snapshot(&self) -> DbResult<CatalogSnapshot> {
        let products = self.list_products().await?;
        let categories = self.list_categories().await?;
        let restaurants = self.list_restaurants().await?;
        Ok(CatalogSnapshot::new(products, categories, restaurants))
    }

    // =========================================================================
    // Restaurants
    // =========================================================================

    pub async fn insert_restaurant(&self, restaurant: &Restaurant) -> DbResult<()> {
        debug!(id = %restaurant.id, name = %restaurant.name, "Inserting restaurant");

        sqlx::query(
            r#"
            INSERT INTO restaurants (
                id, name, address, phone_number, description, image,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&restaurant.id)
        .bind(&restaurant.name)
        .bind(&restaurant.address)
        .bind(&restaurant.phone_number)
        .bind(&restaurant.description)
        .bind(&restaurant.image)
        .bind(restaurant.created_at)
        .bind(restaurant.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_restaurant(&self, id: &str) -> DbResult<Option<Restaurant>> {
        let sql = format!("{RESTAURANT_COLUMNS} WHERE id = ?1");
        let restaurant = sqlx::query_as::<_, Restaurant>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(restaurant)
    }

    pub async fn list_restaurants(&self) -> DbResult<Vec<Restaurant>> {
        let sql = format!("{RESTAURANT_COLUMNS} ORDER BY name");
        let restaurants = sqlx::query_as::<_, Restaurant>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(restaurants)
    }

    pub async fn count_restaurants(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM restaurants")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Deletes a restaurant that no longer owns any products.
    ///
    /// ## Returns
    /// * `Err(DbError::Conflict)` - Products still reference the restaurant
    /// * `Err(DbError::NotFound)` - No such restaurant
    pub async fn delete_restaurant(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting restaurant");

        let mut tx = self.pool.begin().await?;

        let owned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE restaurant_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if owned > 0 {
            return Err(DbError::conflict(
                "restaurant",
                id,
                format!("{owned} product(s) still belong to it"),
            ));
        }

        let result = sqlx::query("DELETE FROM restaurants WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Restaurant", id));
        }

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub async fn insert_category(&self, category: &Category) -> DbResult<()> {
        debug!(id = %category.id, name = %category.name, "Inserting category");

        sqlx::query(
            "INSERT INTO categories (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let sql = format!("{CATEGORY_COLUMNS} ORDER BY name");
        let categories = sqlx::query_as::<_, Category>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    pub async fn delete_category(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::CheckViolation)` - Negative price
    pub async fn insert_product(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, category_id, restaurant_id,
                image, available, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.category_id)
        .bind(&product.restaurant_id)
        .bind(&product.image)
        .bind(product.available)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("{PRODUCT_COLUMNS} WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn list_products(&self) -> DbResult<Vec<Product>> {
        let sql = format!("{PRODUCT_COLUMNS} ORDER BY restaurant_id, name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    /// Lists a restaurant's menu.
    pub async fn list_products_by_restaurant(&self, restaurant_id: &str) -> DbResult<Vec<Product>> {
        let sql = format!("{PRODUCT_COLUMNS} WHERE restaurant_id = ?1 ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(restaurant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    /// Changes a product's price. Carts see the new price on their next
    /// read; placed orders keep the price they were charged.
    ///
    /// Negative prices are rejected by the schema (`CheckViolation`).
    pub async fn update_price(&self, id: &str, price_cents: i64) -> DbResult<()> {
        debug!(id = %id, price_cents = price_cents, "Updating product price");

        let result = sqlx::query("UPDATE products SET price_cents = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(price_cents)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }

    /// Marks a product as orderable or sold out.
    pub async fn set_availability(&self, id: &str, available: bool) -> DbResult<()> {
        debug!(id = %id, available = available, "Updating product availability");

        let result = sqlx::query("UPDATE products SET available = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(available)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }

    /// Deletes a product that no placed order references.
    ///
    /// ## Returns
    /// * `Err(DbError::Conflict)` - The product appears in an order
    /// * `Err(DbError::NotFound)` - No such product
    pub async fn delete_product(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let mut tx = self.pool.begin().await?;

        let ordered: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE product_id = ?1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if ordered > 0 {
            return Err(DbError::conflict(
                "product",
                id,
                "it is part of an existing order",
            ));
        }

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn count_products(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Helper to generate a new catalog entity ID.
pub fn generate_catalog_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn restaurant(id: &str, name: &str) -> Restaurant {
        let now = Utc::now();
        Restaurant {
            id: id.to_string(),
            name: name.to_string(),
            address: "Rainbow Street".to_string(),
            phone_number: "065000000".to_string(),
            description: String::new(),
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    fn product(id: &str, restaurant_id: &str, price_cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Dish {id}"),
            description: Some("Tasty".to_string()),
            price_cents,
            category_id: "c1".to_string(),
            restaurant_id: restaurant_id.to_string(),
            image: "/uploads/dish.png".to_string(),
            available: true,
            created_at: now,
            updated_at: now,
        }
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();
        catalog.insert_restaurant(&restaurant("r1", "Hashem")).await.unwrap();
        catalog.insert_restaurant(&restaurant("r2", "Reem")).await.unwrap();
        catalog.insert_category(&category("c1", "Mains")).await.unwrap();
        catalog.insert_product(&product("p1", "r1", 500)).await.unwrap();
        catalog.insert_product(&product("p2", "r1", 350)).await.unwrap();
        catalog.insert_product(&product("p3", "r2", 700)).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_product_round_trip() {
        let db = seeded().await;
        let p1 = db.catalog().get_product("p1").await.unwrap().unwrap();
        assert_eq!(p1.price_cents, 500);
        assert_eq!(p1.restaurant_id, "r1");
        assert!(p1.available);
        assert!(db.catalog().get_product("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_for_loads_related_rows() {
        let db = seeded().await;
        let snapshot = db
            .catalog()
            .snapshot_for(vec!["p1".to_string(), "p1".to_string(), "ghost".to_string()])
            .await
            .unwrap();

        assert_eq!(snapshot.product_count(), 1);
        assert!(snapshot.resolves("p1"));
        assert!(!snapshot.resolves("ghost"));
        assert_eq!(snapshot.restaurant("r1").unwrap().name, "Hashem");
        assert!(snapshot.restaurant("r2").is_none());
        assert!(snapshot.category("c1").is_some());

        let empty = db.catalog().snapshot_for(Vec::new()).await.unwrap();
        assert_eq!(empty.product_count(), 0);
    }

    #[tokio::test]
    async fn test_full_snapshot_and_counts() {
        let db = seeded().await;
        let snapshot = db.catalog().snapshot().await.unwrap();
        assert_eq!(snapshot.product_count(), 3);
        assert_eq!(snapshot.restaurant_count(), 2);
        assert_eq!(db.catalog().count_restaurants().await.unwrap(), 2);
        assert_eq!(db.catalog().count_products().await.unwrap(), 3);
        assert_eq!(
            db.catalog().list_products_by_restaurant("r1").await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_update_price_and_availability() {
        let db = seeded().await;
        db.catalog().update_price("p1", 650).await.unwrap();
        db.catalog().set_availability("p1", false).await.unwrap();

        let p1 = db.catalog().get_product("p1").await.unwrap().unwrap();
        assert_eq!(p1.price_cents, 650);
        assert!(!p1.available);

        assert!(matches!(
            db.catalog().update_price("p1", -1).await,
            Err(DbError::CheckViolation { .. })
        ));
        assert!(matches!(
            db.catalog().update_price("ghost", 100).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_restaurant_guard() {
        let db = seeded().await;
        assert!(matches!(
            db.catalog().delete_restaurant("r2").await,
            Err(DbError::Conflict { .. })
        ));

        db.catalog().delete_product("p3").await.unwrap();
        db.catalog().delete_restaurant("r2").await.unwrap();
        assert!(db.catalog().get_restaurant("r2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_rows() {
        let db = seeded().await;
        assert!(matches!(
            db.catalog().delete_product("ghost").await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            db.catalog().delete_category("ghost").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
