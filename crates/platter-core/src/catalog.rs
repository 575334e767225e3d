//! # Catalog Snapshot
//!
//! A point-in-time view of the catalog that the engines load once per
//! operation and hand to the pure cart / checkout / view logic.
//!
//! A product "resolves" iff it is present in the snapshot. Products that
//! were deleted (or never existed) are simply absent, which is how stale
//! cart lines get detected.

use std::collections::HashMap;

use crate::types::{Category, Product, Restaurant};

/// Products, categories and restaurants keyed by id.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: HashMap<String, Product>,
    categories: HashMap<String, Category>,
    restaurants: HashMap<String, Restaurant>,
}

impl CatalogSnapshot {
    pub fn new(
        products: impl IntoIterator<Item = Product>,
        categories: impl IntoIterator<Item = Category>,
        restaurants: impl IntoIterator<Item = Restaurant>,
    ) -> Self {
        CatalogSnapshot {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
            categories: categories.into_iter().map(|c| (c.id.clone(), c)).collect(),
            restaurants: restaurants.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    #[inline]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    #[inline]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    #[inline]
    pub fn restaurant(&self, id: &str) -> Option<&Restaurant> {
        self.restaurants.get(id)
    }

    /// Whether a product id currently resolves.
    #[inline]
    pub fn resolves(&self, product_id: &str) -> bool {
        self.products.contains_key(product_id)
    }

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    pub fn insert_category(&mut self, category: Category) {
        self.categories.insert(category.id.clone(), category);
    }

    pub fn insert_restaurant(&mut self, restaurant: Restaurant) {
        self.restaurants.insert(restaurant.id.clone(), restaurant);
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn restaurant_count(&self) -> usize {
        self.restaurants.len()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Builders shared by the core unit tests.

    use chrono::Utc;

    use super::CatalogSnapshot;
    use crate::types::{Category, Product, Restaurant};

    pub fn restaurant(id: &str, name: &str) -> Restaurant {
        let now = Utc::now();
        Restaurant {
            id: id.to_string(),
            name: name.to_string(),
            address: "Main Street".to_string(),
            phone_number: "0790000000".to_string(),
            description: String::new(),
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn category(id: &str) -> Category {
        Category {
            id: id.to_string(),
            name: "Mains".to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn product(id: &str, restaurant_id: &str, price_cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            description: None,
            price_cents,
            category_id: "cat-1".to_string(),
            restaurant_id: restaurant_id.to_string(),
            image: "/uploads/placeholder.png".to_string(),
            available: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// P1 ($5.00) and P2 ($3.50) from R1, P3 ($7.00) from R2.
    pub fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec![
                product("p1", "r1", 500),
                product("p2", "r1", 350),
                product("p3", "r2", 700),
            ],
            vec![category("cat-1")],
            vec![restaurant("r1", "Falafel House"), restaurant("r2", "Pizza Corner")],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_resolution() {
        let mut catalog = catalog();
        assert!(catalog.resolves("p1"));
        assert!(!catalog.resolves("ghost"));
        assert_eq!(catalog.product("p3").unwrap().restaurant_id, "r2");

        catalog.insert_product(product("p4", "r2", 100));
        assert_eq!(catalog.product_count(), 4);
        assert_eq!(catalog.restaurant_count(), 2);
        assert_eq!(catalog.restaurant("r1").unwrap().name, "Falafel House");
        assert!(catalog.category("cat-1").is_some());
    }
}
