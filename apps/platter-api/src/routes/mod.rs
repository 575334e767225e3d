//! # HTTP Routes
//!
//! ```text
//! POST   /api/cart/add-to-cart                  add_item
//! GET    /api/cart | /api/cart/get-cart         get_cart
//! PUT    /api/cart/{product_id}                 set_quantity
//! PUT    /api/cart/{product_id}/note            set_note
//! DELETE /api/cart/remove-from-cart/{product_id} remove_item
//! DELETE /api/cart                              clear
//! POST   /api/orders                            place_order
//! GET    /api/orders                            get_orders
//! GET    /api/dashboard/stats                   dashboard (admin)
//! GET    /health                                store health
//! ```
//!
//! Every `/api` route requires a bearer token.

pub mod cart;
pub mod dashboard;
pub mod order;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::error::ApiError;
use crate::AppState;

/// A JSON body whose parse failure is reported in the API error envelope.
pub type JsonBody<T> = Result<Json<T>, JsonRejection>;

pub(crate) fn body<T>(payload: JsonBody<T>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/cart", get(cart::get_cart).delete(cart::clear_cart))
        .route("/api/cart/get-cart", get(cart::get_cart))
        .route("/api/cart/add-to-cart", post(cart::add_to_cart))
        .route(
            "/api/cart/remove-from-cart/{product_id}",
            delete(cart::remove_from_cart),
        )
        .route("/api/cart/{product_id}", put(cart::update_quantity))
        .route("/api/cart/{product_id}/note", put(cart::update_note))
        .route("/api/orders", post(order::place_order).get(order::get_orders))
        .route("/api/dashboard/stats", get(dashboard::get_stats))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Health check endpoint.
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.platter.db().health_check().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::{tests::SECRET, AuthUser, TokenVerifier};
    use chrono::Utc;
    use platter_core::{Category, Product, Requester, Restaurant, Role};
    use platter_db::{Database, DbConfig};
    use platter_engine::Platter;

    /// One restaurant with one $5.00 product `p-1`.
    pub async fn state() -> Arc<AppState> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let catalog = db.catalog();
        catalog
            .insert_restaurant(&Restaurant {
                id: "r-1".to_string(),
                name: "Hashem".to_string(),
                address: "Downtown, Amman".to_string(),
                phone_number: "0790000000".to_string(),
                description: "Falafel".to_string(),
                image: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        catalog
            .insert_category(&Category {
                id: "c-1".to_string(),
                name: "Sandwiches".to_string(),
                description: None,
                created_at: now,
            })
            .await
            .unwrap();
        catalog
            .insert_product(&Product {
                id: "p-1".to_string(),
                name: "Falafel Sandwich".to_string(),
                description: None,
                price_cents: 500,
                category_id: "c-1".to_string(),
                restaurant_id: "r-1".to_string(),
                image: "/uploads/falafel.jpg".to_string(),
                available: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        Arc::new(AppState::new(Platter::new(db), TokenVerifier::new(SECRET)))
    }

    pub fn alice() -> AuthUser {
        AuthUser(Requester::new("alice", Role::User))
    }

    #[tokio::test]
    async fn test_router_builds() {
        let _ = router(state().await);
    }

    #[tokio::test]
    async fn test_health() {
        let response = health_handler(State(state().await)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
