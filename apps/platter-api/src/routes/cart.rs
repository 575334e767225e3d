//! Cart routes. Every route acts on the caller's own cart.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use platter_core::CartView;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::{body, JsonBody};
use crate::AppState;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartBody {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuantityBody {
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoteBody {
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    pub message: &'static str,
    pub cart: CartView,
}

impl CartResponse {
    fn new(message: &'static str, cart: CartView) -> Json<Self> {
        Json(CartResponse { message, cart })
    }
}

/// `POST /api/cart/add-to-cart`
pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    payload: JsonBody<AddToCartBody>,
) -> Result<Json<CartResponse>, ApiError> {
    let payload = body(payload)?;
    debug!(user_id = %user.id, product_id = %payload.product_id, "POST add-to-cart");

    let cart = state
        .platter
        .carts()
        .add_item(&user.id, &payload.product_id, payload.quantity)
        .await?;
    Ok(CartResponse::new("Item added to cart", cart))
}

/// `GET /api/cart`, `GET /api/cart/get-cart`
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<CartView>, ApiError> {
    Ok(Json(state.platter.carts().get_cart(&user.id).await?))
}

/// `PUT /api/cart/{product_id}`
pub async fn update_quantity(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(product_id): Path<String>,
    payload: JsonBody<QuantityBody>,
) -> Result<Json<CartResponse>, ApiError> {
    let payload = body(payload)?;
    let cart = state
        .platter
        .carts()
        .set_quantity(&user.id, &product_id, payload.quantity)
        .await?;

    let message = if payload.quantity < 1 {
        "Item removed from cart"
    } else {
        "Quantity updated"
    };
    Ok(CartResponse::new(message, cart))
}

/// `PUT /api/cart/{product_id}/note`
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(product_id): Path<String>,
    payload: JsonBody<NoteBody>,
) -> Result<Json<CartResponse>, ApiError> {
    let payload = body(payload)?;
    let cart = state
        .platter
        .carts()
        .set_note(&user.id, &product_id, &payload.note)
        .await?;
    Ok(CartResponse::new("Note updated", cart))
}

/// `DELETE /api/cart/remove-from-cart/{product_id}`
pub async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(product_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .platter
        .carts()
        .remove_item(&user.id, &product_id)
        .await?;
    Ok(CartResponse::new("Item removed from cart", cart))
}

/// `DELETE /api/cart`
pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state.platter.carts().clear(&user.id).await?;
    Ok(CartResponse::new("Cart cleared", cart))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::tests::{alice, state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_add_then_update_then_remove() {
        let state = state().await;

        let Json(added) = add_to_cart(
            State(state.clone()),
            alice(),
            Ok(Json(AddToCartBody {
                product_id: "p-1".to_string(),
                quantity: 2,
            })),
        )
        .await
        .unwrap();
        assert_eq!(added.cart.total_cents, 1000);

        let Json(updated) = update_quantity(
            State(state.clone()),
            alice(),
            Path("p-1".to_string()),
            Ok(Json(QuantityBody { quantity: 0 })),
        )
        .await
        .unwrap();
        assert_eq!(updated.message, "Item removed from cart");
        assert!(updated.cart.items.is_empty());

        let Json(removed) = remove_from_cart(State(state), alice(), Path("p-1".to_string()))
            .await
            .unwrap();
        assert!(removed.cart.items.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_is_404() {
        let state = state().await;

        let err = add_to_cart(
            State(state),
            alice(),
            Ok(Json(AddToCartBody {
                product_id: "p-missing".to_string(),
                quantity: 1,
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_note_on_missing_line_is_404() {
        let state = state().await;

        let err = update_note(
            State(state),
            alice(),
            Path("p-1".to_string()),
            Ok(Json(NoteBody {
                note: "no onions".to_string(),
            })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
