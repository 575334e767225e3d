//! Order routes.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::debug;

use platter_core::{CheckoutRequest, OrderView};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::{body, JsonBody};
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub message: &'static str,
    pub order: OrderView,
}

/// `POST /api/orders`
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    payload: JsonBody<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let request = body(payload)?;
    debug!(user_id = %user.id, "POST orders");

    let order = state.platter.orders().place_order(&user.id, &request).await?;
    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            message: "Order placed successfully",
            order,
        }),
    ))
}

/// `GET /api/orders`: all orders for admins, own orders otherwise.
pub async fn get_orders(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    Ok(Json(state.platter.orders().get_orders(&user).await?))
}
