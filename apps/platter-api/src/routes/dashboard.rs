//! Admin dashboard route.

use std::sync::Arc;

use axum::{extract::State, Json};

use platter_core::DashboardStats;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;

/// `GET /api/dashboard/stats` (admin only)
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.platter.stats().dashboard(&user).await?))
}
