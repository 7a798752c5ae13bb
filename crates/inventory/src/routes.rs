//! Inventory HTTP routes
//!
//! - `GET /items?userId=` lists a user's inventory
//! - `POST /items` grants items to a user
//! - `GET /health`

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use play_domain::{GrantItemsDto, InventoryItemDto, PlayError};
use serde::Deserialize;
use uuid::Uuid;

use crate::context::AppContext;
use crate::errors::ApiResult;

type Ctx = State<Arc<AppContext>>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemsQuery {
    user_id: Option<Uuid>,
}

/// Build the inventory router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/items", get(list_items).post(grant_items))
        .route("/health", get(health))
        .with_state(ctx)
}

async fn list_items(
    State(ctx): Ctx,
    Query(query): Query<ItemsQuery>,
) -> ApiResult<Json<Vec<InventoryItemDto>>> {
    let user_id = query
        .user_id
        .ok_or_else(|| PlayError::Validation("userId query parameter is required".into()))?;
    Ok(Json(ctx.inventory.items_for_user(user_id).await?))
}

async fn grant_items(State(ctx): Ctx, Json(grant): Json<GrantItemsDto>) -> ApiResult<StatusCode> {
    ctx.inventory.grant(grant).await?;
    Ok(StatusCode::OK)
}

async fn health(State(ctx): Ctx) -> impl IntoResponse {
    let status = ctx.health_check().await;
    let code = if status.is_healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (code, Json(status))
}
