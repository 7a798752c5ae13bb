//! Catalog HTTP routes
//!
//! - `GET /items`, `POST /items`
//! - `GET /items/{id}`, `PUT /items/{id}`, `DELETE /items/{id}`
//! - `GET /health`

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use play_domain::{CreateItemDto, ItemDto, PlayError, UpdateItemDto};
use uuid::Uuid;

use crate::context::AppContext;
use crate::errors::ApiResult;

type Ctx = State<Arc<AppContext>>;

/// Build the catalog router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).put(update_item).delete(delete_item))
        .route("/health", get(health))
        .with_state(ctx)
}

async fn list_items(State(ctx): Ctx) -> ApiResult<Json<Vec<ItemDto>>> {
    ctx.faults.on_list_request().await?;
    Ok(Json(ctx.catalog.list().await?))
}

async fn get_item(State(ctx): Ctx, Path(id): Path<Uuid>) -> ApiResult<Json<ItemDto>> {
    let item = ctx
        .catalog
        .get(id)
        .await?
        .ok_or_else(|| PlayError::NotFound(format!("catalog item {id}")))?;
    Ok(Json(item))
}

async fn create_item(
    State(ctx): Ctx,
    Json(dto): Json<CreateItemDto>,
) -> ApiResult<impl IntoResponse> {
    let item = ctx.catalog.create(dto).await?;
    let location = format!("/items/{}", item.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(item)))
}

async fn update_item(
    State(ctx): Ctx,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateItemDto>,
) -> ApiResult<StatusCode> {
    ctx.catalog.update(id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_item(State(ctx): Ctx, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    ctx.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn health(State(ctx): Ctx) -> impl IntoResponse {
    let status = ctx.health_check().await;
    let code = if status.is_healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (code, Json(status))
}
