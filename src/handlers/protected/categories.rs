use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use super::{request_body, resource_id};
use crate::database::models::{Category, CategoryPayload};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Identity};
use crate::state::AppState;

fn not_found(id: i32) -> ApiError {
    ApiError::not_found(format!("Categoria {} não encontrada...", id))
}

/// GET /categorias - List every category
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = state.store.list_categories().await?;
    Ok(ApiResponse::success(categories))
}

/// GET /categorias/:id - Get a single category
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Category> {
    let id = resource_id(path)?;
    state
        .store
        .find_category(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| not_found(id))
}

/// POST /categorias - Create a category; any `categoriaId` in the body is ignored
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> ApiResult<Category> {
    let payload = request_body(payload)?;
    let category = state.store.insert_category(payload.fields).await?;

    tracing::info!(user = %identity.subject, id = category.id, "Created category");
    let location = format!("/categorias/{}", category.id);
    Ok(ApiResponse::created(category, location))
}

/// PUT /categorias/:id - Replace name and description
///
/// The body's `categoriaId` must equal the path id; the id itself never changes.
pub async fn update(
    State(state): State<AppState>,
    identity: Identity,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> ApiResult<Category> {
    let id = resource_id(path)?;
    let payload = request_body(payload)?;
    if payload.id != id {
        return Err(ApiError::invalid_data());
    }

    let category = state
        .store
        .update_category(id, payload.fields)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user = %identity.subject, id, "Updated category");
    Ok(ApiResponse::success(category))
}

/// DELETE /categorias/:id - Delete a category and its products
pub async fn delete(
    State(state): State<AppState>,
    identity: Identity,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let id = resource_id(path)?;
    if !state.store.delete_category(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(user = %identity.subject, id, "Deleted category");
    Ok(ApiResponse::no_content())
}
