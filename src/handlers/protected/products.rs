use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use super::{request_body, resource_id};
use crate::database::models::{Product, ProductPayload};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Identity};
use crate::state::AppState;

fn not_found(id: i32) -> ApiError {
    ApiError::not_found(format!("Produto {} não encontrado...", id))
}

/// GET /produtos - List every product
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let products = state.store.list_products().await?;
    Ok(ApiResponse::success(products))
}

/// GET /produtos/:id - Get a single product
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Product> {
    let id = resource_id(path)?;
    state
        .store
        .find_product(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| not_found(id))
}

/// POST /produtos - Create a product in an existing category
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<Product> {
    let payload = request_body(payload)?;
    let product = state.store.insert_product(payload.fields).await?;

    tracing::info!(
        user = %identity.subject,
        id = product.id,
        category = product.category_id,
        "Created product"
    );
    let location = format!("/produtos/{}", product.id);
    Ok(ApiResponse::created(product, location))
}

/// PUT /produtos/:id - Replace every mutable product field
pub async fn update(
    State(state): State<AppState>,
    identity: Identity,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<Product> {
    let id = resource_id(path)?;
    let payload = request_body(payload)?;
    if payload.id != id {
        return Err(ApiError::invalid_data());
    }

    let product = state
        .store
        .update_product(id, payload.fields)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user = %identity.subject, id, "Updated product");
    Ok(ApiResponse::success(product))
}

/// DELETE /produtos/:id
pub async fn delete(
    State(state): State<AppState>,
    identity: Identity,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let id = resource_id(path)?;
    if !state.store.delete_product(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(user = %identity.subject, id, "Deleted product");
    Ok(ApiResponse::no_content())
}
