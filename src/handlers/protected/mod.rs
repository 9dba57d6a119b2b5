// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here is mounted behind `middleware::require_identity`, so a handler
// only runs once the caller's token has been validated.

pub mod categories; // /categorias[/:id]
pub mod products;   // /produtos[/:id]

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Path,
};
use axum::Json;

use crate::error::ApiError;

/// Resolve the numeric `:id` segment. Non-numeric ids never match a resource.
pub(crate) fn resource_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!("Rejected path id: {}", rejection);
        ApiError::not_found("Recurso não encontrado")
    })
}

/// Unwrap a JSON body; anything unreadable is `400 Dados inválidos`.
pub(crate) fn request_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection);
        ApiError::invalid_data()
    })
}
