// handlers/public/login.rs - POST /login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::Credentials;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub const INVALID_LOGIN: &str = "Login inválido";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Seconds until `expires_at`
    pub expires_in: i64,
}

/// POST /login - Authenticate and receive a bearer token
///
/// Expected Input:
/// ```json
/// { "userName": "admin", "password": "admin" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "expiresAt": "2024-01-01T02:00:00Z",
///     "expiresIn": 7200
///   }
/// }
/// ```
///
/// The token sits under `data`, inside the same `{success, data}` envelope as every
/// other response; clients that read a top-level `token` must read `data.token`.
/// A missing or malformed body is `400 Dados inválidos`; wrong credentials are
/// `400 Login inválido`.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(credentials) = payload.map_err(|rejection| {
        tracing::debug!("Rejected login body: {}", rejection);
        ApiError::invalid_data()
    })?;

    if !state.credentials.verify(&credentials).await {
        tracing::warn!(username = %credentials.username, "Login rejected");
        return Err(ApiError::bad_request(INVALID_LOGIN));
    }

    let issued = state.tokens.issue(&credentials.username).map_err(|e| {
        tracing::error!("Token issuance failed: {}", e);
        ApiError::internal_server_error("Erro interno do servidor")
    })?;

    tracing::info!(username = %credentials.username, jti = %issued.claims.jti, "Issued token");

    Ok(ApiResponse::success(LoginResponse {
        expires_at: issued.expires_at(),
        expires_in: state.tokens.ttl_secs(),
        token: issued.token,
    }))
}
