use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, extracted from a validated bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub token_id: Uuid,
    pub expires_at: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            token_id: claims.jti,
            expires_at: claims.exp,
        }
    }
}

/// Token validator. Runs on every request; when the bearer token verifies, the
/// caller's [`Identity`] is stored in the request extensions. Requests without a
/// usable token pass through unchanged and are stopped by [`require_identity`] on
/// routes that need it.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match extract_bearer_token(request.headers()) {
        Ok(Some(token)) => match state.tokens.validate(token) {
            Ok(claims) => Some(Identity::from(claims)),
            Err(e) => {
                tracing::debug!("Bearer token rejected: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(reason) => {
            tracing::debug!("Malformed Authorization header: {}", reason);
            None
        }
    };

    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}

/// Authorization gate for protected routes. Rejects with 401 before the handler
/// (and its body extractor) runs.
pub async fn require_identity(request: Request, next: Next) -> Result<Response, ApiError> {
    if request.extensions().get::<Identity>().is_none() {
        tracing::debug!("Rejected unauthenticated {} {}", request.method(), request.uri().path());
        return Err(ApiError::unauthorized());
    }
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Extract the bearer token from the Authorization header.
///
/// Returns `Ok(None)` when the header is absent and `Err` when it is present but
/// not a non-empty `Bearer` credential.
fn extract_bearer_token(headers: &HeaderMap) -> Result<Option<&str>, &'static str> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let (scheme, token) = auth_str
        .split_once(' ')
        .ok_or("Authorization header must use Bearer token format")?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err("Authorization header must use Bearer token format");
    }

    let token = token.trim();
    if token.is_empty() {
        return Err("Empty JWT token");
    }
    Ok(Some(token))
}
