use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{authenticate, require_identity};
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let routes = Router::new()
        // Public
        .merge(public_routes())
        // Protected
        .merge(protected_routes());

    with_global_layers(routes, state)
}

/// Wrap `routes` in the fallback and the global middleware stack.
///
/// Layer order, outermost first: panic boundary, tracing, CORS, body limit, token
/// validator. Protected routes additionally pass through the authorization gate.
fn with_global_layers(routes: Router<AppState>, state: AppState) -> Router {
    let max_body = state.config.server.max_request_size_bytes;
    let cors = cors_layer(&state.config.security);

    routes
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/login", post(public::login))
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .merge(category_routes())
        .merge(product_routes())
        .route_layer(middleware::from_fn(require_identity))
}

fn category_routes() -> Router<AppState> {
    use protected::categories;

    Router::new()
        .route("/categorias", get(categories::list).post(categories::create))
        .route(
            "/categorias/:id",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
}

fn product_routes() -> Router<AppState> {
    use protected::products;

    Router::new()
        .route("/produtos", get(products::list).post(products::create))
        .route(
            "/produtos/:id",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
}

async fn fallback() -> ApiError {
    ApiError::not_found("Recurso não encontrado")
}

/// CORS policy from configuration. Disabled means no cross-origin access; an
/// empty origin list allows any origin.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Last-resort boundary: a panicking handler becomes the generic 500 envelope.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    ApiError::internal_server_error("Erro interno do servidor").into_response()
}
