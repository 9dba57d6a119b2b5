use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub const BANNER: &str = "Catálogo de Produtos - 2024";

/// GET / - Service banner and route overview
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": BANNER,
            "version": version,
            "environment": state.config.environment,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "/login (public - token acquisition)",
                "categorias": "/categorias[/:id] (protected)",
                "produtos": "/produtos[/:id] (protected)",
            }
        }
    }))
}
