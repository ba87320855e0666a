use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::middleware::{Identity, PipelineExt, authorize};
use crate::state::AppState;

pub fn init_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1", init_api_router(state))
}

fn init_api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .authorize(authorize(state, Vec::<String>::new()))
}

async fn root() -> &'static str {
    "Welcome to Multi tenant chat Server"
}

async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Returns the caller's verified claims.
async fn me(identity: Identity) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Identity retrieved successfully",
        "data": identity.claims(),
    }))
}
