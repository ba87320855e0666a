#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use chatgate::chatgate_auth::{Claims, create_token};
use chatgate::chatgate_config::JwtConfig;
use chatgate::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET)
}

pub fn test_state() -> AppState {
    AppState::new(test_jwt_config())
}

pub fn token_for(sub: &str, role: &str) -> String {
    create_token(&Claims::new(sub, role), &test_jwt_config()).unwrap()
}

pub fn signed(claims: Claims) -> String {
    create_token(&claims, &test_jwt_config()).unwrap()
}

pub fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Composes `routes` with the router-wide layers, as the binary does.
pub fn app(routes: Router<AppState>) -> Router {
    chatgate::router::compose(routes, test_state())
}
