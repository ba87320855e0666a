mod common;

use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use chatgate::chatgate_auth::Claims;
use chatgate::middleware::{Identity, PipelineExt, Stages, authorize};
use chatgate::router::init_router;
use chatgate::state::AppState;
use common::{app, body_json, get as get_request, signed, test_state, token_for};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn whoami(identity: Identity) -> Json<Value> {
    Json(json!({ "sub": identity.user_id(), "role": identity.role() }))
}

fn routes(roles: &[&str]) -> Router<AppState> {
    let state = test_state();
    Router::new()
        .route("/protected", get(whoami))
        .stages(Stages::new().authorize(authorize(&state, roles.iter().copied())))
}

#[tokio::test]
async fn test_no_header_is_unauthorized() {
    let response = app(routes(&["admin"]))
        .oneshot(get_request("/protected", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "You are not authorized");
    assert_eq!(body["errorMessages"], json!([]));
}

#[tokio::test]
async fn test_admin_reaches_handler_with_claims() {
    let token = token_for("user-1", "admin");
    let response = app(routes(&["admin"]))
        .oneshot(get_request("/protected", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sub"], "user-1");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn test_bare_token_is_accepted() {
    let token = token_for("user-2", "admin");
    let response = app(routes(&["admin"]))
        .oneshot(get_request("/protected", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_role_outside_set_is_forbidden() {
    let token = token_for("user-3", "user");
    let response = app(routes(&["admin", "super_admin"]))
        .oneshot(get_request("/protected", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Forbidden. You're not allowed for this request.");
    assert_eq!(body["errorMessages"], json!([]));
}

#[tokio::test]
async fn test_empty_role_set_admits_any_role() {
    for role in ["user", "admin", "moderator"] {
        let token = token_for("user-4", role);
        let response = app(routes(&[]))
            .oneshot(get_request("/protected", Some(&format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "role {role}");
    }
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let past = (chrono::Utc::now().timestamp() - 60) as u64;
    let token = signed(Claims {
        iat: Some(past - 3600),
        exp: Some(past),
        ..Claims::new("user-5", "admin")
    });

    let response = app(routes(&["admin"]))
        .oneshot(get_request("/protected", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_and_empty_credentials_are_unauthorized() {
    for header in ["Bearer ", "   ", "Bearer not.a.jwt", "bearer abc"] {
        let response = app(routes(&[]))
            .oneshot(get_request("/protected", Some(header)))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "header {header:?}"
        );
    }
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_unauthorized() {
    use chatgate::chatgate_auth::create_token;
    use chatgate::chatgate_config::JwtConfig;

    let token = create_token(
        &Claims::new("user-6", "admin"),
        &JwtConfig::new("some-other-secret"),
    )
    .unwrap();

    let response = app(routes(&[]))
        .oneshot(get_request("/protected", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_numeric_id_token_is_accepted() {
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

    let token = encode(
        &Header::new(Algorithm::HS256),
        &json!({ "id": 42, "role": "admin", "exp": 9999999999_u64 }),
        &EncodingKey::from_secret(common::TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let response = app(routes(&["admin"]))
        .oneshot(get_request("/protected", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sub"], "42");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn test_me_route_returns_identity() {
    let token = signed(Claims::new("user-7", "user").with_claim("tenant", "acme"));
    let response = init_router(test_state())
        .oneshot(get_request("/api/v1/me", Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["sub"], "user-7");
    assert_eq!(body["data"]["role"], "user");
    assert_eq!(body["data"]["tenant"], "acme");
}

#[tokio::test]
async fn test_me_route_requires_credential() {
    let response = init_router(test_state())
        .oneshot(get_request("/api/v1/me", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let response = init_router(test_state())
        .oneshot(get_request("/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
