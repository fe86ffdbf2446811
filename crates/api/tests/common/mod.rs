//! Shared helpers for HTTP-level integration tests.
//!
//! Mirrors the production router construction (`router::build_app_router`)
//! so tests exercise the same middleware stack, swapping only the
//! credential verifier for a static one with a known roster.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use matchday_api::auth::jwt::JwtConfig;
use matchday_api::auth::verifier::{StaticVerifier, VerifiedIdentity};
use matchday_api::config::ServerConfig;
use matchday_api::router::build_app_router;
use matchday_api::state::AppState;

/// Identities registered with the test verifier. Logging in with
/// credential `cred-<name>` resolves to subject `subject-<name>`.
pub const TEST_IDENTITIES: [&str; 5] = ["alice", "bob", "carol", "dave", "root"];

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        identity_project_id: "matchday-test".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            refresh_token_expiry_days: 30,
        },
    }
}

/// Build the full application router against the given pool, with a
/// static credential verifier standing in for the identity provider.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let mut verifier = StaticVerifier::new();
    for name in TEST_IDENTITIES {
        verifier = verifier.with_identity(
            &format!("cred-{name}"),
            VerifiedIdentity {
                subject_id: format!("subject-{name}"),
                email: Some(format!("{name}@test.com")),
                display_name: Some(name.to_string()),
            },
        );
    }

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        verifier: Arc::new(verifier),
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

// ---------------------------------------------------------------------------
// Flow helpers
// ---------------------------------------------------------------------------

/// Log a test identity in via the API and return the auth response
/// (`access_token`, `refresh_token`, `expires_in`, `user`).
pub async fn login(app: Router, name: &str) -> serde_json::Value {
    let body = serde_json::json!({ "credential": format!("cred-{name}") });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK, "login must succeed for {name}");
    body_json(response).await
}

/// Login and return just the access token.
pub async fn login_token(app: Router, name: &str) -> String {
    login(app, name).await["access_token"]
        .as_str()
        .expect("access_token must be a string")
        .to_string()
}

/// Grant a global admin role directly in the database.
pub async fn make_global_admin(pool: &PgPool, user_id: i64) {
    use matchday_core::access::Scope;
    use matchday_core::roles::Role;
    use matchday_db::models::membership::CreateMembership;
    use matchday_db::repositories::MembershipRepo;

    MembershipRepo::grant(
        pool,
        &CreateMembership {
            user_id,
            role: Role::Admin,
            scope: Scope::Global,
        },
    )
    .await
    .expect("admin grant should succeed");
}
