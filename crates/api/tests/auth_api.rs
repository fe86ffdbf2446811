//! HTTP-level integration tests for the auth endpoints: login with an
//! external credential, refresh-token rotation, and logout.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, login, post_json, post_json_auth};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns both tokens plus the local user profile.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = login(app, "alice").await;

    assert!(json["access_token"].is_string(), "response must contain access_token");
    assert!(json["refresh_token"].is_string(), "response must contain refresh_token");
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["email"], "alice@test.com");
    assert_eq!(json["user"]["display_name"], "alice");
}

/// An unknown credential is one generic 401; the verifier's reason is
/// not leaked.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_invalid_credential(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "credential": "not-a-real-credential" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

/// Logging in twice with the same credential reuses the user row.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_is_upsert(pool: PgPool) {
    let app = common::build_test_app(pool);

    let first = login(app.clone(), "bob").await;
    let second = login(app, "bob").await;
    assert_eq!(first["user"]["id"], second["user"]["id"]);
}

// ---------------------------------------------------------------------------
// Refresh (rotation-on-use)
// ---------------------------------------------------------------------------

/// A valid refresh token yields a new pair; the presented token is
/// superseded and rejected on reuse.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = login(app.clone(), "alice").await;
    let original_refresh = auth["refresh_token"].as_str().unwrap();

    // First refresh succeeds and returns a different refresh token.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": original_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert!(rotated["access_token"].is_string());
    assert_ne!(rotated["refresh_token"], auth["refresh_token"]);

    // Reusing the superseded token fails with the collapsed error.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": original_refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_REFRESH_TOKEN");

    // The replacement works.
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": rotated["refresh_token"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// An unknown refresh token and a malformed one produce the identical
/// generic error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_unknown_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    for bogus in ["", "garbage", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"] {
        let response = post_json(
            app.clone(),
            "/api/v1/auth/refresh",
            serde_json::json!({ "refresh_token": bogus }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["code"], "INVALID_REFRESH_TOKEN");
    }
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

/// Logout revokes the presented refresh token immediately, well before
/// its natural expiry.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_refresh_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let auth = login(app.clone(), "carol").await;
    let access = auth["access_token"].as_str().unwrap();
    let refresh = auth["refresh_token"].as_str().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/logout",
        access,
        serde_json::json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout-all invalidates every session for the user.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_all_revokes_every_session(pool: PgPool) {
    let app = common::build_test_app(pool);
    let session_a = login(app.clone(), "dave").await;
    let session_b = login(app.clone(), "dave").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/logout-all",
        session_a["access_token"].as_str().unwrap(),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for session in [&session_a, &session_b] {
        let response = post_json(
            app.clone(),
            "/api/v1/auth/refresh",
            serde_json::json!({ "refresh_token": session["refresh_token"] }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

// ---------------------------------------------------------------------------
// Access-token enforcement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_protected_route_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/users/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = common::get(app, "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// `/users/me` reflects the authenticated identity and its grants.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_users_me(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = common::login_token(app.clone(), "alice").await;

    let response = get_auth(app, "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["email"], "alice@test.com");
    assert_eq!(
        json["data"]["memberships"].as_array().map(Vec::len),
        Some(0),
        "a fresh user has no grants (implicit fan)"
    );
}
