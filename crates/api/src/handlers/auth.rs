//! Handlers for the `/auth` resource (login, refresh, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use matchday_core::error::CoreError;
use matchday_core::types::DbId;
use matchday_db::models::refresh_token::CreateRefreshToken;
use matchday_db::models::user::{UpsertUser, User};
use matchday_db::repositories::{RefreshTokenRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, ACCESS_TOKEN_TTL_MINS,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// The identity provider's ID token.
    pub credential: String,
}

/// Request body for `POST /auth/refresh` and `POST /auth/logout`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub email: Option<String>,
    pub display_name: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Verify an externally-issued credential and return access + refresh
/// tokens for the local account (created on first login).
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Verify the credential with the identity provider. Every
    //    failure collapses into one generic unauthorized response.
    let identity = state.verifier.verify(&input.credential).await.map_err(|e| {
        tracing::debug!(error = %e, "Credential verification failed");
        AppError::Core(CoreError::Unauthorized("Invalid credential".into()))
    })?;

    // 2. Create-if-absent / update-on-change of the local user row.
    let user = UserRepo::upsert_by_external_subject(
        &state.pool,
        &UpsertUser {
            external_subject_id: identity.subject_id,
            email: identity.email,
            display_name: identity.display_name.unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User logged in");

    // 3. Mint the token pair and persist the refresh hash.
    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a new access + refresh pair. The
/// presented token is rotated: revoked and replaced in one transaction.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Hash the provided refresh token and find a usable record.
    //    Unknown, revoked, and expired all look identical to the caller.
    let token_hash = hash_refresh_token(&input.refresh_token);
    let record = RefreshTokenRepo::find_usable_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::InvalidRefreshToken)?;

    // 2. The user must still exist.
    let user = UserRepo::find_by_id(&state.pool, record.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id = record.user_id, "Refresh token for missing user");
            AppError::InvalidRefreshToken
        })?;

    // 3. Rotate: revoke the presented record and persist the
    //    replacement together. Losing the rotation race to a concurrent
    //    refresh or logout invalidates this attempt.
    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let expires_at = Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);
    let replacement = CreateRefreshToken {
        user_id: user.id,
        token_hash: refresh_hash,
        expires_at,
    };
    RefreshTokenRepo::rotate(&state.pool, record.id, &replacement)
        .await?
        .ok_or(AppError::InvalidRefreshToken)?;

    // 4. Mint the new access token.
    let access_token = generate_access_token(user.id, &user.external_subject_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: ACCESS_TOKEN_TTL_MINS * 60,
        user: UserInfo {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented refresh token (single-device logout). Returns
/// 204 whether or not the token was still usable.
pub async fn logout(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<RefreshRequest>,
) -> AppResult<StatusCode> {
    let token_hash = hash_refresh_token(&input.refresh_token);
    RefreshTokenRepo::revoke_by_hash(&state.pool, &token_hash).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/logout-all
///
/// Revoke every refresh token for the authenticated user. Returns 204.
pub async fn logout_all(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    let revoked = RefreshTokenRepo::revoke_all_for_user(&state.pool, user.user_id).await?;
    tracing::info!(user_id = user.user_id, revoked, "Logged out everywhere");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist the refresh hash, and
/// build the response.
async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.external_subject_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let expires_at = Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    RefreshTokenRepo::create(
        &state.pool,
        &CreateRefreshToken {
            user_id: user.id,
            token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: ACCESS_TOKEN_TTL_MINS * 60,
        user: UserInfo {
            id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
        },
    })
}
