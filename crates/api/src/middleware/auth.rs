//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use matchday_core::access::MembershipSet;
use matchday_core::error::CoreError;
use matchday_core::types::DbId;
use matchday_db::repositories::MembershipRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's subject id at the identity provider (from `claims.ext`).
    pub external_subject_id: String,
}

impl AuthUser {
    /// Load this user's grants for access-control evaluation.
    ///
    /// One query; every subsequent check on the returned set is
    /// computed in memory. Handlers needing several checks load the set
    /// once and reuse it for the rest of the request.
    pub async fn access_set(&self, state: &AppState) -> Result<MembershipSet, AppError> {
        Ok(MembershipRepo::access_set(&state.pool, self.user_id).await?)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        // Signature failures, expiry, and malformed payloads all
        // surface as the same generic message; the cause is not leaked.
        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            external_subject_id: claims.ext,
        })
    }
}
