//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::Json;
use matchday_core::error::CoreError;
use matchday_db::models::membership::AccessMembership;
use matchday_db::models::user::User;
use matchday_db::repositories::{MembershipRepo, UserRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload for `GET /users/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    /// Every grant the user holds, oldest first. An empty list means
    /// the user is an implicit fan everywhere.
    pub memberships: Vec<AccessMembership>,
}

/// GET /api/v1/users/me
///
/// The authenticated user's profile and role grants.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;

    let memberships = MembershipRepo::list_for_user(&state.pool, user.id).await?;

    Ok(Json(DataResponse {
        data: MeResponse { user, memberships },
    }))
}
