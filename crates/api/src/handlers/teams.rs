//! Handlers for the `/teams` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use matchday_core::access::Scope;
use matchday_core::error::CoreError;
use matchday_core::roles::Role;
use matchday_core::types::DbId;
use matchday_db::models::membership::CreateMembership;
use matchday_db::models::team::CreateTeam;
use matchday_db::repositories::{MembershipRepo, TeamRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /teams`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: String,
    /// Optional league to create the team in; requires league-manager
    /// privileges there.
    pub league_id: Option<DbId>,
}

/// POST /api/v1/teams
///
/// Create a team. Any authenticated user may create an unaffiliated
/// team and becomes its manager; creating directly inside a league
/// requires managing that league.
pub async fn create_team(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateTeamRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    if let Some(league_id) = input.league_id {
        let acl = user.access_set(&state).await?;
        if !acl.can_manage_league(league_id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "League manager role required to create a team in this league".into(),
            )));
        }
    }

    let team = TeamRepo::create(
        &state.pool,
        &CreateTeam {
            league_id: input.league_id,
            name: input.name.trim().to_string(),
        },
    )
    .await?;

    // The creator manages the team they just created. A concurrent
    // duplicate is impossible for a fresh team id, so the no-op result
    // is ignored.
    MembershipRepo::grant(
        &state.pool,
        &CreateMembership {
            user_id: user.user_id,
            role: Role::Manager,
            scope: Scope::Team(team.id),
        },
    )
    .await?;

    tracing::info!(team_id = team.id, user_id = user.user_id, "Team created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: team })))
}

/// GET /api/v1/teams/{id}
///
/// Team detail. Requires view access (player or above, or admin).
pub async fn get_team(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let team = TeamRepo::find_by_id(&state.pool, team_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Team",
            id: team_id,
        }))?;

    let acl = user.access_set(&state).await?;
    if !acl.can_view_team(team_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Team membership required".into(),
        )));
    }

    Ok(Json(DataResponse { data: team }))
}
