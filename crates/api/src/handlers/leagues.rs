//! Handlers for the `/leagues` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use matchday_core::error::CoreError;
use matchday_core::types::DbId;
use matchday_db::models::league::CreateLeague;
use matchday_db::repositories::{LeagueRepo, TeamRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /leagues`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLeagueRequest {
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: String,
}

/// POST /api/v1/leagues
///
/// Create a league. Admin only.
pub async fn create_league(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateLeagueRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let league = LeagueRepo::create(
        &state.pool,
        &CreateLeague {
            name: input.name.trim().to_string(),
        },
    )
    .await?;

    tracing::info!(league_id = league.id, user_id = admin.user_id, "League created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: league })))
}

/// GET /api/v1/leagues
///
/// List all leagues. Any authenticated user.
pub async fn list_leagues(
    _user: RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let leagues = LeagueRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: leagues }))
}

/// GET /api/v1/leagues/{id}
pub async fn get_league(
    _user: RequireAuth,
    State(state): State<AppState>,
    Path(league_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let league = LeagueRepo::find_by_id(&state.pool, league_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "League",
            id: league_id,
        }))?;
    Ok(Json(DataResponse { data: league }))
}

/// GET /api/v1/leagues/{id}/teams
pub async fn list_league_teams(
    _user: RequireAuth,
    State(state): State<AppState>,
    Path(league_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // 404 before listing so a missing league is not an empty list.
    LeagueRepo::find_by_id(&state.pool, league_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "League",
            id: league_id,
        }))?;

    let teams = TeamRepo::list_for_league(&state.pool, league_id).await?;
    Ok(Json(DataResponse { data: teams }))
}
