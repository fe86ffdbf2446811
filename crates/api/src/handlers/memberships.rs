//! Handlers for the `/memberships` resource: grant, revoke, list.
//!
//! The evaluator itself is a pure predicate service; whether the
//! *caller* may grant or revoke is decided here, per scope:
//! global grants need a global admin, team grants need the team
//! manager, league grants need the league manager.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use matchday_core::access::{MembershipSet, Scope};
use matchday_core::error::CoreError;
use matchday_core::roles::Role;
use matchday_core::types::DbId;
use matchday_db::models::membership::CreateMembership;
use matchday_db::repositories::MembershipRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /memberships`.
#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub user_id: DbId,
    pub role: Role,
    pub team_id: Option<DbId>,
    pub league_id: Option<DbId>,
}

/// POST /api/v1/memberships
///
/// Grant a role to a user within a scope. Duplicate grants are refused
/// with 409 so the caller learns no new state was created.
pub async fn grant(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(input): Json<GrantRequest>,
) -> AppResult<impl IntoResponse> {
    // 1. Shape checks: a scope has at most one referent, and the
    //    highest-privilege roles are global-only (and vice versa).
    if input.team_id.is_some() && input.league_id.is_some() {
        return Err(AppError::BadRequest(
            "A membership is scoped to a team or a league, not both".into(),
        ));
    }
    let scope = Scope::from_columns(input.team_id, input.league_id);
    match (scope, input.role.is_global_only()) {
        (Scope::Global, false) => {
            return Err(AppError::BadRequest(format!(
                "Role '{}' requires a team or league scope",
                input.role
            )));
        }
        (Scope::Team(_) | Scope::League(_), true) => {
            return Err(AppError::BadRequest(format!(
                "Role '{}' can only be granted globally",
                input.role
            )));
        }
        _ => {}
    }

    // 2. Authorization of the authorizer.
    let acl = caller.access_set(&state).await?;
    ensure_scope_manager(&acl, scope)?;

    // 3. Grant; the unique constraint absorbs duplicates.
    let created = MembershipRepo::grant(
        &state.pool,
        &CreateMembership {
            user_id: input.user_id,
            role: input.role,
            scope,
        },
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "User already holds this role in this scope".into(),
        ))
    })?;

    tracing::info!(
        membership_id = created.id,
        user_id = input.user_id,
        role = %input.role,
        granted_by = caller.user_id,
        "Membership granted"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// DELETE /api/v1/memberships/{id}
///
/// Revoke a grant. Returns 204. Removing a player additionally applies
/// the remove-player rule: assistants are excluded even though they
/// pass the broader assist checks.
pub async fn revoke(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(membership_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let membership = MembershipRepo::find_by_id(&state.pool, membership_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Membership",
            id: membership_id,
        }))?;

    let acl = caller.access_set(&state).await?;
    let scope = membership.scope();

    // Removing another user's team player is the carved-out check
    // (assistants excluded); everything else follows the scope-manager
    // rule.
    match (membership.parsed_role(), scope) {
        (Some(Role::Player), Scope::Team(team_id)) if membership.user_id != caller.user_id => {
            if !acl.can_remove_player(team_id) {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Only the team manager or an admin may remove players".into(),
                )));
            }
        }
        _ => ensure_scope_manager(&acl, scope)?,
    }

    MembershipRepo::revoke(&state.pool, membership.id).await?;
    tracing::info!(
        membership_id = membership.id,
        revoked_by = caller.user_id,
        "Membership revoked"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/teams/{id}/memberships
///
/// List a team's grants. Requires view access to the team.
pub async fn list_for_team(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(team_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let acl = caller.access_set(&state).await?;
    if !acl.can_view_team(team_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Team membership required".into(),
        )));
    }

    let memberships = MembershipRepo::list_for_scope(&state.pool, Scope::Team(team_id)).await?;
    Ok(Json(DataResponse { data: memberships }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The caller must manage the given scope to mutate grants in it.
fn ensure_scope_manager(acl: &MembershipSet, scope: Scope) -> Result<(), AppError> {
    let allowed = match scope {
        Scope::Global => acl.is_admin(),
        Scope::Team(team_id) => acl.can_manage_team(team_id),
        Scope::League(league_id) => acl.can_manage_league(league_id),
    };
    if allowed {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Scope manager role required".into(),
        )))
    }
}
