//! Handlers for league invitations: create, list, revoke, accept.
//!
//! A league invitation is redeemed *for a team* by someone who manages
//! that team; success links the team into the league.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use matchday_core::codes::generate_invite_code;
use matchday_core::error::{CoreError, InviteError};
use matchday_core::types::{DbId, Timestamp};
use matchday_db::models::invitation::{CreateLeagueInvitation, LeagueInvitation};
use matchday_db::repositories::{LeagueInvitationRepo, LeagueRepo, LinkOutcome, TeamRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::handlers::invitations::{CreateInvitationRequest, ListInvitationsQuery};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /league-invitations/accept`.
#[derive(Debug, Deserialize)]
pub struct AcceptLeagueInvitationRequest {
    pub code: String,
    /// The team joining the league; the caller must manage it.
    pub team_id: DbId,
}

/// POST /api/v1/leagues/{id}/invitations
///
/// Create an invitation for the league. Requires league management.
pub async fn create_league_invitation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(league_id): Path<DbId>,
    Json(input): Json<CreateInvitationRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    LeagueRepo::find_by_id(&state.pool, league_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "League",
            id: league_id,
        }))?;

    let acl = user.access_set(&state).await?;
    if !acl.can_manage_league(league_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "League manager role required".into(),
        )));
    }

    if let Some(deadline) = input.expires_at {
        if deadline <= Utc::now() {
            return Err(AppError::BadRequest("expires_at must be in the future".into()));
        }
    }

    let mut create = CreateLeagueInvitation {
        code: generate_invite_code(),
        league_id,
        created_by: Some(user.user_id),
        max_uses: input.max_uses.unwrap_or(1),
        expires_at: input.expires_at,
    };

    let invitation = match LeagueInvitationRepo::create(&state.pool, &create).await {
        Ok(invitation) => invitation,
        Err(err) if is_unique_violation(&err, "uq_league_invitations_code") => {
            tracing::warn!(code = %create.code, "League invitation code collision, retrying once");
            create.code = generate_invite_code();
            LeagueInvitationRepo::create(&state.pool, &create).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        invitation_id = invitation.id,
        league_id,
        created_by = user.user_id,
        "League invitation created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: invitation })))
}

/// GET /api/v1/leagues/{id}/invitations
pub async fn list_league_invitations(
    State(state): State<AppState>,
    user: AuthUser,
    Path(league_id): Path<DbId>,
    Query(query): Query<ListInvitationsQuery>,
) -> AppResult<impl IntoResponse> {
    let acl = user.access_set(&state).await?;
    if !acl.can_manage_league(league_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "League manager role required".into(),
        )));
    }

    let invitations =
        LeagueInvitationRepo::list_for_league(&state.pool, league_id, query.active).await?;
    Ok(Json(DataResponse { data: invitations }))
}

/// POST /api/v1/league-invitations/{id}/revoke
pub async fn revoke_league_invitation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(invitation_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let invitation = LeagueInvitationRepo::find_by_id(&state.pool, invitation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "LeagueInvitation",
            id: invitation_id,
        }))?;

    let acl = user.access_set(&state).await?;
    if !acl.can_manage_league(invitation.league_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "League manager role required".into(),
        )));
    }

    LeagueInvitationRepo::revoke(&state.pool, invitation.id).await?;
    let invitation = LeagueInvitationRepo::find_by_id(&state.pool, invitation.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "LeagueInvitation",
            id: invitation_id,
        }))?;

    tracing::info!(invitation_id, revoked_by = user.user_id, "League invitation revoked");
    Ok(Json(DataResponse { data: invitation }))
}

/// POST /api/v1/league-invitations/accept
///
/// Redeem a league code for a team the caller manages, linking the team
/// into the league. The use counter and the link commit together.
pub async fn accept_league_invitation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<AcceptLeagueInvitationRequest>,
) -> AppResult<impl IntoResponse> {
    // 1. Exact code lookup.
    let invitation = LeagueInvitationRepo::find_by_code(&state.pool, &input.code)
        .await?
        .ok_or(AppError::Invite(InviteError::CodeNotFound))?;

    // 2. The team must exist and be managed by the caller.
    let team = TeamRepo::find_by_id(&state.pool, input.team_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Team",
            id: input.team_id,
        }))?;

    let acl = user.access_set(&state).await?;
    if !acl.can_manage_team(team.id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Team manager role required".into(),
        )));
    }

    // 3. Classify invalidity up front for a precise error kind.
    let now = Utc::now();
    if !invitation.is_valid(now) {
        return Err(AppError::Invite(classify_invalid(&invitation, now)));
    }

    // 4. A team already in the league is rejected, not ignored.
    if team.league_id == Some(invitation.league_id) {
        return Err(AppError::Invite(InviteError::AlreadyMember));
    }

    // 5. Atomically consume a use and link the team.
    let outcome = LeagueInvitationRepo::redeem_and_link(&state.pool, invitation.id, team.id).await?;
    match outcome {
        LinkOutcome::Linked { invitation, team } => {
            tracing::info!(
                invitation_id = invitation.id,
                league_id = invitation.league_id,
                team_id = team.id,
                user_id = user.user_id,
                "League invitation redeemed"
            );
            Ok((StatusCode::OK, Json(DataResponse { data: team })))
        }
        LinkOutcome::AlreadyMember => Err(AppError::Invite(InviteError::AlreadyMember)),
        LinkOutcome::NotRedeemable => {
            let current = LeagueInvitationRepo::find_by_id(&state.pool, invitation.id)
                .await?
                .ok_or(AppError::Invite(InviteError::CodeNotFound))?;
            Err(AppError::Invite(classify_invalid(&current, Utc::now())))
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The precise policy kind for an invitation that failed `is_valid`.
fn classify_invalid(invitation: &LeagueInvitation, now: Timestamp) -> InviteError {
    if !invitation.has_available_uses() {
        InviteError::CodeExhausted
    } else if !invitation.is_active {
        InviteError::CodeInactive
    } else if invitation.is_expired(now) {
        InviteError::CodeExpired
    } else {
        InviteError::CodeExhausted
    }
}
