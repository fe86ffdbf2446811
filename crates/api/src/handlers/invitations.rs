//! Handlers for team invitation codes: create, list, revoke, accept.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use matchday_core::access::Scope;
use matchday_core::codes::generate_invite_code;
use matchday_core::error::{CoreError, InviteError};
use matchday_core::roles::Role;
use matchday_core::types::{DbId, Timestamp};
use matchday_db::models::invitation::{CreateInvitation, InvitationCode};
use matchday_db::repositories::{InvitationRepo, MembershipRepo, RedeemOutcome, TeamRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /teams/{id}/invitations`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    /// How many redemptions the code allows (default 1).
    #[validate(range(min = 1, max = 1000, message = "max_uses must be between 1 and 1000"))]
    pub max_uses: Option<i32>,
    /// Optional absolute deadline.
    pub expires_at: Option<Timestamp>,
}

/// Query parameters for listing invitations.
#[derive(Debug, Deserialize, Default)]
pub struct ListInvitationsQuery {
    /// When true, only currently active codes are returned.
    #[serde(default)]
    pub active: bool,
}

/// Request body for `POST /invitations/accept`.
#[derive(Debug, Deserialize)]
pub struct AcceptInvitationRequest {
    pub code: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/teams/{id}/invitations
///
/// Create an invitation code for the team. Requires team management.
/// Code generation is collision-blind; a unique-constraint conflict is
/// retried once with a fresh code before surfacing.
pub async fn create_invitation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<DbId>,
    Json(input): Json<CreateInvitationRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    TeamRepo::find_by_id(&state.pool, team_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Team",
            id: team_id,
        }))?;

    let acl = user.access_set(&state).await?;
    if !acl.can_manage_team(team_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Team manager role required".into(),
        )));
    }

    if let Some(deadline) = input.expires_at {
        if deadline <= Utc::now() {
            return Err(AppError::BadRequest("expires_at must be in the future".into()));
        }
    }

    let mut create = CreateInvitation {
        code: generate_invite_code(),
        team_id,
        created_by: Some(user.user_id),
        max_uses: input.max_uses.unwrap_or(1),
        expires_at: input.expires_at,
    };

    let invitation = match InvitationRepo::create(&state.pool, &create).await {
        Ok(invitation) => invitation,
        Err(err) if is_unique_violation(&err, "uq_invitation_codes_code") => {
            tracing::warn!(code = %create.code, "Invitation code collision, retrying once");
            create.code = generate_invite_code();
            InvitationRepo::create(&state.pool, &create).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        invitation_id = invitation.id,
        team_id,
        created_by = user.user_id,
        "Invitation code created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: invitation })))
}

/// GET /api/v1/teams/{id}/invitations
///
/// List the team's invitation codes. Requires team management.
pub async fn list_invitations(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<DbId>,
    Query(query): Query<ListInvitationsQuery>,
) -> AppResult<impl IntoResponse> {
    let acl = user.access_set(&state).await?;
    if !acl.can_manage_team(team_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Team manager role required".into(),
        )));
    }

    let invitations = InvitationRepo::list_for_team(&state.pool, team_id, query.active).await?;
    Ok(Json(DataResponse { data: invitations }))
}

/// POST /api/v1/invitations/{id}/revoke
///
/// Deactivate a code regardless of remaining uses. Idempotent: revoking
/// an already-inactive code succeeds without change.
pub async fn revoke_invitation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(invitation_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let invitation = InvitationRepo::find_by_id(&state.pool, invitation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Invitation",
            id: invitation_id,
        }))?;

    let acl = user.access_set(&state).await?;
    if !acl.can_manage_team(invitation.team_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Team manager role required".into(),
        )));
    }

    InvitationRepo::revoke(&state.pool, invitation.id).await?;
    let invitation = InvitationRepo::find_by_id(&state.pool, invitation.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Invitation",
            id: invitation_id,
        }))?;

    tracing::info!(invitation_id, revoked_by = user.user_id, "Invitation revoked");
    Ok(Json(DataResponse { data: invitation }))
}

/// POST /api/v1/invitations/accept
///
/// Redeem a code: the authenticated user joins the code's team as a
/// player. The use counter and the membership commit together.
pub async fn accept_invitation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<AcceptInvitationRequest>,
) -> AppResult<impl IntoResponse> {
    // 1. Exact code lookup; unknown codes are terminal.
    let invitation = InvitationRepo::find_by_code(&state.pool, &input.code)
        .await?
        .ok_or(AppError::Invite(InviteError::CodeNotFound))?;

    // 2. Classify invalidity up front so the caller gets the precise
    //    kind. The atomic redeem below remains the real gate.
    let now = Utc::now();
    if !invitation.is_valid(now) {
        return Err(AppError::Invite(classify_invalid(&invitation, now)));
    }

    // 3. Existing members are rejected, not silently ignored.
    let already = MembershipRepo::exists_in_scope(
        &state.pool,
        user.user_id,
        Scope::Team(invitation.team_id),
    )
    .await?;
    if already {
        return Err(AppError::Invite(InviteError::AlreadyMember));
    }

    // 4. Atomically consume a use and create the membership.
    let outcome =
        InvitationRepo::redeem_and_grant(&state.pool, invitation.id, user.user_id, Role::Player)
            .await?;

    match outcome {
        RedeemOutcome::Redeemed {
            invitation,
            membership,
        } => {
            tracing::info!(
                invitation_id = invitation.id,
                team_id = invitation.team_id,
                user_id = user.user_id,
                "Invitation redeemed"
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: membership })))
        }
        RedeemOutcome::AlreadyMember => Err(AppError::Invite(InviteError::AlreadyMember)),
        RedeemOutcome::NotRedeemable => {
            // Lost a race between the precheck and the update; re-read
            // for the precise kind.
            let current = InvitationRepo::find_by_id(&state.pool, invitation.id)
                .await?
                .ok_or(AppError::Invite(InviteError::CodeNotFound))?;
            Err(AppError::Invite(classify_invalid(&current, Utc::now())))
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The precise policy kind for a code that failed `is_valid`.
///
/// Checked in lifecycle order: a manually revoked code reads as
/// inactive even if it has also expired; exhaustion is reported last
/// (an exhausted code is also inactive, so the flag is checked against
/// the cap first).
fn classify_invalid(invitation: &InvitationCode, now: Timestamp) -> InviteError {
    if !invitation.has_available_uses() {
        InviteError::CodeExhausted
    } else if !invitation.is_active {
        InviteError::CodeInactive
    } else if invitation.is_expired(now) {
        InviteError::CodeExpired
    } else {
        // Only reachable when a concurrent redemption consumed the last
        // use between re-reads; report it as exhaustion.
        InviteError::CodeExhausted
    }
}
