//! Route definitions for invitation redemption and revocation.
//!
//! Creation and listing live under the owning `/teams` and `/leagues`
//! scopes; the code-holder-facing endpoints are mounted here.

use axum::routing::post;
use axum::Router;

use crate::handlers::{invitations, league_invitations};
use crate::state::AppState;

/// Routes mounted at the `/api/v1` root.
///
/// ```text
/// POST /invitations/accept                 -> accept_invitation
/// POST /invitations/{id}/revoke            -> revoke_invitation (team manager)
/// POST /league-invitations/accept          -> accept_league_invitation (team manager)
/// POST /league-invitations/{id}/revoke     -> revoke_league_invitation (league manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/invitations/accept", post(invitations::accept_invitation))
        .route(
            "/invitations/{id}/revoke",
            post(invitations::revoke_invitation),
        )
        .route(
            "/league-invitations/accept",
            post(league_invitations::accept_league_invitation),
        )
        .route(
            "/league-invitations/{id}/revoke",
            post(league_invitations::revoke_league_invitation),
        )
}
