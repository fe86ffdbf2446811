//! Route definitions for the `/teams` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{invitations, memberships, teams};
use crate::state::AppState;

/// Routes mounted at `/teams`.
///
/// ```text
/// POST /                  -> create_team
/// GET  /{id}              -> get_team (team member)
/// GET  /{id}/memberships  -> list team grants (team member)
/// POST /{id}/invitations  -> create_invitation (team manager)
/// GET  /{id}/invitations  -> list_invitations (team manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(teams::create_team))
        .route("/{id}", get(teams::get_team))
        .route("/{id}/memberships", get(memberships::list_for_team))
        .route(
            "/{id}/invitations",
            post(invitations::create_invitation).get(invitations::list_invitations),
        )
}
