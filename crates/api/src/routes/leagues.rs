//! Route definitions for the `/leagues` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{league_invitations, leagues};
use crate::state::AppState;

/// Routes mounted at `/leagues`.
///
/// ```text
/// POST /                      -> create_league (admin)
/// GET  /                      -> list_leagues
/// GET  /{id}                  -> get_league
/// GET  /{id}/teams            -> list_league_teams
/// POST /{id}/invitations      -> create_league_invitation (league manager)
/// GET  /{id}/invitations      -> list_league_invitations (league manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(leagues::create_league).get(leagues::list_leagues))
        .route("/{id}", get(leagues::get_league))
        .route("/{id}/teams", get(leagues::list_league_teams))
        .route(
            "/{id}/invitations",
            post(league_invitations::create_league_invitation)
                .get(league_invitations::list_league_invitations),
        )
}
