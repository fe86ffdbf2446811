pub mod auth;
pub mod health;
pub mod invitations;
pub mod leagues;
pub mod memberships;
pub mod teams;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                         login with an external credential (public)
/// /auth/refresh                       rotate a refresh token (public)
/// /auth/logout                        revoke the presented refresh token (auth)
/// /auth/logout-all                    revoke all refresh tokens (auth)
///
/// /users/me                           profile + role grants (auth)
///
/// /leagues                            list (auth), create (admin)
/// /leagues/{id}                       detail (auth)
/// /leagues/{id}/teams                 teams in the league (auth)
/// /leagues/{id}/invitations           list, create (league manager)
///
/// /teams                              create (auth; manager grant to creator)
/// /teams/{id}                         detail (team member)
/// /teams/{id}/memberships             list grants (team member)
/// /teams/{id}/invitations             list, create (team manager)
///
/// /memberships                        grant (scope manager)
/// /memberships/{id}                   revoke (scope manager / remove-player rule)
///
/// /invitations/accept                 redeem a team code (auth)
/// /invitations/{id}/revoke            deactivate a code (team manager)
/// /league-invitations/accept          redeem a league code for a team (team manager)
/// /league-invitations/{id}/revoke     deactivate (league manager)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/leagues", leagues::router())
        .nest("/teams", teams::router())
        .nest("/memberships", memberships::router())
        .merge(invitations::router())
}
