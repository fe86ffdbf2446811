//! Route definitions for the `/memberships` resource.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::memberships;
use crate::state::AppState;

/// Routes mounted at `/memberships`.
///
/// ```text
/// POST   /       -> grant (scope manager)
/// DELETE /{id}   -> revoke (scope manager / remove-player rule)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(memberships::grant))
        .route("/{id}", delete(memberships::revoke))
}
