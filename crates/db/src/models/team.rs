//! Team entity model.

use matchday_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A team row from the `teams` table.
///
/// `league_id` is set when the team joins a league (directly or by
/// redeeming a league invitation).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Team {
    pub id: DbId,
    pub league_id: Option<DbId>,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new team.
#[derive(Debug)]
pub struct CreateTeam {
    pub league_id: Option<DbId>,
    pub name: String,
}
