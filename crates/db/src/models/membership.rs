//! Access-membership entity model: one role grant in one scope.

use matchday_core::access::Scope;
use matchday_core::roles::Role;
use matchday_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use std::str::FromStr;

/// A grant row from the `access_memberships` table.
///
/// The role is stored as its snake_case name; [`AccessMembership::role`]
/// parses it back into the typed hierarchy. Lifecycle is grant/revoke
/// only -- role changes are modeled as revoke+grant, never update.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccessMembership {
    pub id: DbId,
    pub user_id: DbId,
    pub team_id: Option<DbId>,
    pub league_id: Option<DbId>,
    pub role: String,
    pub created_at: Timestamp,
}

impl AccessMembership {
    /// The scope this grant applies to.
    pub fn scope(&self) -> Scope {
        Scope::from_columns(self.team_id, self.league_id)
    }

    /// The typed role, if the stored name is recognized.
    pub fn parsed_role(&self) -> Option<Role> {
        Role::from_str(&self.role).ok()
    }
}

/// DTO for granting a role.
#[derive(Debug, Clone, Copy)]
pub struct CreateMembership {
    pub user_id: DbId,
    pub role: Role,
    pub scope: Scope,
}
