//! Repository for the `teams` table.

use matchday_core::types::DbId;
use sqlx::PgPool;

use crate::models::team::{CreateTeam, Team};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, league_id, name, created_at, updated_at";

/// Provides CRUD operations for teams.
pub struct TeamRepo;

impl TeamRepo {
    /// Insert a new team, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTeam) -> Result<Team, sqlx::Error> {
        let query = format!(
            "INSERT INTO teams (league_id, name) VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(input.league_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a team by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE id = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List teams belonging to a league.
    pub async fn list_for_league(pool: &PgPool, league_id: DbId) -> Result<Vec<Team>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM teams WHERE league_id = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Team>(&query)
            .bind(league_id)
            .fetch_all(pool)
            .await
    }
}
