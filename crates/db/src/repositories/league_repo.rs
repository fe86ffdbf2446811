//! Repository for the `leagues` table.

use matchday_core::types::DbId;
use sqlx::PgPool;

use crate::models::league::{CreateLeague, League};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for leagues.
pub struct LeagueRepo;

impl LeagueRepo {
    /// Insert a new league, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLeague) -> Result<League, sqlx::Error> {
        let query = format!(
            "INSERT INTO leagues (name) VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, League>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a league by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<League>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leagues WHERE id = $1");
        sqlx::query_as::<_, League>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all leagues ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<League>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leagues ORDER BY created_at DESC");
        sqlx::query_as::<_, League>(&query).fetch_all(pool).await
    }
}
