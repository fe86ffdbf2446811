//! Repository for the `users` table.

use matchday_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{UpsertUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, external_subject_id, email, display_name, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Create-if-absent / update-on-change keyed by the immutable
    /// external subject id. Called on every successful login so the
    /// local row tracks the identity provider's claims.
    pub async fn upsert_by_external_subject(
        pool: &PgPool,
        input: &UpsertUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (external_subject_id, email, display_name)
             VALUES ($1, $2, $3)
             ON CONFLICT (external_subject_id) DO UPDATE SET
                email = EXCLUDED.email,
                display_name = EXCLUDED.display_name,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.external_subject_id)
            .bind(&input.email)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by the external subject id.
    pub async fn find_by_external_subject(
        pool: &PgPool,
        external_subject_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE external_subject_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(external_subject_id)
            .fetch_optional(pool)
            .await
    }
}
