//! Repository for the `access_memberships` table.

use matchday_core::access::{Grant, MembershipSet, Scope};
use matchday_core::types::DbId;
use sqlx::{PgExecutor, PgPool};
use std::str::FromStr;

use crate::models::membership::{AccessMembership, CreateMembership};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, team_id, league_id, role, created_at";

/// Provides grant/revoke/list operations for role memberships.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Grant a role within a scope.
    ///
    /// Returns `None` when the user already holds the identical grant:
    /// the unique constraint on (user_id, role, team_id, league_id)
    /// absorbs concurrent duplicates, and `ON CONFLICT DO NOTHING`
    /// turns the violation into an idempotent no-op the caller can see.
    ///
    /// Accepts any executor so invitation redemption can grant inside
    /// its transaction.
    pub async fn grant<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateMembership,
    ) -> Result<Option<AccessMembership>, sqlx::Error> {
        let (team_id, league_id) = input.scope.to_columns();
        let query = format!(
            "INSERT INTO access_memberships (user_id, team_id, league_id, role)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AccessMembership>(&query)
            .bind(input.user_id)
            .bind(team_id)
            .bind(league_id)
            .bind(input.role.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Remove a grant. Returns `true` if a row was deleted.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM access_memberships WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a grant by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AccessMembership>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM access_memberships WHERE id = $1");
        sqlx::query_as::<_, AccessMembership>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All grants a user holds, oldest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<AccessMembership>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM access_memberships
             WHERE user_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, AccessMembership>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// All grants within a scope (exact scope match).
    pub async fn list_for_scope(
        pool: &PgPool,
        scope: Scope,
    ) -> Result<Vec<AccessMembership>, sqlx::Error> {
        let (team_id, league_id) = scope.to_columns();
        let query = format!(
            "SELECT {COLUMNS} FROM access_memberships
             WHERE team_id IS NOT DISTINCT FROM $1
               AND league_id IS NOT DISTINCT FROM $2
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, AccessMembership>(&query)
            .bind(team_id)
            .bind(league_id)
            .fetch_all(pool)
            .await
    }

    /// Whether the user holds any grant in the exact scope.
    pub async fn exists_in_scope(
        pool: &PgPool,
        user_id: DbId,
        scope: Scope,
    ) -> Result<bool, sqlx::Error> {
        let (team_id, league_id) = scope.to_columns();
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                 SELECT 1 FROM access_memberships
                 WHERE user_id = $1
                   AND team_id IS NOT DISTINCT FROM $2
                   AND league_id IS NOT DISTINCT FROM $3
             )",
        )
        .bind(user_id)
        .bind(team_id)
        .bind(league_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Load a user's grants as the evaluator's [`MembershipSet`].
    ///
    /// One query per request; every subsequent access check is computed
    /// in memory from the returned set. Rows with an unrecognized role
    /// name are skipped with a warning rather than failing the request.
    pub async fn access_set(pool: &PgPool, user_id: DbId) -> Result<MembershipSet, sqlx::Error> {
        let rows = Self::list_for_user(pool, user_id).await?;
        let grants = rows
            .iter()
            .filter_map(|row| match matchday_core::roles::Role::from_str(&row.role) {
                Ok(role) => Some(Grant {
                    role,
                    scope: row.scope(),
                }),
                Err(_) => {
                    tracing::warn!(
                        membership_id = row.id,
                        role = %row.role,
                        "Skipping membership with unrecognized role name"
                    );
                    None
                }
            })
            .collect();
        Ok(MembershipSet::new(grants))
    }
}
