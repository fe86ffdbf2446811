//! Repository for the `league_invitations` table.
//!
//! Same lifecycle as team invitation codes, but redemption links a team
//! into the league instead of creating a user membership.

use matchday_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::invitation::{CreateLeagueInvitation, LeagueInvitation};
use crate::models::team::Team;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, code, league_id, created_by, max_uses, uses, is_active, expires_at, created_at";

/// Outcome of a transactional redeem-and-link.
#[derive(Debug)]
pub enum LinkOutcome {
    /// A use was consumed and the team joined the league.
    Linked {
        invitation: LeagueInvitation,
        team: Team,
    },
    /// The team is already in this league; nothing was consumed.
    AlreadyMember,
    /// The conditional update matched no row (inactive, expired, or
    /// exhausted). The caller re-reads to classify.
    NotRedeemable,
}

/// Provides lifecycle operations for league invitations.
pub struct LeagueInvitationRepo;

impl LeagueInvitationRepo {
    /// Insert a new league invitation, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateLeagueInvitation,
    ) -> Result<LeagueInvitation, sqlx::Error> {
        let query = format!(
            "INSERT INTO league_invitations (code, league_id, created_by, max_uses, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeagueInvitation>(&query)
            .bind(&input.code)
            .bind(input.league_id)
            .bind(input.created_by)
            .bind(input.max_uses)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find an invitation by its exact code string.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<LeagueInvitation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM league_invitations WHERE code = $1");
        sqlx::query_as::<_, LeagueInvitation>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Find an invitation by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<LeagueInvitation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM league_invitations WHERE id = $1");
        sqlx::query_as::<_, LeagueInvitation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a league's invitations, optionally only the active ones.
    pub async fn list_for_league(
        pool: &PgPool,
        league_id: DbId,
        active_only: bool,
    ) -> Result<Vec<LeagueInvitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM league_invitations
             WHERE league_id = $1 AND ($2 = false OR is_active = true)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, LeagueInvitation>(&query)
            .bind(league_id)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Manually revoke an invitation regardless of remaining uses.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE league_invitations SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically consume one use. Same guard and cap semantics as
    /// [`crate::repositories::InvitationRepo::redeem`].
    pub async fn redeem<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<LeagueInvitation>, sqlx::Error> {
        let query = format!(
            "UPDATE league_invitations
             SET uses = uses + 1,
                 is_active = (uses + 1 < max_uses)
             WHERE id = $1
               AND is_active = true
               AND uses < max_uses
               AND (expires_at IS NULL OR expires_at > NOW())
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeagueInvitation>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Consume one use and link the team into the league in a single
    /// transaction. A team already in the league rolls the use back.
    pub async fn redeem_and_link(
        pool: &PgPool,
        id: DbId,
        team_id: DbId,
    ) -> Result<LinkOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(invitation) = Self::redeem(&mut *tx, id).await? else {
            return Ok(LinkOutcome::NotRedeemable);
        };

        let team = sqlx::query_as::<_, Team>(
            "UPDATE teams SET league_id = $2, updated_at = NOW()
             WHERE id = $1
               AND (league_id IS NULL OR league_id <> $2)
             RETURNING id, league_id, name, created_at, updated_at",
        )
        .bind(team_id)
        .bind(invitation.league_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(team) = team else {
            tx.rollback().await?;
            return Ok(LinkOutcome::AlreadyMember);
        };

        tx.commit().await?;
        Ok(LinkOutcome::Linked { invitation, team })
    }
}
