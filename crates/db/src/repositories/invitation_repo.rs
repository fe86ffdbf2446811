//! Repository for the `invitation_codes` table.
//!
//! Redemption is the one concurrency-sensitive path in this subsystem:
//! the use counter is incremented by a single conditional UPDATE so two
//! racing redemptions of a code's last use cannot both succeed.

use matchday_core::access::Scope;
use matchday_core::roles::Role;
use matchday_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::invitation::{CreateInvitation, InvitationCode};
use crate::models::membership::{AccessMembership, CreateMembership};
use crate::repositories::MembershipRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, code, team_id, created_by, max_uses, uses, is_active, expires_at, created_at";

/// Outcome of a transactional redeem-and-grant.
#[derive(Debug)]
pub enum RedeemOutcome {
    /// A use was consumed and the membership created.
    Redeemed {
        invitation: InvitationCode,
        membership: AccessMembership,
    },
    /// The redeeming user already holds a grant in the code's scope;
    /// nothing was consumed.
    AlreadyMember,
    /// The conditional update matched no row: the code is inactive,
    /// expired, or exhausted (possibly because a concurrent redemption
    /// won the last use). The caller re-reads to classify.
    NotRedeemable,
}

/// Provides lifecycle operations for team invitation codes.
pub struct InvitationRepo;

impl InvitationRepo {
    /// Insert a new invitation code, returning the created row.
    ///
    /// Fails with a unique violation if the generated code collides;
    /// the caller decides whether to retry.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInvitation,
    ) -> Result<InvitationCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO invitation_codes (code, team_id, created_by, max_uses, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InvitationCode>(&query)
            .bind(&input.code)
            .bind(input.team_id)
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
    ) -> Result<Option<InvitationCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invitation_codes WHERE code = $1");
        sqlx::query_as::<_, InvitationCode>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Find an invitation by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InvitationCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invitation_codes WHERE id = $1");
        sqlx::query_as::<_, InvitationCode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a team's invitations, optionally only the active ones.
    pub async fn list_for_team(
        pool: &PgPool,
        team_id: DbId,
        active_only: bool,
    ) -> Result<Vec<InvitationCode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invitation_codes
             WHERE team_id = $1 AND ($2 = false OR is_active = true)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, InvitationCode>(&query)
            .bind(team_id)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Manually revoke a code regardless of remaining uses.
    ///
    /// Returns `true` if the row was flipped; revoking an already
    /// inactive code affects no rows, which callers treat as success.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE invitation_codes SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically consume one use.
    ///
    /// A single conditional UPDATE: increments `uses` and deactivates
    /// the code in the same statement when the cap is reached, guarded
    /// by active/unexpired/under-cap conditions. At most `max_uses`
    /// redemptions can ever succeed, concurrent or not. `None` means
    /// the guard failed.
    pub async fn redeem<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<InvitationCode>, sqlx::Error> {
        let query = format!(
            "UPDATE invitation_codes
             SET uses = uses + 1,
                 is_active = (uses + 1 < max_uses)
             WHERE id = $1
               AND is_active = true
               AND uses < max_uses
               AND (expires_at IS NULL OR expires_at > NOW())
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InvitationCode>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Consume one use and create the membership in a single
    /// transaction. Either both writes commit or neither does; a
    /// membership conflict rolls the consumed use back.
    pub async fn redeem_and_grant(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        role: Role,
    ) -> Result<RedeemOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(invitation) = Self::redeem(&mut *tx, id).await? else {
            return Ok(RedeemOutcome::NotRedeemable);
        };

        let input = CreateMembership {
            user_id,
            role,
            scope: Scope::Team(invitation.team_id),
        };
        let Some(membership) = MembershipRepo::grant(&mut *tx, &input).await? else {
            // Lost a race with a concurrent grant: undo the use.
            tx.rollback().await?;
            return Ok(RedeemOutcome::AlreadyMember);
        };

        tx.commit().await?;
        Ok(RedeemOutcome::Redeemed {
            invitation,
            membership,
        })
    }
}
