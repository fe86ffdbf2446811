//! Invitation entity models and their derived validity predicates.
//!
//! Team codes (`invitation_codes`) and league invitations
//! (`league_invitations`) share the same lifecycle: a use counter that
//! only the atomic redeem update increments, and a manually revocable
//! `is_active` flag. Neither is ever hard-deleted.

use matchday_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A team-scoped invitation code row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvitationCode {
    pub id: DbId,
    pub code: String,
    pub team_id: DbId,
    pub created_by: Option<DbId>,
    pub max_uses: i32,
    pub uses: i32,
    pub is_active: bool,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// A league-scoped invitation row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeagueInvitation {
    pub id: DbId,
    pub code: String,
    pub league_id: DbId,
    pub created_by: Option<DbId>,
    pub max_uses: i32,
    pub uses: i32,
    pub is_active: bool,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a team invitation code.
#[derive(Debug)]
pub struct CreateInvitation {
    pub code: String,
    pub team_id: DbId,
    pub created_by: Option<DbId>,
    pub max_uses: i32,
    pub expires_at: Option<Timestamp>,
}

/// DTO for creating a league invitation.
#[derive(Debug)]
pub struct CreateLeagueInvitation {
    pub code: String,
    pub league_id: DbId,
    pub created_by: Option<DbId>,
    pub max_uses: i32,
    pub expires_at: Option<Timestamp>,
}

macro_rules! invitation_predicates {
    ($ty:ty) => {
        impl $ty {
            /// An absolute deadline is set and has passed.
            pub fn is_expired(&self, now: Timestamp) -> bool {
                self.expires_at.is_some_and(|deadline| deadline <= now)
            }

            pub fn has_available_uses(&self) -> bool {
                self.uses < self.max_uses
            }

            /// Redeemable right now: active, not expired, not exhausted.
            pub fn is_valid(&self, now: Timestamp) -> bool {
                self.is_active && !self.is_expired(now) && self.has_available_uses()
            }

            /// The use that reached the cap should flip `is_active` off;
            /// the atomic redeem update does this in the same statement.
            pub fn should_be_revoked(&self) -> bool {
                self.uses >= self.max_uses
            }
        }
    };
}

invitation_predicates!(InvitationCode);
invitation_predicates!(LeagueInvitation);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn code(max_uses: i32, uses: i32, is_active: bool, expires_at: Option<Timestamp>) -> InvitationCode {
        InvitationCode {
            id: 1,
            code: "ABCD2345".to_string(),
            team_id: 1,
            created_by: None,
            max_uses,
            uses,
            is_active,
            expires_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fresh_code_is_valid() {
        let now = Utc::now();
        let c = code(1, 0, true, None);
        assert!(c.is_valid(now));
        assert!(!c.should_be_revoked());
    }

    #[test]
    fn test_inactive_code_is_invalid() {
        let now = Utc::now();
        let c = code(5, 0, false, None);
        assert!(!c.is_valid(now));
    }

    #[test]
    fn test_expired_code_is_invalid() {
        let now = Utc::now();
        let c = code(5, 0, true, Some(now - Duration::minutes(1)));
        assert!(c.is_expired(now));
        assert!(!c.is_valid(now));
    }

    #[test]
    fn test_deadline_exactly_now_counts_as_expired() {
        let now = Utc::now();
        let c = code(5, 0, true, Some(now));
        assert!(c.is_expired(now));
    }

    #[test]
    fn test_exhausted_code_is_invalid_and_should_be_revoked() {
        let now = Utc::now();
        let c = code(3, 3, true, None);
        assert!(!c.has_available_uses());
        assert!(!c.is_valid(now));
        assert!(c.should_be_revoked());
    }

    #[test]
    fn test_future_deadline_is_still_valid() {
        let now = Utc::now();
        let c = code(3, 2, true, Some(now + Duration::hours(1)));
        assert!(c.is_valid(now));
    }
}
