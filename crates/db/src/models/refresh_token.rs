//! Refresh-token record model.

use matchday_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session credential row from the `refresh_tokens` table.
///
/// Holds only the one-way hash of the opaque secret -- the raw value is
/// returned to the client exactly once and never stored.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl RefreshTokenRecord {
    /// Usable iff never revoked and not past its expiry.
    pub fn is_usable(&self, now: Timestamp) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

/// DTO for persisting a newly issued refresh token.
#[derive(Debug)]
pub struct CreateRefreshToken {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(expires_at: Timestamp, revoked_at: Option<Timestamp>) -> RefreshTokenRecord {
        RefreshTokenRecord {
            id: 1,
            user_id: 1,
            token_hash: "deadbeef".to_string(),
            expires_at,
            revoked_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_live_record_is_usable() {
        let now = Utc::now();
        assert!(record(now + Duration::days(30), None).is_usable(now));
    }

    #[test]
    fn test_expired_record_is_not_usable() {
        let now = Utc::now();
        assert!(!record(now - Duration::seconds(1), None).is_usable(now));
    }

    #[test]
    fn test_revoked_record_is_not_usable_before_expiry() {
        let now = Utc::now();
        assert!(!record(now + Duration::days(30), Some(now)).is_usable(now));
    }
}
