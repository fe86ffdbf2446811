//! The role hierarchy.
//!
//! Roles are ordered by descending global authority:
//!
//! ```text
//! master > admin > league_manager > manager
//!        > match_manager / referee_commission
//!        > assistant > player > fan
//! ```
//!
//! `match_manager` and `referee_commission` share one rank. A user with
//! no memberships is implicitly [`Role::Fan`]; the fan role is computed,
//! never persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A role grantable to a user within a scope.
///
/// Serialized (and stored) as the snake_case names shown in the module
/// docs, e.g. `"league_manager"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Master,
    Admin,
    LeagueManager,
    Manager,
    MatchManager,
    RefereeCommission,
    Assistant,
    Player,
    Fan,
}

impl Role {
    /// Numeric authority rank; higher outranks lower.
    ///
    /// `MatchManager` and `RefereeCommission` intentionally share a rank.
    pub fn authority(&self) -> u8 {
        match self {
            Role::Master => 80,
            Role::Admin => 70,
            Role::LeagueManager => 60,
            Role::Manager => 50,
            Role::MatchManager | Role::RefereeCommission => 40,
            Role::Assistant => 30,
            Role::Player => 20,
            Role::Fan => 10,
        }
    }

    /// Whether this role outranks or equals `other` in global authority.
    pub fn outranks_or_equals(&self, other: Role) -> bool {
        self.authority() >= other.authority()
    }

    /// Whether the role may only be granted at global scope.
    pub fn is_global_only(&self) -> bool {
        matches!(self, Role::Master | Role::Admin)
    }

    /// The snake_case wire/storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Master => "master",
            Role::Admin => "admin",
            Role::LeagueManager => "league_manager",
            Role::Manager => "manager",
            Role::MatchManager => "match_manager",
            Role::RefereeCommission => "referee_commission",
            Role::Assistant => "assistant",
            Role::Player => "player",
            Role::Fan => "fan",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "master" => Ok(Role::Master),
            "admin" => Ok(Role::Admin),
            "league_manager" => Ok(Role::LeagueManager),
            "manager" => Ok(Role::Manager),
            "match_manager" => Ok(Role::MatchManager),
            "referee_commission" => Ok(Role::RefereeCommission),
            "assistant" => Ok(Role::Assistant),
            "player" => Ok(Role::Player),
            "fan" => Ok(Role::Fan),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized role name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown role name: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_is_strictly_descending_across_ranks() {
        let descending = [
            Role::Master,
            Role::Admin,
            Role::LeagueManager,
            Role::Manager,
            Role::MatchManager,
            Role::Assistant,
            Role::Player,
            Role::Fan,
        ];
        for pair in descending.windows(2) {
            assert!(
                pair[0].authority() > pair[1].authority(),
                "{} must outrank {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_match_manager_and_referee_commission_share_rank() {
        assert_eq!(
            Role::MatchManager.authority(),
            Role::RefereeCommission.authority()
        );
    }

    #[test]
    fn test_round_trip_all_roles() {
        let all = [
            Role::Master,
            Role::Admin,
            Role::LeagueManager,
            Role::Manager,
            Role::MatchManager,
            Role::RefereeCommission,
            Role::Assistant,
            Role::Player,
            Role::Fan,
        ];
        for role in all {
            let parsed: Role = role.as_str().parse().expect("known name must parse");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_unknown_role_name_fails() {
        let result = Role::from_str("superuser");
        assert!(result.is_err());
    }

    #[test]
    fn test_global_only_roles() {
        assert!(Role::Master.is_global_only());
        assert!(Role::Admin.is_global_only());
        assert!(!Role::Manager.is_global_only());
        assert!(!Role::Player.is_global_only());
    }
}
