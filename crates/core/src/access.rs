//! Access-control evaluation over a user's loaded membership set.
//!
//! The evaluator is a pure function of the grants a user holds: callers
//! load the user's membership rows once per request (the only
//! memoization this subsystem needs) and then answer any number of
//! "can user U perform action A in context C" questions without further
//! I/O. Absence of a matching grant is a normal `false`, never an error.
//!
//! The evaluator performs no self-authorization: whether the *caller* is
//! allowed to grant or revoke is checked at the call site.

use crate::roles::Role;
use crate::types::DbId;

/// The context a grant applies to: everywhere, one team, or one league.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Applies everywhere. Reserved for [`Role::Master`] and [`Role::Admin`].
    Global,
    Team(DbId),
    League(DbId),
}

impl Scope {
    /// Build a scope from the storage encoding: nullable `(team_id, league_id)`
    /// with at most one non-null; both null means global.
    pub fn from_columns(team_id: Option<DbId>, league_id: Option<DbId>) -> Self {
        match (team_id, league_id) {
            (Some(team), None) => Scope::Team(team),
            (None, Some(league)) => Scope::League(league),
            (None, None) => Scope::Global,
            // The storage CHECK constraint forbids both referents; if a
            // violating row ever appears, read it as the narrower team
            // scope rather than a global grant.
            (Some(team), Some(_)) => Scope::Team(team),
        }
    }

    /// The storage encoding of this scope.
    pub fn to_columns(self) -> (Option<DbId>, Option<DbId>) {
        match self {
            Scope::Global => (None, None),
            Scope::Team(id) => (Some(id), None),
            Scope::League(id) => (None, Some(id)),
        }
    }
}

/// One grant of a role within a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub role: Role,
    pub scope: Scope,
}

/// All grants a single user holds, loaded once per request.
#[derive(Debug, Clone, Default)]
pub struct MembershipSet {
    grants: Vec<Grant>,
}

impl MembershipSet {
    pub fn new(grants: Vec<Grant>) -> Self {
        Self { grants }
    }

    /// An empty set: the implicit fan.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    /// Exact membership lookup.
    ///
    /// A global grant of the same role satisfies any team- or
    /// league-scoped check; the cascade is computed here rather than
    /// stored as duplicate rows.
    pub fn has_role(&self, role: Role, scope: Scope) -> bool {
        self.grants.iter().any(|g| {
            g.role == role && (g.scope == scope || g.scope == Scope::Global)
        })
    }

    /// Holds the master role globally.
    pub fn is_master(&self) -> bool {
        self.has_role(Role::Master, Scope::Global)
    }

    /// Holds admin-or-above globally.
    pub fn is_admin(&self) -> bool {
        self.is_master() || self.has_role(Role::Admin, Scope::Global)
    }

    pub fn can_manage_league(&self, league_id: DbId) -> bool {
        self.is_admin() || self.has_role(Role::LeagueManager, Scope::League(league_id))
    }

    pub fn can_manage_team(&self, team_id: DbId) -> bool {
        self.is_admin() || self.has_role(Role::Manager, Scope::Team(team_id))
    }

    pub fn can_assist_team(&self, team_id: DbId) -> bool {
        self.can_manage_team(team_id) || self.has_role(Role::Assistant, Scope::Team(team_id))
    }

    pub fn can_view_team(&self, team_id: DbId) -> bool {
        self.can_assist_team(team_id) || self.has_role(Role::Player, Scope::Team(team_id))
    }

    pub fn can_manage_matches(&self, team_id: DbId) -> bool {
        self.can_manage_team(team_id)
            || self.has_role(Role::MatchManager, Scope::Team(team_id))
            || self.has_role(Role::RefereeCommission, Scope::Team(team_id))
    }

    /// Whether the user may remove a player from the team.
    ///
    /// Assistants are excluded: they may view and assist, but only an
    /// admin or the team manager removes players. This is a policy
    /// carve-out from the otherwise monotonic assist chain.
    pub fn can_remove_player(&self, team_id: DbId) -> bool {
        self.is_admin() || self.has_role(Role::Manager, Scope::Team(team_id))
    }

    /// Whether the user holds any grant at all in the given scope
    /// (exact scope match; global grants count everywhere).
    pub fn is_member_of(&self, scope: Scope) -> bool {
        self.grants
            .iter()
            .any(|g| g.scope == scope || g.scope == Scope::Global)
    }

    /// The highest-authority role visible in the given scope.
    ///
    /// Considers exact scope matches plus global grants. A user with no
    /// visible grant is a [`Role::Fan`] -- computed here so every caller
    /// sees the same default, never persisted.
    pub fn effective_role(&self, scope: Scope) -> Role {
        self.grants
            .iter()
            .filter(|g| g.scope == scope || g.scope == Scope::Global)
            .map(|g| g.role)
            .max_by_key(|r| r.authority())
            .unwrap_or(Role::Fan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(grants: &[(Role, Scope)]) -> MembershipSet {
        MembershipSet::new(
            grants
                .iter()
                .map(|&(role, scope)| Grant { role, scope })
                .collect(),
        )
    }

    const TEAM: Scope = Scope::Team(7);

    #[test]
    fn test_empty_set_is_fan_everywhere() {
        let acl = MembershipSet::empty();
        assert_eq!(acl.effective_role(TEAM), Role::Fan);
        assert_eq!(acl.effective_role(Scope::Global), Role::Fan);
        assert!(!acl.can_view_team(7));
        assert!(!acl.is_admin());
    }

    #[test]
    fn test_exact_grant_matches_only_its_scope() {
        let acl = set(&[(Role::Manager, Scope::Team(7))]);
        assert!(acl.has_role(Role::Manager, Scope::Team(7)));
        assert!(!acl.has_role(Role::Manager, Scope::Team(8)));
        assert!(!acl.has_role(Role::Manager, Scope::League(7)));
    }

    #[test]
    fn test_global_grant_cascades_into_scoped_checks() {
        let acl = set(&[(Role::Admin, Scope::Global)]);
        assert!(acl.has_role(Role::Admin, Scope::Team(1)));
        assert!(acl.has_role(Role::Admin, Scope::League(99)));
        assert!(acl.is_admin());
        assert!(acl.can_manage_team(1));
        assert!(acl.can_manage_league(2));
    }

    #[test]
    fn test_master_implies_admin() {
        let acl = set(&[(Role::Master, Scope::Global)]);
        assert!(acl.is_master());
        assert!(acl.is_admin());
        assert!(acl.can_remove_player(3));
    }

    /// Broader privilege implies every narrower team check.
    #[test]
    fn test_manage_chain_is_monotonic() {
        let manager = set(&[(Role::Manager, TEAM)]);
        assert!(manager.can_manage_team(7));
        assert!(manager.can_assist_team(7));
        assert!(manager.can_view_team(7));
        assert!(manager.can_manage_matches(7));

        let assistant = set(&[(Role::Assistant, TEAM)]);
        assert!(!assistant.can_manage_team(7));
        assert!(assistant.can_assist_team(7));
        assert!(assistant.can_view_team(7));

        let player = set(&[(Role::Player, TEAM)]);
        assert!(!player.can_assist_team(7));
        assert!(player.can_view_team(7));
    }

    /// The documented exception: assistants assist and view, but never
    /// remove players.
    #[test]
    fn test_assistant_cannot_remove_player() {
        let assistant = set(&[(Role::Assistant, TEAM)]);
        assert!(assistant.can_assist_team(7));
        assert!(!assistant.can_remove_player(7));

        let manager = set(&[(Role::Manager, TEAM)]);
        assert!(manager.can_remove_player(7));

        let admin = set(&[(Role::Admin, Scope::Global)]);
        assert!(admin.can_remove_player(7));
    }

    #[test]
    fn test_player_promoted_to_manager_can_remove_player() {
        let before = set(&[(Role::Player, TEAM)]);
        assert!(!before.can_remove_player(7));

        // Promotion is modeled as revoke+grant; the evaluator only sees
        // the resulting set.
        let after = set(&[(Role::Player, TEAM), (Role::Manager, TEAM)]);
        assert!(after.can_remove_player(7));
    }

    #[test]
    fn test_match_roles_manage_matches_but_not_team() {
        for role in [Role::MatchManager, Role::RefereeCommission] {
            let acl = set(&[(role, TEAM)]);
            assert!(acl.can_manage_matches(7), "{role} must manage matches");
            assert!(!acl.can_manage_team(7), "{role} must not manage the team");
        }
    }

    #[test]
    fn test_effective_role_picks_highest_authority() {
        let acl = set(&[(Role::Player, TEAM), (Role::Manager, TEAM)]);
        assert_eq!(acl.effective_role(TEAM), Role::Manager);

        let acl = set(&[(Role::Player, TEAM), (Role::Admin, Scope::Global)]);
        assert_eq!(acl.effective_role(TEAM), Role::Admin);
    }

    #[test]
    fn test_scope_column_round_trip() {
        for scope in [Scope::Global, Scope::Team(4), Scope::League(9)] {
            let (team_id, league_id) = scope.to_columns();
            assert_eq!(Scope::from_columns(team_id, league_id), scope);
        }
    }

    #[test]
    fn test_league_manager_scoped_to_one_league() {
        let acl = set(&[(Role::LeagueManager, Scope::League(5))]);
        assert!(acl.can_manage_league(5));
        assert!(!acl.can_manage_league(6));
        assert!(!acl.can_manage_team(5));
    }
}
