pub mod auth;
pub mod invitations;
pub mod league_invitations;
pub mod leagues;
pub mod memberships;
pub mod teams;
pub mod users;
