//! Matchday core library.
//!
//! Pure domain logic with no I/O: role hierarchy, access-control
//! evaluation, invite-code generation, token hashing, and the shared
//! error types. Both the repository layer and the API layer depend on
//! this crate; it depends on nothing of theirs.

pub mod access;
pub mod codes;
pub mod error;
pub mod roles;
pub mod types;
