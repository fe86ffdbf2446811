//! User entity model and DTOs.

use matchday_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// The user is the identity anchor: `external_subject_id` is the stable
/// subject identifier from the credential verifier and never changes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub external_subject_id: String,
    pub email: Option<String>,
    pub display_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for create-if-absent / update-on-change at login time.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertUser {
    pub external_subject_id: String,
    pub email: Option<String>,
    pub display_name: String,
}
