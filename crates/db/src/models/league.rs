//! League entity model.

use matchday_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A league row from the `leagues` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct League {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new league.
#[derive(Debug)]
pub struct CreateLeague {
    pub name: String,
}
