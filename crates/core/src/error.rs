use crate::types::DbId;

/// Domain-level errors shared by every layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Policy violations of the invitation-code lifecycle.
///
/// Each kind is distinguished so the HTTP layer can render a precise
/// message and machine code to the caller. Note the deliberate contrast
/// with refresh-token failures, which are collapsed into one generic
/// unauthorized signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InviteError {
    #[error("Invitation code not found")]
    CodeNotFound,

    #[error("Invitation code has been revoked")]
    CodeInactive,

    #[error("Invitation code has expired")]
    CodeExpired,

    #[error("Invitation code has no remaining uses")]
    CodeExhausted,

    #[error("Already a member of this invitation's scope")]
    AlreadyMember,
}

impl InviteError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            InviteError::CodeNotFound => "CODE_NOT_FOUND",
            InviteError::CodeInactive => "CODE_INACTIVE",
            InviteError::CodeExpired => "CODE_EXPIRED",
            InviteError::CodeExhausted => "CODE_EXHAUSTED",
            InviteError::AlreadyMember => "ALREADY_MEMBER",
        }
    }
}
