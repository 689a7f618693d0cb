//! Domain errors

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Permission, RelationshipKind};

#[derive(Error, Debug)]
pub enum DomainError {
    /// Absent, or owned by another tenant. The two cases are never
    /// distinguished towards the caller.
    #[error("User group {0} not found")]
    GroupNotFound(Uuid),

    #[error("{kind} member {member_id} not found")]
    MemberNotFound { kind: RelationshipKind, member_id: Uuid },

    #[error("Actor {actor_id} lacks the {required} permission")]
    AuthorizationError { actor_id: Uuid, required: Permission },

    #[error("{kind} member {member_id} of group {group_id} belongs to another tenant")]
    RelationshipViolation {
        group_id: Uuid,
        kind: RelationshipKind,
        member_id: Uuid,
    },

    #[error("User group {0} was modified concurrently")]
    ConcurrentModification(Uuid),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    FileNotSupported(String),

    #[error("File(s) too large")]
    FileTooLarge,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}
