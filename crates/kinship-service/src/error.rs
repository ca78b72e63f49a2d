//! Error types for relationship operations

use kinship_domain::{Relationship, RelationshipId, RelationshipTypeId, UserId};
use thiserror::Error;

/// A proposal failed its preconditions; nothing was written or sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was not supplied
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A user id did not resolve in the user directory
    #[error("Unknown user {id} in field {field}")]
    UnknownUser {
        /// Field holding the id
        field: &'static str,
        /// Unresolved id
        id: UserId,
    },

    /// The relationship type id did not resolve
    #[error("Unknown relationship type {0}")]
    UnknownRelationshipType(RelationshipTypeId),

    /// Requester and target are the same user
    #[error("User {0} cannot propose a relationship to themselves")]
    SelfRelationship(UserId),

    /// The same requester already proposed this type to the same target
    #[error("Relationship already exists: {}", .existing.id)]
    Duplicate {
        /// The existing row
        existing: Relationship,
    },
}

/// The relationship is not in a state that allows the transition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Approve was called on an approved relationship
    #[error("Relationship {0} is already approved")]
    AlreadyApproved(RelationshipId),

    /// Deny was called on a relationship that is no longer pending
    #[error("Relationship {0} is not pending")]
    NotPending(RelationshipId),
}

/// Errors returned by [`RelationshipService`](crate::RelationshipService)
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Precondition failure on create
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No relationship with that id
    #[error("Relationship not found: {0}")]
    NotFound(RelationshipId),

    /// Invalid state transition
    #[error("Invalid transition: {0}")]
    State(#[from] StateError),

    /// The acting user may not perform this transition
    #[error("User {actor} may not modify relationship {id}")]
    Forbidden {
        /// Acting user
        actor: UserId,
        /// Relationship
        id: RelationshipId,
    },

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),
}

impl ServiceError {
    /// Wrap any displayable storage error
    pub(crate) fn store<E: std::fmt::Display>(err: E) -> Self {
        ServiceError::Store(err.to_string())
    }
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
