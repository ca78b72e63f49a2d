//! Trait definitions for external interactions
//!
//! These traits define the boundaries between relationship logic and
//! infrastructure. Implementations live in other crates (kinship-store for
//! persistence, kinship-service for the stock dispatchers) or in the host
//! platform.

use crate::{
    Activity, Notification, Relationship, RelationshipId, RelationshipType, RelationshipTypeId,
    RelationshipView, User, UserId,
};
use std::fmt;

/// Resolves user identifiers against the host's user table
pub trait UserDirectory {
    /// Error type for lookups
    type Error;

    /// Resolve a user id to a handle
    fn find_user(&self, id: UserId) -> Result<Option<User>, Self::Error>;

    /// Whether a user id refers to an existing user
    fn user_exists(&self, id: UserId) -> Result<bool, Self::Error> {
        Ok(self.find_user(id)?.is_some())
    }
}

/// Read access to the administrator-managed relationship types
pub trait RelationshipTypeCatalog {
    /// Error type for lookups
    type Error;

    /// Get a relationship type by id
    fn get_relationship_type(
        &self,
        id: RelationshipTypeId,
    ) -> Result<Option<RelationshipType>, Self::Error>;

    /// All relationship types, ordered by id
    fn list_relationship_types(&self) -> Result<Vec<RelationshipType>, Self::Error>;
}

/// Which side of the relationship a listing matches the user on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// User is requester or target
    #[default]
    Either,

    /// User is the target
    Incoming,

    /// User is the requester
    Outgoing,
}

/// Filter for per-user relationship listings
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipFilter {
    /// Restrict by approval flag
    pub approved: Option<bool>,

    /// Restrict by the user's side
    pub direction: Direction,
}

impl RelationshipFilter {
    /// Approved relationships on either side
    pub fn approved() -> Self {
        Self {
            approved: Some(true),
            direction: Direction::Either,
        }
    }

    /// Pending relationships on either side
    pub fn pending() -> Self {
        Self {
            approved: Some(false),
            direction: Direction::Either,
        }
    }

    /// Pending relationships waiting on the user's answer
    pub fn incoming_pending() -> Self {
        Self {
            approved: Some(false),
            direction: Direction::Incoming,
        }
    }
}

/// Result of a guarded write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The write happened; carries the record as it now stands (or stood, for deletes)
    Applied(Relationship),

    /// The row exists but its state did not satisfy the guard; nothing was written
    Conflict(Relationship),

    /// No row with that id
    Missing,
}

/// Guard applied when deleting a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteGuard {
    /// Delete in any state
    Any,

    /// Delete only while pending
    PendingOnly,
}

/// Persistence for relationship rows
///
/// Every write method is a single transaction.
pub trait RelationshipStore {
    /// Error type for store operations
    type Error;

    /// Insert a new pending relationship
    fn insert_relationship(
        &mut self,
        requester_id: UserId,
        target_id: UserId,
        relationship_type_id: RelationshipTypeId,
    ) -> Result<Relationship, Self::Error>;

    /// Get a relationship by id
    fn get_relationship(&self, id: RelationshipId) -> Result<Option<Relationship>, Self::Error>;

    /// Find an existing relationship with the same requester, target and type
    fn find_relationship(
        &self,
        requester_id: UserId,
        target_id: UserId,
        relationship_type_id: RelationshipTypeId,
    ) -> Result<Option<Relationship>, Self::Error>;

    /// Set `approved` only if it is currently false
    fn mark_approved(&mut self, id: RelationshipId) -> Result<WriteOutcome, Self::Error>;

    /// Delete a relationship, subject to `guard`
    fn delete_relationship(
        &mut self,
        id: RelationshipId,
        guard: DeleteGuard,
    ) -> Result<WriteOutcome, Self::Error>;

    /// List relationships involving `user`, ordered by relationship id
    fn list_for_user(
        &self,
        user: UserId,
        filter: &RelationshipFilter,
    ) -> Result<Vec<RelationshipView>, Self::Error>;
}

/// Error reported by a dispatcher or publisher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyError(pub String);

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Notification delivery failed: {}", self.0)
    }
}

impl std::error::Error for NotifyError {}

/// Delivers notifications to users
///
/// Fire-and-forget from the caller's side: an error is reported but never
/// undoes the state change that produced the notification.
pub trait NotificationDispatcher {
    /// Deliver or queue a notification
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Publishes activity-stream events
pub trait ActivityPublisher {
    /// Publish an activity
    fn publish(&self, activity: &Activity) -> Result<(), NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_presets() {
        let approved = RelationshipFilter::approved();
        assert_eq!(approved.approved, Some(true));
        assert_eq!(approved.direction, Direction::Either);

        let inbox = RelationshipFilter::incoming_pending();
        assert_eq!(inbox.approved, Some(false));
        assert_eq!(inbox.direction, Direction::Incoming);

        let all = RelationshipFilter::default();
        assert!(all.approved.is_none());
    }

    #[test]
    fn test_notify_error_display() {
        let err = NotifyError("queue full".to_string());
        assert_eq!(err.to_string(), "Notification delivery failed: queue full");
    }
}
