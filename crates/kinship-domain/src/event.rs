//! Notification and activity events emitted by relationship transitions

use crate::{Relationship, RelationshipType, User};
use std::fmt;

/// Unique identifier for an emitted event, based on UUIDv7
///
/// Delivery is best-effort; a downstream pipeline that retries can use the
/// id to drop redelivered events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u128);

impl EventId {
    /// Generate a new time-ordered event id
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Kind of notification sent to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// A relationship was proposed to the recipient
    Proposed,

    /// The recipient's proposal was accepted
    Approved,

    /// The recipient's proposal was turned down
    Denied,

    /// The other party ended the relationship
    Removed,
}

impl NotificationKind {
    /// Stable name used by delivery pipelines
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Proposed => "relationship.proposed",
            NotificationKind::Approved => "relationship.approved",
            NotificationKind::Denied => "relationship.denied",
            NotificationKind::Removed => "relationship.removed",
        }
    }

    /// Human-readable line for a notification from `from` of type `type_name`
    pub fn describe(&self, from: &str, type_name: &str) -> String {
        match self {
            NotificationKind::Proposed => {
                format!("{} would like to add you as {}", from, type_name)
            }
            NotificationKind::Approved => {
                format!("{} accepted your {} request", from, type_name)
            }
            NotificationKind::Denied => {
                format!("{} declined your {} request", from, type_name)
            }
            NotificationKind::Removed => {
                format!("{} removed your {} relationship", from, type_name)
            }
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification addressed to one user about one relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Event identifier
    pub id: EventId,

    /// What happened
    pub kind: NotificationKind,

    /// User the notification is attributed to
    pub from: User,

    /// Recipient
    pub to: User,

    /// Relationship the notification is about
    pub subject: Relationship,

    /// Type of the relationship, for rendering
    pub relationship_type: RelationshipType,
}

impl Notification {
    /// Create a notification with a fresh event id
    pub fn new(
        kind: NotificationKind,
        from: User,
        to: User,
        subject: Relationship,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            id: EventId::new(),
            kind,
            from,
            to,
            subject,
            relationship_type,
        }
    }

    /// Rendered one-line message for the recipient
    pub fn message(&self) -> String {
        self.kind
            .describe(&self.from.username, &self.relationship_type.name)
    }
}

/// Kind of activity published to a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    /// A relationship became established
    RelationshipCreated,
}

impl ActivityKind {
    /// Stable name used by activity pipelines
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::RelationshipCreated => "relationship.created",
        }
    }
}

/// An activity-stream event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    /// Event identifier
    pub id: EventId,

    /// What happened
    pub kind: ActivityKind,

    /// User who performed the activity
    pub actor: User,

    /// User whose stream holds the activity
    pub container: User,

    /// Relationship the activity is about
    pub subject: Relationship,
}

impl Activity {
    /// Create an activity with a fresh event id
    pub fn new(kind: ActivityKind, actor: User, container: User, subject: Relationship) -> Self {
        Self {
            id: EventId::new(),
            kind,
            actor,
            container,
            subject,
        }
    }
}
