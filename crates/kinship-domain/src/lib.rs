//! Kinship Domain Layer
//!
//! Core types and trait seams for typed user relationships. This crate holds
//! no infrastructure: storage, user lookup and notification delivery are
//! reached only through the traits in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Relationship**: a directed proposal from a requester to a target, carrying
//!   a type and an approval flag
//! - **RelationshipType**: administrator-managed reference data ("friend", "colleague")
//! - **Notification**: a message to one user about a relationship transition
//! - **Activity**: an event published on a user's own activity stream
//!
//! ## Lifecycle
//!
//! ```text
//! propose ──► pending ──approve──► approved
//!                │                    │
//!              deny                remove
//!                ▼                    ▼
//!             deleted              deleted
//! ```
//!
//! A pending relationship may also be removed by either party.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod event;
pub mod ids;
pub mod relationship;
pub mod traits;
pub mod user;

// Re-exports for convenience
pub use event::{Activity, ActivityKind, EventId, Notification, NotificationKind};
pub use ids::{RelationshipId, RelationshipTypeId, UserId};
pub use relationship::{
    NewRelationship, PartyRole, Relationship, RelationshipType, RelationshipView,
};
pub use user::User;
