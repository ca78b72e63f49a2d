//! Kinship Service
//!
//! The relationship lifecycle: propose, approve, deny and remove, with the
//! notifications and activity events each transition emits.
//!
//! | Transition | Row | Notification | Activity |
//! |------------|-----|--------------|----------|
//! | `create` | inserted, pending | Proposed: requester → target | none |
//! | `approve` | `approved = 1` (pending only) | Approved: target → requester | requester's stream |
//! | `deny` | deleted (pending only) | Denied: target → requester | none |
//! | `remove_by_target` | deleted | Removed: target → requester | none |
//! | `remove_by_requester` | deleted | Removed: requester → target | none |
//!
//! # Usage
//!
//! ```no_run
//! use kinship_domain::NewRelationship;
//! use kinship_service::{RelationshipService, ServiceConfig};
//! use kinship_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("kinship.db")?;
//! let mut service = RelationshipService::with_tracing(store, ServiceConfig::default());
//!
//! let rel = service.create(NewRelationship::new(
//!     kinship_domain::UserId::new(1),
//!     kinship_domain::UserId::new(2),
//!     kinship_domain::RelationshipTypeId::new(1),
//! ))?;
//! service.approve(rel.id)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! allow_self_relationship = false
//! reject_duplicates = true
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod notify;
mod service;
mod validator;

pub use config::{ConfigError, ServiceConfig};
pub use error::{Result, ServiceError, StateError, ValidationError};
pub use notify::{Fanout, RecordingNotifier, TracingNotifier};
pub use service::RelationshipService;
pub use validator::{ValidatedProposal, Validator};
