//! Command implementations.

pub mod kind;
pub mod list;
pub mod relationship;
pub mod user;

pub use self::kind::execute_type;
pub use self::list::{execute_list, execute_show};
pub use self::relationship::{execute_approve, execute_deny, execute_propose, execute_remove};
pub use self::user::execute_user;

use crate::error::{CliError, Result};
use kinship_domain::traits::RelationshipTypeCatalog;
use kinship_domain::{RelationshipId, RelationshipTypeId, UserId};
use kinship_service::{Fanout, RecordingNotifier, RelationshipService, TracingNotifier};
use kinship_store::SqliteStore;

/// Event sink the binary runs with: every event is logged, then recorded so
/// each command can report what it sent.
pub type Events = Fanout<TracingNotifier, RecordingNotifier>;

/// Service wired the way the binary runs it.
pub type Service = RelationshipService<SqliteStore, Events, Events>;

/// Resolve a user given by username or numeric id.
///
/// Usernames win; a numeric id is passed through unchecked so the service
/// reports unknown users itself.
pub fn resolve_user(store: &SqliteStore, input: &str) -> Result<UserId> {
    if let Some(user) = store.find_user_by_name(input)? {
        return Ok(user.id);
    }
    UserId::parse(input).map_err(|_| CliError::InvalidInput(format!("Unknown user '{}'", input)))
}

/// Resolve a relationship type given by name or numeric id.
pub fn resolve_type(store: &SqliteStore, input: &str) -> Result<RelationshipTypeId> {
    let types = store.list_relationship_types()?;
    if let Some(rt) = types.iter().find(|t| t.name == input) {
        return Ok(rt.id);
    }
    RelationshipTypeId::parse(input)
        .map_err(|_| CliError::InvalidInput(format!("Unknown relationship type '{}'", input)))
}

/// Parse a relationship id argument.
pub fn parse_relationship_id(input: &str) -> Result<RelationshipId> {
    RelationshipId::parse(input).map_err(CliError::InvalidInput)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Events, Service};
    use kinship_service::{RecordingNotifier, RelationshipService, ServiceConfig, TracingNotifier};
    use kinship_store::SqliteStore;

    /// In-memory service seeded with alice, bob and a `friend` type.
    pub fn seeded_service() -> (Service, RecordingNotifier) {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.add_user("alice").unwrap();
        store.add_user("bob").unwrap();
        store.add_relationship_type("friend").unwrap();
        let recorder = RecordingNotifier::new();
        let events = Events::new(TracingNotifier, recorder.clone());
        let service = RelationshipService::new(
            store,
            events.clone(),
            events,
            ServiceConfig::default(),
        );
        (service, recorder)
    }
}
