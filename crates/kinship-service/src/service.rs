//! Relationship state transitions and read-side queries

use crate::error::{Result, ServiceError, StateError};
use crate::notify::TracingNotifier;
use crate::validator::Validator;
use crate::ServiceConfig;
use kinship_domain::traits::{
    ActivityPublisher, DeleteGuard, NotificationDispatcher, RelationshipFilter,
    RelationshipStore, RelationshipTypeCatalog, UserDirectory, WriteOutcome,
};
use kinship_domain::{
    Activity, ActivityKind, NewRelationship, Notification, NotificationKind, PartyRole,
    Relationship, RelationshipId, RelationshipType, RelationshipView, User, UserId,
};
use std::fmt;
use tracing::{debug, info, warn};

/// Both users and the type of a relationship, resolved for addressing
struct Parties {
    requester: User,
    target: User,
    relationship_type: RelationshipType,
}

/// Owns the relationship lifecycle
///
/// Each transition writes through the store in a single transaction, then
/// dispatches its notifications. Dispatch is best-effort: a failing
/// dispatcher is logged and the transition still succeeds.
///
/// # Examples
///
/// ```
/// use kinship_domain::NewRelationship;
/// use kinship_service::{RecordingNotifier, RelationshipService, ServiceConfig};
/// use kinship_store::SqliteStore;
///
/// let mut store = SqliteStore::open_in_memory().unwrap();
/// let alice = store.add_user("alice").unwrap();
/// let bob = store.add_user("bob").unwrap();
/// let friend = store.add_relationship_type("friend").unwrap();
///
/// let events = RecordingNotifier::new();
/// let mut service =
///     RelationshipService::new(store, events.clone(), events.clone(), ServiceConfig::default());
///
/// let rel = service.create(NewRelationship::new(alice.id, bob.id, friend.id)).unwrap();
/// service.approve(rel.id).unwrap();
///
/// assert_eq!(service.list_approved_for_user(bob.id).unwrap().len(), 1);
/// assert_eq!(events.notifications().len(), 2);
/// assert_eq!(events.activities().len(), 1);
/// ```
pub struct RelationshipService<S, N = TracingNotifier, A = TracingNotifier> {
    store: S,
    notifier: N,
    activities: A,
    validator: Validator,
}

impl<S> RelationshipService<S, TracingNotifier, TracingNotifier> {
    /// Create a service that logs events instead of delivering them
    pub fn with_tracing(store: S, config: ServiceConfig) -> Self {
        Self::new(store, TracingNotifier, TracingNotifier, config)
    }
}

impl<S, N, A> RelationshipService<S, N, A> {
    /// Create a new service
    pub fn new(store: S, notifier: N, activities: A, config: ServiceConfig) -> Self {
        Self {
            store,
            notifier,
            activities,
            validator: Validator::new(config),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ServiceConfig {
        self.validator.config()
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the underlying store (administrative access)
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Borrow the notification dispatcher
    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

impl<S, N, A> RelationshipService<S, N, A>
where
    S: RelationshipStore + UserDirectory + RelationshipTypeCatalog,
    <S as RelationshipStore>::Error: fmt::Display,
    <S as UserDirectory>::Error: fmt::Display,
    <S as RelationshipTypeCatalog>::Error: fmt::Display,
    N: NotificationDispatcher,
    A: ActivityPublisher,
{
    /// Propose a relationship
    ///
    /// Validates every reference, persists a pending row and notifies the
    /// target. On a validation failure nothing is written or sent.
    pub fn create(&mut self, new: NewRelationship) -> Result<Relationship> {
        debug!(?new, "proposing relationship");

        let proposal = self.validator.validate(&new, &self.store)?;
        let rel = self
            .store
            .insert_relationship(
                proposal.requester.id,
                proposal.target.id,
                proposal.relationship_type.id,
            )
            .map_err(ServiceError::store)?;

        info!(
            relationship_id = %rel.id,
            requester = %rel.requester_id,
            target = %rel.target_id,
            relationship_type = %proposal.relationship_type.name,
            "relationship proposed"
        );

        self.dispatch(Notification::new(
            NotificationKind::Proposed,
            proposal.requester,
            proposal.target,
            rel.clone(),
            proposal.relationship_type,
        ));

        Ok(rel)
    }

    /// Accept a pending relationship
    ///
    /// The update only applies while the row is still pending, so the
    /// approval notification and the activity fire exactly once.
    pub fn approve(&mut self, id: RelationshipId) -> Result<Relationship> {
        debug!(relationship_id = %id, "approving relationship");

        let rel = match self.store.mark_approved(id).map_err(ServiceError::store)? {
            WriteOutcome::Applied(rel) => rel,
            WriteOutcome::Conflict(_) => return Err(StateError::AlreadyApproved(id).into()),
            WriteOutcome::Missing => return Err(ServiceError::NotFound(id)),
        };

        info!(relationship_id = %id, "relationship approved");

        if let Some(parties) = self.resolve_parties(&rel) {
            self.dispatch(Notification::new(
                NotificationKind::Approved,
                parties.target,
                parties.requester.clone(),
                rel.clone(),
                parties.relationship_type,
            ));
            self.publish(Activity::new(
                ActivityKind::RelationshipCreated,
                parties.requester.clone(),
                parties.requester,
                rel.clone(),
            ));
        }

        Ok(rel)
    }

    /// Turn down a pending relationship
    ///
    /// Deletes the row and notifies the requester. Returns the deleted record.
    pub fn deny(&mut self, id: RelationshipId) -> Result<Relationship> {
        debug!(relationship_id = %id, "denying relationship");

        let rel = match self
            .store
            .delete_relationship(id, DeleteGuard::PendingOnly)
            .map_err(ServiceError::store)?
        {
            WriteOutcome::Applied(rel) => rel,
            WriteOutcome::Conflict(_) => return Err(StateError::NotPending(id).into()),
            WriteOutcome::Missing => return Err(ServiceError::NotFound(id)),
        };

        info!(relationship_id = %id, "relationship denied");

        if let Some(parties) = self.resolve_parties(&rel) {
            self.dispatch(Notification::new(
                NotificationKind::Denied,
                parties.target,
                parties.requester,
                rel.clone(),
                parties.relationship_type,
            ));
        }

        Ok(rel)
    }

    /// The target ends the relationship; the requester is notified
    pub fn remove_by_target(&mut self, id: RelationshipId) -> Result<Relationship> {
        self.remove(id, PartyRole::Target)
    }

    /// The requester ends the relationship; the target is notified
    pub fn remove_by_requester(&mut self, id: RelationshipId) -> Result<Relationship> {
        self.remove(id, PartyRole::Requester)
    }

    fn remove(&mut self, id: RelationshipId, initiator: PartyRole) -> Result<Relationship> {
        debug!(relationship_id = %id, ?initiator, "removing relationship");

        let rel = match self
            .store
            .delete_relationship(id, DeleteGuard::Any)
            .map_err(ServiceError::store)?
        {
            WriteOutcome::Applied(rel) => rel,
            // An unguarded delete never conflicts; treat a concurrent change as gone
            WriteOutcome::Conflict(_) | WriteOutcome::Missing => {
                return Err(ServiceError::NotFound(id))
            }
        };

        info!(relationship_id = %id, ?initiator, "relationship removed");

        if let Some(parties) = self.resolve_parties(&rel) {
            let (from, to) = match initiator {
                PartyRole::Target => (parties.target, parties.requester),
                PartyRole::Requester => (parties.requester, parties.target),
            };
            self.dispatch(Notification::new(
                NotificationKind::Removed,
                from,
                to,
                rel.clone(),
                parties.relationship_type,
            ));
        }

        Ok(rel)
    }

    /// Approve on behalf of `actor`, who must be the target
    pub fn approve_as(&mut self, actor: UserId, id: RelationshipId) -> Result<Relationship> {
        let rel = self.get(id)?;
        if rel.target_id != actor {
            return Err(ServiceError::Forbidden { actor, id });
        }
        self.approve(id)
    }

    /// Deny on behalf of `actor`, who must be the target
    pub fn deny_as(&mut self, actor: UserId, id: RelationshipId) -> Result<Relationship> {
        let rel = self.get(id)?;
        if rel.target_id != actor {
            return Err(ServiceError::Forbidden { actor, id });
        }
        self.deny(id)
    }

    /// Remove on behalf of `actor`, who must be one of the parties
    ///
    /// The notification goes to the other party.
    pub fn remove_as(&mut self, actor: UserId, id: RelationshipId) -> Result<Relationship> {
        let rel = self.get(id)?;
        match rel.party_role(actor) {
            Some(role) => self.remove(id, role),
            None => Err(ServiceError::Forbidden { actor, id }),
        }
    }

    /// Get a relationship by id
    pub fn get(&self, id: RelationshipId) -> Result<Relationship> {
        self.store
            .get_relationship(id)
            .map_err(ServiceError::store)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Approved relationships where `user` is requester or target, by id
    pub fn list_approved_for_user(&self, user: UserId) -> Result<Vec<RelationshipView>> {
        self.list_for_user(user, &RelationshipFilter::approved())
    }

    /// Pending relationships where `user` is requester or target, by id
    pub fn list_pending_for_user(&self, user: UserId) -> Result<Vec<RelationshipView>> {
        self.list_for_user(user, &RelationshipFilter::pending())
    }

    /// Pending relationships waiting on `user`'s answer, by id
    pub fn list_incoming_pending(&self, user: UserId) -> Result<Vec<RelationshipView>> {
        self.list_for_user(user, &RelationshipFilter::incoming_pending())
    }

    /// Relationships involving `user` that match `filter`, by id
    pub fn list_for_user(
        &self,
        user: UserId,
        filter: &RelationshipFilter,
    ) -> Result<Vec<RelationshipView>> {
        self.store
            .list_for_user(user, filter)
            .map_err(ServiceError::store)
    }

    /// All relationship types, by id
    pub fn relationship_types(&self) -> Result<Vec<RelationshipType>> {
        self.store
            .list_relationship_types()
            .map_err(ServiceError::store)
    }

    /// Resolve addressing for a relationship whose write already committed
    ///
    /// A failure here must not fail the transition, so it is logged and the
    /// notifications are skipped.
    fn resolve_parties(&self, rel: &Relationship) -> Option<Parties> {
        let lookup = || -> Result<Parties> {
            let requester = self.lookup_user(rel.requester_id)?;
            let target = self.lookup_user(rel.target_id)?;
            let relationship_type = self
                .store
                .get_relationship_type(rel.relationship_type_id)
                .map_err(ServiceError::store)?
                .ok_or_else(|| {
                    ServiceError::Store(format!(
                        "relationship type {} missing",
                        rel.relationship_type_id
                    ))
                })?;
            Ok(Parties {
                requester,
                target,
                relationship_type,
            })
        };

        match lookup() {
            Ok(parties) => Some(parties),
            Err(e) => {
                warn!(relationship_id = %rel.id, error = %e, "cannot address notifications");
                None
            }
        }
    }

    fn lookup_user(&self, id: UserId) -> Result<User> {
        self.store
            .find_user(id)
            .map_err(ServiceError::store)?
            .ok_or_else(|| ServiceError::Store(format!("user {} missing", id)))
    }

    fn dispatch(&self, notification: Notification) {
        if let Err(e) = self.notifier.send(&notification) {
            warn!(
                event_id = %notification.id,
                kind = notification.kind.as_str(),
                relationship_id = %notification.subject.id,
                error = %e,
                "notification dispatch failed"
            );
        }
    }

    fn publish(&self, activity: Activity) {
        if let Err(e) = self.activities.publish(&activity) {
            warn!(
                event_id = %activity.id,
                kind = activity.kind.as_str(),
                relationship_id = %activity.subject.id,
                error = %e,
                "activity publish failed"
            );
        }
    }
}
