//! Precondition checks for new relationship proposals

use crate::error::{Result, ServiceError, ValidationError};
use crate::ServiceConfig;
use kinship_domain::traits::{RelationshipStore, RelationshipTypeCatalog, UserDirectory};
use kinship_domain::{NewRelationship, RelationshipType, User, UserId};
use std::fmt;

/// A proposal whose references all resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProposal {
    /// Proposing user
    pub requester: User,

    /// Receiving user
    pub target: User,

    /// Relationship type
    pub relationship_type: RelationshipType,
}

/// Validates proposals before anything is written
pub struct Validator {
    config: ServiceConfig,
}

impl Validator {
    /// Create a validator with the given configuration
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    /// Create a validator with default configuration
    pub fn default_config() -> Self {
        Self::new(ServiceConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Check a proposal against the store
    ///
    /// Checks run in order: required fields, self-relationship, requester,
    /// target, relationship type, duplicates. The first failure is returned.
    pub fn validate<S>(&self, new: &NewRelationship, store: &S) -> Result<ValidatedProposal>
    where
        S: UserDirectory + RelationshipTypeCatalog + RelationshipStore,
        <S as UserDirectory>::Error: fmt::Display,
        <S as RelationshipTypeCatalog>::Error: fmt::Display,
        <S as RelationshipStore>::Error: fmt::Display,
    {
        let requester_id = new
            .requester_id
            .ok_or(ValidationError::MissingField("requester_id"))?;
        let target_id = new
            .target_id
            .ok_or(ValidationError::MissingField("target_id"))?;
        let type_id = new
            .relationship_type_id
            .ok_or(ValidationError::MissingField("relationship_type_id"))?;

        if requester_id == target_id && !self.config.allow_self_relationship {
            return Err(ValidationError::SelfRelationship(requester_id).into());
        }

        let requester = Self::resolve_user(store, "requester_id", requester_id)?;
        let target = Self::resolve_user(store, "target_id", target_id)?;

        let relationship_type = store
            .get_relationship_type(type_id)
            .map_err(ServiceError::store)?
            .ok_or(ValidationError::UnknownRelationshipType(type_id))?;

        if self.config.reject_duplicates {
            if let Some(existing) = store
                .find_relationship(requester_id, target_id, type_id)
                .map_err(ServiceError::store)?
            {
                return Err(ValidationError::Duplicate { existing }.into());
            }
        }

        Ok(ValidatedProposal {
            requester,
            target,
            relationship_type,
        })
    }

    fn resolve_user<S>(store: &S, field: &'static str, id: UserId) -> Result<User>
    where
        S: UserDirectory,
        S::Error: fmt::Display,
    {
        store
            .find_user(id)
            .map_err(ServiceError::store)?
            .ok_or_else(|| ValidationError::UnknownUser { field, id }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_domain::RelationshipTypeId;
    use kinship_store::SqliteStore;

    fn seeded() -> (SqliteStore, User, User, RelationshipType) {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let alice = store.add_user("alice").unwrap();
        let bob = store.add_user("bob").unwrap();
        let friend = store.add_relationship_type("friend").unwrap();
        (store, alice, bob, friend)
    }

    fn validation_error(result: Result<ValidatedProposal>) -> ValidationError {
        match result {
            Err(ServiceError::Validation(e)) => e,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_proposal() {
        let (store, alice, bob, friend) = seeded();
        let validator = Validator::default_config();

        let proposal = validator
            .validate(&NewRelationship::new(alice.id, bob.id, friend.id), &store)
            .unwrap();
        assert_eq!(proposal.requester, alice);
        assert_eq!(proposal.target, bob);
        assert_eq!(proposal.relationship_type, friend);
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let (store, alice, bob, _) = seeded();
        let validator = Validator::default_config();

        let err = validation_error(validator.validate(&NewRelationship::default(), &store));
        assert_eq!(err, ValidationError::MissingField("requester_id"));

        let partial = NewRelationship {
            requester_id: Some(alice.id),
            target_id: Some(bob.id),
            relationship_type_id: None,
        };
        let err = validation_error(validator.validate(&partial, &store));
        assert_eq!(err, ValidationError::MissingField("relationship_type_id"));
    }

    #[test]
    fn test_unknown_references() {
        let (store, alice, bob, friend) = seeded();
        let validator = Validator::default_config();

        let err = validation_error(
            validator.validate(&NewRelationship::new(alice.id, UserId::new(99), friend.id), &store),
        );
        assert_eq!(
            err,
            ValidationError::UnknownUser {
                field: "target_id",
                id: UserId::new(99)
            }
        );

        let err = validation_error(
            validator.validate(&NewRelationship::new(UserId::new(98), alice.id, friend.id), &store),
        );
        assert!(matches!(err, ValidationError::UnknownUser { field: "requester_id", .. }));

        let err = validation_error(validator.validate(
            &NewRelationship::new(alice.id, bob.id, RelationshipTypeId::new(7)),
            &store,
        ));
        assert_eq!(
            err,
            ValidationError::UnknownRelationshipType(RelationshipTypeId::new(7))
        );
    }

    #[test]
    fn test_self_relationship_is_configurable() {
        let (store, alice, _, friend) = seeded();
        let proposal = NewRelationship::new(alice.id, alice.id, friend.id);

        let err = validation_error(Validator::default_config().validate(&proposal, &store));
        assert_eq!(err, ValidationError::SelfRelationship(alice.id));

        let permissive = Validator::new(ServiceConfig::permissive());
        assert!(permissive.validate(&proposal, &store).is_ok());
    }

    #[test]
    fn test_duplicate_detection_is_configurable() {
        let (mut store, alice, bob, friend) = seeded();
        let existing = store.insert_relationship(alice.id, bob.id, friend.id).unwrap();
        let proposal = NewRelationship::new(alice.id, bob.id, friend.id);

        let err = validation_error(Validator::default_config().validate(&proposal, &store));
        assert_eq!(err, ValidationError::Duplicate { existing });

        let permissive = Validator::new(ServiceConfig::permissive());
        assert!(permissive.validate(&proposal, &store).is_ok());

        // The reverse direction is a different proposal
        let reverse = NewRelationship::new(bob.id, alice.id, friend.id);
        assert!(Validator::default_config().validate(&reverse, &store).is_ok());
    }
}
