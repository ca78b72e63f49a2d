//! Relationship module - directed, typed proposals between two users

use crate::{RelationshipId, RelationshipTypeId, UserId};

/// A named category of relationship ("friend", "colleague")
///
/// Reference data maintained by an administrator. The relationship logic
/// only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipType {
    /// Type identifier
    pub id: RelationshipTypeId,

    /// Display name
    pub name: String,
}

impl RelationshipType {
    /// Create a new relationship type
    pub fn new(id: impl Into<RelationshipTypeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Which side of a relationship a user is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    /// The user who proposed the relationship
    Requester,

    /// The user the proposal was addressed to
    Target,
}

/// A directed relationship between two users
///
/// `approved == false` means the proposal is pending. There is no persisted
/// denied state: denial and removal delete the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Row identifier
    pub id: RelationshipId,

    /// User who proposed the relationship
    pub requester_id: UserId,

    /// User who receives the proposal
    pub target_id: UserId,

    /// Type of relationship
    pub relationship_type_id: RelationshipTypeId,

    /// Whether the target has accepted
    pub approved: bool,
}

impl Relationship {
    /// Whether the relationship is still awaiting the target's answer
    pub fn is_pending(&self) -> bool {
        !self.approved
    }

    /// The role `user` plays in this relationship, if any
    ///
    /// For a self-relationship the requester role wins.
    pub fn party_role(&self, user: UserId) -> Option<PartyRole> {
        if user == self.requester_id {
            Some(PartyRole::Requester)
        } else if user == self.target_id {
            Some(PartyRole::Target)
        } else {
            None
        }
    }
}

/// Input for proposing a relationship
///
/// Fields are optional so a caller building this from a form can be told
/// precisely which field was missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewRelationship {
    /// Proposing user
    pub requester_id: Option<UserId>,

    /// Receiving user
    pub target_id: Option<UserId>,

    /// Relationship type
    pub relationship_type_id: Option<RelationshipTypeId>,
}

impl NewRelationship {
    /// Build a fully populated proposal
    pub fn new(
        requester_id: impl Into<UserId>,
        target_id: impl Into<UserId>,
        relationship_type_id: impl Into<RelationshipTypeId>,
    ) -> Self {
        Self {
            requester_id: Some(requester_id.into()),
            target_id: Some(target_id.into()),
            relationship_type_id: Some(relationship_type_id.into()),
        }
    }
}

/// Listing projection: a relationship joined with its type name and both usernames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipView {
    /// Relationship identifier
    pub id: RelationshipId,

    /// Requester id
    pub requester_id: UserId,

    /// Requester username
    pub requester_name: String,

    /// Target id
    pub target_id: UserId,

    /// Target username
    pub target_name: String,

    /// Type id
    pub relationship_type_id: RelationshipTypeId,

    /// Type display name
    pub relationship_type_name: String,

    /// Approval flag
    pub approved: bool,
}

impl RelationshipView {
    /// Strip the joined columns back to the stored record
    pub fn to_relationship(&self) -> Relationship {
        Relationship {
            id: self.id,
            requester_id: self.requester_id,
            target_id: self.target_id,
            relationship_type_id: self.relationship_type_id,
            approved: self.approved,
        }
    }
}
