//! User handle resolved through the host's user directory

use crate::UserId;

/// A user as seen by this module: an id plus the name used to address them
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    /// User identifier
    pub id: UserId,

    /// Display username
    pub username: String,
}

impl User {
    /// Create a new user handle
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}
