//! Integer identifiers for users, relationships and relationship types
//!
//! All three map onto SQLite `INTEGER PRIMARY KEY` columns. Wrapping them
//! keeps a user id from being passed where a relationship id is expected.

use std::fmt;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw row identifier
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the raw row identifier
            pub const fn value(&self) -> i64 {
                self.0
            }

            /// Parse an identifier from its decimal form
            pub fn parse(s: &str) -> Result<Self, String> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|e| format!("Invalid {} '{}': {}", stringify!($name), s, e))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// Identifier of a user in the host platform's user table
    UserId
);

integer_id!(
    /// Identifier of a relationship row
    RelationshipId
);

integer_id!(
    /// Identifier of a relationship type
    RelationshipTypeId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let id = UserId::parse("42").unwrap();
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(RelationshipId::parse(" 7 ").unwrap(), RelationshipId::new(7));
    }

    #[test]
    fn test_parse_invalid() {
        let err = RelationshipTypeId::parse("friend").unwrap_err();
        assert!(err.contains("RelationshipTypeId"));
        assert!(UserId::parse("").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Ordering follows the underlying integer
        #[test]
        fn test_id_ordering_property(a: i64, b: i64) {
            prop_assert_eq!(UserId::new(a) < UserId::new(b), a < b);
            prop_assert_eq!(RelationshipId::new(a) == RelationshipId::new(b), a == b);
        }

        /// Display output parses back to the same id
        #[test]
        fn test_id_string_roundtrip(value: i64) {
            let id = RelationshipId::new(value);
            prop_assert_eq!(RelationshipId::parse(&id.to_string()).unwrap(), id);
        }
    }
}
