//! Kinship Storage Layer
//!
//! Implements the relationship store, user directory and relationship type
//! catalog over SQLite.
//!
//! # Architecture
//!
//! - `relationship` holds one row per proposal, in the column layout the host
//!   platform already uses (`user_id`, `other_user_id`, `relationship_type`,
//!   `approved`)
//! - `user` and `relationship_type` are host-owned reference tables,
//!   provisioned here so the store can run standalone
//! - Foreign keys are enforced, so a row can never point at a missing user or type
//!
//! # Examples
//!
//! ```no_run
//! use kinship_store::SqliteStore;
//!
//! let mut store = SqliteStore::new(":memory:").unwrap();
//! let alice = store.add_user("alice").unwrap();
//! let friend = store.add_relationship_type("friend").unwrap();
//! ```

#![warn(missing_docs)]

use kinship_domain::traits::{
    DeleteGuard, Direction, RelationshipFilter, RelationshipStore, RelationshipTypeCatalog,
    UserDirectory, WriteOutcome,
};
use kinship_domain::{
    Relationship, RelationshipId, RelationshipType, RelationshipTypeId, RelationshipView, User,
    UserId,
};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Unique constraint violated
    #[error("Duplicate: {0}")]
    Duplicate(String),
}

const RELATIONSHIP_COLUMNS: &str = "id, user_id, other_user_id, relationship_type, approved";

/// How long a writer waits for another connection's write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based relationship store
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance. Transitions take the write lock up front
/// (`BEGIN IMMEDIATE`), so handles on the same file serialize their
/// approvals and deletes instead of failing with `SQLITE_BUSY`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open a fresh in-memory store
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Register a user (host-owned data; used for standalone deployments and tests)
    pub fn add_user(&mut self, username: &str) -> Result<User, StoreError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(StoreError::InvalidData("username must not be empty".to_string()));
        }

        self.conn
            .execute("INSERT INTO \"user\" (username) VALUES (?1)", params![username])
            .map_err(|e| unique_violation(e, || format!("user '{}' already exists", username)))?;

        let id = UserId::new(self.conn.last_insert_rowid());
        debug!(user_id = %id, username, "user added");
        Ok(User::new(id, username))
    }

    /// Find a user by username
    pub fn find_user_by_name(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username FROM \"user\" WHERE username = ?1",
                params![username],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// All users, ordered by id
    pub fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username FROM \"user\" ORDER BY id")?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Create a relationship type (administrator operation)
    pub fn add_relationship_type(&mut self, name: &str) -> Result<RelationshipType, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidData(
                "relationship type name must not be empty".to_string(),
            ));
        }

        self.conn
            .execute("INSERT INTO relationship_type (name) VALUES (?1)", params![name])
            .map_err(|e| {
                unique_violation(e, || format!("relationship type '{}' already exists", name))
            })?;

        let id = RelationshipTypeId::new(self.conn.last_insert_rowid());
        debug!(type_id = %id, name, "relationship type added");
        Ok(RelationshipType::new(id, name))
    }

    /// Number of relationship rows (all states)
    pub fn count_relationships(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM relationship", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn select_relationship(
        conn: &Connection,
        id: RelationshipId,
    ) -> Result<Option<Relationship>, rusqlite::Error> {
        conn.query_row(
            &format!("SELECT {} FROM relationship WHERE id = ?1", RELATIONSHIP_COLUMNS),
            params![id.value()],
            relationship_from_row,
        )
        .optional()
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId::new(row.get(0)?),
        username: row.get(1)?,
    })
}

fn relationship_from_row(row: &Row<'_>) -> rusqlite::Result<Relationship> {
    Ok(Relationship {
        id: RelationshipId::new(row.get(0)?),
        requester_id: UserId::new(row.get(1)?),
        target_id: UserId::new(row.get(2)?),
        relationship_type_id: RelationshipTypeId::new(row.get(3)?),
        approved: row.get::<_, i64>(4)? != 0,
    })
}

fn view_from_row(row: &Row<'_>) -> rusqlite::Result<RelationshipView> {
    Ok(RelationshipView {
        id: RelationshipId::new(row.get(0)?),
        requester_id: UserId::new(row.get(1)?),
        requester_name: row.get(2)?,
        target_id: UserId::new(row.get(3)?),
        target_name: row.get(4)?,
        relationship_type_id: RelationshipTypeId::new(row.get(5)?),
        relationship_type_name: row.get(6)?,
        approved: row.get::<_, i64>(7)? != 0,
    })
}

/// Map a UNIQUE violation to `StoreError::Duplicate`, anything else to `Database`
fn unique_violation(err: rusqlite::Error, message: impl FnOnce() -> String) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            StoreError::Duplicate(message())
        }
        _ => StoreError::Database(err),
    }
}

impl UserDirectory for SqliteStore {
    type Error = StoreError;

    fn find_user(&self, id: UserId) -> Result<Option<User>, Self::Error> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username FROM \"user\" WHERE id = ?1",
                params![id.value()],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }
}

impl RelationshipTypeCatalog for SqliteStore {
    type Error = StoreError;

    fn get_relationship_type(
        &self,
        id: RelationshipTypeId,
    ) -> Result<Option<RelationshipType>, Self::Error> {
        let rt = self
            .conn
            .query_row(
                "SELECT id, name FROM relationship_type WHERE id = ?1",
                params![id.value()],
                |row| {
                    Ok(RelationshipType {
                        id: RelationshipTypeId::new(row.get(0)?),
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(rt)
    }

    fn list_relationship_types(&self) -> Result<Vec<RelationshipType>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM relationship_type ORDER BY id")?;
        let types = stmt
            .query_map([], |row| {
                Ok(RelationshipType {
                    id: RelationshipTypeId::new(row.get(0)?),
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(types)
    }
}

impl RelationshipStore for SqliteStore {
    type Error = StoreError;

    fn insert_relationship(
        &mut self,
        requester_id: UserId,
        target_id: UserId,
        relationship_type_id: RelationshipTypeId,
    ) -> Result<Relationship, Self::Error> {
        self.conn.execute(
            "INSERT INTO relationship (user_id, other_user_id, relationship_type, approved)
             VALUES (?1, ?2, ?3, 0)",
            params![
                requester_id.value(),
                target_id.value(),
                relationship_type_id.value(),
            ],
        )?;

        let id = RelationshipId::new(self.conn.last_insert_rowid());
        debug!(relationship_id = %id, "relationship row inserted");

        Ok(Relationship {
            id,
            requester_id,
            target_id,
            relationship_type_id,
            approved: false,
        })
    }

    fn get_relationship(&self, id: RelationshipId) -> Result<Option<Relationship>, Self::Error> {
        Ok(Self::select_relationship(&self.conn, id)?)
    }

    fn find_relationship(
        &self,
        requester_id: UserId,
        target_id: UserId,
        relationship_type_id: RelationshipTypeId,
    ) -> Result<Option<Relationship>, Self::Error> {
        let rel = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM relationship
                     WHERE user_id = ?1 AND other_user_id = ?2 AND relationship_type = ?3
                     ORDER BY id LIMIT 1",
                    RELATIONSHIP_COLUMNS
                ),
                params![
                    requester_id.value(),
                    target_id.value(),
                    relationship_type_id.value(),
                ],
                relationship_from_row,
            )
            .optional()?;
        Ok(rel)
    }

    fn mark_approved(&mut self, id: RelationshipId) -> Result<WriteOutcome, Self::Error> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Guarded on the previous value so concurrent approvals apply once
        let updated = tx.execute(
            "UPDATE relationship SET approved = 1 WHERE id = ?1 AND approved = 0",
            params![id.value()],
        )?;
        let current = Self::select_relationship(&tx, id)?;
        tx.commit()?;

        Ok(match current {
            Some(rel) if updated == 1 => WriteOutcome::Applied(rel),
            Some(rel) => WriteOutcome::Conflict(rel),
            None => WriteOutcome::Missing,
        })
    }

    fn delete_relationship(
        &mut self,
        id: RelationshipId,
        guard: DeleteGuard,
    ) -> Result<WriteOutcome, Self::Error> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let outcome = match Self::select_relationship(&tx, id)? {
            None => WriteOutcome::Missing,
            Some(rel) if guard == DeleteGuard::PendingOnly && !rel.is_pending() => {
                WriteOutcome::Conflict(rel)
            }
            Some(rel) => {
                let deleted = match guard {
                    DeleteGuard::Any => {
                        tx.execute("DELETE FROM relationship WHERE id = ?1", params![id.value()])?
                    }
                    DeleteGuard::PendingOnly => tx.execute(
                        "DELETE FROM relationship WHERE id = ?1 AND approved = 0",
                        params![id.value()],
                    )?,
                };
                if deleted == 1 {
                    WriteOutcome::Applied(rel)
                } else {
                    WriteOutcome::Missing
                }
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    fn list_for_user(
        &self,
        user: UserId,
        filter: &RelationshipFilter,
    ) -> Result<Vec<RelationshipView>, Self::Error> {
        let mut sql = String::from(
            "SELECT r.id, r.user_id, u.username, r.other_user_id, o.username,
                    r.relationship_type, t.name, r.approved
             FROM relationship r
             JOIN \"user\" u ON u.id = r.user_id
             JOIN \"user\" o ON o.id = r.other_user_id
             JOIN relationship_type t ON t.id = r.relationship_type
             WHERE ",
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        match filter.direction {
            Direction::Either => sql.push_str("(r.user_id = ? OR r.other_user_id = ?)"),
            Direction::Incoming => sql.push_str("r.other_user_id = ?"),
            Direction::Outgoing => sql.push_str("r.user_id = ?"),
        }
        params.push(Box::new(user.value()));
        if filter.direction == Direction::Either {
            params.push(Box::new(user.value()));
        }

        if let Some(approved) = filter.approved {
            sql.push_str(" AND r.approved = ?");
            params.push(Box::new(approved as i64));
        }

        sql.push_str(" ORDER BY r.id");

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let views = stmt
            .query_map(&param_refs[..], view_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(views)
    }
}
