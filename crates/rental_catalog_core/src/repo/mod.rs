//! Repository layer: one storage contract, two interchangeable backends.
//!
//! # Responsibility
//! - Define the per-entity storage contract (`Repository<E>`).
//! - Provide a transient in-process backend and a durable SQLite backend.
//!
//! # Invariants
//! - Write paths call `Entity::validate()` / `Entity::apply_update()` before
//!   anything is persisted; a failed update persists nothing.
//! - `get` / `get_by_attribute` signal a miss with `None`, never an error.
//! - `delete` is idempotent.
//! - Only the SQLite backend enforces unique fields (e-mail, amenity name,
//!   review place/user pair) at storage level. The in-memory backend has no
//!   such backstop, so concurrent check-then-insert sequences against it
//!   must be serialized by the caller when strict uniqueness matters.

pub mod memory_repo;
mod sql_records;
pub mod sqlite_repo;

use crate::db::DbError;
use crate::model::{Entity, EntityId, EntityKind, ValidationError};
use rusqlite::ffi;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use memory_repo::InMemoryRepository;
pub use sqlite_repo::{SqlRecord, SqliteRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level error for repository operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound {
        kind: EntityKind,
        id: EntityId,
    },
    /// A unique or primary-key constraint rejected the write.
    Conflict(String),
    /// A foreign-key constraint rejected the write.
    ForeignKey(String),
    /// Persisted data cannot be converted into a valid entity.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    /// A writer panicked while holding the storage lock.
    LockPoisoned(EntityKind),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::ForeignKey(message) => write!(f, "dangling reference: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::LockPoisoned(kind) => write!(f, "{kind} storage lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            let detail = message.clone().unwrap_or_else(|| failure.to_string());
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return Self::Conflict(detail);
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return Self::ForeignKey(detail),
                _ => {}
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for one entity type, keyed by id.
pub trait Repository<E: Entity>: Send + Sync {
    /// Stores a new entity. Fails with `Conflict` when the id is taken.
    fn add(&self, entity: &E) -> RepoResult<()>;
    fn get(&self, id: EntityId) -> RepoResult<Option<E>>;
    /// Insertion order for the in-memory backend; unspecified for SQLite.
    fn get_all(&self) -> RepoResult<Vec<E>>;
    /// Applies `patch` through `Entity::apply_update` and persists the result.
    fn update(&self, id: EntityId, patch: &E::Patch) -> RepoResult<E>;
    /// Removes the entity; absent ids are a no-op.
    fn delete(&self, id: EntityId) -> RepoResult<()>;
    /// First entity matching an equality lookup.
    fn get_by_attribute(&self, lookup: &E::Lookup) -> RepoResult<Option<E>>;
    /// Every entity matching an equality lookup.
    fn list_by_attribute(&self, lookup: &E::Lookup) -> RepoResult<Vec<E>>;
}
