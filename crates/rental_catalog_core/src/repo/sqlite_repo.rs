//! Durable SQLite repository.
//!
//! # Responsibility
//! - Implement `Repository<E>` for every entity with a `SqlRecord` mapping.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Each write is one committed transaction (`BEGIN IMMEDIATE`).
//! - Updates read, patch, validate and write inside the same transaction.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Unique indexes turn a lost check-then-insert race into `Conflict`.

use super::{RepoError, RepoResult, Repository};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::SharedConnection;
use crate::model::{Entity, EntityId};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::marker::PhantomData;
use std::sync::MutexGuard;

/// Table mapping for one entity type.
pub trait SqlRecord: Entity {
    const TABLE: &'static str;
    /// `SELECT <columns> FROM <table>` with no trailing clause.
    const SELECT_SQL: &'static str;
    /// Positional insert matching `insert_values`.
    const INSERT_SQL: &'static str;
    /// Positional update matching `update_values`; the id binds last.
    const UPDATE_SQL: &'static str;

    fn insert_values(&self) -> Vec<Value>;
    fn update_values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
    /// `WHERE ...` clause plus bind values for an equality lookup.
    fn lookup_filter(lookup: &Self::Lookup) -> (&'static str, Vec<Value>);

    /// Loads link-table data that is not part of the main row.
    fn load_links(&mut self, _conn: &Connection) -> RepoResult<()> {
        Ok(())
    }

    /// Replaces link-table data inside the write transaction.
    fn store_links(&self, _tx: &Transaction<'_>) -> RepoResult<()> {
        Ok(())
    }
}

/// SQLite-backed repository for one entity type.
pub struct SqliteRepository<E: SqlRecord> {
    conn: SharedConnection,
    _entity: PhantomData<fn() -> E>,
}

impl<E: SqlRecord> SqliteRepository<E> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: SharedConnection) -> RepoResult<Self> {
        {
            let guard = lock_connection::<E>(&conn)?;
            ensure_connection_ready(&guard, E::TABLE)?;
        }
        Ok(Self {
            conn,
            _entity: PhantomData,
        })
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        lock_connection::<E>(&self.conn)
    }
}

impl<E: SqlRecord> Repository<E> for SqliteRepository<E> {
    fn add(&self, entity: &E) -> RepoResult<()> {
        entity.validate()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(E::INSERT_SQL, params_from_iter(entity.insert_values()))?;
        entity.store_links(&tx)?;
        tx.commit()?;
        Ok(())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<E>> {
        let conn = self.lock()?;
        select_by_id(&conn, id)
    }

    fn get_all(&self) -> RepoResult<Vec<E>> {
        let conn = self.lock()?;
        select_where(&conn, "ORDER BY created_at ASC, id ASC", Vec::new())
    }

    fn update(&self, id: EntityId, patch: &E::Patch) -> RepoResult<E> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut entity: E =
            select_by_id(&tx, id)?.ok_or(RepoError::NotFound { kind: E::KIND, id })?;
        entity.apply_update(patch)?;

        tx.execute(E::UPDATE_SQL, params_from_iter(entity.update_values()))?;
        entity.store_links(&tx)?;
        tx.commit()?;
        Ok(entity)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", E::TABLE),
            [id.to_string()],
        )?;
        Ok(())
    }

    fn get_by_attribute(&self, lookup: &E::Lookup) -> RepoResult<Option<E>> {
        let conn = self.lock()?;
        let (filter, values) = E::lookup_filter(lookup);
        let mut rows: Vec<E> = select_where(
            &conn,
            &format!("{filter} ORDER BY created_at ASC, id ASC LIMIT 1"),
            values,
        )?;
        Ok(rows.pop())
    }

    fn list_by_attribute(&self, lookup: &E::Lookup) -> RepoResult<Vec<E>> {
        let conn = self.lock()?;
        let (filter, values) = E::lookup_filter(lookup);
        select_where(&conn, &format!("{filter} ORDER BY created_at ASC, id ASC"), values)
    }
}

fn lock_connection<E: Entity>(conn: &SharedConnection) -> RepoResult<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|_| RepoError::LockPoisoned(E::KIND))
}

fn select_by_id<E: SqlRecord>(conn: &Connection, id: EntityId) -> RepoResult<Option<E>> {
    let mut rows = select_where(conn, "WHERE id = ?1", vec![Value::Text(id.to_string())])?;
    Ok(rows.pop())
}

fn select_where<E: SqlRecord>(
    conn: &Connection,
    clause: &str,
    values: Vec<Value>,
) -> RepoResult<Vec<E>> {
    let mut stmt = conn.prepare(&format!("{} {clause};", E::SELECT_SQL))?;
    let mut rows = stmt.query(params_from_iter(values))?;
    let mut entities = Vec::new();
    while let Some(row) = rows.next()? {
        let mut entity = E::from_row(row)?;
        entity.load_links(conn)?;
        entities.push(entity);
    }
    Ok(entities)
}

fn ensure_connection_ready(conn: &Connection, table: &'static str) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable(table));
    }

    Ok(())
}

/// Parses a stored id column, naming the table/column on failure.
pub(crate) fn parse_id(value: &str, location: &str) -> RepoResult<EntityId> {
    EntityId::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {location}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
