//! Transient in-process repository.
//!
//! # Invariants
//! - `get_all` returns entities in insertion order.
//! - Stored entities are clones; callers never hold references into storage.
//! - No uniqueness is enforced beyond the id.

use super::{RepoError, RepoResult, Repository};
use crate::model::{Entity, EntityId};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lock-guarded vector store for one entity type.
pub struct InMemoryRepository<E: Entity> {
    rows: RwLock<Vec<E>>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, Vec<E>>> {
        self.rows.read().map_err(|_| RepoError::LockPoisoned(E::KIND))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, Vec<E>>> {
        self.rows.write().map_err(|_| RepoError::LockPoisoned(E::KIND))
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    fn add(&self, entity: &E) -> RepoResult<()> {
        entity.validate()?;

        let mut rows = self.write()?;
        if rows.iter().any(|row| row.id() == entity.id()) {
            return Err(RepoError::Conflict(format!(
                "{} id already stored: {}",
                E::KIND,
                entity.id()
            )));
        }
        rows.push(entity.clone());
        Ok(())
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<E>> {
        Ok(self.read()?.iter().find(|row| row.id() == id).cloned())
    }

    fn get_all(&self) -> RepoResult<Vec<E>> {
        Ok(self.read()?.clone())
    }

    fn update(&self, id: EntityId, patch: &E::Patch) -> RepoResult<E> {
        let mut rows = self.write()?;
        let row = rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or(RepoError::NotFound { kind: E::KIND, id })?;
        row.apply_update(patch)?;
        Ok(row.clone())
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        self.write()?.retain(|row| row.id() != id);
        Ok(())
    }

    fn get_by_attribute(&self, lookup: &E::Lookup) -> RepoResult<Option<E>> {
        Ok(self.read()?.iter().find(|row| row.matches(lookup)).cloned())
    }

    fn list_by_attribute(&self, lookup: &E::Lookup) -> RepoResult<Vec<E>> {
        Ok(self
            .read()?
            .iter()
            .filter(|row| row.matches(lookup))
            .cloned()
            .collect())
    }
}
