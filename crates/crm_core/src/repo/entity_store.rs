//! Generic in-memory entity store.
//!
//! # Responsibility
//! - Hold the authoritative collection for one entity kind.
//! - Assign identity and creation time on insert.
//! - Hand out value copies only; callers never alias stored state.
//!
//! # Invariants
//! - Ids are unique within the store.
//! - A new Id is strictly greater than every Id this store has ever issued
//!   (`1` for a fresh store). Deleted Ids are never reused and gaps are
//!   never filled.
//! - `replace` never changes `id` or `created_at`.
//! - Every write validates the resulting record first; a rejected write
//!   leaves the collection untouched.
//! - Mutations take `&mut self`, so they are atomic with respect to each
//!   other. Shared use across tasks goes through `EntityService`, which
//!   wraps the store in a mutex.

use crate::model::entity::{Entity, EntityId, EntityKind, Record, ValidationError};
use chrono::Utc;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level failure for one requested operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// No live record with this identity.
    NotFound { kind: EntityKind, id: EntityId },
    /// Record failed field validation.
    Validation(ValidationError),
    /// Next Id would overflow `u64`.
    IdSpaceExhausted(EntityKind),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{} not found (Id {id})", kind.label()),
            Self::Validation(err) => write!(f, "{err}"),
            Self::IdSpaceExhausted(kind) => write!(f, "{kind} id space exhausted"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } | Self::IdSpaceExhausted(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Authoritative in-memory collection for entity kind `T`.
///
/// Records keep insertion order.
#[derive(Debug, Clone)]
pub struct EntityStore<T: Entity> {
    records: Vec<Record<T>>,
    /// Highest Id ever issued, including since-deleted records.
    high_water: Option<EntityId>,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            high_water: None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snapshot of every record in insertion order.
    pub fn list(&self) -> Vec<Record<T>> {
        self.records.clone()
    }

    /// Snapshot of the records whose payload matches `predicate`.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Vec<Record<T>> {
        self.records
            .iter()
            .filter(|record| predicate(&record.data))
            .cloned()
            .collect()
    }

    /// Copy of the record with `id`.
    pub fn get(&self, id: EntityId) -> RepoResult<Record<T>> {
        self.position(id).map(|index| self.records[index].clone())
    }

    /// Stores `data` under a fresh identity and returns a copy.
    pub fn insert(&mut self, data: T) -> RepoResult<Record<T>> {
        data.validate()?;
        let id = self.next_id()?;
        let record = Record::new(id, Utc::now(), data);
        self.records.push(record.clone());
        self.high_water = Some(id);

        debug!(
            "event=record_insert module=repo status=ok kind={} id={}",
            T::KIND,
            id
        );
        Ok(record)
    }

    /// Merges `patch` over the record with `id` and returns a copy.
    pub fn replace(&mut self, id: EntityId, patch: T::Patch) -> RepoResult<Record<T>> {
        let index = self.position(id)?;
        let mut merged = self.records[index].data.clone();
        merged.apply_patch(patch);
        merged.validate()?;

        let stored = &mut self.records[index];
        stored.data = merged;

        debug!(
            "event=record_replace module=repo status=ok kind={} id={}",
            T::KIND,
            id
        );
        Ok(stored.clone())
    }

    /// Permanently deletes the record with `id` and returns it.
    pub fn remove(&mut self, id: EntityId) -> RepoResult<Record<T>> {
        let index = self.position(id)?;
        let removed = self.records.remove(index);

        debug!(
            "event=record_remove module=repo status=ok kind={} id={}",
            T::KIND,
            id
        );
        Ok(removed)
    }

    fn position(&self, id: EntityId) -> RepoResult<usize> {
        self.records
            .iter()
            .position(|record| record.id == id)
            .ok_or(RepoError::NotFound { kind: T::KIND, id })
    }

    fn next_id(&self) -> RepoResult<EntityId> {
        let live_max = self.records.iter().map(|record| record.id).max();
        match live_max.max(self.high_water) {
            None => Ok(EntityId::FIRST),
            Some(max) => max
                .checked_next()
                .ok_or(RepoError::IdSpaceExhausted(T::KIND)),
        }
    }
}
