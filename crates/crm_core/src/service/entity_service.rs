//! Async entity service over one owned store.
//!
//! # Responsibility
//! - Provide the only mutation path for persisted entity data.
//! - Suspend callers for a method-specific latency window before resolving.
//! - Normalize loosely-typed identity input before lookup.
//!
//! # Invariants
//! - Each service exclusively owns its store; no other service or caller
//!   can reach it.
//! - The store lock is never held across an `.await`, so every store
//!   operation (including Id assignment) runs to completion atomically,
//!   also on a multi-threaded runtime.
//! - Store errors propagate unchanged: no retries, no swallowing.
//! - Returned records are copies.

use crate::model::entity::{Entity, EntityId, EntityKind, RawId, Record, ValidationError};
use crate::model::lead::{Lead, LeadStage};
use crate::repo::entity_store::{EntityStore, RepoError};
use crate::service::latency::{LatencyProfile, ServiceOp};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure surfaced to service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Identity absent at store level.
    NotFound { kind: EntityKind, id: EntityId },
    /// Identity input could not be normalized to a positive integer.
    InvalidId(String),
    /// Record failed field validation.
    Validation(ValidationError),
    /// Store cannot issue another identity.
    IdSpaceExhausted(EntityKind),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{} not found (Id {id})", kind.label()),
            Self::InvalidId(raw) => write!(f, "invalid id: `{raw}`"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::IdSpaceExhausted(kind) => write!(f, "{kind} id space exhausted"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::IdSpaceExhausted(kind) => Self::IdSpaceExhausted(kind),
        }
    }
}

/// Async boundary over `EntityStore<T>`; one instance per entity kind.
#[derive(Debug)]
pub struct EntityService<T: Entity> {
    store: Mutex<EntityStore<T>>,
    latency: LatencyProfile,
}

impl<T: Entity> EntityService<T> {
    /// Creates a service over a fresh, empty store.
    pub fn new(latency: LatencyProfile) -> Self {
        Self::with_store(EntityStore::new(), latency)
    }

    /// Creates a service that takes ownership of `store`.
    pub fn with_store(store: EntityStore<T>, latency: LatencyProfile) -> Self {
        Self {
            store: Mutex::new(store),
            latency,
        }
    }

    pub fn latency(&self) -> LatencyProfile {
        self.latency
    }

    pub async fn get_all(&self) -> Vec<Record<T>> {
        self.wait(ServiceOp::GetAll).await;
        self.store().list()
    }

    pub async fn get_by_id(&self, id: impl Into<RawId>) -> ServiceResult<Record<T>> {
        let raw = id.into();
        self.wait(ServiceOp::GetById).await;
        let id = self.normalize(&raw, ServiceOp::GetById)?;
        self.store()
            .get(id)
            .map_err(|err| self.reject(err, ServiceOp::GetById))
    }

    pub async fn create(&self, data: T) -> ServiceResult<Record<T>> {
        self.wait(ServiceOp::Create).await;
        self.store()
            .insert(data)
            .map_err(|err| self.reject(err, ServiceOp::Create))
    }

    /// Merges `patch` over the stored record; identity and creation time
    /// are never affected.
    pub async fn update(&self, id: impl Into<RawId>, patch: T::Patch) -> ServiceResult<Record<T>> {
        let raw = id.into();
        self.wait(ServiceOp::Update).await;
        let id = self.normalize(&raw, ServiceOp::Update)?;
        self.store()
            .replace(id, patch)
            .map_err(|err| self.reject(err, ServiceOp::Update))
    }

    /// Permanently deletes the record and returns its last state.
    pub async fn delete(&self, id: impl Into<RawId>) -> ServiceResult<Record<T>> {
        let raw = id.into();
        self.wait(ServiceOp::Delete).await;
        let id = self.normalize(&raw, ServiceOp::Delete)?;
        self.store()
            .remove(id)
            .map_err(|err| self.reject(err, ServiceOp::Delete))
    }

    /// Copies of all records matching `predicate`, with query latency.
    pub async fn find<P>(&self, predicate: P) -> Vec<Record<T>>
    where
        P: Fn(&T) -> bool + Send,
    {
        self.wait(ServiceOp::Query).await;
        self.store().find(predicate)
    }

    async fn wait(&self, op: ServiceOp) {
        let delay = self.latency.delay(op);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    // Store operations never panic mid-mutation, so a poisoned lock still
    // guards consistent data.
    fn store(&self) -> MutexGuard<'_, EntityStore<T>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn normalize(&self, raw: &RawId, op: ServiceOp) -> ServiceResult<EntityId> {
        raw.normalize().ok_or_else(|| {
            warn!(
                "event=service_call module=service status=error kind={} op={} reason=invalid_id",
                T::KIND,
                op.as_str()
            );
            ServiceError::InvalidId(raw.to_string())
        })
    }

    fn reject(&self, err: RepoError, op: ServiceOp) -> ServiceError {
        warn!(
            "event=service_call module=service status=error kind={} op={} error={}",
            T::KIND,
            op.as_str(),
            err
        );
        err.into()
    }
}

impl EntityService<Lead> {
    /// Leads currently in `stage`, in insertion order.
    pub async fn get_by_stage(&self, stage: LeadStage) -> Vec<Record<Lead>> {
        self.find(move |lead: &Lead| lead.stage == stage).await
    }
}
