//! Core domain logic for the CRM.
//! This crate is the single source of truth for business invariants:
//! entity identity, copy-out storage, loose relationships, the lead
//! pipeline board, and task triage.

pub mod config;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod repo;
pub mod resolve;
pub mod search;
pub mod service;
pub mod triage;

pub use config::{ConfigError, ConfigResult, CoreConfig};
pub use logging::{
    default_log_level, init_logging, logging_status, LogConfig, LogLevel, LoggingError,
};
pub use model::company::{Company, CompanyPatch, CompanyRecord, CompanySize};
pub use model::contact::{Contact, ContactPatch, ContactRecord};
pub use model::entity::{Entity, EntityId, EntityKind, RawId, Record, ValidationError};
pub use model::lead::{Lead, LeadPatch, LeadRecord, LeadStage};
pub use model::task::{
    RelatedKind, RelatedRef, Task, TaskPatch, TaskPriority, TaskRecord, TaskStatus,
};
pub use pipeline::board::{
    DragState, DropOutcome, Notification, PipelineBoard, PipelineError, PipelineResult,
    StageBucket,
};
pub use pipeline::gateway::LeadGateway;
pub use pipeline::metrics::StageSummary;
pub use repo::entity_store::{EntityStore, RepoError, RepoResult};
pub use resolve::relationship::{ForeignRef, RelationshipResolver, Resolution};
pub use search::filter::TaskFilter;
pub use service::entity_service::{EntityService, ServiceError, ServiceResult};
pub use service::latency::{LatencyProfile, ServiceOp};
pub use triage::classify::{classify, TaskBucket, TriagedTasks};
pub use triage::stats::DashboardStats;

pub type ContactService = EntityService<Contact>;
pub type CompanyService = EntityService<Company>;
pub type LeadService = EntityService<Lead>;
pub type TaskService = EntityService<Task>;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
