//! Async use-case services.
//!
//! # Responsibility
//! - Expose per-kind CRUD entry points to view layers.
//! - Keep callers decoupled from store ownership and locking.
//!
//! # See also
//! - `repo::entity_store` for identity and copy-out invariants.

pub mod entity_service;
pub mod latency;
