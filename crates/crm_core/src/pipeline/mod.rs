//! Lead pipeline: kanban drag state machine and stage aggregates.
//!
//! # Responsibility
//! - Manage lead-stage buckets and the drag-and-drop interaction model
//!   independent of rendering.
//! - Derive per-stage and whole-pipeline aggregates from the lead list.
//!
//! # Invariants
//! - Aggregates are recomputed on every call, never cached.
//! - Stage changes reach storage only through `LeadGateway`.

pub mod board;
pub mod gateway;
pub mod metrics;
