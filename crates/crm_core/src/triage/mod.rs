//! Pure task and dashboard derivations.
//!
//! # Responsibility
//! - Group tasks into overdue / today / upcoming / completed buckets.
//! - Compute dashboard headline numbers from loaded collections.
//!
//! # Invariants
//! - No mutable state; safe to call on every render.

pub mod classify;
pub mod stats;
