//! Search and list filtering.
//!
//! # Responsibility
//! - Provide the free-text filters used by contact, company, lead and task
//!   screens over already-loaded collections.
//!
//! # Invariants
//! - Filters are pure and keep input order.

pub mod filter;
