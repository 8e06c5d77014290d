//! Entity kinds and shared identity model.
//!
//! # Responsibility
//! - Define the records persisted per kind: contacts, companies, leads and
//!   tasks.
//! - Keep identity and creation metadata in one store-owned envelope.
//!
//! # Invariants
//! - Identity is a positive integer assigned by the store, never by callers.
//! - Foreign references (`contact_id`, `company_id`, task relations) are
//!   loose: they may point at records that no longer exist.
//! - Deletion is permanent; there are no tombstones.

pub mod company;
pub mod contact;
pub mod entity;
pub mod lead;
pub mod task;
