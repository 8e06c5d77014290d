//! Storage layer for entity collections.
//!
//! # Responsibility
//! - Own the authoritative in-memory collection per entity kind.
//! - Keep identity assignment and copy-out semantics in one place.
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`, `Validation`); they
//!   never retry or recover locally.
//! - One store instance is owned by exactly one `EntityService`.

pub mod entity_store;
