//! Read-only joins across entity kinds.

pub mod relationship;
