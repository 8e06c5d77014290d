//! Simulated per-method latency for entity services.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Service method classes with distinct latency windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOp {
    GetAll,
    GetById,
    Create,
    Update,
    Delete,
    /// Filtered reads such as leads-by-stage.
    Query,
}

impl ServiceOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetAll => "get_all",
            Self::GetById => "get_by_id",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Query => "query",
        }
    }
}

/// Latency windows in milliseconds. Reads are shorter than writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LatencyProfile {
    pub get_all: u64,
    pub get_by_id: u64,
    pub create: u64,
    pub update: u64,
    pub delete: u64,
    pub query: u64,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            get_all: 300,
            get_by_id: 200,
            create: 400,
            update: 350,
            delete: 350,
            query: 200,
        }
    }
}

impl LatencyProfile {
    /// No simulated delay at all.
    pub fn instant() -> Self {
        Self {
            get_all: 0,
            get_by_id: 0,
            create: 0,
            update: 0,
            delete: 0,
            query: 0,
        }
    }

    pub fn delay(&self, op: ServiceOp) -> Duration {
        let millis = match op {
            ServiceOp::GetAll => self.get_all,
            ServiceOp::GetById => self.get_by_id,
            ServiceOp::Create => self.create,
            ServiceOp::Update => self.update,
            ServiceOp::Delete => self.delete,
            ServiceOp::Query => self.query,
        };
        Duration::from_millis(millis)
    }
}
