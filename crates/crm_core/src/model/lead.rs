//! Lead entity and pipeline stage domain.
//!
//! # Invariants
//! - `value` is finite and non-negative.
//! - `probability` stays within `0..=100`.
//! - `Won`/`Lost` are terminal for aggregate purposes only; the model allows
//!   transitions out of them.

use crate::model::entity::{
    deserialize_loose_ref, require_text, Entity, EntityId, EntityKind, Record, ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type LeadRecord = Record<Lead>;

/// Pipeline bucket a lead currently occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStage {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Won,
    Lost,
}

impl LeadStage {
    /// Every stage in board column order.
    pub const ALL: [LeadStage; 6] = [
        LeadStage::New,
        LeadStage::Contacted,
        LeadStage::Qualified,
        LeadStage::Proposal,
        LeadStage::Won,
        LeadStage::Lost,
    ];

    /// Terminal stages are excluded from "active" aggregates.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Qualified => "Qualified",
            Self::Proposal => "Proposal",
            Self::Won => "Won",
            Self::Lost => "Lost",
        }
    }
}

impl Display for LeadStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub title: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub stage: LeadStage,
    #[serde(default)]
    pub probability: u8,
    #[serde(default, deserialize_with = "deserialize_loose_ref")]
    pub contact_id: Option<EntityId>,
    #[serde(default, deserialize_with = "deserialize_loose_ref")]
    pub company_id: Option<EntityId>,
    #[serde(default)]
    pub expected_close_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

impl Lead {
    pub fn new(title: impl Into<String>, value: f64, stage: LeadStage) -> Self {
        Self {
            title: title.into(),
            value,
            stage,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPatch {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<LeadStage>,
    pub probability: Option<u8>,
    pub contact_id: Option<Option<EntityId>>,
    pub company_id: Option<Option<EntityId>>,
    pub expected_close_date: Option<Option<NaiveDate>>,
    pub description: Option<String>,
}

impl LeadPatch {
    /// Patch that only moves the lead to `stage`.
    pub fn stage(stage: LeadStage) -> Self {
        Self {
            stage: Some(stage),
            ..Self::default()
        }
    }
}

impl Entity for Lead {
    const KIND: EntityKind = EntityKind::Lead;
    type Patch = LeadPatch;

    fn apply_patch(&mut self, patch: LeadPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(stage) = patch.stage {
            self.stage = stage;
        }
        if let Some(probability) = patch.probability {
            self.probability = probability;
        }
        if let Some(contact_id) = patch.contact_id {
            self.contact_id = contact_id;
        }
        if let Some(company_id) = patch.company_id {
            self.company_id = company_id;
        }
        if let Some(expected_close_date) = patch.expected_close_date {
            self.expected_close_date = expected_close_date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(ValidationError::InvalidLeadValue);
        }
        if self.probability > 100 {
            return Err(ValidationError::ProbabilityOutOfRange(self.probability));
        }
        Ok(())
    }
}
