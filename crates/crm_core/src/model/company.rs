//! Company entity.

use crate::model::entity::{require_text, Entity, EntityKind, Record, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type CompanyRecord = Record<Company>;

/// Headcount bracket shown on company cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "Small (1-50)")]
    Small,
    #[serde(rename = "Medium (50-200)")]
    Medium,
    #[serde(rename = "Large (200+)")]
    Large,
}

impl CompanySize {
    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "Small (1-50)",
            Self::Medium => "Medium (50-200)",
            Self::Large => "Large (200+)",
        }
    }
}

impl Display for CompanySize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub industry: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub size: Option<CompanySize>,
    #[serde(default)]
    pub notes: String,
}

impl Company {
    pub fn new(name: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            industry: industry.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub size: Option<Option<CompanySize>>,
    pub notes: Option<String>,
}

impl Entity for Company {
    const KIND: EntityKind = EntityKind::Company;
    type Patch = CompanyPatch;

    fn apply_patch(&mut self, patch: CompanyPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(industry) = patch.industry {
            self.industry = industry;
        }
        if let Some(website) = patch.website {
            self.website = website;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("industry", &self.industry)
    }
}
