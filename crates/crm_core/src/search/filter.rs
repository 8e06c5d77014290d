//! Case-insensitive list filters for entity screens.
//!
//! # Responsibility
//! - Narrow loaded collections by a free-text query.
//!
//! # Invariants
//! - A blank query matches everything.
//! - Matching is substring-based on lowercase text; input order is kept.

use crate::model::company::CompanyRecord;
use crate::model::contact::ContactRecord;
use crate::model::lead::LeadRecord;
use crate::model::task::{TaskRecord, TaskStatus};
use crate::resolve::relationship::RelationshipResolver;

/// Normalized free-text query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery(Option<String>);

impl TextQuery {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self(None)
        } else {
            Self(Some(trimmed.to_lowercase()))
        }
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_none()
    }

    /// Whether any of `fields` contains the query.
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        let Some(needle) = &self.0 else {
            return true;
        };
        fields
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle.as_str()))
    }
}

/// Task list filter: free text plus optional status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub text: String,
    pub status: Option<TaskStatus>,
}

pub fn filter_contacts(contacts: &[ContactRecord], query: &str) -> Vec<ContactRecord> {
    let query = TextQuery::new(query);
    contacts
        .iter()
        .filter(|contact| {
            let data = &contact.data;
            query.matches_any([
                data.first_name.as_str(),
                data.last_name.as_str(),
                data.email.as_str(),
                data.position.as_str(),
            ])
        })
        .cloned()
        .collect()
}

pub fn filter_companies(companies: &[CompanyRecord], query: &str) -> Vec<CompanyRecord> {
    let query = TextQuery::new(query);
    companies
        .iter()
        .filter(|company| {
            query.matches_any([company.data.name.as_str(), company.data.industry.as_str()])
        })
        .cloned()
        .collect()
}

/// Matches lead title and the resolved contact/company display names.
pub fn filter_leads(resolver: &RelationshipResolver<'_>, query: &str) -> Vec<LeadRecord> {
    let query = TextQuery::new(query);
    resolver
        .leads
        .iter()
        .filter(|lead| {
            if query.is_blank() {
                return true;
            }
            let contact = resolver.contact_name(lead.data.contact_id);
            let company = resolver.company_name(lead.data.company_id);
            query.matches_any([lead.data.title.as_str(), contact.as_str(), company.as_str()])
        })
        .cloned()
        .collect()
}

pub fn filter_tasks(tasks: &[TaskRecord], filter: &TaskFilter) -> Vec<TaskRecord> {
    let query = TextQuery::new(&filter.text);
    tasks
        .iter()
        .filter(|task| filter.status.map_or(true, |status| task.data.status == status))
        .filter(|task| {
            query.matches_any([task.data.title.as_str(), task.data.description.as_str()])
        })
        .cloned()
        .collect()
}
