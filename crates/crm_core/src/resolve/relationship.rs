//! Display-name resolution for loose cross-kind references.
//!
//! # Responsibility
//! - Turn raw `contactId` / `companyId` / task relation values into
//!   display strings over already-loaded collections.
//!
//! # Invariants
//! - Pure: no store access, no mutation.
//! - Every reference lands in exactly one of absent / unresolved / resolved.
//! - References may be integers or integer-like strings.

use crate::model::company::CompanyRecord;
use crate::model::contact::ContactRecord;
use crate::model::entity::{EntityId, RawId, Record};
use crate::model::lead::LeadRecord;
use crate::model::task::{RelatedKind, Task};

pub const NO_CONTACT: &str = "No contact";
pub const UNKNOWN_CONTACT: &str = "Unknown contact";
pub const NO_COMPANY: &str = "No company";
pub const UNKNOWN_COMPANY: &str = "Unknown company";
pub const NO_LEAD: &str = "No lead";
pub const UNKNOWN_LEAD: &str = "Unknown lead";
pub const NO_RELATION: &str = "No relation";

/// Loose foreign reference as stored or received: maybe absent, maybe an
/// integer-like string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForeignRef(Option<RawId>);

impl ForeignRef {
    pub const NONE: ForeignRef = ForeignRef(None);

    pub fn raw(&self) -> Option<&RawId> {
        self.0.as_ref()
    }
}

impl From<RawId> for ForeignRef {
    fn from(value: RawId) -> Self {
        Self(Some(value))
    }
}

impl From<Option<RawId>> for ForeignRef {
    fn from(value: Option<RawId>) -> Self {
        Self(value)
    }
}

impl From<EntityId> for ForeignRef {
    fn from(value: EntityId) -> Self {
        Self(Some(value.into()))
    }
}

impl From<Option<EntityId>> for ForeignRef {
    fn from(value: Option<EntityId>) -> Self {
        Self(value.map(RawId::from))
    }
}

impl From<u64> for ForeignRef {
    fn from(value: u64) -> Self {
        Self(Some(value.into()))
    }
}

impl From<i64> for ForeignRef {
    fn from(value: i64) -> Self {
        Self(Some(value.into()))
    }
}

impl From<&str> for ForeignRef {
    fn from(value: &str) -> Self {
        Self(Some(value.into()))
    }
}

impl From<Option<&str>> for ForeignRef {
    fn from(value: Option<&str>) -> Self {
        Self(value.map(RawId::from))
    }
}

impl From<String> for ForeignRef {
    fn from(value: String) -> Self {
        Self(Some(value.into()))
    }
}

/// Outcome of following one loose reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a, T> {
    /// No reference was set (missing, blank text or zero).
    Absent,
    /// A reference was set but matches no loaded record.
    Unresolved,
    Resolved(&'a Record<T>),
}

impl<'a, T> Resolution<'a, T> {
    /// Maps the tri-state onto display text.
    pub fn display(
        self,
        absent: &str,
        unresolved: &str,
        resolved: impl FnOnce(&'a Record<T>) -> String,
    ) -> String {
        match self {
            Self::Absent => absent.to_string(),
            Self::Unresolved => unresolved.to_string(),
            Self::Resolved(record) => resolved(record),
        }
    }
}

/// Follows `reference` into `records`.
pub fn resolve<'a, T>(records: &'a [Record<T>], reference: &ForeignRef) -> Resolution<'a, T> {
    let Some(raw) = reference.raw() else {
        return Resolution::Absent;
    };
    if raw.is_blank() {
        return Resolution::Absent;
    }
    let Some(id) = raw.normalize() else {
        return Resolution::Unresolved;
    };
    records
        .iter()
        .find(|record| record.id == id)
        .map_or(Resolution::Unresolved, Resolution::Resolved)
}

/// `"No contact"`, `"Unknown contact"`, or `"<first> <last>"`.
pub fn resolve_contact_name(
    contacts: &[ContactRecord],
    contact_id: impl Into<ForeignRef>,
) -> String {
    resolve(contacts, &contact_id.into()).display(NO_CONTACT, UNKNOWN_CONTACT, |record| {
        record.data.full_name()
    })
}

/// `"No company"`, `"Unknown company"`, or the company name.
pub fn resolve_company_name(
    companies: &[CompanyRecord],
    company_id: impl Into<ForeignRef>,
) -> String {
    resolve(companies, &company_id.into()).display(NO_COMPANY, UNKNOWN_COMPANY, |record| {
        record.data.name.clone()
    })
}

/// `"No lead"`, `"Unknown lead"`, or the lead title.
pub fn resolve_lead_title(leads: &[LeadRecord], lead_id: impl Into<ForeignRef>) -> String {
    resolve(leads, &lead_id.into()).display(NO_LEAD, UNKNOWN_LEAD, |record| {
        record.data.title.clone()
    })
}

/// Already-loaded collections bundled for repeated lookups during a render.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipResolver<'a> {
    pub contacts: &'a [ContactRecord],
    pub companies: &'a [CompanyRecord],
    pub leads: &'a [LeadRecord],
}

impl<'a> RelationshipResolver<'a> {
    pub fn new(
        contacts: &'a [ContactRecord],
        companies: &'a [CompanyRecord],
        leads: &'a [LeadRecord],
    ) -> Self {
        Self {
            contacts,
            companies,
            leads,
        }
    }

    pub fn contact_name(&self, contact_id: impl Into<ForeignRef>) -> String {
        resolve_contact_name(self.contacts, contact_id)
    }

    pub fn company_name(&self, company_id: impl Into<ForeignRef>) -> String {
        resolve_company_name(self.companies, company_id)
    }

    pub fn lead_title(&self, lead_id: impl Into<ForeignRef>) -> String {
        resolve_lead_title(self.leads, lead_id)
    }

    /// `"No relation"` for unrelated tasks, otherwise the related record's
    /// display name or its kind's unknown label.
    pub fn related_name(&self, task: &Task) -> String {
        let Some(related) = task.related else {
            return NO_RELATION.to_string();
        };
        match related.kind {
            RelatedKind::Contact => resolve_contact_name(self.contacts, related.id),
            RelatedKind::Company => resolve_company_name(self.companies, related.id),
            RelatedKind::Lead => resolve_lead_title(self.leads, related.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve, ForeignRef, Resolution};
    use crate::model::entity::{EntityId, Record};
    use chrono::Utc;

    fn record(id: u64, name: &str) -> Record<String> {
        Record::new(EntityId::new(id).unwrap(), Utc::now(), name.to_string())
    }

    #[test]
    fn blank_and_zero_references_are_absent() {
        let records = vec![record(1, "one")];
        assert_eq!(resolve(&records, &ForeignRef::NONE), Resolution::Absent);
        assert_eq!(resolve(&records, &ForeignRef::from("  ")), Resolution::Absent);
        assert_eq!(resolve(&records, &ForeignRef::from(0_u64)), Resolution::Absent);
    }

    #[test]
    fn garbage_references_are_unresolved_not_errors() {
        let records = vec![record(1, "one")];
        assert_eq!(
            resolve(&records, &ForeignRef::from("not-an-id")),
            Resolution::Unresolved
        );
        assert_eq!(resolve(&records, &ForeignRef::from(2_u64)), Resolution::Unresolved);
    }

    #[test]
    fn string_and_integer_references_resolve_alike() {
        let records = vec![record(1, "one"), record(2, "two")];
        assert_eq!(
            resolve(&records, &ForeignRef::from("2")),
            Resolution::Resolved(&records[1])
        );
        assert_eq!(
            resolve(&records, &ForeignRef::from(2_i64)),
            Resolution::Resolved(&records[1])
        );
    }
}
