use chrono::{NaiveDate, Utc};
use crm_core::resolve::relationship::{
    resolve_company_name, resolve_contact_name, resolve_lead_title, NO_COMPANY, NO_CONTACT,
    NO_RELATION, UNKNOWN_COMPANY, UNKNOWN_CONTACT, UNKNOWN_LEAD,
};
use crm_core::{
    Company, CompanyRecord, Contact, ContactRecord, EntityId, ForeignRef, Lead, LeadRecord,
    LeadStage, Record, RelatedKind, RelatedRef, RelationshipResolver, Task,
};

fn record<T>(id: u64, data: T) -> Record<T> {
    Record::new(EntityId::new(id).unwrap(), Utc::now(), data)
}

fn contacts() -> Vec<ContactRecord> {
    vec![
        record(1, Contact::new("Sarah", "Johnson", "sarah@techcorp.com")),
        record(3, Contact::new("Mike", "Chen", "mike@creativedesign.com")),
    ]
}

fn companies() -> Vec<CompanyRecord> {
    vec![record(2, Company::new("TechCorp Solutions", "Technology"))]
}

fn leads() -> Vec<LeadRecord> {
    vec![record(
        5,
        Lead::new("Enterprise Software License", 50_000.0, LeadStage::New),
    )]
}

#[test]
fn contact_name_is_first_and_last_name() {
    assert_eq!(resolve_contact_name(&contacts(), 1_u64), "Sarah Johnson");
    assert_eq!(resolve_contact_name(&contacts(), "3"), "Mike Chen");
}

#[test]
fn missing_reference_reads_as_absent() {
    assert_eq!(resolve_contact_name(&contacts(), ForeignRef::NONE), NO_CONTACT);
    assert_eq!(resolve_contact_name(&contacts(), ""), NO_CONTACT);
    assert_eq!(resolve_company_name(&companies(), None::<EntityId>), NO_COMPANY);
    assert_eq!(NO_CONTACT, "No contact");
}

#[test]
fn dangling_or_garbage_reference_reads_as_unknown() {
    assert_eq!(resolve_contact_name(&contacts(), 2_u64), UNKNOWN_CONTACT);
    assert_eq!(resolve_contact_name(&contacts(), "abc"), UNKNOWN_CONTACT);
    assert_eq!(resolve_company_name(&companies(), 9_u64), UNKNOWN_COMPANY);
    assert_eq!(resolve_lead_title(&leads(), 1_u64), UNKNOWN_LEAD);
    assert_eq!(UNKNOWN_CONTACT, "Unknown contact");
}

#[test]
fn company_and_lead_names_resolve() {
    assert_eq!(resolve_company_name(&companies(), 2_u64), "TechCorp Solutions");
    assert_eq!(
        resolve_lead_title(&leads(), 5_u64),
        "Enterprise Software License"
    );
}

#[test]
fn task_relation_resolves_through_its_kind() {
    let contacts = contacts();
    let companies = companies();
    let leads = leads();
    let resolver = RelationshipResolver::new(&contacts, &companies, &leads);
    let due = NaiveDate::from_ymd_opt(2024, 6, 10)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();

    let mut task = Task::new("Follow up", due);
    assert_eq!(resolver.related_name(&task), NO_RELATION);

    task.related = Some(RelatedRef {
        kind: RelatedKind::Lead,
        id: EntityId::new(5).unwrap(),
    });
    assert_eq!(resolver.related_name(&task), "Enterprise Software License");

    task.related = Some(RelatedRef {
        kind: RelatedKind::Company,
        id: EntityId::new(1).unwrap(),
    });
    assert_eq!(resolver.related_name(&task), UNKNOWN_COMPANY);

    task.related = Some(RelatedRef {
        kind: RelatedKind::Contact,
        id: EntityId::new(3).unwrap(),
    });
    assert_eq!(resolver.related_name(&task), "Mike Chen");
}

#[test]
fn resolver_methods_match_free_functions() {
    let contacts = contacts();
    let companies = companies();
    let leads = leads();
    let resolver = RelationshipResolver::new(&contacts, &companies, &leads);

    assert_eq!(resolver.contact_name(1_u64), "Sarah Johnson");
    assert_eq!(resolver.company_name(Some(EntityId::new(2).unwrap())), "TechCorp Solutions");
    assert_eq!(resolver.lead_title(ForeignRef::NONE), "No lead");
}
