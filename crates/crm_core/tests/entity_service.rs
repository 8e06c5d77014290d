use crm_core::{
    Company, CompanyService, Contact, ContactService, EntityId, EntityKind, LatencyProfile, Lead,
    LeadPatch, LeadService, LeadStage, ServiceError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn id(value: u64) -> EntityId {
    EntityId::new(value).unwrap()
}

#[tokio::test]
async fn create_then_get_by_id_roundtrips() {
    let service = ContactService::new(LatencyProfile::instant());
    let created = service
        .create(Contact::new("Sarah", "Johnson", "sarah@techcorp.com"))
        .await
        .unwrap();
    assert_eq!(created.id, id(1));

    let loaded = service.get_by_id(created.id).await.unwrap();
    assert_eq!(loaded, created);
}

#[tokio::test]
async fn get_by_id_accepts_numeric_looking_input() {
    let service = CompanyService::new(LatencyProfile::instant());
    service
        .create(Company::new("TechCorp Solutions", "Technology"))
        .await
        .unwrap();

    assert_eq!(service.get_by_id("1").await.unwrap().id, id(1));
    assert_eq!(service.get_by_id(" 1 ").await.unwrap().id, id(1));
    assert_eq!(service.get_by_id(1.0_f64).await.unwrap().id, id(1));
    assert_eq!(service.get_by_id(1_i64).await.unwrap().id, id(1));
}

#[tokio::test]
async fn unparsable_ids_are_invalid_not_missing() {
    let service = CompanyService::new(LatencyProfile::instant());

    for raw in ["abc", "", "-2", "1.5"] {
        let err = service.get_by_id(raw).await.unwrap_err();
        assert!(
            matches!(err, ServiceError::InvalidId(ref value) if value == raw),
            "{raw:?} gave {err:?}"
        );
    }
    assert!(matches!(
        service.delete(0_u64).await,
        Err(ServiceError::InvalidId(_))
    ));
}

#[tokio::test]
async fn missing_record_reports_kind_and_id() {
    let service = LeadService::new(LatencyProfile::instant());
    let err = service.get_by_id(42_u64).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::Lead,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Lead not found (Id 42)");
}

#[tokio::test]
async fn update_preserves_identity_and_creation_time() {
    let service = LeadService::new(LatencyProfile::instant());
    let created = service
        .create(Lead::new("Enterprise Software License", 50_000.0, LeadStage::New))
        .await
        .unwrap();

    let updated = service
        .update(
            created.id,
            LeadPatch {
                value: Some(75_000.0),
                ..LeadPatch::stage(LeadStage::Qualified)
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.data.title, "Enterprise Software License");
    assert_eq!(updated.data.stage, LeadStage::Qualified);
    assert_eq!(updated.data.value, 75_000.0);
}

#[tokio::test]
async fn update_and_delete_of_missing_record_fail() {
    let service = LeadService::new(LatencyProfile::instant());

    assert!(matches!(
        service.update(7_u64, LeadPatch::stage(LeadStage::Won)).await,
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete(7_u64).await,
        Err(ServiceError::NotFound { .. })
    ));
}

#[tokio::test]
async fn invalid_drafts_are_rejected_with_validation() {
    let service = LeadService::new(LatencyProfile::instant());

    let err = service
        .create(Lead::new("Bad value", -1.0, LeadStage::New))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(service.get_all().await.is_empty());
}

#[tokio::test]
async fn get_by_stage_returns_matching_leads_in_insertion_order() {
    let service = LeadService::new(LatencyProfile::instant());
    for (title, stage) in [
        ("A", LeadStage::New),
        ("B", LeadStage::Contacted),
        ("C", LeadStage::New),
        ("D", LeadStage::Won),
    ] {
        service.create(Lead::new(title, 10.0, stage)).await.unwrap();
    }

    let titles: Vec<String> = service
        .get_by_stage(LeadStage::New)
        .await
        .into_iter()
        .map(|lead| lead.data.title)
        .collect();
    assert_eq!(titles, ["A", "C"]);
    assert!(service.get_by_stage(LeadStage::Lost).await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn reads_complete_faster_than_writes() {
    let service = CompanyService::new(LatencyProfile::default());

    let started = Instant::now();
    let created = service
        .create(Company::new("TechCorp Solutions", "Technology"))
        .await
        .unwrap();
    let write_elapsed = started.elapsed();

    let started = Instant::now();
    service.get_by_id(created.id).await.unwrap();
    let read_elapsed = started.elapsed();

    assert!(write_elapsed >= Duration::from_millis(400));
    assert!(read_elapsed >= Duration::from_millis(200));
    assert!(read_elapsed < write_elapsed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_distinct_ids() {
    let service = Arc::new(CompanyService::new(LatencyProfile::instant()));

    let handles: Vec<_> = (0..32)
        .map(|n| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .create(Company::new(format!("Company {n}"), "Technology"))
                    .await
                    .unwrap()
                    .id
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().get());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=32).collect::<Vec<u64>>());
}
