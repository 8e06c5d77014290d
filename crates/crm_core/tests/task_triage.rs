use chrono::{NaiveDate, NaiveDateTime, Utc};
use crm_core::{
    classify, Company, CompanyRecord, Contact, ContactRecord, DashboardStats, EntityId, Lead,
    LeadRecord, LeadStage, Record, Task, TaskBucket, TaskRecord, TaskStatus,
};
use crm_core::triage::classify::bucket_for;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn task(id: u64, title: &str, due: NaiveDateTime, status: TaskStatus) -> TaskRecord {
    let mut task = Task::new(title, due);
    task.status = status;
    Record::new(EntityId::new(id).unwrap(), Utc::now(), task)
}

fn titles(tasks: &[TaskRecord]) -> Vec<&str> {
    tasks.iter().map(|task| task.data.title.as_str()).collect()
}

#[test]
fn tasks_fall_into_one_bucket_each() {
    let tasks = vec![
        task(1, "yesterday", at(9, 15), TaskStatus::Pending),
        task(2, "today", at(10, 17), TaskStatus::InProgress),
        task(3, "tomorrow", at(11, 8), TaskStatus::Pending),
        task(4, "done", at(9, 8), TaskStatus::Completed),
    ];

    let triaged = classify(today(), &tasks);

    assert_eq!(titles(&triaged.overdue), ["yesterday"]);
    assert_eq!(titles(&triaged.due_today), ["today"]);
    assert_eq!(titles(&triaged.upcoming), ["tomorrow"]);
    assert_eq!(titles(&triaged.completed), ["done"]);
    assert_eq!(triaged.len(), tasks.len());
}

#[test]
fn completed_wins_over_due_date() {
    let mut overdue_but_done = Task::new("old", at(1, 9));
    overdue_but_done.status = TaskStatus::Completed;
    assert_eq!(bucket_for(today(), &overdue_but_done), TaskBucket::Completed);

    let due_early_today = Task::new("early", at(10, 0));
    assert_eq!(bucket_for(today(), &due_early_today), TaskBucket::DueToday);
}

#[test]
fn buckets_sort_by_due_date_and_keep_ties_stable() {
    let tasks = vec![
        task(1, "later", at(20, 9), TaskStatus::Pending),
        task(2, "tie-a", at(12, 9), TaskStatus::Pending),
        task(3, "earliest", at(11, 9), TaskStatus::Pending),
        task(4, "tie-b", at(12, 9), TaskStatus::Pending),
    ];

    let triaged = classify(today(), &tasks);
    assert_eq!(
        titles(triaged.bucket(TaskBucket::Upcoming)),
        ["earliest", "tie-a", "tie-b", "later"]
    );
}

#[test]
fn empty_input_gives_empty_buckets() {
    let triaged = classify(today(), &[]);
    assert!(triaged.is_empty());
    for bucket in TaskBucket::ALL {
        assert!(triaged.bucket(bucket).is_empty());
    }
}

fn record<T>(id: u64, data: T) -> Record<T> {
    Record::new(EntityId::new(id).unwrap(), Utc::now(), data)
}

#[test]
fn dashboard_stats_count_active_pipeline_and_due_tasks() {
    let contacts: Vec<ContactRecord> = vec![
        record(1, Contact::new("Sarah", "Johnson", "sarah@techcorp.com")),
        record(2, Contact::new("Mike", "Chen", "mike@creativedesign.com")),
    ];
    let companies: Vec<CompanyRecord> =
        vec![record(1, Company::new("TechCorp Solutions", "Technology"))];
    let leads: Vec<LeadRecord> = vec![
        record(1, Lead::new("A", 100.0, LeadStage::New)),
        record(2, Lead::new("B", 250.0, LeadStage::Proposal)),
        record(3, Lead::new("C", 1_000.0, LeadStage::Won)),
        record(4, Lead::new("D", 500.0, LeadStage::Lost)),
    ];
    let tasks = vec![
        task(1, "overdue", at(9, 15), TaskStatus::Pending),
        task(2, "midnight", at(10, 0), TaskStatus::Pending),
        task(3, "later today", at(10, 17), TaskStatus::Pending),
        task(4, "overdue but done", at(8, 9), TaskStatus::Completed),
    ];

    let stats = DashboardStats::compute(today(), &contacts, &companies, &leads, &tasks);

    assert_eq!(stats.total_contacts, 2);
    assert_eq!(stats.total_companies, 1);
    assert_eq!(stats.active_leads, 2);
    assert_eq!(stats.pipeline_value, 350.0);
    assert_eq!(stats.tasks_due, 2);
}
