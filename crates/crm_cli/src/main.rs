//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `crm_core` linkage.
//! - Seed a small in-memory CRM and print board, dashboard and triage
//!   numbers; output stays deterministic apart from the current date.
//! - Load core settings through `CoreConfig`.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use crm_core::{
    classify, default_log_level, Company, CompanyService, Contact, ContactService, CoreConfig,
    DashboardStats, Lead, LeadPatch, LeadService, LeadStage, LogConfig, LogLevel,
    PipelineBoard, RelatedKind, RelatedRef, Task, TaskBucket, TaskService, TaskStatus,
};
use log::info;
use std::error::Error;
use std::sync::Arc;

const CONFIG_ENV: &str = "CRM_CONFIG";
const LOG_LEVEL_ENV: &str = "CRM_LOG_LEVEL";
const LOG_DIR_ENV: &str = "CRM_LOG_DIR";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("crm_core ping={}", crm_core::ping());
    println!("crm_core version={}", crm_core::core_version());

    let config = load_config(|key| std::env::var(key).ok())?;
    if config.apply_logging()? {
        if let Some(logging) = &config.logging {
            println!("logging level={} dir={}", logging.level, logging.dir.display());
        }
    }

    let today = Local::now().date_naive();
    let contacts = ContactService::new(config.latency);
    let companies = CompanyService::new(config.latency);
    let leads = Arc::new(LeadService::new(config.latency));
    let tasks = TaskService::new(config.latency);

    seed(today, &contacts, &companies, &leads, &tasks).await?;
    info!("event=cli_seed module=cli status=ok");

    let board = PipelineBoard::new(Arc::clone(&leads));
    board.refresh().await;
    for bucket in board.buckets() {
        println!(
            "stage={} count={} value={:.2}",
            bucket.stage, bucket.summary.count, bucket.summary.value
        );
    }

    let stats = DashboardStats::compute(
        today,
        &contacts.get_all().await,
        &companies.get_all().await,
        &leads.get_all().await,
        &tasks.get_all().await,
    );
    println!(
        "dashboard contacts={} companies={} active_leads={} pipeline_value={:.2} tasks_due={}",
        stats.total_contacts,
        stats.total_companies,
        stats.active_leads,
        stats.pipeline_value,
        stats.tasks_due
    );

    let triaged = classify(today, &tasks.get_all().await);
    for bucket in TaskBucket::ALL {
        println!("tasks bucket={:?} count={}", bucket, triaged.bucket(bucket).len());
    }

    Ok(())
}

/// `CRM_CONFIG` names a JSON config file; without it the run uses zero
/// latency and takes logging from `CRM_LOG_DIR` / `CRM_LOG_LEVEL`.
fn load_config(var: impl Fn(&str) -> Option<String>) -> Result<CoreConfig, Box<dyn Error>> {
    if let Some(path) = var(CONFIG_ENV) {
        let raw = std::fs::read_to_string(path)?;
        return Ok(CoreConfig::from_json(&raw)?);
    }

    let mut config = CoreConfig::instant();
    if let Some(dir) = var(LOG_DIR_ENV) {
        let level = match var(LOG_LEVEL_ENV) {
            Some(raw) => raw.parse::<LogLevel>()?,
            None => default_log_level(),
        };
        config.logging = Some(LogConfig::new(level, dir));
    }
    Ok(config)
}

async fn seed(
    today: NaiveDate,
    contacts: &ContactService,
    companies: &CompanyService,
    leads: &LeadService,
    tasks: &TaskService,
) -> Result<(), Box<dyn Error>> {
    let techcorp = companies
        .create(Company::new("TechCorp Solutions", "Technology"))
        .await?;
    let studio = companies
        .create(Company::new("Creative Design Studio", "Design"))
        .await?;

    let mut sarah = Contact::new("Sarah", "Johnson", "sarah@techcorp.com");
    sarah.position = "CTO".to_string();
    sarah.company_id = Some(techcorp.id);
    let sarah = contacts.create(sarah).await?;

    let mut mike = Contact::new("Mike", "Chen", "mike@creativedesign.com");
    mike.company_id = Some(studio.id);
    let mike = contacts.create(mike).await?;

    let mut platform = Lead::new("Enterprise Software License", 50_000.0, LeadStage::New);
    platform.contact_id = Some(sarah.id);
    platform.company_id = Some(techcorp.id);
    platform.probability = 20;
    let platform = leads.create(platform).await?;

    let mut rebrand = Lead::new("Website Redesign", 15_000.0, LeadStage::Proposal);
    rebrand.contact_id = Some(mike.id);
    rebrand.company_id = Some(studio.id);
    rebrand.probability = 60;
    leads.create(rebrand).await?;

    leads
        .create(Lead::new("Support Renewal", 8_000.0, LeadStage::Won))
        .await?;
    leads
        .update(
            platform.id,
            LeadPatch {
                probability: Some(40),
                ..LeadPatch::stage(LeadStage::Contacted)
            },
        )
        .await?;

    let nine_am = |day: NaiveDate| -> NaiveDateTime { day.and_time(morning()) };
    let mut call = Task::new("Follow up call with Sarah", nine_am(today - Duration::days(1)));
    call.related = Some(RelatedRef {
        kind: RelatedKind::Contact,
        id: sarah.id,
    });
    tasks.create(call).await?;

    let mut proposal = Task::new("Send redesign proposal", nine_am(today));
    proposal.related = Some(RelatedRef {
        kind: RelatedKind::Lead,
        id: platform.id,
    });
    tasks.create(proposal).await?;

    tasks
        .create(Task::new("Quarterly review", nine_am(today + Duration::days(7))))
        .await?;

    let mut onboarding = Task::new("Onboarding checklist", nine_am(today - Duration::days(3)));
    onboarding.status = TaskStatus::Completed;
    tasks.create(onboarding).await?;

    Ok(())
}

fn morning() -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(chrono::NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::load_config;
    use crm_core::{LatencyProfile, LogLevel};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn no_variables_means_instant_and_no_logging() {
        let config = load_config(lookup(&[])).unwrap();
        assert_eq!(config.latency, LatencyProfile::instant());
        assert!(config.logging.is_none());
    }

    #[test]
    fn log_variables_build_a_log_config() {
        let config = load_config(lookup(&[
            ("CRM_LOG_DIR", "/var/log/crm"),
            ("CRM_LOG_LEVEL", "WARNING"),
        ]))
        .unwrap();
        let logging = config.logging.unwrap();
        assert_eq!(logging.level, LogLevel::Warn);
        assert_eq!(logging.dir, PathBuf::from("/var/log/crm"));
    }

    #[test]
    fn config_file_goes_through_core_config() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"latency": {"create": 7}}"#).unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let config = load_config(lookup(&[("CRM_CONFIG", path.as_str())])).unwrap();
        assert_eq!(config.latency.create, 7);
        assert_eq!(config.latency.update, LatencyProfile::default().update);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let result = load_config(lookup(&[("CRM_LOG_DIR", "/tmp"), ("CRM_LOG_LEVEL", "loud")]));
        assert!(result.is_err());
    }
}
