//! Dashboard headline numbers.

use crate::model::company::CompanyRecord;
use crate::model::contact::ContactRecord;
use crate::model::lead::LeadRecord;
use crate::model::task::TaskRecord;
use crate::pipeline::metrics;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_contacts: usize,
    pub total_companies: usize,
    /// Leads outside Won/Lost.
    pub active_leads: usize,
    /// Summed value of active leads only.
    pub pipeline_value: f64,
    /// Open tasks due at or before the start of `today`.
    pub tasks_due: usize,
}

impl DashboardStats {
    pub fn compute(
        today: NaiveDate,
        contacts: &[ContactRecord],
        companies: &[CompanyRecord],
        leads: &[LeadRecord],
        tasks: &[TaskRecord],
    ) -> Self {
        let start_of_today = today.and_time(NaiveTime::MIN);
        let tasks_due = tasks
            .iter()
            .filter(|task| !task.data.is_completed() && task.data.due_date <= start_of_today)
            .count();

        Self {
            total_contacts: contacts.len(),
            total_companies: companies.len(),
            active_leads: metrics::active_count(leads),
            pipeline_value: metrics::active_value(leads),
            tasks_due,
        }
    }
}
