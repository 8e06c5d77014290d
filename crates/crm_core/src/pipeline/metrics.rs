//! Pipeline aggregates, recomputed from the current lead list on every call.

use crate::model::lead::{LeadRecord, LeadStage};
use serde::Serialize;

/// Lead count and summed value for one stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StageSummary {
    pub count: usize,
    pub value: f64,
}

pub fn stage_summary(leads: &[LeadRecord], stage: LeadStage) -> StageSummary {
    leads
        .iter()
        .filter(|lead| lead.data.stage == stage)
        .fold(StageSummary::default(), |acc, lead| StageSummary {
            count: acc.count + 1,
            value: acc.value + lead.data.value,
        })
}

/// Summaries for every stage in board column order, empty stages included.
pub fn stage_summaries(leads: &[LeadRecord]) -> Vec<(LeadStage, StageSummary)> {
    LeadStage::ALL
        .into_iter()
        .map(|stage| (stage, stage_summary(leads, stage)))
        .collect()
}

/// Sum of all lead values regardless of stage.
pub fn total_value(leads: &[LeadRecord]) -> f64 {
    leads.iter().map(|lead| lead.data.value).sum()
}

/// Leads whose stage is not terminal.
pub fn active_count(leads: &[LeadRecord]) -> usize {
    leads
        .iter()
        .filter(|lead| !lead.data.stage.is_terminal())
        .count()
}

/// Summed value of non-terminal leads.
pub fn active_value(leads: &[LeadRecord]) -> f64 {
    leads
        .iter()
        .filter(|lead| !lead.data.stage.is_terminal())
        .map(|lead| lead.data.value)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::{active_count, active_value, stage_summaries, total_value, StageSummary};
    use crate::model::entity::{EntityId, Record};
    use crate::model::lead::{Lead, LeadRecord, LeadStage};
    use chrono::Utc;

    fn lead(id: u64, value: f64, stage: LeadStage) -> LeadRecord {
        Record::new(
            EntityId::new(id).unwrap(),
            Utc::now(),
            Lead::new(format!("lead {id}"), value, stage),
        )
    }

    #[test]
    fn terminal_stages_count_toward_total_but_not_active() {
        let leads = vec![
            lead(1, 100.0, LeadStage::New),
            lead(2, 200.0, LeadStage::Won),
            lead(3, 300.0, LeadStage::Lost),
        ];

        assert_eq!(total_value(&leads), 600.0);
        assert_eq!(active_count(&leads), 1);
        assert_eq!(active_value(&leads), 100.0);
    }

    #[test]
    fn summaries_cover_every_stage_in_order() {
        let leads = vec![lead(1, 50.0, LeadStage::Proposal)];
        let summaries = stage_summaries(&leads);

        let stages: Vec<_> = summaries.iter().map(|(stage, _)| *stage).collect();
        assert_eq!(stages, LeadStage::ALL.to_vec());
        assert_eq!(summaries[0].1, StageSummary::default());
        assert_eq!(
            summaries[3].1,
            StageSummary {
                count: 1,
                value: 50.0
            }
        );
    }
}
