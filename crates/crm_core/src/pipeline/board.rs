//! Kanban interaction state machine for lead stages.
//!
//! # Responsibility
//! - Own the displayed lead list and the single drag session.
//! - Apply stage moves optimistically, persist them through a
//!   `LeadGateway`, and roll back on failure.
//!
//! # Invariants
//! - At most one drag session is active. A session stays active until its
//!   backing call resolves, so no second stage change can overlap it.
//! - Rollback restores the stage captured at drag start, never whatever the
//!   view shows when the failure arrives.
//! - A same-stage drop or a cancel performs no backing call.
//! - A committed move survives a `load`/`refresh` that lands mid-commit.
//! - The view lock is never held across an `.await`.

use crate::model::entity::EntityId;
use crate::model::lead::{LeadRecord, LeadStage};
use crate::pipeline::gateway::LeadGateway;
use crate::pipeline::metrics::{self, StageSummary};
use crate::service::entity_service::ServiceError;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug)]
pub enum PipelineError {
    /// Operation not allowed in the current drag state.
    InvalidOperation(&'static str),
    /// Lead is not part of the displayed list.
    LeadNotOnBoard(EntityId),
    /// Backing stage change was rejected by the service layer.
    UpdateFailed {
        lead_id: EntityId,
        source: ServiceError,
    },
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOperation(reason) => write!(f, "invalid pipeline operation: {reason}"),
            Self::LeadNotOnBoard(id) => write!(f, "lead {id} is not on the board"),
            Self::UpdateFailed { lead_id, source } => {
                write!(f, "failed to update stage of lead {lead_id}: {source}")
            }
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UpdateFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Drag session state. `Committing` is still an active session: the drop
/// happened and the backing call is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        lead_id: EntityId,
        source_stage: LeadStage,
    },
    Committing {
        lead_id: EntityId,
        source_stage: LeadStage,
        target_stage: LeadStage,
    },
}

impl DragState {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// User-facing notice emitted when a stage change resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    StageChanged {
        lead_id: EntityId,
        stage: LeadStage,
    },
    StageChangeFailed {
        lead_id: EntityId,
        restored_stage: LeadStage,
        reason: String,
    },
}

impl Notification {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::StageChangeFailed { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Self::StageChanged { stage, .. } => format!("Lead moved to {stage}"),
            Self::StageChangeFailed { .. } => "Failed to update lead stage".to_string(),
        }
    }
}

/// Result of a drop that was accepted by the state machine.
#[derive(Debug)]
pub enum DropOutcome {
    /// Dropped on the source stage; nothing happened.
    Unchanged,
    /// Stage change persisted; carries the authoritative record.
    Moved(LeadRecord),
    /// Stage change rejected; the displayed stage was restored.
    RolledBack {
        lead_id: EntityId,
        restored_stage: LeadStage,
        error: PipelineError,
    },
}

/// One board column.
#[derive(Debug, Clone, PartialEq)]
pub struct StageBucket {
    pub stage: LeadStage,
    pub leads: Vec<LeadRecord>,
    pub summary: StageSummary,
}

#[derive(Debug, Default)]
struct BoardView {
    leads: Vec<LeadRecord>,
    drag: DragState,
    notifications: Vec<Notification>,
}

impl BoardView {
    fn lead(&self, lead_id: EntityId) -> Option<&LeadRecord> {
        self.leads.iter().find(|lead| lead.id == lead_id)
    }

    /// Returns `false` when the lead is no longer displayed.
    fn set_stage(&mut self, lead_id: EntityId, stage: LeadStage) -> bool {
        match self.leads.iter_mut().find(|lead| lead.id == lead_id) {
            Some(lead) => {
                lead.data.stage = stage;
                true
            }
            None => false,
        }
    }
}

fn lock_view(view: &Mutex<BoardView>) -> MutexGuard<'_, BoardView> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Restores the source stage if a committing drop is abandoned before its
/// backing call resolves (the `drop_on` future was dropped).
struct CommitGuard<'a> {
    view: &'a Mutex<BoardView>,
    lead_id: EntityId,
    source_stage: LeadStage,
    armed: bool,
}

impl CommitGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut view = lock_view(self.view);
        view.set_stage(self.lead_id, self.source_stage);
        view.drag = DragState::Idle;
        warn!(
            "event=stage_change module=pipeline status=abandoned lead_id={} restored={}",
            self.lead_id, self.source_stage
        );
    }
}

/// Presentation-independent kanban board over a lead gateway.
pub struct PipelineBoard<G: LeadGateway> {
    gateway: G,
    view: Mutex<BoardView>,
}

impl<G: LeadGateway> PipelineBoard<G> {
    /// Empty board; call `refresh` or `load` to populate it.
    pub fn new(gateway: G) -> Self {
        Self::with_leads(gateway, Vec::new())
    }

    pub fn with_leads(gateway: G, leads: Vec<LeadRecord>) -> Self {
        Self {
            gateway,
            view: Mutex::new(BoardView {
                leads,
                ..BoardView::default()
            }),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Replaces the displayed leads. An active drag session keeps its
    /// captured source stage.
    pub fn load(&self, leads: Vec<LeadRecord>) {
        let mut view = self.view();
        view.leads = leads;
    }

    /// Reloads the displayed leads from the gateway; returns the lead count.
    pub async fn refresh(&self) -> usize {
        let leads = self.gateway.list_leads().await;
        let count = leads.len();
        self.load(leads);
        debug!(
            "event=board_refresh module=pipeline status=ok leads={}",
            count
        );
        count
    }

    /// Starts a drag session for a displayed lead: `Idle -> Dragging`.
    pub fn begin_drag(&self, lead_id: EntityId) -> PipelineResult<()> {
        let mut view = self.view();
        if view.drag.is_active() {
            warn!(
                "event=drag_start module=pipeline status=rejected lead_id={} reason=session_active",
                lead_id
            );
            return Err(PipelineError::InvalidOperation(
                "a drag session is already active",
            ));
        }
        let source_stage = view
            .lead(lead_id)
            .map(|lead| lead.data.stage)
            .ok_or(PipelineError::LeadNotOnBoard(lead_id))?;

        view.drag = DragState::Dragging {
            lead_id,
            source_stage,
        };
        debug!(
            "event=drag_start module=pipeline status=ok lead_id={} source={}",
            lead_id, source_stage
        );
        Ok(())
    }

    /// Ends a drag outside any target: `Dragging -> Idle`, no backing call.
    ///
    /// A no-op while idle; rejected while a drop is committing.
    pub fn cancel_drag(&self) -> PipelineResult<()> {
        let mut view = self.view();
        match view.drag {
            DragState::Idle => Ok(()),
            DragState::Dragging { lead_id, .. } => {
                view.drag = DragState::Idle;
                debug!(
                    "event=drag_cancel module=pipeline status=ok lead_id={}",
                    lead_id
                );
                Ok(())
            }
            DragState::Committing { .. } => Err(PipelineError::InvalidOperation(
                "cannot cancel a drop that is already committing",
            )),
        }
    }

    /// Drops the dragged lead on `target_stage`.
    ///
    /// A different stage is shown immediately, then persisted; on failure
    /// the stage captured at drag start is restored. The board is `Idle`
    /// again once this resolves.
    pub async fn drop_on(&self, target_stage: LeadStage) -> PipelineResult<DropOutcome> {
        let (lead_id, source_stage) = {
            let mut view = self.view();
            let (lead_id, source_stage) = match view.drag {
                DragState::Idle => {
                    return Err(PipelineError::InvalidOperation("no active drag session"));
                }
                DragState::Committing { .. } => {
                    return Err(PipelineError::InvalidOperation(
                        "a stage change is already in flight",
                    ));
                }
                DragState::Dragging {
                    lead_id,
                    source_stage,
                } => (lead_id, source_stage),
            };

            if target_stage == source_stage {
                view.drag = DragState::Idle;
                debug!(
                    "event=drop module=pipeline status=unchanged lead_id={} stage={}",
                    lead_id, source_stage
                );
                return Ok(DropOutcome::Unchanged);
            }

            if !view.set_stage(lead_id, target_stage) {
                view.drag = DragState::Idle;
                return Err(PipelineError::LeadNotOnBoard(lead_id));
            }
            view.drag = DragState::Committing {
                lead_id,
                source_stage,
                target_stage,
            };
            (lead_id, source_stage)
        };

        let guard = CommitGuard {
            view: &self.view,
            lead_id,
            source_stage,
            armed: true,
        };
        let result = self.gateway.update_stage(lead_id, target_stage).await;
        guard.disarm();

        let mut view = self.view();
        view.drag = DragState::Idle;
        match result {
            Ok(record) => {
                // A refresh during the commit may have reloaded the old stage.
                view.set_stage(lead_id, target_stage);
                info!(
                    "event=stage_change module=pipeline status=ok lead_id={} from={} to={}",
                    lead_id, source_stage, target_stage
                );
                view.notifications.push(Notification::StageChanged {
                    lead_id,
                    stage: target_stage,
                });
                Ok(DropOutcome::Moved(record))
            }
            Err(source) => {
                view.set_stage(lead_id, source_stage);
                warn!(
                    "event=stage_change module=pipeline status=rolled_back lead_id={} from={} to={} error={}",
                    lead_id, source_stage, target_stage, source
                );
                view.notifications.push(Notification::StageChangeFailed {
                    lead_id,
                    restored_stage: source_stage,
                    reason: source.to_string(),
                });
                Ok(DropOutcome::RolledBack {
                    lead_id,
                    restored_stage: source_stage,
                    error: PipelineError::UpdateFailed { lead_id, source },
                })
            }
        }
    }

    pub fn state(&self) -> DragState {
        self.view().drag
    }

    /// Copies of the displayed leads, including optimistic stages.
    pub fn leads(&self) -> Vec<LeadRecord> {
        self.view().leads.clone()
    }

    pub fn lead(&self, lead_id: EntityId) -> Option<LeadRecord> {
        self.view().lead(lead_id).cloned()
    }

    pub fn leads_in(&self, stage: LeadStage) -> Vec<LeadRecord> {
        self.view()
            .leads
            .iter()
            .filter(|lead| lead.data.stage == stage)
            .cloned()
            .collect()
    }

    /// Every column in board order with its leads and summary.
    pub fn buckets(&self) -> Vec<StageBucket> {
        let view = self.view();
        LeadStage::ALL
            .into_iter()
            .map(|stage| {
                let leads: Vec<LeadRecord> = view
                    .leads
                    .iter()
                    .filter(|lead| lead.data.stage == stage)
                    .cloned()
                    .collect();
                let summary = metrics::stage_summary(&leads, stage);
                StageBucket {
                    stage,
                    leads,
                    summary,
                }
            })
            .collect()
    }

    pub fn stage_summary(&self, stage: LeadStage) -> StageSummary {
        metrics::stage_summary(&self.view().leads, stage)
    }

    pub fn stage_summaries(&self) -> Vec<(LeadStage, StageSummary)> {
        metrics::stage_summaries(&self.view().leads)
    }

    pub fn total_value(&self) -> f64 {
        metrics::total_value(&self.view().leads)
    }

    pub fn active_count(&self) -> usize {
        metrics::active_count(&self.view().leads)
    }

    /// Drains notifications emitted since the last call.
    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.view().notifications)
    }

    fn view(&self) -> MutexGuard<'_, BoardView> {
        lock_view(&self.view)
    }
}
