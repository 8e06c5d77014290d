//! Backing-call seam used by the pipeline board.

use crate::model::entity::EntityId;
use crate::model::lead::{Lead, LeadPatch, LeadRecord, LeadStage};
use crate::service::entity_service::{EntityService, ServiceResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Authoritative lead operations the board depends on.
#[async_trait]
pub trait LeadGateway: Send + Sync {
    /// Current copies of every lead.
    async fn list_leads(&self) -> Vec<LeadRecord>;

    /// Persists a stage change for one lead.
    async fn update_stage(&self, lead_id: EntityId, stage: LeadStage) -> ServiceResult<LeadRecord>;
}

#[async_trait]
impl LeadGateway for EntityService<Lead> {
    async fn list_leads(&self) -> Vec<LeadRecord> {
        self.get_all().await
    }

    async fn update_stage(&self, lead_id: EntityId, stage: LeadStage) -> ServiceResult<LeadRecord> {
        self.update(lead_id, LeadPatch::stage(stage)).await
    }
}

#[async_trait]
impl<G: LeadGateway + ?Sized> LeadGateway for Arc<G> {
    async fn list_leads(&self) -> Vec<LeadRecord> {
        (**self).list_leads().await
    }

    async fn update_stage(&self, lead_id: EntityId, stage: LeadStage) -> ServiceResult<LeadRecord> {
        (**self).update_stage(lead_id, stage).await
    }
}
