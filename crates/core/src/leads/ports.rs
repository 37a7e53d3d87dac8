//! Port interfaces for lead storage

use async_trait::async_trait;
use leadforge_domain::{Lead, LeadStats, Result};
use uuid::Uuid;

/// Trait for durable lead storage and delivery-state bookkeeping.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Persist a new lead with `sent = false`.
    async fn insert(&self, lead: &Lead) -> Result<()>;

    /// Fetch a lead by id.
    async fn get(&self, id: Uuid) -> Result<Option<Lead>>;

    /// All undelivered leads, oldest first, so a backlog drains in arrival
    /// order.
    async fn list_pending(&self, limit: usize) -> Result<Vec<Lead>>;

    /// Record a successful delivery. Idempotent in effect; must only be
    /// called after the CRM confirmed the record.
    async fn mark_sent(
        &self,
        id: Uuid,
        external_lead_id: Option<&str>,
        external_contact_id: Option<&str>,
    ) -> Result<()>;

    /// Aggregate counts derived from stored rows.
    async fn stats(&self) -> Result<LeadStats>;
}
