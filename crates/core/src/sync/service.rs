//! Sync orchestrator - core business logic
//!
//! Composes the lead repository, token lifecycle, and CRM client. Invoked
//! per inbound capture request and per scheduled tick; every invocation runs
//! to completion before returning.

use std::sync::Arc;

use leadforge_domain::constants::CRM_LEAD_RECORD_TYPE;
use leadforge_domain::{Lead, LeadForgeError, LeadInput, LeadStats, Result};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::mapper::lead_to_crm_record;
use crate::auth::TokenLifecycle;
use crate::crm::ports::CrmApi;
use crate::leads::ports::LeadRepository;

/// Outcome of one delivery attempt for a single lead.
#[derive(Debug, Clone)]
pub enum DeliveryStatus {
    /// The CRM confirmed the record; the lead is marked sent.
    Delivered { external_lead_id: String },
    /// No usable refresh path exists; the lead stays pending until an
    /// operator re-authorizes.
    AuthRequired,
    /// Delivery failed; the lead stays pending for the next backlog pass.
    Failed(LeadForgeError),
}

/// Result of a capture request: the persisted lead plus what happened to
/// the inline delivery attempt.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub lead: Lead,
    pub delivery: DeliveryStatus,
}

/// Summary of one backlog pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BacklogReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Summary of one scheduled tick.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TickReport {
    pub token_refreshed: bool,
    #[serde(flatten)]
    pub backlog: BacklogReport,
}

/// Sync orchestrator
pub struct SyncService {
    leads: Arc<dyn LeadRepository>,
    crm: Arc<dyn CrmApi>,
    tokens: Arc<TokenLifecycle>,
    batch_size: usize,
}

impl SyncService {
    pub fn new(
        leads: Arc<dyn LeadRepository>,
        crm: Arc<dyn CrmApi>,
        tokens: Arc<TokenLifecycle>,
        batch_size: usize,
    ) -> Self {
        Self { leads, crm, tokens, batch_size }
    }

    /// Validate, persist, and attempt inline delivery of a captured lead.
    ///
    /// The lead is durably stored before any delivery attempt, so a CRM or
    /// auth failure never loses it; it stays pending for the next pass.
    ///
    /// # Errors
    /// - `Validation` when required fields are missing (nothing persisted).
    /// - Storage errors when the lead cannot be persisted.
    pub async fn capture_lead(&self, input: LeadInput) -> Result<CaptureOutcome> {
        input.validate()?;

        let mut lead = Lead::from_input(input);
        self.leads.insert(&lead).await?;
        info!(lead_id = %lead.id, source = %lead.source, "lead captured");

        let delivery = self.deliver(&lead).await;
        if let DeliveryStatus::Delivered { external_lead_id } = &delivery {
            lead.sent = true;
            lead.external_lead_id = Some(external_lead_id.clone());
        }

        Ok(CaptureOutcome { lead, delivery })
    }

    /// Drain the pending backlog in arrival order.
    ///
    /// Each lead is attempted independently; a failure on one never aborts
    /// the rest of the pass.
    pub async fn sync_pending(&self) -> Result<BacklogReport> {
        let pending = self.leads.list_pending(self.batch_size).await?;
        let mut report = BacklogReport { attempted: pending.len(), ..BacklogReport::default() };

        for lead in &pending {
            match self.deliver(lead).await {
                DeliveryStatus::Delivered { .. } => report.delivered += 1,
                DeliveryStatus::AuthRequired => {
                    report.failed += 1;
                    warn!(lead_id = %lead.id, "backlog delivery skipped: authentication required");
                }
                DeliveryStatus::Failed(err) => {
                    report.failed += 1;
                    warn!(lead_id = %lead.id, error = %err, "backlog delivery failed, lead stays pending");
                }
            }
        }

        if report.attempted > 0 {
            info!(
                attempted = report.attempted,
                delivered = report.delivered,
                failed = report.failed,
                "backlog pass complete"
            );
        }

        Ok(report)
    }

    /// The idempotent scheduled-trigger entry point: refresh the token if
    /// needed, then drain the backlog.
    pub async fn tick(&self) -> Result<TickReport> {
        let token_refreshed = match self.tokens.refresh_if_needed().await {
            Ok(refreshed) => refreshed,
            Err(err) => {
                // Refresh failures are transient by contract; the backlog
                // pass below will surface per-lead outcomes on its own.
                warn!(error = %err, "scheduled token refresh failed");
                false
            }
        };

        let backlog = self.sync_pending().await?;
        Ok(TickReport { token_refreshed, backlog })
    }

    /// Aggregate lead counts.
    pub async fn stats(&self) -> Result<LeadStats> {
        self.leads.stats().await
    }

    /// Fetch a single lead for diagnostics.
    pub async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>> {
        self.leads.get(id).await
    }

    /// Deliver one lead to the CRM and record the result.
    ///
    /// `mark_sent` is only called after the CRM confirmed the record, so a
    /// lead can never be marked sent without an external id.
    async fn deliver(&self, lead: &Lead) -> DeliveryStatus {
        let token = match self.tokens.get_valid_access_token().await {
            Ok(token) => token,
            Err(LeadForgeError::AuthRequired) => return DeliveryStatus::AuthRequired,
            Err(err) => return DeliveryStatus::Failed(err),
        };

        let payload = lead_to_crm_record(lead);
        let external_id =
            match self.crm.create_record(CRM_LEAD_RECORD_TYPE, &payload, &token).await {
                Ok(id) => id,
                Err(err) => return DeliveryStatus::Failed(err),
            };

        if let Err(err) = self.leads.mark_sent(lead.id, Some(&external_id), None).await {
            // The CRM has the record but we could not persist that fact;
            // the lead stays pending and the next pass may create a
            // duplicate on the CRM side. Surface loudly.
            warn!(lead_id = %lead.id, external_id = %external_id, error = %err,
                "delivered lead could not be marked sent");
            return DeliveryStatus::Failed(err);
        }

        info!(lead_id = %lead.id, external_id = %external_id, "lead delivered to CRM");
        DeliveryStatus::Delivered { external_lead_id: external_id }
    }
}
