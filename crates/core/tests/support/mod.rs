//! In-memory fakes for the core ports.
//!
//! Shared across the integration suites; not every suite uses every fake.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use leadforge_core::{AuthServerClient, CrmApi, LeadRepository, TokenGrant, TokenStore};
use leadforge_domain::{
    CredentialRecord, CredentialUpdate, Lead, LeadForgeError, LeadStats, Result,
};
use uuid::Uuid;

/// Credential store held in memory, with switchable failure modes.
#[derive(Default)]
pub struct MemoryTokenStore {
    record: Mutex<Option<CredentialRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryTokenStore {
    pub fn with_record(record: CredentialRecord) -> Self {
        Self { record: Mutex::new(Some(record)), ..Self::default() }
    }

    pub fn snapshot(&self) -> Option<CredentialRecord> {
        self.record.lock().unwrap().clone()
    }

    pub fn set_record(&self, record: CredentialRecord) {
        *self.record.lock().unwrap() = Some(record);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn read(&self) -> Result<Option<CredentialRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LeadForgeError::StoreUnavailable("simulated read failure".into()));
        }
        Ok(self.record.lock().unwrap().clone())
    }

    async fn write(&self, update: CredentialUpdate) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LeadForgeError::StoreUnavailable("simulated write failure".into()));
        }
        let mut guard = self.record.lock().unwrap();
        let mut record = guard.clone().unwrap_or_default();
        record.merge(update);
        *guard = Some(record);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.record.lock().unwrap() = None;
        Ok(())
    }
}

/// Scripted authorization server.
#[derive(Default)]
pub struct StubAuthServer {
    grant: Mutex<Option<TokenGrant>>,
    fail_refresh: AtomicBool,
    pub refresh_calls: AtomicUsize,
    pub exchange_calls: AtomicUsize,
}

impl StubAuthServer {
    pub fn issuing(access_token: &str, refresh_token: Option<&str>, expires_in: i64) -> Self {
        Self {
            grant: Mutex::new(Some(TokenGrant {
                access_token: access_token.to_string(),
                refresh_token: refresh_token.map(String::from),
                expires_at: Some(Utc::now() + Duration::seconds(expires_in)),
            })),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        let server = Self::default();
        server.fail_refresh.store(true, Ordering::SeqCst);
        server
    }

    pub fn refresh_call_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthServerClient for StubAuthServer {
    async fn refresh_access_token(&self, _refresh_token: &str) -> Result<TokenGrant> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(LeadForgeError::TokenRefresh("invalid_grant: simulated".into()));
        }
        self.grant
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| LeadForgeError::TokenRefresh("no grant scripted".into()))
    }

    async fn exchange_authorization_code(&self, _code: &str) -> Result<TokenGrant> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.grant
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| LeadForgeError::TokenRefresh("no grant scripted".into()))
    }
}

/// Lead repository held in memory.
#[derive(Default)]
pub struct MemoryLeadRepository {
    leads: Mutex<Vec<Lead>>,
}

impl MemoryLeadRepository {
    pub fn lead(&self, id: Uuid) -> Option<Lead> {
        self.leads.lock().unwrap().iter().find(|l| l.id == id).cloned()
    }
}

#[async_trait]
impl LeadRepository for MemoryLeadRepository {
    async fn insert(&self, lead: &Lead) -> Result<()> {
        self.leads.lock().unwrap().push(lead.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Lead>> {
        Ok(self.lead(id))
    }

    async fn list_pending(&self, limit: usize) -> Result<Vec<Lead>> {
        let mut pending: Vec<Lead> =
            self.leads.lock().unwrap().iter().filter(|l| !l.sent).cloned().collect();
        pending.sort_by_key(|l| l.created_at);
        pending.truncate(limit);
        Ok(pending)
    }

    async fn mark_sent(
        &self,
        id: Uuid,
        external_lead_id: Option<&str>,
        external_contact_id: Option<&str>,
    ) -> Result<()> {
        let mut leads = self.leads.lock().unwrap();
        let lead = leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| LeadForgeError::NotFound(format!("lead {id}")))?;
        lead.sent = true;
        lead.external_lead_id = external_lead_id.map(String::from);
        lead.external_contact_id = external_contact_id.map(String::from);
        Ok(())
    }

    async fn stats(&self) -> Result<LeadStats> {
        let leads = self.leads.lock().unwrap();
        let sent = leads.iter().filter(|l| l.sent).count() as u64;
        let total = leads.len() as u64;
        Ok(LeadStats { total, pending: total - sent, sent })
    }
}

/// Scripted CRM endpoint. Fails deliveries whose payload email matches the
/// configured address; otherwise hands out ids from the queue.
#[derive(Default)]
pub struct StubCrmApi {
    ids: Mutex<VecDeque<String>>,
    fail_for_email: Mutex<Option<String>>,
    pub calls: AtomicUsize,
}

impl StubCrmApi {
    pub fn issuing_ids(ids: &[&str]) -> Self {
        Self {
            ids: Mutex::new(ids.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn fail_for_email(&self, email: &str) {
        *self.fail_for_email.lock().unwrap() = Some(email.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CrmApi for StubCrmApi {
    async fn create_record(
        &self,
        _record_type: &str,
        payload: &serde_json::Value,
        _access_token: &str,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(email) = self.fail_for_email.lock().unwrap().as_deref() {
            if payload["Email"] == email {
                return Err(LeadForgeError::CrmApi {
                    status: 500,
                    body: r#"{"code":"INTERNAL_ERROR"}"#.to_string(),
                });
            }
        }

        Ok(self.ids.lock().unwrap().pop_front().unwrap_or_else(|| "crm_record_1".to_string()))
    }
}

/// A credential record whose access token expires `seconds` from now.
pub fn credentials_expiring_in(seconds: i64) -> CredentialRecord {
    CredentialRecord {
        access_token: Some("stored-access".to_string()),
        refresh_token: Some("stored-refresh".to_string()),
        access_token_expires_at: Some(Utc::now() + Duration::seconds(seconds)),
    }
}

