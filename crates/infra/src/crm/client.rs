//! HTTP client for the external CRM's records API.

use std::time::Duration;

use async_trait::async_trait;
use leadforge_core::CrmApi;
use leadforge_domain::{CrmConfig, LeadForgeError, Result};
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::InfraError;

/// Client for the CRM's `POST /{record_type}` create endpoint.
pub struct CrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl CrmClient {
    pub fn new(config: &CrmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(InfraError::from)?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl CrmApi for CrmClient {
    async fn create_record(
        &self,
        record_type: &str,
        payload: &Value,
        access_token: &str,
    ) -> Result<String> {
        let url = format!("{}/{record_type}", self.base_url);

        // The CRM wraps every request in a "data" array, even for a single
        // record.
        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&json!({ "data": [payload] }))
            .send()
            .await
            .map_err(|e| LeadForgeError::Network(format!("CRM request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LeadForgeError::Network(format!("CRM response unreadable: {e}")))?;

        if !status.is_success() {
            return Err(LeadForgeError::CrmApi { status: status.as_u16(), body });
        }

        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| LeadForgeError::CrmApi {
                status: status.as_u16(),
                body: format!("unparseable success body: {e}"),
            })?;

        let record_id = parsed["data"][0]["details"]["id"]
            .as_str()
            .ok_or_else(|| LeadForgeError::CrmApi {
                status: status.as_u16(),
                body: format!("success body missing record id: {body}"),
            })?
            .to_string();

        debug!(%record_type, %record_id, "CRM record created");
        Ok(record_id)
    }
}
