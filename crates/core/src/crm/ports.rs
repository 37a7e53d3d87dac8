//! Port interface for the external CRM

use async_trait::async_trait;
use leadforge_domain::Result;

/// Stateless transport adapter for the CRM's record-creation endpoint.
///
/// Implementations perform the remote call and nothing else; composing the
/// result with local state is the orchestrator's job.
#[async_trait]
pub trait CrmApi: Send + Sync {
    /// Create a record of the given type and return the external id.
    ///
    /// # Errors
    /// Returns `CrmApi { status, body }` on a non-success response, with the
    /// body preserved verbatim, or `Network` when the call never completed.
    async fn create_record(
        &self,
        record_type: &str,
        payload: &serde_json::Value,
        access_token: &str,
    ) -> Result<String>;
}
