//! Port interfaces for credential storage and token exchange

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leadforge_domain::{CredentialRecord, CredentialUpdate, Result};

/// Durable storage for the singleton credential record.
///
/// Implementations are expected to keep a primary medium as the single
/// arbiter of truth and may carry a disaster-fallback secondary; callers
/// never learn which medium answered.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the credential record. Absence of data is `Ok(None)`, not an
    /// error.
    async fn read(&self) -> Result<Option<CredentialRecord>>;

    /// Merge a partial update into the stored record and persist it.
    /// Fields absent from the update are preserved.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` only when no persistence medium is
    /// reachable.
    async fn write(&self, update: CredentialUpdate) -> Result<()>;

    /// Null out all credential fields, for explicit re-authentication.
    async fn clear(&self) -> Result<()>;
}

/// Tokens issued by the authorization server for one exchange.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: String,
    /// Present on the initial authorization-code exchange only.
    pub refresh_token: Option<String>,
    /// Absolute expiry, computed from `expires_in` at receive time.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Client for the external authorization server's token endpoint.
#[async_trait]
pub trait AuthServerClient: Send + Sync {
    /// Exchange a refresh token for a new access token
    /// (`grant_type=refresh_token`).
    ///
    /// # Errors
    /// Returns `TokenRefresh` on HTTP failure or a non-success response.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenGrant>;

    /// Exchange an authorization code for the initial token pair
    /// (`grant_type=authorization_code`).
    async fn exchange_authorization_code(&self, code: &str) -> Result<TokenGrant>;
}
