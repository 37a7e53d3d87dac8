//! Token lifecycle manager
//!
//! Decides whether the stored access token is usable and performs the
//! refresh-token exchange when it is not. The stored credential record is
//! the single source of truth; nothing is cached in memory, so concurrent
//! callers always converge on the store's merge semantics.

use std::sync::Arc;

use leadforge_domain::{CredentialRecord, CredentialUpdate, LeadForgeError, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::ports::{AuthServerClient, TokenStore};

/// Snapshot of the authentication state, for status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub has_refresh_token: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<i64>,
}

/// Manages the OAuth credential lifecycle against a durable [`TokenStore`].
pub struct TokenLifecycle {
    store: Arc<dyn TokenStore>,
    auth_server: Arc<dyn AuthServerClient>,
}

impl TokenLifecycle {
    pub fn new(store: Arc<dyn TokenStore>, auth_server: Arc<dyn AuthServerClient>) -> Self {
        Self { store, auth_server }
    }

    /// Check whether a usable access token is currently stored.
    ///
    /// Usable means: present, and either carrying no expiry or expiring more
    /// than the safety margin from now.
    pub async fn is_access_token_valid(&self) -> bool {
        self.read_record().await.is_access_token_valid()
    }

    /// Return a valid access token, refreshing silently when needed.
    ///
    /// # Errors
    /// - `AuthRequired` when neither a valid access token nor a refresh
    ///   token exists; the caller must run the authorization-code flow.
    /// - `TokenRefresh` when the refresh exchange fails. Stored credentials
    ///   are left untouched so the next trigger can retry.
    pub async fn get_valid_access_token(&self) -> Result<String> {
        let record = self.read_record().await;

        if record.is_access_token_valid() {
            if let Some(token) = record.access_token {
                return Ok(token);
            }
        }

        let Some(refresh_token) = record.refresh_token else {
            debug!("no refresh token stored, full authorization required");
            return Err(LeadForgeError::AuthRequired);
        };

        self.refresh(&refresh_token).await
    }

    /// Refresh the access token if it is stale and a refresh token exists.
    ///
    /// The idempotent entry point for the scheduled trigger: safe to call on
    /// every tick regardless of state.
    ///
    /// # Errors
    /// Returns `TokenRefresh` when an attempted exchange fails. Missing
    /// credentials are not an error here; no refresh simply occurred.
    pub async fn refresh_if_needed(&self) -> Result<bool> {
        let record = self.read_record().await;

        if record.is_access_token_valid() {
            return Ok(false);
        }

        let Some(refresh_token) = record.refresh_token else {
            debug!("refresh skipped: not authenticated");
            return Ok(false);
        };

        self.refresh(&refresh_token).await?;
        Ok(true)
    }

    /// Complete the initial authorization-code exchange and persist the
    /// full grant.
    ///
    /// # Errors
    /// Returns `TokenRefresh` when the exchange fails, or a store error when
    /// the grant cannot be persisted.
    pub async fn complete_authorization(&self, code: &str) -> Result<()> {
        let grant = self.auth_server.exchange_authorization_code(code).await?;

        self.store
            .write(CredentialUpdate::full_grant(
                grant.access_token,
                grant.refresh_token,
                grant.expires_at,
            ))
            .await?;

        info!("authorization completed, credentials stored");
        Ok(())
    }

    /// Explicit operator-triggered clear. Never called automatically.
    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await?;
        info!("credentials cleared");
        Ok(())
    }

    /// Report the current authentication state, refreshing first when the
    /// stored token is stale and a refresh path exists.
    pub async fn status(&self) -> AuthStatus {
        if let Err(err) = self.refresh_if_needed().await {
            debug!(error = %err, "status probe could not refresh token");
        }

        let record = self.read_record().await;
        AuthStatus {
            authenticated: record.is_access_token_valid(),
            has_refresh_token: record.refresh_token.is_some(),
            expires_in_seconds: record
                .access_token_expires_at
                .map(|at| (at - chrono::Utc::now()).num_seconds()),
        }
    }

    /// Perform the refresh exchange and persist the new access token.
    ///
    /// Two concurrent refreshes are harmless: the store merge only ever
    /// moves the expiry forward and the protocol issues a fresh valid token
    /// on every call, so no mutual exclusion is applied.
    async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let grant = match self.auth_server.refresh_access_token(refresh_token).await {
            Ok(grant) => grant,
            Err(err) => {
                // A transient outage must not force re-authentication, so
                // the stored tokens stay exactly as they are.
                warn!(error = %err, "token refresh failed, keeping existing credentials");
                return Err(err);
            }
        };

        // Access token and expiry only; the stored refresh token survives
        // the merge.
        self.store
            .write(CredentialUpdate::access_only(grant.access_token.clone(), grant.expires_at))
            .await?;

        info!("access token refreshed");
        Ok(grant.access_token)
    }

    async fn read_record(&self) -> CredentialRecord {
        match self.store.read().await {
            Ok(record) => record.unwrap_or_default(),
            Err(err) => {
                // An unreadable store is treated as an absent record rather
                // than failing the caller.
                warn!(error = %err, "credential store read failed, treating as absent");
                CredentialRecord::default()
            }
        }
    }
}
