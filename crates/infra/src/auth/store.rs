//! Dual credential store: SQLite row with a JSON file fallback.

use async_trait::async_trait;
use leadforge_core::TokenStore;
use leadforge_domain::{CredentialRecord, CredentialUpdate, LeadForgeError, Result};
use tracing::warn;

use super::file_store::FileCredentialStore;
use crate::database::CredentialTable;

/// Combines the primary database store with the file fallback.
///
/// Reads prefer the database and degrade silently; a read never raises.
/// Writes go to the database first and fall back to the file, failing only
/// when both media are unusable.
pub struct DualCredentialStore {
    primary: CredentialTable,
    fallback: FileCredentialStore,
}

impl DualCredentialStore {
    pub fn new(primary: CredentialTable, fallback: FileCredentialStore) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl TokenStore for DualCredentialStore {
    async fn read(&self) -> Result<Option<CredentialRecord>> {
        match self.primary.read().await {
            Ok(Some(record)) => return Ok(Some(record)),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "primary credential store unreadable, trying fallback"),
        }

        match self.fallback.read().await {
            Ok(record) => Ok(record),
            Err(e) => {
                warn!(error = %e, "fallback credential store unreadable");
                Ok(None)
            }
        }
    }

    async fn write(&self, update: CredentialUpdate) -> Result<()> {
        let primary_err = match self.primary.write(update.clone()).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                warn!(error = %e, "primary credential store write failed, using fallback");
                e
            }
        };

        // The fallback holds a full record, so merge against the freshest
        // one still visible. The primary may reject writes yet answer
        // reads (full disk, read-only volume); its record wins over the
        // possibly stale file so a partial update cannot drop the stored
        // refresh token.
        let current = match self.primary.read().await {
            Ok(Some(record)) => record,
            _ => match self.fallback.read().await {
                Ok(record) => record.unwrap_or_default(),
                Err(e) => {
                    warn!(error = %e, "fallback credential store unreadable before write");
                    CredentialRecord::default()
                }
            },
        };

        match self.fallback.write(&current.merged(update)).await {
            Ok(()) => Ok(()),
            Err(fallback_err) => Err(LeadForgeError::StoreUnavailable(format!(
                "primary: {primary_err}; fallback: {fallback_err}"
            ))),
        }
    }

    async fn clear(&self) -> Result<()> {
        let primary_result = self.primary.clear().await;
        let fallback_result = self.fallback.remove().await;

        match (primary_result, fallback_result) {
            (Err(p), Err(f)) => {
                Err(LeadForgeError::StoreUnavailable(format!("primary: {p}; fallback: {f}")))
            }
            (Err(e), Ok(())) | (Ok(()), Err(e)) => {
                warn!(error = %e, "credential store partially cleared");
                Ok(())
            }
            (Ok(()), Ok(())) => Ok(()),
        }
    }
}
