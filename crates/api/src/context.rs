//! Application context: dependency wiring for the HTTP layer.

use std::sync::Arc;

use leadforge_core::{SyncService, TokenLifecycle};
use leadforge_domain::{Config, Result};
use leadforge_infra::database::CredentialTable;
use leadforge_infra::{
    CrmClient, DbManager, DualCredentialStore, FileCredentialStore, OAuthClient,
    SqliteLeadRepository,
};

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub service: Arc<SyncService>,
    pub tokens: Arc<TokenLifecycle>,
    pub db: Arc<DbManager>,
}

impl AppContext {
    /// Build the full component graph from configuration.
    ///
    /// Opens the database pool, runs migrations, and wires the dual
    /// credential store, clients, and services.
    pub fn from_config(config: &Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let store: Arc<dyn leadforge_core::TokenStore> = Arc::new(DualCredentialStore::new(
            CredentialTable::new(Arc::clone(&db)),
            FileCredentialStore::new(config.database.fallback_path()),
        ));
        let auth_server: Arc<dyn leadforge_core::AuthServerClient> =
            Arc::new(OAuthClient::new(config.auth.clone())?);
        let tokens = Arc::new(TokenLifecycle::new(store, auth_server));

        let leads: Arc<dyn leadforge_core::LeadRepository> =
            Arc::new(SqliteLeadRepository::new(Arc::clone(&db)));
        let crm: Arc<dyn leadforge_core::CrmApi> = Arc::new(CrmClient::new(&config.crm)?);

        let service = Arc::new(SyncService::new(
            leads,
            crm,
            Arc::clone(&tokens),
            config.sync.batch_size,
        ));

        Ok(Self { service, tokens, db })
    }

    /// Check that the database answers queries.
    pub fn health_check(&self) -> Result<()> {
        self.db.health_check()
    }
}
