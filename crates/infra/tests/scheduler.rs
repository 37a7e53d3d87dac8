//! Lifecycle tests for the sync scheduler, wired with real components over
//! an empty database so no network traffic happens.

use std::sync::Arc;
use std::time::Duration;

use leadforge_core::{SyncService, TokenLifecycle};
use leadforge_domain::{AuthConfig, CrmConfig};
use leadforge_infra::database::CredentialTable;
use leadforge_infra::{
    CrmClient, DbManager, DualCredentialStore, FileCredentialStore, OAuthClient, SchedulerConfig,
    SqliteLeadRepository, SyncScheduler,
};
use tempfile::TempDir;

fn scheduler(dir: &TempDir, interval: Duration) -> SyncScheduler {
    let db = Arc::new(DbManager::new(dir.path().join("test.db"), 2).expect("manager created"));
    db.run_migrations().expect("migrations run");

    let store: Arc<dyn leadforge_core::TokenStore> = Arc::new(DualCredentialStore::new(
        CredentialTable::new(Arc::clone(&db)),
        FileCredentialStore::new(dir.path().join("creds.json")),
    ));
    let auth_server: Arc<dyn leadforge_core::AuthServerClient> = Arc::new(
        OAuthClient::new(AuthConfig {
            token_url: "http://127.0.0.1:9/oauth/token".to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "https://example.com/callback".to_string(),
        })
        .expect("client built"),
    );
    let leads: Arc<dyn leadforge_core::LeadRepository> =
        Arc::new(SqliteLeadRepository::new(db));
    let crm: Arc<dyn leadforge_core::CrmApi> = Arc::new(
        CrmClient::new(&CrmConfig {
            base_url: "http://127.0.0.1:9/crm/v2".to_string(),
            timeout_seconds: 1,
        })
        .expect("client built"),
    );

    let tokens = Arc::new(TokenLifecycle::new(store, auth_server));
    let service = Arc::new(SyncService::new(leads, crm, tokens, 50));
    SyncScheduler::new(service, SchedulerConfig { interval })
}

#[tokio::test(flavor = "multi_thread")]
async fn scheduler_lifecycle() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = scheduler(&dir, Duration::from_secs(3600));

    assert!(!scheduler.is_running().await);

    scheduler.start().await.unwrap();
    assert!(scheduler.is_running().await);

    scheduler.stop().await.unwrap();
    assert!(!scheduler.is_running().await);
}

#[tokio::test(flavor = "multi_thread")]
async fn double_start_fails() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = scheduler(&dir, Duration::from_secs(3600));

    scheduler.start().await.unwrap();
    assert!(scheduler.start().await.is_err());

    scheduler.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_without_start_fails() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = scheduler(&dir, Duration::from_secs(3600));

    assert!(scheduler.stop().await.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn scheduler_can_restart_after_stop() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = scheduler(&dir, Duration::from_secs(3600));

    scheduler.start().await.unwrap();
    scheduler.stop().await.unwrap();

    scheduler.start().await.unwrap();
    assert!(scheduler.is_running().await);
    scheduler.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn ticks_keep_running_with_an_empty_backlog() {
    let dir = TempDir::new().unwrap();
    let mut scheduler = scheduler(&dir, Duration::from_millis(10));

    scheduler.start().await.unwrap();
    // A few intervals pass; unauthenticated ticks over an empty backlog
    // must not kill the loop.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(scheduler.is_running().await);

    scheduler.stop().await.unwrap();
}
