//! Application configuration structures

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_SYNC_BATCH_SIZE};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub crm: CrmConfig,
    pub sync: SyncConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// SQLite database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path.
    pub path: String,
    /// Connection pool size.
    pub pool_size: u32,
    /// Path for the fallback credential file. Defaults to
    /// `<path>.credentials.json` when unset.
    #[serde(default)]
    pub credential_fallback_path: Option<String>,
}

impl DatabaseConfig {
    /// Resolve the fallback credential file location.
    #[must_use]
    pub fn fallback_path(&self) -> String {
        self.credential_fallback_path
            .clone()
            .unwrap_or_else(|| format!("{}.credentials.json", self.path))
    }
}

/// Authorization-server settings for the CRM connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token endpoint of the authorization server.
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI registered for the authorization-code flow.
    pub redirect_uri: String,
}

/// External CRM settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmConfig {
    /// API base, e.g. "https://crm.example.com/crm/v2".
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Backlog-drain scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Interval between scheduled ticks, in seconds. Should be shorter than
    /// the access token's typical lifetime.
    pub interval_seconds: u64,
    pub enabled: bool,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8080 }
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_batch_size() -> usize {
    DEFAULT_SYNC_BATCH_SIZE
}
