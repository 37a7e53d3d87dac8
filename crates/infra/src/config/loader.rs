//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `LEADFORGE_DB_PATH`: Database file path
//! - `LEADFORGE_DB_POOL_SIZE`: Connection pool size
//! - `LEADFORGE_CREDENTIAL_FALLBACK_PATH`: Fallback credential file (optional)
//! - `LEADFORGE_AUTH_TOKEN_URL`: Authorization-server token endpoint
//! - `LEADFORGE_AUTH_CLIENT_ID`: OAuth client id
//! - `LEADFORGE_AUTH_CLIENT_SECRET`: OAuth client secret
//! - `LEADFORGE_AUTH_REDIRECT_URI`: Registered redirect URI
//! - `LEADFORGE_CRM_BASE_URL`: CRM API base URL
//! - `LEADFORGE_CRM_TIMEOUT`: CRM request timeout in seconds (optional)
//! - `LEADFORGE_SYNC_INTERVAL`: Sync interval in seconds
//! - `LEADFORGE_SYNC_ENABLED`: Whether scheduled sync is enabled (true/false)
//! - `LEADFORGE_SYNC_BATCH_SIZE`: Leads per backlog pass (optional)
//! - `LEADFORGE_SERVER_HOST` / `LEADFORGE_SERVER_PORT`: Bind address (optional)
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `leadforge.{json,toml}` in the
//! working directory, up to two parent directories, and next to the
//! executable.

use std::path::{Path, PathBuf};

use leadforge_domain::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_SYNC_BATCH_SIZE};
use leadforge_domain::{
    AuthConfig, Config, CrmConfig, DatabaseConfig, LeadForgeError, Result, ServerConfig,
    SyncConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `LeadForgeError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Returns an error
/// if any are missing.
///
/// # Errors
/// Returns `LeadForgeError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("LEADFORGE_DB_PATH")?;
    let db_pool_size = env_var("LEADFORGE_DB_POOL_SIZE").and_then(|s| {
        s.parse::<u32>().map_err(|e| LeadForgeError::Config(format!("Invalid pool size: {e}")))
    })?;
    let credential_fallback_path = std::env::var("LEADFORGE_CREDENTIAL_FALLBACK_PATH").ok();

    let token_url = env_var("LEADFORGE_AUTH_TOKEN_URL")?;
    let client_id = env_var("LEADFORGE_AUTH_CLIENT_ID")?;
    let client_secret = env_var("LEADFORGE_AUTH_CLIENT_SECRET")?;
    let redirect_uri = env_var("LEADFORGE_AUTH_REDIRECT_URI")?;

    let crm_base_url = env_var("LEADFORGE_CRM_BASE_URL")?;
    let crm_timeout = env_parse::<u64>("LEADFORGE_CRM_TIMEOUT", DEFAULT_HTTP_TIMEOUT_SECS)?;

    let sync_interval = env_var("LEADFORGE_SYNC_INTERVAL").and_then(|s| {
        s.parse::<u64>().map_err(|e| LeadForgeError::Config(format!("Invalid sync interval: {e}")))
    })?;
    let sync_enabled = env_bool("LEADFORGE_SYNC_ENABLED", true);
    let batch_size = env_parse::<usize>("LEADFORGE_SYNC_BATCH_SIZE", DEFAULT_SYNC_BATCH_SIZE)?;

    let server_default = ServerConfig::default();
    let server_host =
        std::env::var("LEADFORGE_SERVER_HOST").unwrap_or_else(|_| server_default.host.clone());
    let server_port = env_parse::<u16>("LEADFORGE_SERVER_PORT", server_default.port)?;

    Ok(Config {
        database: DatabaseConfig {
            path: db_path,
            pool_size: db_pool_size,
            credential_fallback_path,
        },
        auth: AuthConfig { token_url, client_id, client_secret, redirect_uri },
        crm: CrmConfig { base_url: crm_base_url, timeout_seconds: crm_timeout },
        sync: SyncConfig { interval_seconds: sync_interval, enabled: sync_enabled, batch_size },
        server: ServerConfig { host: server_host, port: server_port },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `LeadForgeError::Config` if no file is found, the format is
/// invalid, or required fields are missing.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LeadForgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LeadForgeError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LeadForgeError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content.
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LeadForgeError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LeadForgeError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(LeadForgeError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("leadforge.json"),
            cwd.join("leadforge.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("leadforge.json"),
                exe_dir.join("leadforge.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| LeadForgeError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional numeric environment variable into its target type,
/// with a default. Out-of-range values fail instead of wrapping.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(s) => s.parse::<T>().map_err(|e| LeadForgeError::Config(format!("Invalid {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
