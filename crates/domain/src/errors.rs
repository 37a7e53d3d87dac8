//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for LeadForge
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum LeadForgeError {
    /// Malformed or incomplete lead input. Never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No usable refresh path exists; the operator must run the full
    /// authorization-code flow again.
    #[error("Authentication required: no usable access or refresh token")]
    AuthRequired,

    /// The refresh exchange against the authorization server failed.
    /// Transient by default; stored credentials are left untouched.
    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    /// The CRM rejected a delivery. The raw body is preserved verbatim so
    /// operators can tell scope errors apart from field validation errors.
    #[error("CRM API error (status {status}): {body}")]
    CrmApi { status: u16, body: String },

    /// Both the primary and the fallback credential store failed.
    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for LeadForge operations
pub type Result<T> = std::result::Result<T, LeadForgeError>;
