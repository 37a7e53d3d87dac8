//! Infrastructure error types and conversions into the domain error

use leadforge_domain::LeadForgeError;
use thiserror::Error;

/// Errors raised by infrastructure adapters before they are mapped onto the
/// domain taxonomy.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<InfraError> for LeadForgeError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Sqlite(e) => LeadForgeError::Database(e.to_string()),
            InfraError::Pool(e) => LeadForgeError::Database(e.to_string()),
            InfraError::Http(e) => LeadForgeError::Network(e.to_string()),
            InfraError::Io(e) => LeadForgeError::Internal(format!("io: {e}")),
            InfraError::Serde(e) => LeadForgeError::Internal(format!("serialization: {e}")),
            InfraError::Join(e) => LeadForgeError::Internal(format!("task join: {e}")),
        }
    }
}

/// Map a panicked or cancelled blocking task onto the domain error.
pub(crate) fn map_join_error(err: tokio::task::JoinError) -> LeadForgeError {
    if err.is_cancelled() {
        LeadForgeError::Internal("blocking task cancelled".into())
    } else {
        LeadForgeError::Internal(format!("blocking task panic: {err}"))
    }
}
