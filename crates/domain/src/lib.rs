//! # LeadForge Domain
//!
//! Pure domain types shared across the workspace: lead and credential
//! records, the error taxonomy, and configuration structures. No I/O
//! happens in this crate.

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

pub use config::{AuthConfig, Config, CrmConfig, DatabaseConfig, ServerConfig, SyncConfig};
pub use errors::{LeadForgeError, Result};
pub use types::{CredentialRecord, CredentialUpdate, Lead, LeadInput, LeadSource, LeadStats};
