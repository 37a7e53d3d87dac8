//! # LeadForge Infrastructure
//!
//! Infrastructure implementations of the core domain ports.
//!
//! This crate contains:
//! - SQLite persistence (lead repository, primary credential store)
//! - The file-backed fallback credential store and the dual store that
//!   combines the two
//! - HTTP clients for the authorization server and the external CRM
//! - The configuration loader and the periodic sync scheduler
//!
//! All "impure" code (I/O, network) lives here; business decisions stay in
//! `leadforge-core`.

pub mod auth;
pub mod config;
pub mod crm;
pub mod database;
pub mod errors;
pub mod scheduler;

pub use auth::{DualCredentialStore, FileCredentialStore, OAuthClient};
pub use crm::CrmClient;
pub use database::{DbManager, SqliteLeadRepository};
pub use errors::InfraError;
pub use scheduler::{SchedulerConfig, SyncScheduler};
