//! SQLite persistence for leads and CRM credentials.

pub mod credential_repository;
pub mod lead_repository;
pub mod manager;

pub use credential_repository::CredentialTable;
pub use lead_repository::SqliteLeadRepository;
pub use manager::DbManager;
