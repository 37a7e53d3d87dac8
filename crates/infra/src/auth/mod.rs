//! Credential storage and authorization-server client.

pub mod file_store;
pub mod oauth_client;
pub mod store;

pub use file_store::FileCredentialStore;
pub use oauth_client::OAuthClient;
pub use store::DualCredentialStore;
