//! External CRM HTTP client.

pub mod client;

pub use client::CrmClient;
