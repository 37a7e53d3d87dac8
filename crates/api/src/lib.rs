//! # LeadForge API
//!
//! HTTP surface for the lead capture and CRM synchronization service.
//! Wires the infrastructure adapters into the core services and exposes
//! them as an axum application.

pub mod context;
pub mod logging;
pub mod routes;

pub use context::AppContext;
pub use routes::router;
