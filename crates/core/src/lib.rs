//! # LeadForge Core
//!
//! Use-case layer: port traits and the services that compose them.
//!
//! This crate contains:
//! - Port interfaces implemented by `leadforge-infra` (token store,
//!   authorization server client, lead repository, CRM API)
//! - The token lifecycle manager
//! - The sync orchestrator that moves captured leads into the CRM
//!
//! Everything here is programmed against traits so it can be exercised with
//! in-memory fakes.

pub mod auth;
pub mod crm;
pub mod leads;
pub mod sync;

pub use auth::ports::{AuthServerClient, TokenGrant, TokenStore};
pub use auth::{AuthStatus, TokenLifecycle};
pub use crm::ports::CrmApi;
pub use leads::ports::LeadRepository;
pub use sync::{BacklogReport, CaptureOutcome, DeliveryStatus, SyncService, TickReport};
