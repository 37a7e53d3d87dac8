//! Lead-to-CRM synchronization

pub mod mapper;
pub mod service;

pub use service::{BacklogReport, CaptureOutcome, DeliveryStatus, SyncService, TickReport};
