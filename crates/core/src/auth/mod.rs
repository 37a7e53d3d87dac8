//! Token lifecycle management

pub mod lifecycle;
pub mod ports;

pub use lifecycle::{AuthStatus, TokenLifecycle};
