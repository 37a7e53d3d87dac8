//! CRM delivery port

pub mod ports;
