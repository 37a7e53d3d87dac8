//! Lead persistence ports

pub mod ports;
