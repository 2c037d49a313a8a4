//! CLI command implementations

pub mod vpn;
