//! VPN session module
//!
//! Drives Tunnelblick for single profiles and routes requests over the
//! profile registry.

pub mod batch;
pub mod tunnelblick;

// Public re-exports
pub use batch::{run_request, BatchReport, ProfileSelector, Request};
pub use tunnelblick::{SessionAction, SessionController};
