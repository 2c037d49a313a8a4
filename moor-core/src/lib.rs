//! Core library for the moor VPN CLI tool
//!
//! This crate provides TOTP generation, keychain credential updates and
//! Tunnelblick session control for the profiles listed in `~/.moorrc`.

pub mod error;
pub mod types;

pub mod auth;
pub mod config;
pub mod platform;
pub mod vpn;

/// Initialize logging infrastructure
///
/// Logs go to stderr so they never mix with command output. Only warnings
/// are shown unless `verbose` is set.
pub fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(level)
        .try_init()?;

    Ok(())
}
