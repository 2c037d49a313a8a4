//! moor - TOTP-backed Tunnelblick CLI
//!
//! Refreshes each profile's keychain password with a fresh TOTP token and
//! asks Tunnelblick to connect or disconnect it.

use clap::{CommandFactory, Parser};
use moor_core::{error::MoorError, init_logging, types::DEFAULT_COMMAND_TIMEOUT_SECS, vpn::Request};
use std::time::Duration;

mod cli;

#[derive(Parser)]
#[command(name = "moor", version)]
#[command(about = "Connect and disconnect Tunnelblick VPN profiles with TOTP credentials")]
struct Cli {
    /// Connect to VPN, connects to all if name not mentioned
    #[arg(short, long, value_name = "NAME", num_args = 0..=1)]
    connect: Option<Option<String>>,

    /// Disconnect from VPN, disconnects from all if name not mentioned
    #[arg(short, long, value_name = "NAME", num_args = 0..=1)]
    disconnect: Option<Option<String>>,

    /// Seconds to wait for each external command
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_COMMAND_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn print_help() {
    if let Err(e) = Cli::command().print_help() {
        eprintln!("{}", e);
    }
    println!();
}

fn check_platform() -> Result<(), MoorError> {
    if cfg!(target_os = "macos") {
        Ok(())
    } else {
        Err(MoorError::UnsupportedPlatform)
    }
}

async fn run(cli: Cli) -> Result<bool, MoorError> {
    let request = match Request::from_flags(cli.connect, cli.disconnect)? {
        Some(request) => request,
        None => {
            print_help();
            return Ok(true);
        }
    };

    check_platform()?;

    cli::vpn::run_vpn(request, Duration::from_secs(cli.timeout)).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Show default help if nothing gets passed
    if std::env::args_os().len() <= 1 {
        print_help();
        std::process::exit(0);
    }

    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    match run(cli).await {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
