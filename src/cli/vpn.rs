//! Connect / disconnect commands
//!
//! Loads the profile registry, runs the request profile by profile and prints
//! a line per profile.

use colored::Colorize;
use moor_core::config::ProfileRegistry;
use moor_core::error::MoorError;
use moor_core::platform::SystemRunner;
use moor_core::vpn::{run_request, BatchReport, Request, SessionAction, SessionController};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Conventional exit status for SIGINT (128 + 2)
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Response to a Ctrl+C during a batch
#[derive(Debug, PartialEq, Eq)]
enum Interrupt {
    SkipRemaining,
    Exit,
}

fn on_interrupt(cancelled: &AtomicBool) -> Interrupt {
    if cancelled.swap(true, Ordering::SeqCst) {
        Interrupt::Exit
    } else {
        Interrupt::SkipRemaining
    }
}

/// Run a connect or disconnect request
///
/// Returns `Ok(false)` when at least one profile failed or was skipped.
pub async fn run_vpn(request: Request, timeout: Duration) -> Result<bool, MoorError> {
    let registry = ProfileRegistry::load_default()?;
    info!("Loaded {} profile(s)", registry.len());

    let runner = SystemRunner::new(timeout);
    let controller = SessionController::new(&runner);

    // Ctrl+C stops the batch after the profile currently in progress,
    // a second one quits immediately
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match on_interrupt(&flag) {
                Interrupt::SkipRemaining => {
                    warn!("Interrupted, remaining profiles will be skipped (Ctrl+C again to quit)")
                }
                Interrupt::Exit => {
                    eprintln!("Interrupted");
                    std::process::exit(INTERRUPTED_EXIT_CODE);
                }
            }
        }
    });

    let report = run_request(&registry, &controller, &request, &cancelled).await?;
    print_report(request.action, &report);

    Ok(report.is_success())
}

fn print_report(action: SessionAction, report: &BatchReport) {
    let verb = match action {
        SessionAction::Connect => "Connecting",
        SessionAction::Disconnect => "Disconnecting",
    };

    for name in &report.succeeded {
        println!("{} {} {}", "✓".green(), verb, name);
    }
    for error in &report.failed {
        eprintln!("{} {}", "✗".red(), error);
    }
    for name in &report.skipped {
        eprintln!("{} Skipped {}", "-".yellow(), name);
    }
}
