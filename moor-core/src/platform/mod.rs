//! External command execution
//!
//! Both the keychain update and the Tunnelblick automation are plain
//! command-line invocations. They go through the [`CommandRunner`] trait so
//! the session logic can be exercised against a recording fake.

use crate::error::CommandError;
use std::fmt;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

#[cfg(any(test, feature = "mock-runner"))]
pub mod mock;

/// A single external program invocation
///
/// Arguments are passed to the program directly, never through a shell.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Indexes into `args` that hold secrets and must not be printed
    pub secret_args: Vec<usize>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secret_args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append an argument that is redacted from `Debug` output
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.secret_args.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    /// Whether any argument equals `value`
    pub fn has_arg(&self, value: &str) -> bool {
        self.args.iter().any(|a| a == value)
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<&str> = self
            .args
            .iter()
            .enumerate()
            .map(|(i, a)| {
                if self.secret_args.contains(&i) {
                    "[REDACTED]"
                } else {
                    a.as_str()
                }
            })
            .collect();
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &args)
            .finish()
    }
}

/// Capability to run external programs
///
/// Implementations return the program's stdout when it exits with status 0
/// and a [`CommandError`] otherwise.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<String, CommandError>;
}

/// Runs programs on the host with a bounded timeout
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<String, CommandError> {
        let program = which::which(&invocation.program).map_err(|e| CommandError::Spawn {
            program: invocation.program.clone(),
            reason: e.to_string(),
        })?;

        debug!("Running {:?}", invocation);

        let child = Command::new(&program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| CommandError::Timeout {
                program: invocation.program.clone(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| CommandError::Spawn {
                program: invocation.program.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(CommandError::Failed {
                program: invocation.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
