//! Recording command runner for testing
//!
//! Records every invocation in order and fails the ones matching a scripted
//! rule, without touching the host.

use super::{CommandRunner, Invocation};
use crate::error::CommandError;
use std::sync::Mutex;

#[derive(Debug)]
struct FailureRule {
    program: String,
    arg: Option<String>,
}

impl FailureRule {
    fn matches(&self, invocation: &Invocation) -> bool {
        invocation.program == self.program
            && self.arg.as_deref().map_or(true, |arg| invocation.has_arg(arg))
    }
}

/// In-memory [`CommandRunner`] that records invocations
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    failures: Mutex<Vec<FailureRule>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every invocation of `program`
    pub fn fail_program(&self, program: &str) {
        self.push_rule(FailureRule {
            program: program.to_string(),
            arg: None,
        });
    }

    /// Fail invocations of `program` that carry `arg` verbatim
    pub fn fail_with_arg(&self, program: &str, arg: &str) {
        self.push_rule(FailureRule {
            program: program.to_string(),
            arg: Some(arg.to_string()),
        });
    }

    fn push_rule(&self, rule: FailureRule) {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(rule);
    }

    /// Snapshot of the invocations seen so far, in call order
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<String, CommandError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(invocation.clone());

        let failures = self
            .failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if failures.iter().any(|rule| rule.matches(invocation)) {
            return Err(CommandError::Failed {
                program: invocation.program.clone(),
                code: Some(1),
                stderr: "scripted failure".to_string(),
            });
        }

        Ok(String::new())
    }
}
