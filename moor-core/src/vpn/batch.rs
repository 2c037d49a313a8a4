//! Request routing over the profile registry
//!
//! A request names one action and either every profile or a single one.
//! Profiles are processed strictly one after another in registry order; a
//! failing profile is recorded and the batch moves on.

use crate::config::{Profile, ProfileRegistry};
use crate::error::{MoorError, SessionError};
use crate::platform::CommandRunner;
use crate::vpn::tunnelblick::{SessionAction, SessionController};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Which profiles a request applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSelector {
    All,
    Named(String),
}

impl From<Option<String>> for ProfileSelector {
    fn from(name: Option<String>) -> Self {
        match name {
            Some(name) => Self::Named(name),
            None => Self::All,
        }
    }
}

/// A fully decided invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub action: SessionAction,
    pub selector: ProfileSelector,
}

impl Request {
    /// Decide the request from the `--connect` / `--disconnect` flags
    ///
    /// The outer `Option` is the flag's presence, the inner one its optional
    /// profile name. Returns `Ok(None)` when neither flag was given.
    pub fn from_flags(
        connect: Option<Option<String>>,
        disconnect: Option<Option<String>>,
    ) -> Result<Option<Self>, MoorError> {
        match (connect, disconnect) {
            (Some(_), Some(_)) => Err(MoorError::Usage {
                message: "Cannot connect & disconnect at the same time".to_string(),
            }),
            (Some(name), None) => Ok(Some(Self {
                action: SessionAction::Connect,
                selector: name.into(),
            })),
            (None, Some(name)) => Ok(Some(Self {
                action: SessionAction::Disconnect,
                selector: name.into(),
            })),
            (None, None) => Ok(None),
        }
    }
}

/// Outcome of a batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<SessionError>,
    /// Profiles left untouched because the batch was cancelled
    pub skipped: Vec<String>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Resolve the profiles a selector refers to, in registry order
///
/// A name missing from the registry is an error before anything is run.
pub fn select<'r>(
    registry: &'r ProfileRegistry,
    selector: &ProfileSelector,
) -> Result<Vec<&'r Profile>, MoorError> {
    match selector {
        ProfileSelector::All => Ok(registry.iter().collect()),
        ProfileSelector::Named(name) => registry
            .find(name)
            .map(|profile| vec![profile])
            .ok_or_else(|| MoorError::ProfileNotFound { name: name.clone() }),
    }
}

/// Execute a request against the registry
///
/// `cancelled` is checked before each profile; once set, the remaining
/// profiles are reported as skipped.
pub async fn run_request<R: CommandRunner>(
    registry: &ProfileRegistry,
    controller: &SessionController<'_, R>,
    request: &Request,
    cancelled: &AtomicBool,
) -> Result<BatchReport, MoorError> {
    let profiles = select(registry, &request.selector)?;
    let mut report = BatchReport::default();

    for profile in profiles {
        if cancelled.load(Ordering::SeqCst) {
            report.skipped.push(profile.name.clone());
            continue;
        }

        debug!("{} {}", request.action.as_str(), profile.name);
        match controller.apply(request.action, profile).await {
            Ok(()) => report.succeeded.push(profile.name.clone()),
            Err(e) => {
                warn!("{}", e);
                report.failed.push(e);
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::RecordingRunner;

    fn registry() -> ProfileRegistry {
        ProfileRegistry::new(vec![
            Profile::new("alpha", "JBSWY3DPEHPK3PXP"),
            Profile::new("beta", "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"),
            Profile::new("gamma", "MZXW6"),
        ])
    }

    fn request(action: SessionAction, selector: ProfileSelector) -> Request {
        Request { action, selector }
    }

    fn osascript_targets(runner: &RecordingRunner) -> Vec<String> {
        runner
            .calls()
            .into_iter()
            .filter(|c| c.program == "osascript")
            .map(|c| c.args[1].rsplit(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_from_flags() {
        assert_eq!(Request::from_flags(None, None).unwrap(), None);
        assert_eq!(
            Request::from_flags(Some(None), None).unwrap(),
            Some(request(SessionAction::Connect, ProfileSelector::All))
        );
        assert_eq!(
            Request::from_flags(None, Some(Some("home".to_string()))).unwrap(),
            Some(request(
                SessionAction::Disconnect,
                ProfileSelector::Named("home".to_string())
            ))
        );
    }

    #[test]
    fn test_from_flags_rejects_both() {
        let result = Request::from_flags(Some(None), Some(Some("home".to_string())));
        match result {
            Err(MoorError::Usage { message }) => {
                assert_eq!(message, "Cannot connect & disconnect at the same time")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connect_all_in_registry_order() {
        let runner = RecordingRunner::new();
        let controller = SessionController::new(&runner).with_timestamp(59);
        let cancelled = AtomicBool::new(false);

        let report = run_request(
            &registry(),
            &controller,
            &request(SessionAction::Connect, ProfileSelector::All),
            &cancelled,
        )
        .await
        .unwrap();

        assert!(report.is_success());
        assert_eq!(report.succeeded, vec!["alpha", "beta", "gamma"]);

        let programs: Vec<String> = runner.calls().into_iter().map(|c| c.program).collect();
        assert_eq!(
            programs,
            vec!["security", "osascript", "security", "osascript", "security", "osascript"]
        );
        assert_eq!(
            osascript_targets(&runner),
            vec!["\"alpha\"", "\"beta\"", "\"gamma\""]
        );
    }

    #[tokio::test]
    async fn test_disconnect_all_in_registry_order() {
        let runner = RecordingRunner::new();
        let controller = SessionController::new(&runner);
        let cancelled = AtomicBool::new(false);

        let report = run_request(
            &registry(),
            &controller,
            &request(SessionAction::Disconnect, ProfileSelector::All),
            &cancelled,
        )
        .await
        .unwrap();

        assert_eq!(report.succeeded, vec!["alpha", "beta", "gamma"]);
        assert!(runner.calls().iter().all(|c| c.program == "osascript"));
        assert_eq!(
            osascript_targets(&runner),
            vec!["\"alpha\"", "\"beta\"", "\"gamma\""]
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let runner = RecordingRunner::new();
        runner.fail_with_arg("security", "Tunnelblick-Auth-beta");
        let controller = SessionController::new(&runner).with_timestamp(59);
        let cancelled = AtomicBool::new(false);

        let report = run_request(
            &registry(),
            &controller,
            &request(SessionAction::Connect, ProfileSelector::All),
            &cancelled,
        )
        .await
        .unwrap();

        assert_eq!(report.succeeded, vec!["alpha", "gamma"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].profile(), "beta");
        assert!(!report.is_success());
        assert_eq!(
            osascript_targets(&runner),
            vec!["\"alpha\"", "\"gamma\""]
        );
    }

    #[tokio::test]
    async fn test_named_profile_only() {
        let runner = RecordingRunner::new();
        let controller = SessionController::new(&runner).with_timestamp(59);
        let cancelled = AtomicBool::new(false);

        let report = run_request(
            &registry(),
            &controller,
            &request(SessionAction::Connect, ProfileSelector::Named("beta".to_string())),
            &cancelled,
        )
        .await
        .unwrap();

        assert_eq!(report.succeeded, vec!["beta"]);
        assert_eq!(runner.calls().len(), 2);
        assert!(runner.calls()[0].has_arg("Tunnelblick-Auth-beta"));
    }

    #[tokio::test]
    async fn test_unknown_profile_runs_nothing() {
        let runner = RecordingRunner::new();
        let controller = SessionController::new(&runner);
        let cancelled = AtomicBool::new(false);

        let result = run_request(
            &registry(),
            &controller,
            &request(SessionAction::Connect, ProfileSelector::Named("delta".to_string())),
            &cancelled,
        )
        .await;

        assert!(matches!(
            result,
            Err(MoorError::ProfileNotFound { ref name }) if name == "delta"
        ));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_batch_skips_remaining() {
        let runner = RecordingRunner::new();
        let controller = SessionController::new(&runner);
        let cancelled = AtomicBool::new(true);

        let report = run_request(
            &registry(),
            &controller,
            &request(SessionAction::Disconnect, ProfileSelector::All),
            &cancelled,
        )
        .await
        .unwrap();

        assert!(report.succeeded.is_empty());
        assert_eq!(report.skipped, vec!["alpha", "beta", "gamma"]);
        assert!(!report.is_success());
        assert!(runner.calls().is_empty());
    }
}
