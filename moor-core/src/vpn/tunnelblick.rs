//! Tunnelblick session control
//!
//! Connecting a profile is a two-step sequence: the keychain password is
//! replaced with a fresh TOTP token, then Tunnelblick is asked to connect over
//! AppleScript. Disconnecting only needs the AppleScript step.

use crate::auth::{credential, totp};
use crate::config::Profile;
use crate::error::SessionError;
use crate::platform::{CommandRunner, Invocation};
use crate::types::VPN_APPLICATION;
use tracing::{debug, info};

const OSASCRIPT_PROGRAM: &str = "osascript";

/// Tunnelblick action sent over AppleScript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Connect,
    Disconnect,
}

impl SessionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
        }
    }
}

/// Progress through the connect sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectStage {
    CredentialPending,
    CredentialSet,
    ConnectRequested,
}

/// Quote `value` as an AppleScript string literal
fn applescript_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// Build the `osascript` invocation for an action on a profile
pub fn action_invocation(action: SessionAction, profile_name: &str) -> Invocation {
    let script = format!(
        "tell application {} to {} {}",
        applescript_string(VPN_APPLICATION),
        action.as_str(),
        applescript_string(profile_name)
    );
    Invocation::new(OSASCRIPT_PROGRAM).arg("-e").arg(script)
}

/// Drives Tunnelblick for individual profiles
pub struct SessionController<'a, R: CommandRunner> {
    runner: &'a R,
    /// Fixed clock for reproducible tokens; `None` reads the system time
    timestamp: Option<u64>,
}

impl<'a, R: CommandRunner> SessionController<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self {
            runner,
            timestamp: None,
        }
    }

    /// Generate tokens for a fixed Unix time instead of the system clock
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Refresh the profile's keychain password, then ask Tunnelblick to connect
    ///
    /// Tunnelblick is never contacted when the token cannot be generated or
    /// the keychain update fails.
    pub async fn connect(&self, profile: &Profile) -> Result<(), SessionError> {
        let mut stage = ConnectStage::CredentialPending;
        debug!("{}: {:?}", profile.name, stage);

        let token = match self.timestamp {
            Some(ts) => totp::generate_totp(&profile.secret, ts),
            None => totp::generate_totp_now(&profile.secret),
        }
        .map_err(|source| SessionError::Otp {
            profile: profile.name.clone(),
            source,
        })?;

        credential::update_credential(self.runner, &profile.name, &token)
            .await
            .map_err(|source| SessionError::CredentialStore {
                profile: profile.name.clone(),
                source,
            })?;
        stage = ConnectStage::CredentialSet;
        debug!("{}: {:?}", profile.name, stage);

        self.runner
            .run(&action_invocation(SessionAction::Connect, &profile.name))
            .await
            .map_err(|source| SessionError::Connection {
                profile: profile.name.clone(),
                source,
            })?;
        stage = ConnectStage::ConnectRequested;
        debug!("{}: {:?}", profile.name, stage);

        info!("Requested connection for {}", profile.name);
        Ok(())
    }

    /// Ask Tunnelblick to disconnect the profile
    pub async fn disconnect(&self, profile: &Profile) -> Result<(), SessionError> {
        self.runner
            .run(&action_invocation(SessionAction::Disconnect, &profile.name))
            .await
            .map_err(|source| SessionError::Disconnection {
                profile: profile.name.clone(),
                source,
            })?;

        info!("Requested disconnection for {}", profile.name);
        Ok(())
    }

    /// Run `action` for a single profile
    pub async fn apply(&self, action: SessionAction, profile: &Profile) -> Result<(), SessionError> {
        match action {
            SessionAction::Connect => self.connect(profile).await,
            SessionAction::Disconnect => self.disconnect(profile).await,
        }
    }
}
