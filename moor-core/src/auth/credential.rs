//! Keychain credential updates
//!
//! Tunnelblick reads a configuration's password from the generic keychain
//! item `Tunnelblick-Auth-<name>` / `password`. The item is upserted with the
//! macOS `security` tool.

use crate::error::CommandError;
use crate::platform::{CommandRunner, Invocation};
use crate::types::{TotpToken, CREDENTIAL_ACCOUNT, CREDENTIAL_SERVICE_PREFIX};
use tracing::debug;

const SECURITY_PROGRAM: &str = "security";

/// Keychain service name for a profile
pub fn credential_service(profile_name: &str) -> String {
    format!("{}{}", CREDENTIAL_SERVICE_PREFIX, profile_name)
}

/// Build the `security add-generic-password` upsert for a profile
pub fn update_invocation(profile_name: &str, token: &TotpToken) -> Invocation {
    Invocation::new(SECURITY_PROGRAM)
        .arg("add-generic-password")
        .arg("-U")
        .arg("-s")
        .arg(credential_service(profile_name))
        .arg("-a")
        .arg(CREDENTIAL_ACCOUNT)
        .arg("-w")
        .secret_arg(token.expose())
}

/// Store `token` as the profile's keychain password, replacing any previous one
pub async fn update_credential<R: CommandRunner>(
    runner: &R,
    profile_name: &str,
    token: &TotpToken,
) -> Result<(), CommandError> {
    runner
        .run(&update_invocation(profile_name, token))
        .await?;
    debug!("Updated keychain item {}", credential_service(profile_name));
    Ok(())
}
