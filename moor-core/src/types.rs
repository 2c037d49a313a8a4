//! Type definitions and wrappers for secure data handling
//!
//! This module provides type-safe wrappers for sensitive data using the
//! secrecy crate to prevent accidental exposure in logs or debug output.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

/// Wrapper for a profile's shared TOTP secret
///
/// Deserialized straight from the profile file and never printed, even in
/// debug output.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "String")]
pub struct ProfileSecret(Secret<String>);

impl ProfileSecret {
    /// Create a new ProfileSecret from its textual (Base32) form
    pub fn new(secret: String) -> Self {
        Self(Secret::new(secret))
    }

    /// Expose the secret value (use with caution!)
    ///
    /// Only the TOTP generator should need this.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for ProfileSecret {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

/// Wrapper for generated TOTP tokens
///
/// Generated OTP tokens should also be treated as sensitive data
/// and never logged, even though they have a short lifetime.
#[derive(Clone, Debug)]
pub struct TotpToken(Secret<String>);

impl TotpToken {
    /// Create a new TotpToken from a generated token string
    pub fn new(token: String) -> Self {
        Self(Secret::new(token))
    }

    /// Expose the token value (use with caution!)
    ///
    /// This should only be called when handing the token to the
    /// credential store.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Application driven through AppleScript
pub const VPN_APPLICATION: &str = "Tunnelblick";

/// Keychain service prefix Tunnelblick reads per-configuration passwords from
pub const CREDENTIAL_SERVICE_PREFIX: &str = "Tunnelblick-Auth-";

/// Keychain account holding the password for a Tunnelblick configuration
pub const CREDENTIAL_ACCOUNT: &str = "password";

/// RFC 6238 time step in seconds
pub const TOTP_STEP_SECS: u64 = 30;

/// Number of digits in a generated token
pub const TOTP_DIGITS: u32 = 6;

/// Upper bound for a single external command, in seconds
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;
