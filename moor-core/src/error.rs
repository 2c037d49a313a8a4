//! Error types for the moor VPN CLI tool
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.

use thiserror::Error;

/// Main error type for the moor application
#[derive(Error, Debug)]
pub enum MoorError {
    /// Errors related to loading the profile file
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to OTP/TOTP operations
    #[error("OTP error: {0}")]
    Otp(#[from] OtpError),

    /// Errors raised while driving a profile's session
    #[error("{0}")]
    Session(#[from] SessionError),

    /// Conflicting or otherwise unusable command-line flags
    #[error("{message}")]
    Usage { message: String },

    /// A profile name that is not present in the registry
    #[error("Profile not found: {name}")]
    ProfileNotFound { name: String },

    /// The host is not macOS
    #[error("Only OS X/macOS supported")]
    UnsupportedPlatform,
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error reading config file {path}: {message}")]
    LoadFailed { path: String, message: String },

    #[error("Error parsing config file {path}: {message}")]
    ParseFailed { path: String, message: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("Could not determine config file location: {message}")]
    PathUnavailable { message: String },
}

/// OTP/TOTP operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid TOTP secret")]
    InvalidSecret,

    #[error("System time error")]
    TimeError,
}

/// Failure of a single external command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("failed to start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} timed out after {seconds} seconds")]
    Timeout { program: String, seconds: u64 },

    #[error("{program} exited with {}: {stderr}", exit_label(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

/// Per-profile session errors
///
/// Each variant carries the profile name so batch reports can be printed
/// without extra bookkeeping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Failed generating OTP for {profile}: {source}")]
    Otp { profile: String, source: OtpError },

    #[error("Failed updating credential for {profile}: {source}")]
    CredentialStore {
        profile: String,
        source: CommandError,
    },

    #[error("Failed connecting to {profile}: {source}")]
    Connection {
        profile: String,
        source: CommandError,
    },

    #[error("Failed disconnecting from {profile}: {source}")]
    Disconnection {
        profile: String,
        source: CommandError,
    },
}

impl SessionError {
    /// Name of the profile the error belongs to
    pub fn profile(&self) -> &str {
        match self {
            Self::Otp { profile, .. }
            | Self::CredentialStore { profile, .. }
            | Self::Connection { profile, .. }
            | Self::Disconnection { profile, .. } => profile,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MoorError>;
