//! Authentication module
//!
//! Handles TOTP generation from profile secrets and keychain credential updates.

pub mod base32;
pub mod credential;
pub mod totp;
