//! TOTP (Time-based One-Time Password) generation
//!
//! Implements RFC 6238 TOTP (HMAC-SHA1, 30 second step, 6 digits) using the
//! totp-lite crate for the HOTP computation and dynamic truncation.

use crate::auth::base32::decode_base32;
use crate::error::OtpError;
use crate::types::{ProfileSecret, TotpToken, TOTP_DIGITS, TOTP_STEP_SECS};
use std::time::{SystemTime, UNIX_EPOCH};
use totp_lite::Sha1;

/// Generate the token valid at `timestamp` (seconds since the Unix epoch)
///
/// Tokens are left-zero-padded to six digits. A secret that is not Base32, or
/// that decodes to no key material at all, yields [`OtpError::InvalidSecret`].
pub fn generate_totp(secret: &ProfileSecret, timestamp: u64) -> Result<TotpToken, OtpError> {
    let key = decode_base32(secret.expose())?;
    if key.is_empty() {
        return Err(OtpError::InvalidSecret);
    }

    let token = totp_lite::totp_custom::<Sha1>(TOTP_STEP_SECS, TOTP_DIGITS, &key, timestamp);
    Ok(TotpToken::new(token))
}

/// Generate the token for the current wall-clock time
pub fn generate_totp_now(secret: &ProfileSecret) -> Result<TotpToken, OtpError> {
    generate_totp(secret, unix_time()?)
}

/// Current time in seconds since the Unix epoch
pub fn unix_time() -> Result<u64, OtpError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .map_err(|_| OtpError::TimeError)
}
