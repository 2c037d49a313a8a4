//! Lenient Base32 decoding for TOTP secrets
//!
//! Secrets are commonly copied from provisioning pages with grouping spaces,
//! lowercase letters or missing padding. Decoding therefore:
//! 1. Removes all whitespace characters
//! 2. Pads to an 8-character boundary
//! 3. Decodes case-insensitively (RFC 4648 alphabet)

use crate::error::OtpError;
use data_encoding::{Encoding, Specification};

const RFC4648_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

fn clean(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Formula: padding_length = (8 - (len % 8)) % 8
fn pad(input: &str) -> String {
    let padding_len = (8 - (input.len() % 8)) % 8;
    format!("{}{}", input, "=".repeat(padding_len))
}

/// RFC 4648 Base32 that ignores leftover bits in the final quantum
///
/// Secrets generated as random Base32 strings rarely end on a byte boundary;
/// authenticator apps drop the extra bits rather than reject the secret.
fn lenient_base32() -> Result<Encoding, OtpError> {
    let mut spec = Specification::new();
    spec.symbols.push_str(RFC4648_SYMBOLS);
    spec.padding = Some('=');
    spec.check_trailing_bits = false;
    spec.encoding().map_err(|_| OtpError::InvalidSecret)
}

/// Decode a Base32 secret into key material
///
/// Existing `=` padding is accepted. Anything the RFC 4648 alphabet cannot
/// represent is reported as [`OtpError::InvalidSecret`].
pub fn decode_base32(input: &str) -> Result<Vec<u8>, OtpError> {
    let cleaned = clean(input);
    let unpadded = cleaned.trim_end_matches('=');
    let padded = pad(unpadded);

    lenient_base32()?
        .decode(padded.to_uppercase().as_bytes())
        .map_err(|_| OtpError::InvalidSecret)
}
