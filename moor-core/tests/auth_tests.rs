//! Unit tests for authentication functionality
//!
//! Tests secret decoding and TOTP generation through the public API.

use moor_core::auth::base32::decode_base32;
use moor_core::auth::totp::{generate_totp, generate_totp_now};
use moor_core::error::OtpError;
use moor_core::types::ProfileSecret;

fn secret(s: &str) -> ProfileSecret {
    ProfileSecret::new(s.to_string())
}

#[test]
fn test_example_profile_secret() {
    let token = generate_totp_now(&secret("JBSWY3DPEHPK3PXP")).unwrap();
    assert_eq!(token.expose().len(), 6);
    assert!(token.expose().chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_deterministic_for_fixed_time() {
    let s = secret("JBSWY3DPEHPK3PXP");
    let a = generate_totp(&s, 1_700_000_000).unwrap();
    let b = generate_totp(&s, 1_700_000_000).unwrap();
    assert_eq!(a.expose(), b.expose());
}

#[test]
fn test_tokens_change_across_steps() {
    // Consecutive 30 second steps; a collision across all of them would
    // indicate the time step is not being applied
    let s = secret("JBSWY3DPEHPK3PXP");
    let tokens: Vec<String> = (0..4)
        .map(|step| {
            generate_totp(&s, 1_700_000_010 + step * 30)
                .unwrap()
                .expose()
                .to_string()
        })
        .collect();

    assert!(tokens.windows(2).any(|pair| pair[0] != pair[1]));
}

#[test]
fn test_leading_zeros_preserved() {
    // RFC 6238 SHA-1 vector for T=1234567890 is 89005924
    let token = generate_totp(&secret("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"), 1234567890).unwrap();
    assert_eq!(token.expose(), "005924");
}

#[test]
fn test_grouped_secret_matches_plain() {
    let grouped = generate_totp(&secret("jbsw y3dp ehpk 3pxp"), 59).unwrap();
    let plain = generate_totp(&secret("JBSWY3DPEHPK3PXP"), 59).unwrap();
    assert_eq!(grouped.expose(), plain.expose());
}

#[test]
fn test_invalid_secret() {
    assert_eq!(
        generate_totp(&secret("INVALID@SECRET!"), 59).unwrap_err(),
        OtpError::InvalidSecret
    );
    assert_eq!(decode_base32("0189").unwrap_err(), OtpError::InvalidSecret);
}
