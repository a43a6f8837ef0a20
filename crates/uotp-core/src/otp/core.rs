//! Core OTP generation — RFC 4226 (HOTP) and RFC 6238 (TOTP).
//!
//! Implements HMAC-based One-Time Password with SHA-1, SHA-256, and SHA-512,
//! time-step calculation, and code derivation for an [`OtpProfile`].
//!
//! Everything here is a pure function of its inputs: the time-step counter
//! is recomputed on every call and nothing is cached, so two calls in the
//! same window always agree and a call in the next window picks it up
//! immediately.

use crate::otp::secret;
use crate::otp::types::*;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Raw HMAC-OTP (RFC 4226 §5.3)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute an HOTP code for the given raw key bytes and counter.
///
/// The counter is serialised as 8 big-endian bytes; HMAC accepts any key
/// length, so there is no failure path here.
pub fn hotp_raw(key: &[u8], counter: u64, digits: u8, algo: Algorithm) -> String {
    let hmac_result = compute_hmac(key, &counter.to_be_bytes(), algo);
    truncate(&hmac_result, digits)
}

/// Compute HMAC(key, message) using the specified algorithm.
fn compute_hmac(key: &[u8], data: &[u8], algo: Algorithm) -> Vec<u8> {
    match algo {
        Algorithm::Sha1 => {
            let mut mac =
                Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac =
                Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac =
                Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

/// Dynamic truncation per RFC 4226 §5.3.
///
/// The offset comes from the low nibble of the digest's last byte; the four
/// bytes there form a big-endian value whose top bit is cleared to avoid
/// sign ambiguity.
fn truncate(hmac_result: &[u8], digits: u8) -> String {
    let offset = (hmac_result[hmac_result.len() - 1] & 0x0f) as usize;
    let binary = ((hmac_result[offset] as u32 & 0x7f) << 24)
        | ((hmac_result[offset + 1] as u32) << 16)
        | ((hmac_result[offset + 2] as u32) << 8)
        | (hmac_result[offset + 3] as u32);
    let modulus = 10u32.pow(digits as u32);
    let code = binary % modulus;
    format!("{:0>width$}", code, width = digits as usize)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Time steps (RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute the time-step counter for a given unix timestamp.
pub fn time_step_at(unix_seconds: u64, period: u32) -> u64 {
    unix_seconds / period as u64
}

/// Seconds remaining for a specific timestamp.
pub fn seconds_remaining_at(unix_seconds: u64, period: u32) -> u32 {
    let p = period as u64;
    (p - (unix_seconds % p)) as u32
}

/// Progress fraction for a specific timestamp (0.0 = fresh code,
/// 1.0 = about to expire).
pub fn progress_fraction_at(unix_seconds: u64, period: u32) -> f64 {
    let p = period as f64;
    let elapsed = (unix_seconds % period as u64) as f64;
    elapsed / p
}

/// Current unix timestamp in seconds.
pub fn current_unix_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOTP (time-based, RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generate a TOTP code from raw key bytes at an explicit unix timestamp.
pub fn totp_at(key: &[u8], unix_seconds: u64, digits: u8, period: u32, algo: Algorithm) -> String {
    let step = time_step_at(unix_seconds, period);
    hotp_raw(key, step, digits, algo)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  High-level: generate from profile
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generate a [`GeneratedCode`] for a profile and operator-supplied secret
/// text, at a specific unix timestamp.
///
/// The only failure mode is the secret codec: once the key bytes are in
/// hand, derivation cannot fail.
pub fn generate_code_at(
    profile: &OtpProfile,
    secret_text: &str,
    unix_seconds: u64,
) -> Result<GeneratedCode, OtpError> {
    let key = secret::decode_secret(secret_text, profile.encoding)?;
    let step = time_step_at(unix_seconds, profile.period);
    let code = hotp_raw(&key, step, profile.digits, profile.algorithm);
    Ok(GeneratedCode {
        code,
        remaining_seconds: seconds_remaining_at(unix_seconds, profile.period),
        period: profile.period,
        progress: progress_fraction_at(unix_seconds, profile.period),
        counter: step,
    })
}

/// Generate a [`GeneratedCode`] at the current wall-clock time.
pub fn generate_code(profile: &OtpProfile, secret_text: &str) -> Result<GeneratedCode, OtpError> {
    generate_code_at(profile, secret_text, current_unix_time())
}
