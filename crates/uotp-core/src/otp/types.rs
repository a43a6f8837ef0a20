//! Core types for the OTP kernel.

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Algorithm
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Hash algorithm used for HMAC-based OTP.
///
/// UnderNET X verifies SHA-1 codes; the other variants are reachable
/// through configuration and `otpauth://` URIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Sha1
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
            Self::Sha512 => write!(f, "SHA512"),
        }
    }
}

impl Algorithm {
    /// Parse from a case-insensitive string.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SHA1" | "SHA-1" | "HMACSHA1" | "HMAC-SHA1" => Some(Self::Sha1),
            "SHA256" | "SHA-256" | "HMACSHA256" | "HMAC-SHA256" => Some(Self::Sha256),
            "SHA512" | "SHA-512" | "HMACSHA512" | "HMAC-SHA512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// URI-safe name for `otpauth://` parameters.
    pub fn uri_name(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Secret encoding
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Textual encoding of the shared secret.
///
/// `Auto` keeps the historical convention: a 40-character string is taken
/// as hex (the natural length of a SHA-1 key), anything else as Base32.
/// Operators who want to remove the guesswork pin `Hex` or `Base32`
/// explicitly in the target configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretEncoding {
    Auto,
    Hex,
    Base32,
}

impl Default for SecretEncoding {
    fn default() -> Self {
        Self::Auto
    }
}

impl fmt::Display for SecretEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Hex => write!(f, "hex"),
            Self::Base32 => write!(f, "base32"),
        }
    }
}

impl SecretEncoding {
    /// Parse from a case-insensitive string.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "hex" | "hexadecimal" => Some(Self::Hex),
            "base32" | "b32" => Some(Self::Base32),
            _ => None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OTP profile
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Derivation parameters for one authentication target.
///
/// The secret text itself is not stored here — it lives in the host's
/// secure storage and is fetched fresh for every generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpProfile {
    /// How the operator-supplied secret text is encoded.
    #[serde(default)]
    pub encoding: SecretEncoding,
    /// Hash algorithm.
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Number of digits in the generated code (6 or 8).
    #[serde(default = "default_digits")]
    pub digits: u8,
    /// Time period in seconds (typically 30).
    #[serde(default = "default_period")]
    pub period: u32,
}

fn default_digits() -> u8 {
    6
}

fn default_period() -> u32 {
    30
}

impl Default for OtpProfile {
    fn default() -> Self {
        Self {
            encoding: SecretEncoding::Auto,
            algorithm: Algorithm::Sha1,
            digits: 6,
            period: 30,
        }
    }
}

impl OtpProfile {
    pub fn with_encoding(mut self, encoding: SecretEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    pub fn with_period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Generated code
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A derived one-time code plus its window bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCode {
    /// The zero-padded decimal code.
    pub code: String,
    /// Seconds until the current window expires.
    pub remaining_seconds: u32,
    /// Window length in seconds.
    pub period: u32,
    /// Progress through the window (0.0 = fresh, 1.0 = about to expire).
    pub progress: f64,
    /// The time-step counter the code was derived from.
    pub counter: u64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Error kind for this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtpErrorKind {
    /// The operator has not set a secret at all.
    NoSecretConfigured,
    InvalidSecret,
    InvalidUri,
    InvalidAlgorithm,
    InvalidDigits,
    InvalidPeriod,
}

/// Crate-level error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpError {
    pub kind: OtpErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl fmt::Display for OtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(d) = &self.detail {
            write!(f, " ({})", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for OtpError {}

impl OtpError {
    pub fn new(kind: OtpErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<OtpError> for String {
    fn from(e: OtpError) -> String {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Algorithm ────────────────────────────────────────────────

    #[test]
    fn algorithm_default_is_sha1() {
        assert_eq!(Algorithm::default(), Algorithm::Sha1);
    }

    #[test]
    fn algorithm_from_str_loose() {
        assert_eq!(Algorithm::from_str_loose("sha1"), Some(Algorithm::Sha1));
        assert_eq!(Algorithm::from_str_loose("SHA-256"), Some(Algorithm::Sha256));
        assert_eq!(Algorithm::from_str_loose("HmacSha512"), Some(Algorithm::Sha512));
        assert_eq!(Algorithm::from_str_loose("md5"), None);
    }

    #[test]
    fn algorithm_display_and_uri_name() {
        assert_eq!(Algorithm::Sha1.to_string(), "SHA1");
        assert_eq!(Algorithm::Sha256.uri_name(), "SHA256");
    }

    // ── SecretEncoding ───────────────────────────────────────────

    #[test]
    fn encoding_default_is_auto() {
        assert_eq!(SecretEncoding::default(), SecretEncoding::Auto);
    }

    #[test]
    fn encoding_from_str_loose() {
        assert_eq!(SecretEncoding::from_str_loose("HEX"), Some(SecretEncoding::Hex));
        assert_eq!(SecretEncoding::from_str_loose("b32"), Some(SecretEncoding::Base32));
        assert_eq!(SecretEncoding::from_str_loose("auto"), Some(SecretEncoding::Auto));
        assert_eq!(SecretEncoding::from_str_loose("base64"), None);
    }

    // ── OtpProfile ───────────────────────────────────────────────

    #[test]
    fn profile_defaults() {
        let p = OtpProfile::default();
        assert_eq!(p.encoding, SecretEncoding::Auto);
        assert_eq!(p.algorithm, Algorithm::Sha1);
        assert_eq!(p.digits, 6);
        assert_eq!(p.period, 30);
    }

    #[test]
    fn profile_builders() {
        let p = OtpProfile::default()
            .with_encoding(SecretEncoding::Base32)
            .with_algorithm(Algorithm::Sha256)
            .with_digits(8)
            .with_period(60);
        assert_eq!(p.encoding, SecretEncoding::Base32);
        assert_eq!(p.algorithm, Algorithm::Sha256);
        assert_eq!(p.digits, 8);
        assert_eq!(p.period, 60);
    }

    #[test]
    fn profile_serde_defaults_for_omitted_fields() {
        let p: OtpProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(p, OtpProfile::default());
        let p: OtpProfile = serde_json::from_str(r#"{"digits": 8}"#).unwrap();
        assert_eq!(p.digits, 8);
        assert_eq!(p.period, 30);
    }

    #[test]
    fn profile_serde_roundtrip() {
        let p = OtpProfile::default().with_encoding(SecretEncoding::Hex);
        let json = serde_json::to_string(&p).unwrap();
        let back: OtpProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    // ── GeneratedCode ────────────────────────────────────────────

    #[test]
    fn generated_code_serde() {
        let code = GeneratedCode {
            code: "123456".into(),
            remaining_seconds: 15,
            period: 30,
            progress: 0.5,
            counter: 55755375,
        };
        let json = serde_json::to_string(&code).unwrap();
        let back: GeneratedCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, "123456");
        assert_eq!(back.remaining_seconds, 15);
    }

    // ── Error ────────────────────────────────────────────────────

    #[test]
    fn error_display() {
        let err = OtpError::new(OtpErrorKind::InvalidSecret, "bad base32")
            .with_detail("extra info");
        let s = err.to_string();
        assert!(s.contains("InvalidSecret"));
        assert!(s.contains("bad base32"));
        assert!(s.contains("extra info"));
    }

    #[test]
    fn error_into_string() {
        let err = OtpError::new(OtpErrorKind::NoSecretConfigured, "no secret set");
        let s: String = err.into();
        assert!(s.contains("NoSecretConfigured"));
    }
}
