//! `otpauth://` key-URI parsing and generation per the Google Authenticator
//! format:
//! <https://github.com/google/google-authenticator/wiki/Key-Uri-Format>
//!
//! Operators frequently receive their X-service secret as a key URI, so the
//! codec accepts one as an alternative to raw secret text. Only `totp` URIs
//! are usable here; counter-based (`hotp`) URIs need a durable counter store
//! a client-side generator does not have, and are rejected.

use crate::otp::types::*;
use serde::{Deserialize, Serialize};

/// Result of parsing a key URI: the derivation profile, the Base32 secret
/// text, and the display-only naming fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyUri {
    pub profile: OtpProfile,
    pub secret: String,
    pub label: String,
    pub issuer: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Parse
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Parse an `otpauth://totp/...` URI.
pub fn parse_otpauth_uri(uri: &str) -> Result<KeyUri, OtpError> {
    let url = url::Url::parse(uri)
        .map_err(|e| OtpError::new(OtpErrorKind::InvalidUri, format!("Invalid URI: {}", e)))?;

    if url.scheme() != "otpauth" {
        return Err(OtpError::new(
            OtpErrorKind::InvalidUri,
            format!("Expected scheme 'otpauth', got '{}'", url.scheme()),
        ));
    }

    match url.host_str() {
        Some("totp") => {}
        Some("hotp") => {
            return Err(OtpError::new(
                OtpErrorKind::InvalidUri,
                "Counter-based (hotp) URIs cannot be used for X login",
            ))
        }
        other => {
            return Err(OtpError::new(
                OtpErrorKind::InvalidUri,
                format!("Unknown OTP type: {:?}", other),
            ))
        }
    }

    // Path is "/LABEL" or "/ISSUER:LABEL"
    let path = url.path();
    let path = path.strip_prefix('/').unwrap_or(path);
    let path_decoded = url_decode(path);

    let (path_issuer, label) = if let Some(colon_pos) = path_decoded.find(':') {
        let issuer = path_decoded[..colon_pos].trim().to_string();
        let label = path_decoded[colon_pos + 1..].trim().to_string();
        (Some(issuer), label)
    } else {
        (None, path_decoded.to_string())
    };

    // Query parameters
    let mut secret = None;
    let mut param_issuer = None;
    let mut profile = OtpProfile::default().with_encoding(SecretEncoding::Base32);

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "secret" => secret = Some(value.to_string()),
            "issuer" => param_issuer = Some(value.to_string()),
            "algorithm" => {
                if let Some(algo) = Algorithm::from_str_loose(&value) {
                    profile.algorithm = algo;
                }
            }
            "digits" => {
                if let Ok(d) = value.parse::<u8>() {
                    if d == 6 || d == 7 || d == 8 {
                        profile.digits = d;
                    }
                }
            }
            "period" => {
                if let Ok(p) = value.parse::<u32>() {
                    if p > 0 {
                        profile.period = p;
                    }
                }
            }
            _ => {} // ignore unknown params
        }
    }

    let secret = secret.ok_or_else(|| {
        OtpError::new(OtpErrorKind::InvalidUri, "Missing 'secret' parameter")
    })?;

    // Prefer issuer from query param, then from path prefix
    let issuer = param_issuer.or(path_issuer);

    Ok(KeyUri {
        profile,
        secret,
        label,
        issuer,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Generate
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generate an `otpauth://totp/...` URI, omitting default-valued parameters.
pub fn build_otpauth_uri(key: &KeyUri) -> String {
    let label = url_encode(&key.label);

    let path = match &key.issuer {
        Some(iss) if !iss.is_empty() => format!("{}:{}", url_encode(iss), label),
        _ => label,
    };

    let mut params = vec![format!("secret={}", key.secret)];

    if let Some(ref iss) = key.issuer {
        params.push(format!("issuer={}", url_encode(iss)));
    }

    if key.profile.algorithm != Algorithm::Sha1 {
        params.push(format!("algorithm={}", key.profile.algorithm.uri_name()));
    }

    if key.profile.digits != 6 {
        params.push(format!("digits={}", key.profile.digits));
    }

    if key.profile.period != 30 {
        params.push(format!("period={}", key.profile.period));
    }

    format!("otpauth://totp/{}?{}", path, params.join("&"))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  URL encoding helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn url_encode(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                output.push(byte as char);
            }
            b' ' => output.push_str("%20"),
            b'@' => output.push_str("%40"),
            _ => output.push_str(&format!("%{:02X}", byte)),
        }
    }
    output
}

fn url_decode(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                result.push(byte as char);
            } else {
                result.push('%');
                result.push_str(&hex);
            }
        } else if c == '+' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }
    result
}
