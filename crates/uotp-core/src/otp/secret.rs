//! Secret codec — turns operator-supplied secret text into raw key bytes.
//!
//! Two textual encodings are accepted: hexadecimal (the conventional
//! rendering of a 20-byte SHA-1 key is exactly 40 characters) and RFC 4648
//! Base32. Under [`SecretEncoding::Auto`] a 40-character input is taken as
//! hex and anything else as Base32; a 40-character input that fails hex
//! decoding is an error, never a silent Base32 fallback.

use crate::otp::types::*;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Decode
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Decode secret text into raw key bytes.
///
/// Empty (or whitespace-only) input is [`OtpErrorKind::NoSecretConfigured`],
/// distinct from malformed input which is [`OtpErrorKind::InvalidSecret`].
pub fn decode_secret(text: &str, encoding: SecretEncoding) -> Result<Vec<u8>, OtpError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(OtpError::new(
            OtpErrorKind::NoSecretConfigured,
            "No OTP secret set",
        ));
    }

    match encoding {
        SecretEncoding::Hex => decode_hex(text),
        SecretEncoding::Base32 => decode_base32(text),
        SecretEncoding::Auto => {
            if text.len() == 40 {
                decode_hex(text).map_err(|e| {
                    e.with_detail("40-character secrets are taken as hex; set the encoding to base32 to override")
                })
            } else {
                decode_base32(text)
            }
        }
    }
}

/// Strict case-insensitive hex decode.
fn decode_hex(text: &str) -> Result<Vec<u8>, OtpError> {
    hex::decode(text).map_err(|e| {
        OtpError::new(OtpErrorKind::InvalidSecret, "Invalid hex secret")
            .with_detail(e.to_string())
    })
}

/// Base32 decode (case-insensitive; spaces and dashes ignored; missing `=`
/// padding tolerated).
fn decode_base32(text: &str) -> Result<Vec<u8>, OtpError> {
    let cleaned = text.replace(' ', "").replace('-', "").to_uppercase();
    if cleaned.is_empty() {
        return Err(OtpError::new(
            OtpErrorKind::InvalidSecret,
            "Invalid base-32 secret",
        ));
    }
    let padded = pad_base32(&cleaned);
    base32::decode(base32::Alphabet::Rfc4648 { padding: true }, &padded)
        .or_else(|| base32::decode(base32::Alphabet::Rfc4648 { padding: false }, &cleaned))
        .ok_or_else(|| OtpError::new(OtpErrorKind::InvalidSecret, "Invalid base-32 secret"))
}

/// Pad a base-32 string to a multiple of 8 with '='.
fn pad_base32(s: &str) -> String {
    let remainder = s.len() % 8;
    if remainder == 0 {
        s.to_string()
    } else {
        let pad_count = 8 - remainder;
        format!("{}{}", s, "=".repeat(pad_count))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Encode / generate
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Encode raw bytes to base-32 (no padding, uppercase).
pub fn encode_secret(bytes: &[u8]) -> String {
    base32::encode(base32::Alphabet::Rfc4648 { padding: false }, bytes)
}

/// Generate a cryptographically-random base-32 secret.
pub fn generate_secret(byte_length: usize) -> String {
    let mut buf = vec![0u8; byte_length];
    use rand::RngCore;
    rand::thread_rng().fill_bytes(&mut buf);
    encode_secret(&buf)
}

/// Check whether secret text decodes under the given encoding.
pub fn is_valid_secret(text: &str, encoding: SecretEncoding) -> bool {
    decode_secret(text, encoding).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Hex rendering of the ASCII key "12345678901234567890".
    const HEX_40: &str = "3132333435363738393031323334353637383930";

    // ── Auto dispatch ────────────────────────────────────────────

    #[test]
    fn auto_40_chars_is_hex() {
        let bytes = decode_secret(HEX_40, SecretEncoding::Auto).unwrap();
        assert_eq!(bytes, b"12345678901234567890");
    }

    #[test]
    fn auto_40_chars_uppercase_hex() {
        let bytes = decode_secret(&HEX_40.to_uppercase(), SecretEncoding::Auto).unwrap();
        assert_eq!(bytes, b"12345678901234567890");
    }

    #[test]
    fn auto_40_chars_bad_hex_does_not_fall_back() {
        // 'u' is a perfectly fine Base32 letter, so a silent fallback
        // would decode this to garbage instead of failing.
        let with_u = format!("u{}", &HEX_40[1..]);
        assert_eq!(with_u.len(), 40);
        let err = decode_secret(&with_u, SecretEncoding::Auto).unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::InvalidSecret);
        assert!(err.detail.is_some());
    }

    #[test]
    fn auto_other_lengths_are_base32() {
        let bytes = decode_secret("JBSWY3DPEHPK3PXP", SecretEncoding::Auto).unwrap();
        assert_eq!(bytes, b"Hello!\xde\xad\xbe\xef");
    }

    // ── Explicit hex ─────────────────────────────────────────────

    #[test]
    fn hex_any_even_length() {
        assert_eq!(decode_secret("00ff", SecretEncoding::Hex).unwrap(), vec![0x00, 0xff]);
    }

    #[test]
    fn hex_odd_length_fails() {
        let err = decode_secret("abc", SecretEncoding::Hex).unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::InvalidSecret);
    }

    #[test]
    fn hex_rejects_non_hex() {
        assert!(decode_secret("zz", SecretEncoding::Hex).is_err());
    }

    // ── Explicit base32 ──────────────────────────────────────────

    #[test]
    fn base32_unpadded() {
        let bytes = decode_secret("JBSWY3DP", SecretEncoding::Base32).unwrap();
        assert_eq!(bytes, b"Hello");
    }

    #[test]
    fn base32_padded() {
        let bytes = decode_secret("JBSWY3DPEB3W64TMMQ======", SecretEncoding::Base32).unwrap();
        assert_eq!(bytes, b"Hello world");
    }

    #[test]
    fn base32_odd_group_without_padding() {
        // 11 bytes encode to 18 base-32 chars; decoding must tolerate the
        // missing "======".
        let bytes = decode_secret("JBSWY3DPEB3W64TMMQ", SecretEncoding::Base32).unwrap();
        assert_eq!(bytes, b"Hello world");
    }

    #[test]
    fn base32_case_insensitive_with_separators() {
        let clean = decode_secret("JBSWY3DPEHPK3PXP", SecretEncoding::Base32).unwrap();
        let spaced = decode_secret("jbsw y3dp ehpk 3pxp", SecretEncoding::Base32).unwrap();
        let dashed = decode_secret("JBSW-Y3DP-EHPK-3PXP", SecretEncoding::Base32).unwrap();
        assert_eq!(clean, spaced);
        assert_eq!(spaced, dashed);
    }

    #[test]
    fn base32_invalid() {
        let err = decode_secret("!!!", SecretEncoding::Base32).unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::InvalidSecret);
    }

    #[test]
    fn base32_only_separators() {
        assert!(decode_secret("- - -", SecretEncoding::Base32).is_err());
    }

    #[test]
    fn explicit_base32_overrides_40_char_heuristic() {
        // 40 Base32 characters (25 bytes) would be rejected as hex under
        // Auto, which is exactly what the explicit selector is for.
        let b32_40 = "JBSWY3DPEHPK3PXPJBSWY3DPEHPK3PXPJBSWY3DP";
        assert_eq!(b32_40.len(), 40);
        assert!(decode_secret(b32_40, SecretEncoding::Auto).is_err());
        let bytes = decode_secret(b32_40, SecretEncoding::Base32).unwrap();
        assert_eq!(bytes.len(), 25);
    }

    // ── Missing secret ───────────────────────────────────────────

    #[test]
    fn empty_is_no_secret_configured() {
        let err = decode_secret("", SecretEncoding::Auto).unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::NoSecretConfigured);
        let err = decode_secret("   ", SecretEncoding::Base32).unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::NoSecretConfigured);
    }

    // ── Encode / generate ────────────────────────────────────────

    #[test]
    fn decode_encode_roundtrip() {
        let original = b"hello world secret";
        let b32 = encode_secret(original);
        let decoded = decode_secret(&b32, SecretEncoding::Base32).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn generate_secret_length() {
        let s = generate_secret(20);
        assert!(!s.is_empty());
        let bytes = decode_secret(&s, SecretEncoding::Base32).unwrap();
        assert_eq!(bytes.len(), 20);
    }

    #[test]
    fn is_valid_secret_check() {
        assert!(is_valid_secret("JBSWY3DPEHPK3PXP", SecretEncoding::Auto));
        assert!(is_valid_secret(HEX_40, SecretEncoding::Hex));
        assert!(!is_valid_secret("", SecretEncoding::Auto));
        assert!(!is_valid_secret("!!!", SecretEncoding::Base32));
    }
}
