//! # UnderNET X OTP – core
//!
//! Pure one-time-password kernel used for UnderNET X-service login:
//!
//! - **RFC 4226 / 6238** – HOTP & TOTP generation with SHA-1, SHA-256, SHA-512
//! - **Secret codec** – 40-char hex or RFC 4648 Base32, with an explicit
//!   encoding selector for operators who want to pin the format
//! - **otpauth:// URIs** – Parsing & generation per the Google Authenticator spec
//!
//! No I/O and no host knowledge live here; the IRC-side policy layer is in
//! `uotp-irc`.

pub mod otp;

pub use otp::*;
