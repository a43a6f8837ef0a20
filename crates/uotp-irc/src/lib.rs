//! # UnderNET X OTP – IRC glue
//!
//! The policy layer that sits between a chat client and the OTP kernel in
//! `uotp-core`:
//!
//! - [`message`] — structured IRC line parsing and login/notice matching
//! - [`config`] — per-target configuration schema
//! - [`session`] — the per-server AWAITING-AUTH / AUTHENTICATED state machine
//! - [`service`] — event entry points and host-collaborator seams
//! - [`commands`] — operator command surface (`otp`, status, targets)
//!
//! The host dispatches its connection events and outgoing lines into
//! [`service::OtpService`] from its single event thread; nothing here blocks,
//! performs I/O, or spawns.

pub mod message;
pub mod config;
pub mod session;
pub mod service;
pub mod commands;

// Convenience re-exports
pub use commands::*;
pub use config::{OtpSettings, TargetConfig};
pub use service::{Clock, DiagnosticSink, OtpService, SecretSource, SystemClock};
pub use session::AuthPhase;
