//! Operator command surface.
//!
//! Thin wrappers the host binds its user commands to; every fallible entry
//! returns `Result<T, String>` so the host can echo the error verbatim.

use crate::service::OtpService;
use crate::session::AuthPhase;
use serde::{Deserialize, Serialize};

/// One row of the status listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetStatus {
    pub server: String,
    /// Whether a live session exists for the server.
    pub connected: bool,
    pub phase: Option<AuthPhase>,
}

/// The `otp` command: current code for a configured server, formatted for
/// the operator. No side effects on the session state machine.
pub fn otp_current_code(svc: &OtpService, server: &str) -> Result<String, String> {
    let code = svc.current_code(server).map_err(|e| e.to_string())?;
    Ok(format!(
        "UnderNET OTP for {}: {} ({}s remaining)",
        server, code.code, code.remaining_seconds
    ))
}

/// Per-target session status.
pub fn otp_status(svc: &OtpService) -> Vec<TargetStatus> {
    svc.settings()
        .targets
        .iter()
        .map(|t| {
            let phase = svc.phase(&t.server);
            TargetStatus {
                server: t.server.clone(),
                connected: phase.is_some(),
                phase,
            }
        })
        .collect()
}

/// Configured target names.
pub fn otp_targets(svc: &OtpService) -> Vec<String> {
    svc.settings()
        .targets
        .iter()
        .map(|t| t.server.clone())
        .collect()
}
