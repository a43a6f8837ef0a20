//! Per-server authentication session.
//!
//! One [`TargetSession`] exists for each configured server while the host is
//! connected to it. The session owns the whole interception lifetime: it is
//! created on `connecting`, dropped on `disconnected`, and replaced wholesale
//! on reconnect — there is no global hook table to keep in sync.

use crate::config::TargetConfig;
use crate::message::{self, IrcMessage, LoginRequest};
use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AuthPhase
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where the session stands with the X service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    /// Codes are appended to outgoing login commands.
    AwaitingAuth,
    /// Login confirmed; outgoing commands pass through untouched.
    Authenticated,
}

impl fmt::Display for AuthPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingAuth => write!(f, "awaiting auth"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TargetSession
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The two-state login-attach policy for one server.
#[derive(Debug, Clone)]
pub struct TargetSession {
    config: TargetConfig,
    phase: AuthPhase,
}

impl TargetSession {
    /// A fresh session always starts awaiting authentication.
    pub fn new(config: TargetConfig) -> Self {
        Self {
            config,
            phase: AuthPhase::AwaitingAuth,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// True while outgoing logins should get a code appended.
    pub fn wants_code(&self) -> bool {
        self.phase == AuthPhase::AwaitingAuth
    }

    /// Feed an inbound message; returns true on the
    /// `AwaitingAuth → Authenticated` transition.
    ///
    /// Anything that is not the expected success notice — including a
    /// malformed line — is a no-op, and so is a success notice arriving
    /// after authentication already completed.
    pub fn observe_notice(&mut self, msg: &IrcMessage) -> bool {
        if self.phase == AuthPhase::Authenticated {
            return false;
        }
        if message::is_auth_success(msg, &self.config.service_ident) {
            self.phase = AuthPhase::Authenticated;
            log::info!(
                "{}: X authentication confirmed, stopping OTP interception",
                self.config.server
            );
            return true;
        }
        false
    }

    /// Match an outgoing message as a login command needing a code.
    ///
    /// Returns `None` once authenticated — interception stops until the
    /// session is replaced by a reconnect.
    pub fn match_login<'a>(&self, msg: &'a IrcMessage) -> Option<LoginRequest<'a>> {
        if !self.wants_code() {
            return None;
        }
        message::login_request(msg, &self.config.service_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TargetSession {
        TargetSession::new(TargetConfig::new("undernet"))
    }

    fn msg(line: &str) -> IrcMessage {
        IrcMessage::parse(line).unwrap()
    }

    const LOGIN: &str = "PRIVMSG x@channels.undernet.org :login alice hunter2";
    const SUCCESS: &str =
        ":X!cservice@undernet.org NOTICE alice :AUTHENTICATION SUCCESSFUL as alice";

    #[test]
    fn starts_awaiting() {
        let s = session();
        assert_eq!(s.phase(), AuthPhase::AwaitingAuth);
        assert!(s.wants_code());
    }

    #[test]
    fn login_matched_while_awaiting() {
        let s = session();
        assert!(s.match_login(&msg(LOGIN)).is_some());
    }

    #[test]
    fn success_notice_transitions_once() {
        let mut s = session();
        assert!(s.observe_notice(&msg(SUCCESS)));
        assert_eq!(s.phase(), AuthPhase::Authenticated);
        // Idempotent afterwards.
        assert!(!s.observe_notice(&msg(SUCCESS)));
    }

    #[test]
    fn login_ignored_after_authentication() {
        let mut s = session();
        s.observe_notice(&msg(SUCCESS));
        assert!(s.match_login(&msg(LOGIN)).is_none());
    }

    #[test]
    fn unrelated_notice_is_noop() {
        let mut s = session();
        assert!(!s.observe_notice(&msg(
            ":X!cservice@undernet.org NOTICE alice :Remember to set yourself as idle"
        )));
        assert_eq!(s.phase(), AuthPhase::AwaitingAuth);
    }

    #[test]
    fn forged_source_is_noop() {
        let mut s = session();
        assert!(!s.observe_notice(&msg(
            ":mallory!x@example.com NOTICE alice :AUTHENTICATION SUCCESSFUL as alice"
        )));
        assert!(s.wants_code());
    }

    #[test]
    fn replacement_resets_phase() {
        let mut s = session();
        s.observe_notice(&msg(SUCCESS));
        // What the service does on reconnect.
        s = TargetSession::new(s.config().clone());
        assert!(s.wants_code());
    }

    #[test]
    fn custom_service_addresses_respected() {
        let cfg = TargetConfig::new("testnet")
            .with_service_addr("q@cserve.testnet.org")
            .with_service_ident("Q!cserve@testnet.org");
        let mut s = TargetSession::new(cfg);
        assert!(s.match_login(&msg(LOGIN)).is_none());
        assert!(s
            .match_login(&msg("PRIVMSG q@cserve.testnet.org :login bob pw"))
            .is_some());
        assert!(!s.observe_notice(&msg(SUCCESS)));
        assert!(s.observe_notice(&msg(
            ":Q!cserve@testnet.org NOTICE bob :AUTHENTICATION SUCCESSFUL"
        )));
    }
}
