//! Central OTP service — owns the session map, delegates to the kernel.
//!
//! The host chat client drives this from its single event thread:
//! connection lifecycle events, inbound notices, and the outgoing-line
//! interception point all arrive synchronously, so the session map needs no
//! locking. The host also supplies the three capabilities the service
//! cannot own itself — wall-clock time, secure secret storage, and an
//! operator-facing print sink.

use crate::config::OtpSettings;
use crate::message::IrcMessage;
use crate::session::{AuthPhase, TargetSession};
use std::collections::HashMap;
use uotp_core::otp::{core, uri};
use uotp_core::{GeneratedCode, OtpError, OtpErrorKind};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Host seams
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Wall-clock seconds source.
pub trait Clock {
    fn now_unix(&self) -> u64;
}

/// System time; what production hosts use.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        core::current_unix_time()
    }
}

/// The host's secure secret storage, keyed by server name.
///
/// Returns the operator-supplied secret text, or `None` when nothing has
/// been set for that server. The service never caches the result.
pub trait SecretSource {
    fn secret_text(&self, server: &str) -> Option<String>;
}

/// Operator-facing output (the host's print/echo facility).
pub trait DiagnosticSink {
    fn print(&self, message: &str);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OtpService
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Event entry points and per-server session state.
pub struct OtpService {
    settings: OtpSettings,
    /// Live sessions keyed by lowercased server name.
    sessions: HashMap<String, TargetSession>,
    clock: Box<dyn Clock>,
    secrets: Box<dyn SecretSource>,
    sink: Box<dyn DiagnosticSink>,
}

fn session_key(server: &str) -> String {
    server.to_ascii_lowercase()
}

impl OtpService {
    /// Service with the system clock.
    pub fn new(
        settings: OtpSettings,
        secrets: Box<dyn SecretSource>,
        sink: Box<dyn DiagnosticSink>,
    ) -> Self {
        Self::with_clock(settings, Box::new(SystemClock), secrets, sink)
    }

    /// Service with an explicit clock.
    pub fn with_clock(
        settings: OtpSettings,
        clock: Box<dyn Clock>,
        secrets: Box<dyn SecretSource>,
        sink: Box<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            settings,
            sessions: HashMap::new(),
            clock,
            secrets,
            sink,
        }
    }

    pub fn settings(&self) -> &OtpSettings {
        &self.settings
    }

    /// Phase of the live session for a server, if connected.
    pub fn phase(&self, server: &str) -> Option<AuthPhase> {
        self.sessions.get(&session_key(server)).map(|s| s.phase())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Connection lifecycle
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// The host is (re)connecting to a server. A configured server gets a
    /// fresh session, replacing any stale one — the reset transition.
    pub fn on_connecting(&mut self, server: &str) {
        let Some(cfg) = self.settings.get(server) else {
            return;
        };
        log::info!("{}: connecting, arming X OTP login", server);
        self.sessions
            .insert(session_key(server), TargetSession::new(cfg.clone()));
    }

    /// The host lost the connection; the session goes with it.
    pub fn on_disconnected(&mut self, server: &str) {
        if self.sessions.remove(&session_key(server)).is_some() {
            log::debug!("{}: disconnected, dropping OTP session", server);
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Inbound / outbound hooks
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Feed an inbound raw line; returns true when it completed
    /// authentication for this server.
    pub fn on_notice(&mut self, server: &str, line: &str) -> bool {
        let Some(session) = self.sessions.get_mut(&session_key(server)) else {
            return false;
        };
        let Some(msg) = IrcMessage::parse(line) else {
            return false;
        };
        session.observe_notice(&msg)
    }

    /// The interception point for outgoing lines.
    ///
    /// While the server's session awaits authentication, a matching login
    /// command comes back with the current code appended. Everything else —
    /// unknown servers, non-login traffic, unparseable lines, and any
    /// failure to derive a code — comes back unchanged; the outgoing
    /// command is never dropped.
    pub fn before_send(&self, server: &str, line: &str) -> String {
        let Some(session) = self.sessions.get(&session_key(server)) else {
            return line.to_string();
        };
        let Some(msg) = IrcMessage::parse(line) else {
            return line.to_string();
        };
        let Some(req) = session.match_login(&msg) else {
            return line.to_string();
        };
        match self.generate_for(server) {
            Ok(generated) => {
                log::debug!("{}: appending OTP to login for {}", server, req.username);
                req.with_code(&generated.code).to_line()
            }
            Err(err) => {
                self.report_generation_failure(server, &err);
                line.to_string()
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Code generation
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Current code for a configured server, on demand.
    ///
    /// Works whether or not a session is live and never touches the state
    /// machine (the `otp` operator command).
    pub fn current_code(&self, server: &str) -> Result<GeneratedCode, OtpError> {
        self.generate_for(server)
    }

    fn generate_for(&self, server: &str) -> Result<GeneratedCode, OtpError> {
        let cfg = self.settings.get(server).ok_or_else(|| {
            OtpError::new(
                OtpErrorKind::NoSecretConfigured,
                format!("No OTP target configured for {}", server),
            )
        })?;
        let secret = self.secrets.secret_text(server).unwrap_or_default();
        let now = self.clock.now_unix();
        // Operators may store the whole provisioning URI instead of bare
        // secret text; the URI then carries its own derivation parameters.
        let trimmed = secret.trim();
        if trimmed.starts_with("otpauth://") {
            let key = uri::parse_otpauth_uri(trimmed)?;
            return core::generate_code_at(&key.profile, &key.secret, now);
        }
        core::generate_code_at(&cfg.profile, &secret, now)
    }

    /// One diagnostic per failed attempt; no retries, no deduplication.
    fn report_generation_failure(&self, server: &str, err: &OtpError) {
        let text = match err.kind {
            OtpErrorKind::NoSecretConfigured => format!(
                "{}: no OTP secret set; sending login without a code",
                server
            ),
            _ => format!(
                "{}: could not derive OTP ({}); sending login without a code",
                server, err
            ),
        };
        log::warn!("{}", text);
        self.sink.print(&text);
    }
}
