//! Structured IRC line handling.
//!
//! The interception point works on parsed messages rather than raw-line
//! pattern matching: an outgoing login is recognised by verb, target
//! address, and argument shape, and an inbound auth confirmation by source
//! identity and notice text. Lines that do not parse simply do not match;
//! they are never an error.

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  IrcMessage
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One parsed IRC line: `[:prefix] COMMAND param* [:trailing]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrcMessage {
    /// Source of the message (without the leading `:`), if present.
    pub prefix: Option<String>,
    /// Verb, case preserved as received.
    pub command: String,
    /// Middle parameters (everything before the trailing parameter).
    pub params: Vec<String>,
    /// Trailing parameter (after ` :`), spaces preserved.
    pub trailing: Option<String>,
}

impl IrcMessage {
    /// Parse a raw IRC line. Returns `None` for lines with no command.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut rest = line.trim_start();

        let prefix = if let Some(after) = rest.strip_prefix(':') {
            let (pfx, tail) = after.split_once(' ')?;
            rest = tail.trim_start();
            Some(pfx.to_string())
        } else {
            None
        };

        let mut params = Vec::new();
        let mut trailing = None;
        let mut command = None;

        while !rest.is_empty() {
            if command.is_some() {
                if let Some(t) = rest.strip_prefix(':') {
                    trailing = Some(t.to_string());
                    break;
                }
            }
            let (word, tail) = match rest.split_once(' ') {
                Some((w, t)) => (w, t.trim_start()),
                None => (rest, ""),
            };
            if command.is_none() {
                command = Some(word.to_string());
            } else {
                params.push(word.to_string());
            }
            rest = tail;
        }

        Some(Self {
            prefix,
            command: command?,
            params,
            trailing,
        })
    }

    /// Render back to wire form.
    pub fn to_line(&self) -> String {
        let mut out = String::new();
        if let Some(pfx) = &self.prefix {
            out.push(':');
            out.push_str(pfx);
            out.push(' ');
        }
        out.push_str(&self.command);
        for p in &self.params {
            out.push(' ');
            out.push_str(p);
        }
        if let Some(t) = &self.trailing {
            out.push_str(" :");
            out.push_str(t);
        }
        out
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Login-command matching
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An outgoing X login command recognised in a parsed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    msg: &'a IrcMessage,
}

impl LoginRequest<'_> {
    /// The same command with ` <code>` appended to the trailing parameter.
    pub fn with_code(&self, code: &str) -> IrcMessage {
        let mut msg = self.msg.clone();
        if let Some(t) = &mut msg.trailing {
            t.push(' ');
            t.push_str(code);
        }
        msg
    }
}

/// Match `PRIVMSG <service_addr> :login <user> <pass>`.
///
/// Verb and address compare case-insensitively; the trailing parameter must
/// carry exactly the literal `login` plus two arguments — a command with a
/// different shape is someone talking to the service, not a login.
pub fn login_request<'a>(msg: &'a IrcMessage, service_addr: &str) -> Option<LoginRequest<'a>> {
    if !msg.command.eq_ignore_ascii_case("PRIVMSG") {
        return None;
    }
    if msg.params.len() != 1 || !msg.params[0].eq_ignore_ascii_case(service_addr) {
        return None;
    }
    let trailing = msg.trailing.as_deref()?;
    let mut words = trailing.split_whitespace();
    let verb = words.next()?;
    if !verb.eq_ignore_ascii_case("login") {
        return None;
    }
    let username = words.next()?;
    let password = words.next()?;
    if words.next().is_some() {
        return None;
    }
    Some(LoginRequest {
        username,
        password,
        msg,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Auth-success matching
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const AUTH_SUCCESS_TEXT: &str = "AUTHENTICATION SUCCESSFUL";

/// Match a `NOTICE` from the expected service identity announcing
/// successful authentication.
pub fn is_auth_success(msg: &IrcMessage, service_ident: &str) -> bool {
    if !msg.command.eq_ignore_ascii_case("NOTICE") {
        return false;
    }
    let from_service = msg
        .prefix
        .as_deref()
        .is_some_and(|p| p.eq_ignore_ascii_case(service_ident));
    if !from_service {
        return false;
    }
    msg.trailing
        .as_deref()
        .is_some_and(|t| t.starts_with(AUTH_SUCCESS_TEXT))
}
