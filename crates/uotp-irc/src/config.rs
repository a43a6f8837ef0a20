//! Per-target configuration schema.
//!
//! The host owns persistence (plugin options, config files, whatever it
//! has); this module owns the shape. Each monitored network gets its own
//! [`TargetConfig`], so several simultaneously connected networks
//! authenticate independently. The secret text itself is never part of the
//! configuration — it stays in the host's secure storage and is fetched
//! through [`crate::service::SecretSource`].

use serde::{Deserialize, Serialize};
use uotp_core::OtpProfile;

/// UnderNET's channel-service login address.
pub const DEFAULT_SERVICE_ADDR: &str = "x@channels.undernet.org";

/// Full identity X notices arrive from.
pub const DEFAULT_SERVICE_IDENT: &str = "X!cservice@undernet.org";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TargetConfig
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One monitored network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// The host's identifier for the connection (server/network name).
    pub server: String,
    /// Address outgoing login commands are sent to.
    #[serde(default = "default_service_addr")]
    pub service_addr: String,
    /// Identity the auth-success notice must come from.
    #[serde(default = "default_service_ident")]
    pub service_ident: String,
    /// OTP derivation parameters.
    #[serde(default)]
    pub profile: OtpProfile,
}

fn default_service_addr() -> String {
    DEFAULT_SERVICE_ADDR.to_string()
}

fn default_service_ident() -> String {
    DEFAULT_SERVICE_IDENT.to_string()
}

impl TargetConfig {
    /// Target with UnderNET defaults.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            service_addr: default_service_addr(),
            service_ident: default_service_ident(),
            profile: OtpProfile::default(),
        }
    }

    pub fn with_profile(mut self, profile: OtpProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_service_addr(mut self, addr: impl Into<String>) -> Self {
        self.service_addr = addr.into();
        self
    }

    pub fn with_service_ident(mut self, ident: impl Into<String>) -> Self {
        self.service_ident = ident.into();
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OtpSettings
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// All monitored targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpSettings {
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

impl OtpSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-target convenience (the common case).
    pub fn single(target: TargetConfig) -> Self {
        Self {
            targets: vec![target],
        }
    }

    pub fn with_target(mut self, target: TargetConfig) -> Self {
        self.targets.push(target);
        self
    }

    /// Look up a target by server name, case-insensitively.
    pub fn get(&self, server: &str) -> Option<&TargetConfig> {
        self.targets
            .iter()
            .find(|t| t.server.eq_ignore_ascii_case(server))
    }

    /// Whether the server is configured for OTP login at all.
    pub fn is_monitored(&self, server: &str) -> bool {
        self.get(server).is_some()
    }
}
