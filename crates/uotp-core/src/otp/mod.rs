//! OTP kernel: sub-modules.

pub mod types;
pub mod core;
pub mod secret;
pub mod uri;

// Re-export top-level items for convenience.
pub use types::*;
