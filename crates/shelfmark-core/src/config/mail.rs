//! Outbound mail configuration.

use serde::{Deserialize, Serialize};

/// Outbound mail settings for the password reset flow.
///
/// Message formatting and transport belong to the platform's mail
/// service; this subsystem only composes the reset URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Sender address placed on reset mails.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Path component of the reset URL, appended to the caller's
    /// protocol + host.
    #[serde(default = "default_reset_path")]
    pub reset_path: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_address: default_from_address(),
            reset_path: default_reset_path(),
        }
    }
}

fn default_from_address() -> String {
    "no-reply@shelfmark.local".to_string()
}

fn default_reset_path() -> String {
    "/reset-password".to_string()
}
