//! Non-production mailer.

use async_trait::async_trait;
use tracing::info;

use shelfmark_core::result::AppResult;
use shelfmark_core::traits::mailer::{OutboundMailer, ResetMail};

/// Mailer for development deployments: logs the composed mail instead
/// of delivering it. The real transport lives in the platform's mail
/// service and is injected in its place in production.
#[derive(Debug, Clone, Default)]
pub struct LoggingMailer;

impl LoggingMailer {
    /// Creates a new logging mailer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutboundMailer for LoggingMailer {
    async fn send_password_reset(&self, mail: &ResetMail) -> AppResult<()> {
        info!(
            to = %mail.to,
            from = %mail.from,
            reset_url = %mail.reset_url,
            "Password reset mail (not delivered in this environment)"
        );
        Ok(())
    }
}
