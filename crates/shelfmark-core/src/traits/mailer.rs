//! Outbound mail port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A password-reset mail handed to the platform's mail service.
///
/// The raw token appears only here and in the composed URL; the stored
/// side is a digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetMail {
    /// Recipient address.
    pub to: String,
    /// Fully composed reset URL containing the raw token.
    pub reset_url: String,
    /// Sender address from configuration.
    pub from: String,
}

/// Delivers mail on behalf of the credential subsystem.
///
/// Message formatting and transport are the platform mail service's
/// concern; implementations receive the composed payload and either
/// deliver it or fail.
#[async_trait]
pub trait OutboundMailer: Send + Sync + 'static {
    /// Delivers a password-reset mail.
    async fn send_password_reset(&self, mail: &ResetMail) -> AppResult<()>;
}
