//! Password reset request / validate / consume flow.
//!
//! Reset state lives on the user record: a SHA-256 digest of the raw
//! token plus a fixed 30-minute expiry. The raw token leaves the system
//! exactly once, in the delivered mail (or in the response outcome for
//! non-production deployments).

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;
use tracing::{error, info, warn};
use uuid::Uuid;

use shelfmark_core::config::auth::AuthConfig;
use shelfmark_core::config::mail::MailConfig;
use shelfmark_core::error::AppError;
use shelfmark_core::result::AppResult;
use shelfmark_core::traits::mailer::{OutboundMailer, ResetMail};
use shelfmark_store::traits::UserStore;

use crate::encoding::{hex_encode, sha256_hex};
use crate::password::{PasswordHasher, PasswordValidator};

/// Fixed reset token lifetime.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 30;

/// Entropy of the raw reset token, in bytes.
const RESET_TOKEN_BYTES: usize = 32;

/// Outcome of a reset request.
///
/// In production the token travels only by mail and both debug fields
/// are `None`. Non-production deployments carry the raw token and URL
/// here so the flow stays testable without a mail transport.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResetRequestOutcome {
    /// Whether the reset mail was handed off successfully.
    pub email_sent: bool,
    /// Raw token (non-production only).
    pub reset_token: Option<String>,
    /// Composed reset URL (non-production only).
    pub reset_url: Option<String>,
}

/// The password reset state machine:
/// `no-reset-pending → pending → (consumed | expired)`.
#[derive(Clone)]
pub struct PasswordResetFlow {
    /// User persistence.
    users: Arc<dyn UserStore>,
    /// Outbound mail delivery.
    mailer: Arc<dyn OutboundMailer>,
    /// Password hashing for consume.
    hasher: PasswordHasher,
    /// Password policy for consume.
    validator: PasswordValidator,
    /// Mail composition settings.
    mail_config: MailConfig,
    /// Whether this deployment runs in production mode.
    production: bool,
}

impl std::fmt::Debug for PasswordResetFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordResetFlow")
            .field("production", &self.production)
            .finish()
    }
}

impl PasswordResetFlow {
    /// Creates a new reset flow from configuration and collaborators.
    pub fn new(
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn OutboundMailer>,
        auth_config: &AuthConfig,
        mail_config: MailConfig,
        production: bool,
    ) -> Self {
        Self {
            users,
            mailer,
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(auth_config),
            mail_config,
            production,
        }
    }

    /// Starts a reset: generates a one-time token for the given address
    /// and hands the composed mail to the mailer.
    ///
    /// Only the token's digest is stored. If delivery fails in
    /// production the stored digest is rolled back before the failure
    /// surfaces; outside production the raw token is returned in the
    /// outcome instead.
    pub async fn request(
        &self,
        email: &str,
        protocol_host: &str,
    ) -> AppResult<ResetRequestOutcome> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("No account found for that email address"))?;

        let mut bytes = [0u8; RESET_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let raw_token = hex_encode(&bytes);
        let digest = sha256_hex(&raw_token);
        let expires = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        self.users.set_reset_token(user.id, &digest, expires).await?;

        let reset_url = format!(
            "{}{}/{}",
            protocol_host.trim_end_matches('/'),
            self.mail_config.reset_path,
            raw_token
        );

        let mail = ResetMail {
            to: user.email.clone(),
            reset_url: reset_url.clone(),
            from: self.mail_config.from_address.clone(),
        };

        let email_sent = match self.mailer.send_password_reset(&mail).await {
            Ok(()) => {
                info!(user_id = %user.id, "Password reset mail handed off");
                true
            }
            Err(e) => {
                if self.production {
                    if let Err(clear_err) = self.users.clear_reset_token(user.id).await {
                        error!(
                            user_id = %user.id,
                            error = %clear_err,
                            "Failed to roll back reset token after mail failure"
                        );
                    }
                    error!(user_id = %user.id, error = %e, "Password reset mail delivery failed");
                    return Err(AppError::mail("Failed to send password reset email"));
                }
                warn!(
                    user_id = %user.id,
                    error = %e,
                    "Reset mail delivery failed; token stays available in the response"
                );
                false
            }
        };

        if self.production {
            Ok(ResetRequestOutcome {
                email_sent,
                reset_token: None,
                reset_url: None,
            })
        } else {
            Ok(ResetRequestOutcome {
                email_sent,
                reset_token: Some(raw_token),
                reset_url: Some(reset_url),
            })
        }
    }

    /// Checks a presented token without consuming it.
    ///
    /// Expired and unknown tokens are indistinguishable by design.
    pub async fn validate(&self, token: &str) -> AppResult<Uuid> {
        let user = self.lookup(token).await?;
        Ok(user.id)
    }

    /// Consumes a presented token: sets the new password and clears the
    /// reset state, so a second consume of the same token fails.
    pub async fn consume(&self, token: &str, new_password: &str) -> AppResult<Uuid> {
        let user = self.lookup(token).await?;

        self.validator.validate(new_password)?;
        let password_hash = self.hasher.hash_password(new_password)?;

        self.users.update_password(user.id, &password_hash).await?;

        info!(user_id = %user.id, "Password reset completed");
        Ok(user.id)
    }

    /// Shared digest lookup with the uniform invalid-or-expired error.
    async fn lookup(&self, token: &str) -> AppResult<shelfmark_entity::user::User> {
        let digest = sha256_hex(token);
        self.users
            .find_by_reset_token_hash(&digest, Utc::now())
            .await?
            .ok_or_else(|| AppError::invalid_token("Invalid or expired reset token"))
    }
}
