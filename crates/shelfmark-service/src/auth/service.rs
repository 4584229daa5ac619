//! Login, logout, and password reset boundary operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use shelfmark_auth::password::PasswordHasher;
use shelfmark_auth::reset::{PasswordResetFlow, ResetRequestOutcome};
use shelfmark_auth::token::{TokenLifecycle, TokenPair};
use shelfmark_core::error::AppError;
use shelfmark_core::result::AppResult;
use shelfmark_entity::audit::AuditLogEntry;
use shelfmark_entity::user::User;
use shelfmark_store::traits::UserStore;

use crate::audit::AuditNotifier;
use crate::context::RequestContext;

/// Caller-facing summary of an authenticated user.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UserSummary {
    /// User identifier.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Staff employee number.
    pub employee_number: String,
    /// Assigned role references.
    pub roles: Vec<Uuid>,
    /// Last successful login before this one.
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            employee_number: user.employee_number.clone(),
            roles: user.roles.clone(),
            last_login: user.last_login,
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginResult {
    /// Issued token pair.
    pub tokens: TokenPair,
    /// The authenticated user.
    pub user: UserSummary,
}

/// The authentication boundary consumed by route handlers.
#[derive(Clone)]
pub struct AuthService {
    /// User persistence.
    users: Arc<dyn UserStore>,
    /// Token issuance and revocation.
    lifecycle: TokenLifecycle,
    /// Password verification.
    hasher: PasswordHasher,
    /// Password reset flow.
    reset: PasswordResetFlow,
    /// Fire-and-forget audit notification.
    audit: AuditNotifier,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish()
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<dyn UserStore>,
        lifecycle: TokenLifecycle,
        reset: PasswordResetFlow,
        audit: AuditNotifier,
    ) -> Self {
        Self {
            users,
            lifecycle,
            hasher: PasswordHasher::new(),
            reset,
            audit,
        }
    }

    /// Authenticates a user and issues a token pair.
    ///
    /// The identifier may be an email address or an employee number.
    /// Unknown identifiers and wrong passwords produce the identical
    /// error, so callers cannot probe which accounts exist.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        client_ip: &str,
    ) -> AppResult<LoginResult> {
        let user = self
            .users
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(invalid_credentials)?;

        let password_valid = self.hasher.verify_password(password, &user.password_hash)?;
        if !password_valid {
            return Err(invalid_credentials());
        }

        let tokens = self.lifecycle.issue_token_pair(&user, client_ip).await?;

        // Best-effort; a failed timestamp update must not undo the login.
        if let Err(e) = self.users.update_last_login(user.id, Utc::now()).await {
            warn!(user_id = %user.id, error = %e, "Failed to update last login");
        }

        self.audit.notify(AuditLogEntry::new(
            user.id,
            "auth.login",
            "user",
            Some(user.id),
            None,
            Some(client_ip.to_string()),
        ));

        info!(user_id = %user.id, "Login successful");

        Ok(LoginResult {
            tokens,
            user: UserSummary::from(&user),
        })
    }

    /// Revokes a refresh token. Always reports success: revocation is
    /// best-effort and a repeated or unknown token is not an error.
    pub async fn logout(&self, refresh_token: &str, ctx: &RequestContext) -> AppResult<()> {
        if let Err(e) = self.lifecycle.revoke(refresh_token, &ctx.client_ip).await {
            warn!(actor_id = %ctx.actor_id, error = %e, "Refresh revocation failed during logout");
        }

        self.audit.notify(AuditLogEntry::new(
            ctx.actor_id,
            "auth.logout",
            "user",
            Some(ctx.actor_id),
            None,
            Some(ctx.client_ip.clone()),
        ));

        Ok(())
    }

    /// Starts a password reset for the given email address.
    pub async fn request_password_reset(
        &self,
        email: &str,
        protocol_host: &str,
    ) -> AppResult<ResetRequestOutcome> {
        self.reset.request(email, protocol_host).await
    }

    /// Checks a reset token without consuming it.
    pub async fn validate_reset_token(&self, token: &str) -> AppResult<()> {
        self.reset.validate(token).await.map(|_| ())
    }

    /// Consumes a reset token and sets the new password.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        let user_id = self.reset.consume(token, new_password).await?;

        self.audit.notify(AuditLogEntry::new(
            user_id,
            "auth.password_reset",
            "user",
            Some(user_id),
            None,
            None,
        ));

        Ok(())
    }
}

/// The single authentication failure for both unknown identifiers and
/// wrong passwords.
fn invalid_credentials() -> AppError {
    AppError::authentication("Invalid credentials")
}
