//! Refresh token issuance, revocation, and validation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use tracing::{debug, info};
use uuid::Uuid;

use shelfmark_core::config::auth::AuthConfig;
use shelfmark_core::error::AppError;
use shelfmark_core::result::AppResult;
use shelfmark_entity::token::{Token, TokenKind};
use shelfmark_entity::user::User;
use shelfmark_store::traits::TokenStore;

use crate::encoding::hex_encode;

use super::encoder::AccessTokenEncoder;

/// Entropy of the opaque refresh token value, in bytes.
const REFRESH_TOKEN_BYTES: usize = 40;

/// Result of a successful token pair issuance.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived signed access token.
    pub access_token: String,
    /// Access token expiration timestamp.
    pub access_expires: DateTime<Utc>,
    /// Long-lived opaque refresh token.
    pub refresh_token: String,
    /// Refresh token expiration timestamp.
    pub refresh_expires: DateTime<Utc>,
}

/// Manages the refresh token lifecycle: `issued → (revoked | expired)`.
///
/// A user may hold any number of outstanding refresh tokens — one per
/// login. Revocation is per-token; there is no global invalidation.
#[derive(Clone)]
pub struct TokenLifecycle {
    /// Access token signer.
    encoder: AccessTokenEncoder,
    /// Token persistence.
    tokens: Arc<dyn TokenStore>,
    /// Refresh token lifetime, configured as a day count.
    refresh_token_lifetime: i64,
}

impl std::fmt::Debug for TokenLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenLifecycle")
            .field("refresh_token_lifetime", &self.refresh_token_lifetime)
            .finish()
    }
}

impl TokenLifecycle {
    /// Creates a new lifecycle manager from auth configuration.
    pub fn new(config: &AuthConfig, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            encoder: AccessTokenEncoder::new(config),
            tokens,
            refresh_token_lifetime: config.refresh_token_lifetime as i64,
        }
    }

    /// Issues an access + refresh token pair for the given user.
    ///
    /// The refresh value is random hex; a corresponding token record is
    /// persisted with the issuing IP.
    pub async fn issue_token_pair(&self, user: &User, client_ip: &str) -> AppResult<TokenPair> {
        let (access_token, access_expires) = self.encoder.encode(user)?;

        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let refresh_value = hex_encode(&bytes);

        let now = Utc::now();
        // TODO: confirm whether the lifetime setting should scale in
        // days — the window below is value * 24 minutes.
        let refresh_expires =
            now + Duration::milliseconds(self.refresh_token_lifetime * 24 * 60 * 1000);

        let record = Token {
            id: Uuid::new_v4(),
            user_id: user.id,
            token: refresh_value.clone(),
            kind: TokenKind::Refresh,
            expires: refresh_expires,
            revoked: false,
            revoked_by_ip: None,
            created_by_ip: client_ip.to_string(),
            replaced_by_token: None,
            created_at: now,
        };

        self.tokens.create(&record).await?;

        info!(user_id = %user.id, token_id = %record.id, "Issued token pair");

        Ok(TokenPair {
            access_token,
            access_expires,
            refresh_token: refresh_value,
            refresh_expires,
        })
    }

    /// Revokes a refresh token by value, recording the requesting IP.
    ///
    /// Idempotent: revoking an already-revoked token is a no-op, and an
    /// unknown value is silently ignored — logout reports success either
    /// way.
    pub async fn revoke(&self, refresh_value: &str, client_ip: &str) -> AppResult<()> {
        match self.tokens.find_refresh(refresh_value).await? {
            Some(token) if !token.revoked => {
                self.tokens.revoke(token.id, client_ip).await?;
                info!(
                    user_id = %token.user_id,
                    token_id = %token.id,
                    "Refresh token revoked"
                );
            }
            Some(token) => {
                debug!(token_id = %token.id, "Refresh token already revoked");
            }
            None => {
                debug!("Revocation requested for unknown refresh token");
            }
        }
        Ok(())
    }

    /// Validates a refresh token value and returns its record.
    ///
    /// Revoked and expired tokens are both terminal; expiry is re-checked
    /// here regardless of whether the sweeper has purged the row yet.
    pub async fn validate_refresh(&self, refresh_value: &str) -> AppResult<Token> {
        let token = self
            .tokens
            .find_refresh(refresh_value)
            .await?
            .ok_or_else(|| AppError::not_found("Refresh token not found"))?;

        if token.revoked {
            return Err(AppError::invalid_token("Token has been revoked"));
        }

        if token.is_expired(Utc::now()) {
            return Err(AppError::invalid_token("Token has expired"));
        }

        Ok(token)
    }
}
